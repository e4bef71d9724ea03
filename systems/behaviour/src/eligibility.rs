//! Predicates deciding which cells, items and creatures a policy may target.

use dino_park_core::{
    CellCoord, CreatureId, CreatureSnapshot, Direction, FlightMode, FoodKind, FoodSource,
    GrowthStage, ItemKind, Species, SpatialQuery, CONTESTED_CARCASS_RADIUS,
};

/// Distance at which a creature in `mode` can use a resource.
pub(crate) const fn reach(mode: FlightMode) -> u32 {
    match mode {
        FlightMode::Grounded => 1,
        FlightMode::Flying => 0,
    }
}

/// Water takes priority unless the creature is also hungry and its hit
/// points sit lower than its water.
pub(crate) fn water_comes_first(actor: &CreatureSnapshot) -> bool {
    !(actor.is_hungry() && actor.hit_points < actor.water)
}

/// Food is skipped while thirst is the more pressing need.
pub(crate) fn food_comes_first(actor: &CreatureSnapshot) -> bool {
    !(actor.is_thirsty() && actor.water < actor.hit_points)
}

pub(crate) fn water_at(world: &dyn SpatialQuery, cell: CellCoord) -> Option<CellCoord> {
    world
        .ground_at(cell)
        .filter(|ground| ground.has_water())
        .map(|_| cell)
}

/// First thing on the cell the actor would eat: items in placement order,
/// then fruit on the plant, then fish in the lake.
pub(crate) fn food_at(
    actor: &CreatureSnapshot,
    world: &dyn SpatialQuery,
    cell: CellCoord,
) -> Option<FoodSource> {
    let species = actor.species;
    let edible = world.items_at(cell).iter().find(|item| {
        if species.serving(item.kind.food_kind()).is_none() {
            return false;
        }
        match item.kind {
            ItemKind::Corpse { food, .. } => {
                food > 0 && !(species.can_fly() && is_contested(world, actor.id, cell))
            }
            _ => true,
        }
    });
    if let Some(item) = edible {
        return Some(FoodSource::Item(item.id));
    }

    let ground = world.ground_at(cell)?;
    if species.forage_ground() == Some(ground.kind()) && ground.fruit() > 0 {
        return Some(FoodSource::Plant(cell));
    }
    if species.serving(FoodKind::Fish).is_some() && ground.has_fish() {
        return Some(FoodSource::Fish(cell));
    }
    None
}

/// Another creature lingers close enough to the carcass to fight over it.
fn is_contested(world: &dyn SpatialQuery, actor: CreatureId, carcass: CellCoord) -> bool {
    let (columns, rows) = world.grid_bounds();
    let radius = i64::from(CONTESTED_CARCASS_RADIUS);
    (-radius..=radius).any(|dy| {
        (-radius..=radius).any(|dx| {
            let column = u32::try_from(i64::from(carcass.column()) + dx).ok();
            let row = u32::try_from(i64::from(carcass.row()) + dy).ok();
            let (Some(column), Some(row)) = (column, row) else {
                return false;
            };
            if column >= columns || row >= rows {
                return false;
            }
            world
                .occupant_at(CellCoord::new(column, row))
                .map_or(false, |occupant| occupant != actor)
        })
    })
}

/// Creature on the cell the hunter may strike.
pub(crate) fn prey_at(
    hunter: &CreatureSnapshot,
    world: &dyn SpatialQuery,
    cell: CellCoord,
) -> Option<CreatureId> {
    let prey = world.occupant_at(cell).and_then(|id| world.creature(id))?;
    if prey.id == hunter.id || hunter.recently_attacked(prey.id) {
        return None;
    }
    match (prey.species, prey.mode) {
        (Species::Stegosaur, _) | (Species::Pterodactyl, FlightMode::Grounded) => Some(prey.id),
        _ => None,
    }
}

/// Adult with enough strength and no pressing needs.
pub(crate) fn ready_to_breed(creature: &CreatureSnapshot) -> bool {
    creature.stage == GrowthStage::Adult
        && !creature.pregnant
        && !creature.is_hibernating()
        && !creature.is_hungry()
        && !creature.is_thirsty()
        && creature.hit_points > creature.stats().mating_threshold
}

/// Partner on the cell for a grounded breeder.
pub(crate) fn partner_at(
    actor: &CreatureSnapshot,
    world: &dyn SpatialQuery,
    cell: CellCoord,
) -> Option<CreatureId> {
    let partner = world.occupant_at(cell).and_then(|id| world.creature(id))?;
    let compatible = partner.id != actor.id
        && partner.species == actor.species
        && partner.gender == actor.gender.opposite()
        && partner.mode == FlightMode::Grounded
        && ready_to_breed(partner);
    compatible.then_some(partner.id)
}

/// For a free tree next to a nesting female, the female waiting there.
pub(crate) fn nest_beside(
    actor: &CreatureSnapshot,
    world: &dyn SpatialQuery,
    tree: CellCoord,
) -> Option<CreatureId> {
    if !world.ground_at(tree)?.is_free_tree() {
        return None;
    }
    neighbours(world, tree).find_map(|cell| {
        let female = world.occupant_at(cell).and_then(|id| world.creature(id))?;
        let waiting = female.species == actor.species
            && female.gender == actor.gender.opposite()
            && female.perched
            && female.seeking_mate
            && ready_to_breed(female);
        waiting.then_some(female.id)
    })
}

/// Unoccupied tree a flyer may perch in. A nesting flyer also needs a free
/// tree next door for its partner.
pub(crate) fn perch_at(
    actor: &CreatureSnapshot,
    world: &dyn SpatialQuery,
    cell: CellCoord,
    nesting: bool,
) -> Option<CellCoord> {
    if !open_tree(world, cell, actor.id) {
        return None;
    }
    if nesting && !neighbours(world, cell).any(|next| open_tree(world, next, actor.id)) {
        return None;
    }
    Some(cell)
}

/// Free tree with nobody but `actor` standing on it.
fn open_tree(world: &dyn SpatialQuery, cell: CellCoord, actor: CreatureId) -> bool {
    world
        .ground_at(cell)
        .map_or(false, |ground| ground.is_free_tree())
        && world.occupant_at(cell).map_or(true, |id| id == actor)
}

fn neighbours(world: &dyn SpatialQuery, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
    let bounds = world.grid_bounds();
    Direction::ALL
        .into_iter()
        .filter_map(move |direction| cell.step(direction, bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dino_park_core::{Gender, HibernationCause};

    fn snapshot(hit_points: u32, water: u32) -> CreatureSnapshot {
        CreatureSnapshot {
            id: CreatureId::new(0),
            name: "Stegosaur1".to_owned(),
            species: Species::Stegosaur,
            stage: GrowthStage::Adult,
            gender: Gender::Female,
            cell: CellCoord::new(0, 0),
            hit_points,
            water,
            mode: FlightMode::Grounded,
            fuel: 0,
            hibernation: None,
            pregnant: false,
            perched: false,
            immobile: false,
            seeking_mate: false,
            recently_attacked: Vec::new(),
        }
    }

    #[test]
    fn the_scarcer_resource_wins() {
        let parched = snapshot(80, 10);
        assert!(water_comes_first(&parched));
        assert!(!food_comes_first(&parched));

        let famished = snapshot(10, 30);
        assert!(!water_comes_first(&famished));
        assert!(food_comes_first(&famished));
    }

    #[test]
    fn water_wins_ties() {
        let even = snapshot(20, 20);
        assert!(water_comes_first(&even));
        assert!(food_comes_first(&even));
    }

    #[test]
    fn breeding_needs_a_healthy_adult() {
        assert!(ready_to_breed(&snapshot(95, 80)));
        assert!(!ready_to_breed(&snapshot(85, 80)));

        let mut baby = snapshot(95, 80);
        baby.stage = GrowthStage::Baby;
        assert!(!ready_to_breed(&baby));

        let mut sleeping = snapshot(95, 80);
        sleeping.hibernation = Some(HibernationCause::Water);
        assert!(!ready_to_breed(&sleeping));
    }

    #[test]
    fn flyers_must_hover_over_what_they_use() {
        assert_eq!(reach(FlightMode::Grounded), 1);
        assert_eq!(reach(FlightMode::Flying), 0);
    }
}

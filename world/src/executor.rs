//! Applies the actions creatures decide on.
//!
//! Every action re-validates its preconditions against the current state. A
//! target that moved, died or ran dry between decision and execution turns
//! the action into a no-op that reports "nothing happened" instead of failing.

use dino_park_core::{
    Action, CellCoord, CreatureId, Direction, Event, FlightMode, FoodKind, FoodSource, Gender,
    Ground, HibernationCause, ItemKind, Rejection, RemovalCause, Serving, Species,
    ATTACK_HIT_CHANCE, HUNT_DAMAGE, HUNT_HEAL, INTRINSIC_WEAPON,
};
use tracing::{debug, info};

use crate::{
    creature::{Hibernation, Pregnancy},
    reject, Context, World,
};

/// Furthest a courting flyer may be from the perched female: one step from
/// the tree next to hers.
const FLYER_COURTSHIP_REACH: u32 = 3;

pub(crate) fn execute(
    world: &mut World,
    context: &mut Context,
    id: CreatureId,
    action: Action,
    out_events: &mut Vec<Event>,
) {
    let Some(name) = world.creature(id).map(|creature| creature.name.clone()) else {
        reject(Rejection::UnknownCreature, out_events);
        return;
    };

    let outcome = match action {
        Action::Hibernate => hibernate(world, id, out_events),
        Action::Drink { lake } => drink(world, id, lake),
        Action::Eat { food } => eat(world, id, food, out_events),
        Action::Attack { target } => attack(world, context, id, target, out_events),
        Action::Hunt { target } => hunt(world, id, target, out_events),
        Action::Breed { mate } => breed(world, id, mate, out_events),
        Action::Perch { tree } => perch(world, id, tree),
        Action::Step { direction, .. } => {
            step(world, id, direction, out_events).map(|to| {
                format!(
                    "{name} moved {} to ({}, {})",
                    direction.label(),
                    to.column(),
                    to.row()
                )
            })
        }
        Action::EndTurn => Some(format!("{name} ends its turn")),
    };

    let outcome = outcome.unwrap_or_else(|| {
        debug!(creature = id.get(), action = action.name(), "action had no effect");
        format!("nothing happened for {name} during {}", action.name())
    });
    out_events.push(Event::ActionResolved {
        creature: id,
        action,
        outcome,
    });
}

/// Reports whether a creature in `mode` standing on `from` can interact with
/// a resource on `to`: grounded creatures reach next door, flyers in the air
/// have to be right above it.
fn reaches(mode: FlightMode, from: CellCoord, to: CellCoord) -> bool {
    let distance = from.manhattan_distance(to);
    match mode {
        FlightMode::Grounded => distance <= 1,
        FlightMode::Flying => distance == 0,
    }
}

fn hibernate(world: &mut World, id: CreatureId, out_events: &mut Vec<Event>) -> Option<String> {
    let creature = world.creature_mut(id)?;
    let name = creature.name.clone();
    let stats = creature.species.stats();

    if creature.hibernation.is_none() {
        let cause = if creature.hit_points.is_empty() {
            HibernationCause::Food
        } else if creature.water.is_empty() {
            HibernationCause::Water
        } else {
            return None;
        };
        creature.hibernation = Some(Hibernation {
            cause,
            unconscious_turns: 1,
        });
        info!(creature = id.get(), %name, ?cause, "hibernating");
        out_events.push(Event::CreatureHibernated {
            creature: id,
            cause,
        });
        let need = match cause {
            HibernationCause::Food => "hunger",
            HibernationCause::Water => "thirst",
        };
        return Some(format!("{name} is hibernating due to extreme {need}"));
    }

    let hibernation = creature.hibernation.as_mut()?;
    let (limit, cause) = match hibernation.cause {
        HibernationCause::Food => (stats.food_unconscious_limit, RemovalCause::Starved),
        HibernationCause::Water => (stats.water_unconscious_limit, RemovalCause::Dehydrated),
    };
    if hibernation.unconscious_turns >= limit {
        world.kill(id, cause, out_events);
        return Some(format!("{name} is dead."));
    }
    hibernation.unconscious_turns += 1;
    let turns = hibernation.unconscious_turns;
    Some(format!("{name} has hibernated for {turns} turn(s)"))
}

fn drink(world: &mut World, id: CreatureId, lake: CellCoord) -> Option<String> {
    let creature = world.creature(id)?;
    if !reaches(creature.mode(), creature.cell, lake) {
        return None;
    }
    let amount = creature.species.stats().drink_amount;

    match world.ground_mut(lake)? {
        Ground::Lake { sips, .. } if *sips > 0 => *sips -= 1,
        _ => return None,
    }
    let creature = world.creature_mut(id)?;
    creature.water.fill(amount);
    Some(format!(
        "{} drank some water | current water level is {}",
        creature.name,
        creature.water.value()
    ))
}

fn eat(
    world: &mut World,
    id: CreatureId,
    food: FoodSource,
    out_events: &mut Vec<Event>,
) -> Option<String> {
    let creature = world.creature(id)?;
    let (species, mode, cell) = (creature.species, creature.mode(), creature.cell);

    let (label, healed) = match food {
        FoodSource::Item(item) => {
            let (at, found) = world.find_item(item)?;
            if !reaches(mode, cell, at) {
                return None;
            }
            let serving = species.serving(found.kind.food_kind())?;
            let healed = match (serving, found.kind) {
                (Serving::Portion(value), _) => {
                    let _ = world.remove_item(item, out_events)?;
                    value
                }
                (Serving::Bites(bite), ItemKind::Corpse { .. }) => {
                    let ItemKind::Corpse { food, .. } = &mut world.item_mut(item)?.kind else {
                        return None;
                    };
                    let taken = bite.min(*food);
                    *food -= taken;
                    if *food == 0 {
                        let _ = world.remove_item(item, out_events);
                    }
                    taken
                }
                (Serving::Remaining, ItemKind::Corpse { food, .. }) => {
                    let _ = world.remove_item(item, out_events)?;
                    food
                }
                (Serving::Bites(_) | Serving::Remaining, _) => return None,
            };
            (found.kind.label(), healed)
        }
        FoodSource::Fish(lake) => {
            if !reaches(mode, cell, lake) {
                return None;
            }
            let Some(Serving::Portion(value)) = species.serving(FoodKind::Fish) else {
                return None;
            };
            match world.ground_mut(lake)? {
                Ground::Lake { fish, .. } if *fish > 0 => *fish -= 1,
                _ => return None,
            }
            ("a fish".to_owned(), value)
        }
        FoodSource::Plant(plant) => {
            if !reaches(mode, cell, plant) {
                return None;
            }
            let Some(Serving::Portion(value)) = species.serving(FoodKind::Fruit) else {
                return None;
            };
            let ground = world.ground_mut(plant)?;
            if Some(ground.kind()) != species.forage_ground() {
                return None;
            }
            match ground {
                Ground::Bush { fruit } | Ground::Tree { fruit, .. } if *fruit > 0 => *fruit -= 1,
                _ => return None,
            }
            ("fruit".to_owned(), value)
        }
    };

    let creature = world.creature_mut(id)?;
    creature.hit_points.fill(healed);
    Some(format!(
        "{} has eaten {label} which healed for {healed} HP",
        creature.name
    ))
}

fn attack(
    world: &mut World,
    context: &mut Context,
    id: CreatureId,
    target: CreatureId,
    out_events: &mut Vec<Event>,
) -> Option<String> {
    if id == target {
        return None;
    }
    let attacker = world.creature(id)?.name.clone();
    let victim = world.creature(target)?;
    if world.creature(id)?.cell.manhattan_distance(victim.cell) > 1 {
        return None;
    }
    let victim_name = victim.name.clone();

    if !context.roll(ATTACK_HIT_CHANCE) {
        return Some(format!("{attacker} misses {victim_name}."));
    }

    let weapon = INTRINSIC_WEAPON;
    let victim = world.creature_mut(target)?;
    victim.hit_points.drain(weapon.damage);
    let mut outcome = format!(
        "{attacker} {} {victim_name} for {} damage.",
        weapon.verb, weapon.damage
    );
    if victim.hit_points.is_empty() {
        world.kill(target, RemovalCause::Killed, out_events);
        outcome.push_str(&format!("\n{victim_name} is killed."));
    }
    Some(outcome)
}

fn hunt(
    world: &mut World,
    id: CreatureId,
    target: CreatureId,
    out_events: &mut Vec<Event>,
) -> Option<String> {
    if id == target {
        return None;
    }
    let hunter = world.creature(id)?;
    if !hunter.species.hunts() {
        return None;
    }
    let hunter_cell = hunter.cell;
    let prey = world.creature(target)?;
    if hunter_cell.manhattan_distance(prey.cell) > 1 {
        return None;
    }
    let (prey_species, prey_mode, prey_name) = (prey.species, prey.mode(), prey.name.clone());

    let hunter = world.creature_mut(id)?;
    let _ = hunter.cooldowns.insert(target, 0);
    let hunter_name = hunter.name.clone();

    match (prey_species, prey_mode) {
        (Species::Stegosaur, _) => {
            hunter.hit_points.fill(HUNT_HEAL);
            world.creature_mut(target)?.hit_points.drain(HUNT_DAMAGE);
            Some(format!(
                "{hunter_name} attacked {prey_name} and healed for {HUNT_HEAL} HP"
            ))
        }
        (Species::Pterodactyl, FlightMode::Grounded) => {
            hunter.hit_points.refill();
            let _ = world.remove_creature(target, RemovalCause::Devoured, out_events);
            Some(format!("{hunter_name} devoured {prey_name}"))
        }
        _ => Some(format!("{hunter_name} attacked {prey_name} to no effect")),
    }
}

fn breed(
    world: &mut World,
    id: CreatureId,
    mate: CreatureId,
    out_events: &mut Vec<Event>,
) -> Option<String> {
    if id == mate {
        return None;
    }
    let actor = world.creature(id)?;
    let partner = world.creature(mate)?;
    let species = actor.species;
    let threshold = species.stats().mating_threshold;

    let compatible = partner.species == species && partner.gender == actor.gender.opposite();
    let fit = [actor, partner].iter().all(|creature| {
        !creature.is_pregnant() && creature.hit_points.value() > threshold
    });
    let female = if actor.gender == Gender::Female { actor } else { partner };
    let distance = actor.cell.manhattan_distance(partner.cell);
    let close = if species.can_fly() {
        female.perch().is_some() && distance <= FLYER_COURTSHIP_REACH
    } else {
        distance <= 1
    };
    if !(compatible && fit && close) {
        return None;
    }

    let (female_id, female_name) = (female.id, female.name.clone());
    let (actor_name, partner_name) = (actor.name.clone(), partner.name.clone());

    for participant in [id, mate] {
        if let Some(flight) = world
            .creature_mut(participant)
            .and_then(|creature| creature.flight.as_mut())
        {
            flight.seeking_mate = false;
        }
    }
    let mother = world.creature_mut(female_id)?;
    mother.pregnancy = Some(Pregnancy {
        egg: species,
        turns: 0,
    });
    if species.can_fly() {
        mother.immobile = true;
    }
    info!(creature = female_id.get(), ?species, "conceived");
    out_events.push(Event::CreatureConceived {
        creature: female_id,
    });
    Some(format!(
        "{actor_name} mated with {partner_name}; {female_name} is pregnant"
    ))
}

fn perch(world: &mut World, id: CreatureId, tree: CellCoord) -> Option<String> {
    let creature = world.creature(id)?;
    if creature.cell != tree || creature.perch().is_some() {
        return None;
    }
    if !world.ground(tree)?.is_free_tree() {
        return None;
    }
    let creature = world.creature_mut(id)?;
    let flight = creature.flight.as_mut()?;
    flight.perch = Some(tree);
    flight.mode = FlightMode::Grounded;
    flight.fuel.refill();
    creature.immobile = true;
    let outcome = format!("{} is resting in the tree", creature.name);
    world.set_tree_occupied(tree, true);
    Some(outcome)
}

fn step(
    world: &mut World,
    id: CreatureId,
    direction: Direction,
    out_events: &mut Vec<Event>,
) -> Option<CellCoord> {
    let creature = world.creature(id)?;
    if creature.immobile || creature.hibernation.is_some() {
        return None;
    }
    let to = creature.cell.step(direction, world.bounds())?;
    if !world.is_enterable(to, creature.mode()) {
        return None;
    }
    world.move_creature(id, to, out_events).then_some(to)
}

/// Hand-feeds a creature, waking it if it starved into hibernation.
pub(crate) fn feed(world: &mut World, id: CreatureId, food: FoodKind, out_events: &mut Vec<Event>) {
    let Some(creature) = world.creature_mut(id) else {
        reject(Rejection::UnknownCreature, out_events);
        return;
    };
    let Some(value) = creature.species.hand_fed_value(food) else {
        reject(Rejection::Inedible, out_events);
        return;
    };
    creature.hit_points.fill(value);
    let starving = creature
        .hibernation
        .map_or(false, |hibernation| hibernation.cause == HibernationCause::Food);
    if starving {
        creature.hibernation = None;
        info!(creature = id.get(), name = %creature.name, "revived by feeding");
        out_events.push(Event::CreatureRevived {
            creature: id,
            cause: HibernationCause::Food,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::reaches;
    use dino_park_core::{CellCoord, FlightMode};

    #[test]
    fn grounded_creatures_reach_neighbouring_cells() {
        let origin = CellCoord::new(2, 2);
        assert!(reaches(FlightMode::Grounded, origin, CellCoord::new(2, 3)));
        assert!(!reaches(FlightMode::Grounded, origin, CellCoord::new(3, 3)));
    }

    #[test]
    fn flyers_in_the_air_must_hover_above_the_target() {
        let origin = CellCoord::new(2, 2);
        assert!(reaches(FlightMode::Flying, origin, origin));
        assert!(!reaches(FlightMode::Flying, origin, CellCoord::new(2, 3)));
    }
}

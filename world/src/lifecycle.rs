//! Per-turn bookkeeping: resource decay, growth, gestation, revival and the
//! park clock that incubates eggs and rots corpses.

use dino_park_core::{
    CreatureId, Event, FlightMode, GrowthStage, HibernationCause, ItemId, ItemKind, Rejection,
    Species, ATTACK_COOLDOWN_TURNS, INCUBATION_TURNS, RAIN_REVIVAL_WATER,
};
use tracing::{debug, info};

use crate::{reject, Context, World};

/// Mutates a creature's state at the start of its turn.
pub(crate) fn begin_turn(world: &mut World, id: CreatureId, out_events: &mut Vec<Event>) {
    let raining = world.raining;
    let Some(creature) = world.creature_mut(id) else {
        reject(Rejection::UnknownCreature, out_events);
        return;
    };
    let stats = creature.species.stats();
    let mut released_tree = None;
    let mut laid_egg = None;

    if let Some(flight) = creature.flight.as_mut() {
        if flight.mode == FlightMode::Flying {
            if flight.fuel.is_empty() {
                flight.mode = FlightMode::Grounded;
                debug!(creature = id.get(), "out of fuel");
                out_events.push(Event::CreatureGrounded { creature: id });
            } else {
                flight.fuel.drain(1);
            }
        }
    }

    if creature.hibernation.is_none() {
        creature.hit_points.drain(1);
        creature.water.drain(1);
    }

    if creature.stage == GrowthStage::Baby {
        creature.age = creature.age.saturating_add(1);
        if creature.age >= stats.maturation_turns {
            creature.stage = GrowthStage::Adult;
            info!(creature = id.get(), name = %creature.name, "matured");
            out_events.push(Event::CreatureMatured { creature: id });
        }
    }

    if let Some(pregnancy) = creature.pregnancy.as_mut() {
        pregnancy.turns = pregnancy.turns.saturating_add(1);
        let egg = pregnancy.egg;
        let nesting = creature
            .flight
            .as_ref()
            .map_or(true, |flight| flight.perch.is_some());
        if pregnancy.turns >= stats.gestation_turns && nesting {
            creature.pregnancy = None;
            if let Some(flight) = creature.flight.as_mut() {
                released_tree = flight.perch.take();
                flight.fuel.refill();
                flight.mode = FlightMode::Flying;
                flight.seeking_mate = false;
                creature.immobile = false;
            }
            laid_egg = Some((egg, creature.cell));
        }
    }

    if raining {
        if let Some(hibernation) = creature.hibernation {
            if hibernation.cause == HibernationCause::Water {
                creature.hibernation = None;
                creature.water.set(RAIN_REVIVAL_WATER);
                if creature.perch().is_none() {
                    creature.immobile = false;
                }
                info!(creature = id.get(), name = %creature.name, "revived by rain");
                out_events.push(Event::CreatureRevived {
                    creature: id,
                    cause: HibernationCause::Water,
                });
            }
        }
    }

    if creature.species.hunts() {
        creature
            .cooldowns
            .retain(|_, age| *age < ATTACK_COOLDOWN_TURNS);
        for age in creature.cooldowns.values_mut() {
            *age += 1;
        }
    }

    if let Some(tree) = released_tree {
        world.set_tree_occupied(tree, false);
    }
    if let Some((species, cell)) = laid_egg {
        if let Some(item) = world.place_item(ItemKind::egg(species), cell, out_events) {
            info!(creature = id.get(), ?species, "egg laid");
            out_events.push(Event::EggLaid {
                creature: id,
                item,
                cell,
            });
        }
    }
}

/// Advances the park clock by one tick.
pub(crate) fn advance_clock(world: &mut World, context: &mut Context, out_events: &mut Vec<Event>) {
    world.tick += 1;
    out_events.push(Event::TimeAdvanced { tick: world.tick });

    let mut hatching = Vec::new();
    let mut rotten = Vec::new();
    for (index, items) in world.items.iter_mut().enumerate() {
        for item in items.iter_mut() {
            match &mut item.kind {
                ItemKind::Egg {
                    species,
                    incubation,
                } => {
                    *incubation = incubation.saturating_add(1);
                    if *incubation >= INCUBATION_TURNS {
                        hatching.push((index, item.id, *species));
                    }
                }
                ItemKind::Corpse { species, food, age } => {
                    if *food == 0 || *age >= species.stats().corpse_lifetime {
                        rotten.push(item.id);
                    } else {
                        *age += 1;
                    }
                }
                ItemKind::Fruit | ItemKind::VegetarianMealKit | ItemKind::CarnivoreMealKit => {}
            }
        }
    }

    for item in rotten {
        let _ = world.remove_item(item, out_events);
    }
    for (index, item, species) in hatching {
        hatch(world, context, index, item, species, out_events);
    }
}

fn hatch(
    world: &mut World,
    context: &mut Context,
    index: usize,
    item: ItemId,
    species: Species,
    out_events: &mut Vec<Event>,
) {
    let Some(cell) = world.cell_of(index) else {
        return;
    };
    let mode = if species.can_fly() {
        FlightMode::Flying
    } else {
        FlightMode::Grounded
    };
    if !world.is_enterable(cell, mode) {
        debug!(item = item.get(), "hatch postponed, nest is blocked");
        return;
    }
    let _ = world.remove_item(item, out_events);
    let Some(creature) = world.spawn(
        context,
        species,
        GrowthStage::Baby,
        None,
        cell,
        out_events,
    ) else {
        return;
    };
    out_events.push(Event::EggHatched {
        item,
        creature,
        cell,
    });
    let points = species.stats().hatch_reward;
    let total = context.credit(points);
    info!(?species, points, total, "egg hatched");
    out_events.push(Event::RewardGranted { points, total });
}

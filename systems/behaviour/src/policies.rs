//! The seven behaviour policies a creature consults each turn.

use dino_park_core::{
    Action, CellCoord, Command, CreatureSnapshot, Gender, Purpose, SpatialQuery,
};
use dino_park_system_targeting::{approach, nearest, Approach};
use rand::{seq::SliceRandom, RngCore};

use crate::{
    eligibility::{
        food_at, food_comes_first, nest_beside, partner_at, perch_at, prey_at, reach,
        ready_to_breed, water_at, water_comes_first,
    },
    Behaviour,
};

/// Walks toward `target`, or performs `arrive` once within `reach` of it.
///
/// Immobile creatures that are not already in reach pass.
fn pursue(
    actor: &CreatureSnapshot,
    world: &dyn SpatialQuery,
    target: CellCoord,
    reach: u32,
    purpose: Purpose,
    arrive: Action,
) -> Option<Action> {
    match approach(world, actor.cell, target, actor.mode, reach) {
        Approach::Arrived => Some(arrive),
        _ if actor.immobile => None,
        Approach::Step(direction) => Some(Action::Step { direction, purpose }),
        Approach::Hold => Some(Action::EndTurn),
    }
}

/// Keeps a creature with an empty resource hibernating until it revives or
/// dies.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hibernation;

impl Behaviour for Hibernation {
    fn decide(
        &self,
        actor: &CreatureSnapshot,
        _world: &dyn SpatialQuery,
        _rng: &mut dyn RngCore,
        _effects: &mut Vec<Command>,
    ) -> Option<Action> {
        (actor.is_hibernating() || actor.is_critical()).then_some(Action::Hibernate)
    }
}

/// Sends a thirsty creature to the nearest lake that still holds water.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeekWater;

impl Behaviour for SeekWater {
    fn decide(
        &self,
        actor: &CreatureSnapshot,
        world: &dyn SpatialQuery,
        _rng: &mut dyn RngCore,
        _effects: &mut Vec<Command>,
    ) -> Option<Action> {
        if !actor.is_thirsty() || !water_comes_first(actor) {
            return None;
        }
        let lake = nearest(world, actor.cell, |cell| water_at(world, cell))?;
        pursue(
            actor,
            world,
            lake.cell,
            reach(actor.mode),
            Purpose::Water,
            Action::Drink { lake: lake.cell },
        )
    }
}

/// Sends a hungry creature to the nearest food its species eats.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeekFood;

impl Behaviour for SeekFood {
    fn decide(
        &self,
        actor: &CreatureSnapshot,
        world: &dyn SpatialQuery,
        _rng: &mut dyn RngCore,
        _effects: &mut Vec<Command>,
    ) -> Option<Action> {
        if !actor.is_hungry() || !food_comes_first(actor) {
            return None;
        }
        let meal = nearest(world, actor.cell, |cell| food_at(actor, world, cell))?;
        pursue(
            actor,
            world,
            meal.cell,
            reach(actor.mode),
            Purpose::Food,
            Action::Eat { food: meal.target },
        )
    }
}

/// Sends a carnivore after the nearest prey it has not struck recently.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeekPrey;

impl Behaviour for SeekPrey {
    fn decide(
        &self,
        actor: &CreatureSnapshot,
        world: &dyn SpatialQuery,
        _rng: &mut dyn RngCore,
        _effects: &mut Vec<Command>,
    ) -> Option<Action> {
        if !actor.species.hunts() {
            return None;
        }
        let prey = nearest(world, actor.cell, |cell| prey_at(actor, world, cell))?;
        pursue(
            actor,
            world,
            prey.cell,
            1,
            Purpose::Prey,
            Action::Hunt {
                target: prey.target,
            },
        )
    }
}

/// Brings breeding partners together.
///
/// Grounded species walk up to the nearest fit partner. A flying female
/// announces that she is waiting instead and leaves the approach to the male,
/// who heads for the free tree beside her perch.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeekMate;

impl Behaviour for SeekMate {
    fn decide(
        &self,
        actor: &CreatureSnapshot,
        world: &dyn SpatialQuery,
        _rng: &mut dyn RngCore,
        effects: &mut Vec<Command>,
    ) -> Option<Action> {
        if !ready_to_breed(actor) {
            return None;
        }

        if !actor.species.can_fly() {
            let partner = nearest(world, actor.cell, |cell| partner_at(actor, world, cell))?;
            return pursue(
                actor,
                world,
                partner.cell,
                1,
                Purpose::Mate,
                Action::Breed {
                    mate: partner.target,
                },
            );
        }

        if actor.gender == Gender::Female {
            if !actor.seeking_mate {
                effects.push(Command::SetSeekingMate {
                    creature: actor.id,
                    seeking: true,
                });
            }
            return None;
        }

        let nest = nearest(world, actor.cell, |tree| nest_beside(actor, world, tree))?;
        pursue(
            actor,
            world,
            nest.cell,
            1,
            Purpose::Mate,
            Action::Breed { mate: nest.target },
        )
    }
}

/// Sends a flyer to a tree when it runs out of fuel or wants to nest.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeekPerch;

impl Behaviour for SeekPerch {
    fn decide(
        &self,
        actor: &CreatureSnapshot,
        world: &dyn SpatialQuery,
        _rng: &mut dyn RngCore,
        _effects: &mut Vec<Command>,
    ) -> Option<Action> {
        if !actor.species.can_fly() || actor.perched {
            return None;
        }
        let nesting = actor.pregnant || (actor.gender == Gender::Female && ready_to_breed(actor));
        if actor.fuel > 0 && !nesting {
            return None;
        }
        let tree = nearest(world, actor.cell, |cell| perch_at(actor, world, cell, nesting))?;
        pursue(
            actor,
            world,
            tree.cell,
            0,
            Purpose::Perch,
            Action::Perch { tree: tree.cell },
        )
    }
}

/// Takes a random legal step, or ends the turn when none exists.
#[derive(Clone, Copy, Debug, Default)]
pub struct Wander;

impl Behaviour for Wander {
    fn decide(
        &self,
        actor: &CreatureSnapshot,
        world: &dyn SpatialQuery,
        rng: &mut dyn RngCore,
        _effects: &mut Vec<Command>,
    ) -> Option<Action> {
        if actor.immobile {
            return Some(Action::EndTurn);
        }
        let exits = world.legal_exits(actor.cell, actor.mode);
        let action = exits
            .choose(rng)
            .map_or(Action::EndTurn, |(direction, _)| Action::Step {
                direction: *direction,
                purpose: Purpose::Wander,
            });
        Some(action)
    }
}

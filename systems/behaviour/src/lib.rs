#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides what a creature does with its turn.
//!
//! Each species owns a fixed, ordered [`BehaviourChain`]. The policies are
//! consulted in order and the first one that proposes an [`Action`] wins; a
//! creature whose policies all pass ends its turn. Policies read the park
//! through [`SpatialQuery`] only. State changes that have to happen before the
//! action executes are emitted as [`Command`] values.

mod eligibility;
mod policies;

use std::borrow::Cow;

use dino_park_core::{Action, Command, CreatureSnapshot, FlightMode, Species, SpatialQuery};
use rand::RngCore;

pub use policies::{Hibernation, SeekFood, SeekMate, SeekPerch, SeekPrey, SeekWater, Wander};

/// Decision logic consulted once per turn.
pub trait Behaviour: std::fmt::Debug {
    /// Proposes an action for the actor, or passes with `None`.
    ///
    /// Commands pushed into `effects` must be applied before the action.
    fn decide(
        &self,
        actor: &CreatureSnapshot,
        world: &dyn SpatialQuery,
        rng: &mut dyn RngCore,
        effects: &mut Vec<Command>,
    ) -> Option<Action>;
}

/// Ordered list of policies evaluated for a creature.
#[derive(Debug)]
pub struct BehaviourChain {
    policies: Vec<Box<dyn Behaviour>>,
}

impl BehaviourChain {
    /// Creates a chain that consults the provided policies in order.
    #[must_use]
    pub fn new(policies: Vec<Box<dyn Behaviour>>) -> Self {
        Self { policies }
    }

    /// Standard chain for the species.
    #[must_use]
    pub fn for_species(species: Species) -> Self {
        let mut policies: Vec<Box<dyn Behaviour>> =
            vec![Box::new(Hibernation), Box::new(SeekWater), Box::new(SeekFood)];
        if species.hunts() {
            policies.push(Box::new(SeekPrey));
        }
        policies.push(Box::new(SeekMate));
        if species.can_fly() {
            policies.push(Box::new(SeekPerch));
        }
        policies.push(Box::new(Wander));
        Self::new(policies)
    }

    /// Number of policies in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Reports whether the chain has no policies at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Runs the chain and returns the winning action.
    ///
    /// A perched flyer that needs food or water leaves its tree first; the
    /// matching [`Command::LeavePerch`] is pushed into `effects` and the
    /// remaining policies see the flyer as it will be once airborne.
    pub fn decide(
        &self,
        actor: &CreatureSnapshot,
        world: &dyn SpatialQuery,
        rng: &mut dyn RngCore,
        effects: &mut Vec<Command>,
    ) -> Action {
        let actor = if leaves_perch(actor) {
            effects.push(Command::LeavePerch { creature: actor.id });
            Cow::Owned(unperched(actor))
        } else {
            Cow::Borrowed(actor)
        };

        self.policies
            .iter()
            .find_map(|policy| policy.decide(&actor, world, rng, effects))
            .unwrap_or(Action::EndTurn)
    }
}

fn leaves_perch(actor: &CreatureSnapshot) -> bool {
    actor.perched
        && !actor.pregnant
        && !actor.is_hibernating()
        && !actor.is_critical()
        && (actor.is_hungry() || actor.is_thirsty())
}

fn unperched(actor: &CreatureSnapshot) -> CreatureSnapshot {
    let mut airborne = actor.clone();
    airborne.perched = false;
    airborne.immobile = false;
    if airborne.fuel > 0 {
        airborne.mode = FlightMode::Flying;
    }
    airborne
}

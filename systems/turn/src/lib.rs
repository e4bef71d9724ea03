#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn driver that advances the park one round at a time.
//!
//! A round ticks the park clock once, then lets every creature that was alive
//! when the round began take its turn in ascending identifier order: the
//! lifecycle bookkeeping runs, the species' behaviour chain picks an action,
//! its side effects are applied and the action executes. Once every creature
//! has acted, the objective decides whether the simulation goes on.

use dino_park_core::{Command, Event, Species, TurnOutcome};
use dino_park_system_behaviour::BehaviourChain;
use dino_park_world::{apply, query, Context, World};
use tracing::{debug, info};

/// Condition that ends the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Objective {
    /// Runs until the park dies out or the operator quits.
    #[default]
    Sandbox,
    /// Collect eco points before the round limit passes.
    Challenge {
        /// Ledger balance that wins the challenge.
        eco_point_goal: u64,
        /// Rounds available to reach the goal.
        round_limit: u64,
    },
}

/// Drives rounds against a world and its context.
#[derive(Debug)]
pub struct TurnDriver {
    objective: Objective,
    chains: [BehaviourChain; Species::ALL.len()],
    rounds: u64,
    quit_requested: bool,
}

impl TurnDriver {
    /// Creates a driver pursuing the provided objective.
    #[must_use]
    pub fn new(objective: Objective) -> Self {
        Self {
            objective,
            chains: Species::ALL.map(BehaviourChain::for_species),
            rounds: 0,
            quit_requested: false,
        }
    }

    /// Objective the driver evaluates after each round.
    #[must_use]
    pub const fn objective(&self) -> Objective {
        self.objective
    }

    /// Number of rounds played so far.
    #[must_use]
    pub const fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Makes the next round end the simulation without anyone acting.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    /// Plays a single round and reports how the simulation stands.
    ///
    /// Every event the world produced during the round is appended to
    /// `out_events`.
    pub fn run_round(
        &mut self,
        world: &mut World,
        context: &mut Context,
        out_events: &mut Vec<Event>,
    ) -> TurnOutcome {
        if self.quit_requested {
            info!(rounds = self.rounds, "quit requested");
            return TurnOutcome::Quit;
        }

        self.rounds += 1;
        let roster = query::creature_ids(world);
        debug!(round = self.rounds, creatures = roster.len(), "round started");
        apply(world, context, Command::Tick, out_events);

        for creature in roster {
            if query::creature(world, creature).is_none() {
                continue;
            }
            apply(world, context, Command::BeginTurn { creature }, out_events);

            let Some(actor) = query::creature(world, creature) else {
                continue;
            };
            let mut effects = Vec::new();
            let action = {
                let view = query::view(world);
                self.chains[actor.species.index()].decide(
                    &actor,
                    &view,
                    context.rng(),
                    &mut effects,
                )
            };
            for effect in effects {
                apply(world, context, effect, out_events);
            }
            apply(world, context, Command::Act { creature, action }, out_events);
        }

        let outcome = self.evaluate(world, context);
        if outcome != TurnOutcome::Continue {
            info!(round = self.rounds, ?outcome, eco_points = context.eco_points(), "simulation over");
        }
        outcome
    }

    fn evaluate(&self, world: &World, context: &Context) -> TurnOutcome {
        if let Objective::Challenge { eco_point_goal, .. } = self.objective {
            if context.eco_points() >= eco_point_goal {
                return TurnOutcome::Win;
            }
        }
        if query::creature_ids(world).is_empty() && query::egg_count(world) == 0 {
            return TurnOutcome::Loss;
        }
        match self.objective {
            Objective::Challenge { round_limit, .. } if self.rounds >= round_limit => {
                TurnOutcome::Loss
            }
            _ => TurnOutcome::Continue,
        }
    }
}

impl Default for TurnDriver {
    fn default() -> Self {
        Self::new(Objective::default())
    }
}

//! TOML scenario files describing the park a run starts from.

use std::{fs, io, path::Path};

use dino_park_core::{CellCoord, Event, Gender, GrowthStage, ItemKind, Species};
use dino_park_system_bootstrap::{Bootstrap, LayoutError, Provision, Resident};
use dino_park_world::{apply, query, Context, World};
use serde::Deserialize;
use thiserror::Error;

/// Scenario used when no file is given on the command line.
pub(crate) const DEMO_SCENARIO: &str = include_str!("../scenarios/demo.toml");

/// Reasons a scenario cannot be loaded.
#[derive(Debug, Error)]
pub(crate) enum ScenarioError {
    /// The file could not be read.
    #[error("failed to read scenario file")]
    Io(#[from] io::Error),
    /// The file is not a valid scenario document.
    #[error("failed to parse scenario")]
    Toml(#[from] toml::de::Error),
    /// The map rows do not form a valid layout.
    #[error("invalid map")]
    Layout(#[from] LayoutError),
    /// An egg or corpse was listed without the species it belongs to.
    #[error("{kind:?} at column {column}, row {row} needs a species")]
    MissingSpecies {
        /// Kind of the item.
        kind: ItemSpec,
        /// Column of the item.
        column: u32,
        /// Row of the item.
        row: u32,
    },
}

/// Everything needed to start a run.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Scenario {
    /// Seed of the shared random generator.
    pub(crate) seed: u64,
    /// Maximum number of rounds to play.
    pub(crate) rounds: u64,
    /// Rows of layout glyphs.
    pub(crate) map: Vec<String>,
    /// Creatures present at the start.
    pub(crate) creatures: Vec<CreatureSpec>,
    /// Items lying on the ground at the start.
    pub(crate) items: Vec<ItemEntry>,
    /// Rain schedule.
    pub(crate) weather: Weather,
    /// Optional eco point challenge.
    pub(crate) challenge: Option<Challenge>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            seed: 0,
            rounds: 100,
            map: Vec::new(),
            creatures: Vec::new(),
            items: Vec::new(),
            weather: Weather::default(),
            challenge: None,
        }
    }
}

/// Creature entry of a scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CreatureSpec {
    species: Species,
    #[serde(default = "adult")]
    stage: GrowthStage,
    #[serde(default)]
    gender: Option<Gender>,
    column: u32,
    row: u32,
    #[serde(default)]
    hit_points: Option<u32>,
    #[serde(default)]
    water: Option<u32>,
}

fn adult() -> GrowthStage {
    GrowthStage::Adult
}

/// Item entry of a scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ItemEntry {
    kind: ItemSpec,
    #[serde(default)]
    species: Option<Species>,
    column: u32,
    row: u32,
}

/// Item kinds a scenario may place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ItemSpec {
    /// A single fruit.
    Fruit,
    /// Herbivore meal kit.
    VegetarianMealKit,
    /// Carnivore meal kit.
    CarnivoreMealKit,
    /// Freshly laid egg.
    Egg,
    /// Fresh corpse.
    Corpse,
}

/// Rain schedule: every `interval` rounds the sky is rolled with `chance`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Weather {
    pub(crate) interval: u64,
    pub(crate) chance: f64,
}

impl Default for Weather {
    fn default() -> Self {
        Self {
            interval: 10,
            chance: 0.2,
        }
    }
}

impl Weather {
    /// Rain state for the round about to start, or `None` when the sky keeps
    /// its current state.
    pub(crate) fn forecast(&self, round: u64, world: &World, context: &mut Context) -> Option<bool> {
        if self.interval == 0 || round % self.interval != 0 {
            return None;
        }
        let raining = context.roll(self.chance);
        (raining != query::is_raining(world)).then_some(raining)
    }
}

/// Eco point goal and the rounds available to reach it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Challenge {
    pub(crate) eco_point_goal: u64,
    pub(crate) round_limit: u64,
}

impl Scenario {
    /// Reads and parses a scenario file.
    pub(crate) fn load(path: &Path) -> Result<Self, ScenarioError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parses a scenario document.
    pub(crate) fn parse(contents: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(contents)?)
    }

    /// Builds the starting park: terrain first, then items, then creatures.
    ///
    /// Events produced while seeding are appended to `out_events`.
    pub(crate) fn boot(
        &self,
        bootstrap: &Bootstrap,
        out_events: &mut Vec<Event>,
    ) -> Result<(World, Context), ScenarioError> {
        let mut world = World::new();
        let mut context = Context::new(self.seed);
        let mut commands = bootstrap.terrain(&self.map)?;
        commands.extend(bootstrap.provisions(&self.provisions()?));
        for command in commands {
            apply(&mut world, &mut context, command, out_events);
        }
        bootstrap.populate(&mut world, &mut context, &self.residents(), out_events);
        Ok((world, context))
    }

    /// Residents to spawn, in file order.
    pub(crate) fn residents(&self) -> Vec<Resident> {
        self.creatures
            .iter()
            .map(|creature| Resident {
                species: creature.species,
                stage: creature.stage,
                gender: creature.gender,
                cell: CellCoord::new(creature.column, creature.row),
                hit_points: creature.hit_points,
                water: creature.water,
            })
            .collect()
    }

    /// Items to place, in file order.
    pub(crate) fn provisions(&self) -> Result<Vec<Provision>, ScenarioError> {
        self.items
            .iter()
            .map(|entry| {
                let missing = || ScenarioError::MissingSpecies {
                    kind: entry.kind,
                    column: entry.column,
                    row: entry.row,
                };
                let kind = match entry.kind {
                    ItemSpec::Fruit => ItemKind::Fruit,
                    ItemSpec::VegetarianMealKit => ItemKind::VegetarianMealKit,
                    ItemSpec::CarnivoreMealKit => ItemKind::CarnivoreMealKit,
                    ItemSpec::Egg => ItemKind::egg(entry.species.ok_or_else(missing)?),
                    ItemSpec::Corpse => ItemKind::corpse(entry.species.ok_or_else(missing)?),
                };
                Ok(Provision {
                    kind,
                    cell: CellCoord::new(entry.column, entry.row),
                })
            })
            .collect()
    }
}

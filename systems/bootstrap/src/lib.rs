#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a Dino Park from a text layout and a
//! roster of residents.
//!
//! Layouts are rows of glyphs: `.` dirt, `#` wall, `+` tree, `*` bush and
//! `~` lake. Every row must be as wide as the first.

use dino_park_core::{
    CellCoord, Command, Event, Gender, Ground, GrowthStage, ItemKind, Species,
};
use dino_park_world::{apply, query, Context, World};
use thiserror::Error;

/// Fruit on a freshly planted bush.
pub const STARTING_BUSH_FRUIT: u32 = 5;

/// Fruit on a freshly planted tree.
pub const STARTING_TREE_FRUIT: u32 = 10;

/// Reasons a layout cannot be turned into a park.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout holds no cells at all.
    #[error("layout is empty")]
    Empty,
    /// A row is wider or narrower than the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A glyph does not name any ground.
    #[error("unknown glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// The unrecognised character.
        glyph: char,
        /// Zero-based column of the glyph.
        column: usize,
        /// Zero-based row of the glyph.
        row: usize,
    },
    /// The layout does not fit the grid's coordinate range.
    #[error("layout of {columns}x{rows} cells is too large")]
    TooLarge {
        /// Number of columns in the layout.
        columns: usize,
        /// Number of rows in the layout.
        rows: usize,
    },
}

/// Creature the park starts with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resident {
    /// Species of the creature.
    pub species: Species,
    /// Growth stage of the creature.
    pub stage: GrowthStage,
    /// Gender, drawn at random when absent.
    pub gender: Option<Gender>,
    /// Cell the creature starts on.
    pub cell: CellCoord,
    /// Starting hit points overriding the species default.
    pub hit_points: Option<u32>,
    /// Starting water overriding the species default.
    pub water: Option<u32>,
}

/// Item lying in the park from the start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Provision {
    /// What the item is.
    pub kind: ItemKind,
    /// Where it lies.
    pub cell: CellCoord,
}

/// Produces the command batches that seed a park.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Translates a layout into a grid configuration followed by the ground
    /// of every cell that is not plain dirt.
    pub fn terrain<S>(&self, layout: &[S]) -> Result<Vec<Command>, LayoutError>
    where
        S: AsRef<str>,
    {
        let expected = layout
            .first()
            .map_or(0, |row| row.as_ref().chars().count());
        if expected == 0 {
            return Err(LayoutError::Empty);
        }
        let too_large = LayoutError::TooLarge {
            columns: expected,
            rows: layout.len(),
        };
        let columns = u32::try_from(expected).map_err(|_| too_large.clone())?;
        let rows = u32::try_from(layout.len()).map_err(|_| too_large.clone())?;

        let mut commands = vec![Command::ConfigureGrid { columns, rows }];
        for (row, line) in layout.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != expected {
                return Err(LayoutError::Ragged {
                    row,
                    expected,
                    found,
                });
            }
            for (column, glyph) in line.chars().enumerate() {
                let ground = ground_for(glyph).ok_or(LayoutError::UnknownGlyph {
                    glyph,
                    column,
                    row,
                })?;
                if ground == Ground::Dirt {
                    continue;
                }
                let cell = CellCoord::new(
                    u32::try_from(column).map_err(|_| too_large.clone())?,
                    u32::try_from(row).map_err(|_| too_large.clone())?,
                );
                commands.push(Command::SetGround { cell, ground });
            }
        }
        Ok(commands)
    }

    /// Commands placing the provisions on the ground.
    #[must_use]
    pub fn provisions(&self, provisions: &[Provision]) -> Vec<Command> {
        provisions
            .iter()
            .map(|provision| Command::PlaceItem {
                kind: provision.kind,
                cell: provision.cell,
            })
            .collect()
    }

    /// Spawns every resident and applies its vital overrides.
    ///
    /// Residents whose spawn is rejected are skipped; the rejection shows up
    /// in `out_events`.
    pub fn populate(
        &self,
        world: &mut World,
        context: &mut Context,
        residents: &[Resident],
        out_events: &mut Vec<Event>,
    ) {
        for resident in residents {
            let mut events = Vec::new();
            apply(
                world,
                context,
                Command::SpawnCreature {
                    species: resident.species,
                    stage: resident.stage,
                    gender: resident.gender,
                    cell: resident.cell,
                },
                &mut events,
            );
            let spawned = events.iter().find_map(|event| match event {
                Event::CreatureSpawned { creature, .. } => Some(*creature),
                _ => None,
            });
            out_events.append(&mut events);

            let Some(creature) = spawned else {
                continue;
            };
            if resident.hit_points.is_some() || resident.water.is_some() {
                apply(
                    world,
                    context,
                    Command::AdjustVitals {
                        creature,
                        hit_points: resident.hit_points,
                        water: resident.water,
                    },
                    out_events,
                );
            }
        }
    }
}

fn ground_for(glyph: char) -> Option<Ground> {
    match glyph {
        '.' => Some(Ground::Dirt),
        '#' => Some(Ground::Wall),
        '+' => Some(Ground::Tree {
            fruit: STARTING_TREE_FRUIT,
            occupied: false,
        }),
        '*' => Some(Ground::Bush {
            fruit: STARTING_BUSH_FRUIT,
        }),
        '~' => Some(Ground::lake()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(layout: &[&str]) -> World {
        let mut world = World::new();
        let mut context = Context::new(0);
        let mut events = Vec::new();
        for command in Bootstrap.terrain(layout).expect("valid layout") {
            apply(&mut world, &mut context, command, &mut events);
        }
        assert!(events
            .iter()
            .all(|event| !matches!(event, Event::CommandRejected { .. })));
        world
    }

    #[test]
    fn returns_welcome_banner() {
        let world = World::new();
        assert_eq!(
            Bootstrap.welcome_banner(&world),
            "Welcome to Dino Park."
        );
    }

    #[test]
    fn layout_round_trips_through_the_renderer() {
        let layout = [".#+", "*~.", "..."];
        let world = build(&layout);
        assert_eq!(query::grid_bounds(&world), (3, 3));
        assert_eq!(query::render(&world), ".#+\n*~.\n...\n");
        assert_eq!(
            query::ground_at(&world, CellCoord::new(0, 1)),
            Some(Ground::Bush {
                fruit: STARTING_BUSH_FRUIT
            })
        );
    }

    #[test]
    fn dirt_needs_no_ground_commands() {
        let commands = Bootstrap.terrain(&["...", "..."]).expect("valid");
        assert_eq!(commands, vec![Command::ConfigureGrid { columns: 3, rows: 2 }]);
    }

    #[test]
    fn malformed_layouts_are_rejected() {
        assert_eq!(
            Bootstrap.terrain::<&str>(&[]),
            Err(LayoutError::Empty)
        );
        assert_eq!(
            Bootstrap.terrain(&["...", ".."]),
            Err(LayoutError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            Bootstrap.terrain(&["..", ".?"]),
            Err(LayoutError::UnknownGlyph {
                glyph: '?',
                column: 1,
                row: 1
            })
        );
    }

    #[test]
    fn errors_read_well() {
        let error = LayoutError::UnknownGlyph {
            glyph: 'x',
            column: 4,
            row: 2,
        };
        assert_eq!(error.to_string(), "unknown glyph 'x' at column 4, row 2");
    }

    #[test]
    fn populate_applies_vital_overrides_and_skips_rejections() {
        let mut world = build(&["..#"]);
        let mut context = Context::new(0);
        let mut events = Vec::new();
        let residents = [
            Resident {
                species: Species::Allosaur,
                stage: GrowthStage::Adult,
                gender: Some(Gender::Male),
                cell: CellCoord::new(0, 0),
                hit_points: Some(30),
                water: None,
            },
            Resident {
                species: Species::Stegosaur,
                stage: GrowthStage::Baby,
                gender: None,
                cell: CellCoord::new(2, 0),
                hit_points: None,
                water: None,
            },
        ];
        Bootstrap.populate(&mut world, &mut context, &residents, &mut events);

        let creatures = query::creatures(&world);
        assert_eq!(creatures.len(), 1);
        assert_eq!(creatures[0].hit_points, 30);
        assert_eq!(creatures[0].water, 60);
        assert!(events.contains(&Event::CommandRejected {
            reason: dino_park_core::Rejection::Unenterable
        }));
    }

    #[test]
    fn provisions_become_placements() {
        let provisions = [Provision {
            kind: ItemKind::egg(Species::Brachiosaur),
            cell: CellCoord::new(1, 0),
        }];
        assert_eq!(
            Bootstrap.provisions(&provisions),
            vec![Command::PlaceItem {
                kind: ItemKind::egg(Species::Brachiosaur),
                cell: CellCoord::new(1, 0),
            }]
        );
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that finds the nearest eligible target on the grid and picks
//! the greedy step that closes in on it.
//!
//! The scan visits every cell exactly once in row-major order. Candidates are
//! ranked by Manhattan distance from the origin; among equally distant
//! candidates the one met first by the scan wins, so a fixed grid always
//! yields the same target.

use dino_park_core::{CellCoord, Direction, FlightMode, SpatialQuery};

/// Eligible target found by [`nearest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate<T> {
    /// Whatever the probe reported for the cell.
    pub target: T,
    /// Cell the target was found on.
    pub cell: CellCoord,
    /// Manhattan distance from the origin of the search.
    pub distance: u32,
}

impl<T> Candidate<T> {
    fn precedes(&self, other: &Self) -> bool {
        self.distance < other.distance
    }
}

/// Scans the grid and returns the candidate closest to `origin`.
///
/// `probe` is called once per cell and reports the eligible target on that
/// cell, if any.
pub fn nearest<T, F>(world: &dyn SpatialQuery, origin: CellCoord, mut probe: F) -> Option<Candidate<T>>
where
    F: FnMut(CellCoord) -> Option<T>,
{
    let mut best: Option<Candidate<T>> = None;
    for cell in world.cells() {
        let Some(target) = probe(cell) else {
            continue;
        };
        let current = Candidate {
            target,
            cell,
            distance: origin.manhattan_distance(cell),
        };
        match &mut best {
            Some(existing) => {
                if current.precedes(existing) {
                    *existing = current;
                }
            }
            None => best = Some(current),
        }
    }
    best
}

/// Legal exit that brings a creature in `mode` closest to `target`.
///
/// Returns `None` when no exit strictly improves on the current distance.
/// Exits are compared in [`Direction::ALL`] order and the first of equally
/// good exits is kept.
#[must_use]
pub fn step_toward(
    world: &dyn SpatialQuery,
    from: CellCoord,
    target: CellCoord,
    mode: FlightMode,
) -> Option<Direction> {
    let mut best_distance = from.manhattan_distance(target);
    let mut best = None;
    for (direction, to) in world.legal_exits(from, mode) {
        let distance = to.manhattan_distance(target);
        if distance < best_distance {
            best_distance = distance;
            best = Some(direction);
        }
    }
    best
}

/// What a creature should do about a target it has selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Approach {
    /// The target is within interaction reach.
    Arrived,
    /// Take one step in the direction.
    Step(Direction),
    /// No step gets closer; stay put this turn.
    Hold,
}

/// Decides between interacting with a target and stepping toward it.
///
/// `reach` is the largest distance the interaction works at: `0` for
/// co-located targets, `1` for neighbours.
#[must_use]
pub fn approach(
    world: &dyn SpatialQuery,
    from: CellCoord,
    target: CellCoord,
    mode: FlightMode,
    reach: u32,
) -> Approach {
    if from.manhattan_distance(target) <= reach {
        return Approach::Arrived;
    }
    step_toward(world, from, target, mode).map_or(Approach::Hold, Approach::Step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dino_park_core::{Command, Gender, Ground, GrowthStage, Species};
    use dino_park_world::{apply, query, Context, World};

    fn world(columns: u32, rows: u32, walls: &[CellCoord]) -> World {
        let mut world = World::new();
        let mut context = Context::new(0);
        let mut events = Vec::new();
        apply(
            &mut world,
            &mut context,
            Command::ConfigureGrid { columns, rows },
            &mut events,
        );
        for &cell in walls {
            apply(
                &mut world,
                &mut context,
                Command::SetGround {
                    cell,
                    ground: Ground::Wall,
                },
                &mut events,
            );
        }
        world
    }

    #[test]
    fn equal_distances_resolve_to_scan_order() {
        let world = world(9, 9, &[]);
        let view = query::view(&world);
        let origin = CellCoord::new(4, 4);
        let candidates = [
            CellCoord::new(4, 0),
            CellCoord::new(7, 4),
            CellCoord::new(1, 4),
            CellCoord::new(8, 7),
        ];
        let distances: Vec<_> = candidates
            .iter()
            .map(|cell| origin.manhattan_distance(*cell))
            .collect();
        assert_eq!(distances, vec![4, 3, 3, 7]);

        let found = nearest(&view, origin, |cell| {
            candidates.iter().position(|candidate| *candidate == cell)
        })
        .expect("a candidate");
        assert_eq!(found.distance, 3);
        assert_eq!(found.cell, CellCoord::new(1, 4));
        assert_eq!(found.target, 2);
    }

    #[test]
    fn distances_five_three_three_seven_pick_the_first_three() {
        let world = world(10, 10, &[]);
        let view = query::view(&world);
        let origin = CellCoord::new(5, 5);
        let candidates = [
            CellCoord::new(5, 0),
            CellCoord::new(5, 8),
            CellCoord::new(2, 5),
            CellCoord::new(9, 8),
        ];
        let found = nearest(&view, origin, |cell| {
            candidates.contains(&cell).then_some(cell)
        })
        .expect("a candidate");
        assert_eq!(found.distance, 3);
        assert_eq!(found.target, CellCoord::new(2, 5));

        let again = nearest(&view, origin, |cell| {
            candidates.contains(&cell).then_some(cell)
        });
        assert_eq!(again, Some(found));
    }

    #[test]
    fn empty_grid_has_no_candidate() {
        let world = world(3, 3, &[]);
        let view = query::view(&world);
        assert_eq!(nearest(&view, CellCoord::new(0, 0), |_| None::<()>), None);
    }

    #[test]
    fn steps_diagonally_when_that_closes_most_distance() {
        let world = world(5, 5, &[]);
        let view = query::view(&world);
        let step = step_toward(
            &view,
            CellCoord::new(0, 0),
            CellCoord::new(3, 3),
            FlightMode::Grounded,
        );
        assert_eq!(step, Some(Direction::SouthEast));
    }

    #[test]
    fn holds_when_walls_block_every_improvement() {
        let walls = [
            CellCoord::new(1, 0),
            CellCoord::new(1, 1),
            CellCoord::new(1, 2),
        ];
        let world = world(3, 3, &walls);
        let view = query::view(&world);
        let from = CellCoord::new(0, 1);
        let target = CellCoord::new(2, 1);
        assert_eq!(step_toward(&view, from, target, FlightMode::Grounded), None);
        assert_eq!(
            approach(&view, from, target, FlightMode::Grounded, 1),
            Approach::Hold
        );
    }

    #[test]
    fn occupied_cells_are_not_exits() {
        let mut world = world(3, 1, &[]);
        let mut context = Context::new(0);
        let mut events = Vec::new();
        apply(
            &mut world,
            &mut context,
            Command::SpawnCreature {
                species: Species::Stegosaur,
                stage: GrowthStage::Adult,
                gender: Some(Gender::Male),
                cell: CellCoord::new(1, 0),
            },
            &mut events,
        );
        let view = query::view(&world);
        assert_eq!(
            step_toward(
                &view,
                CellCoord::new(0, 0),
                CellCoord::new(2, 0),
                FlightMode::Grounded
            ),
            None
        );
    }

    #[test]
    fn reach_decides_arrival() {
        let world = world(4, 1, &[]);
        let view = query::view(&world);
        let from = CellCoord::new(0, 0);
        let next_door = CellCoord::new(1, 0);
        assert_eq!(
            approach(&view, from, next_door, FlightMode::Grounded, 1),
            Approach::Arrived
        );
        assert_eq!(
            approach(&view, from, next_door, FlightMode::Flying, 0),
            Approach::Step(Direction::East)
        );
    }
}

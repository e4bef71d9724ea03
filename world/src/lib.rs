#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Dino Park.
//!
//! The world owns the grid, the items lying on it and every creature. It is
//! only ever mutated through [`apply`], which executes a single [`Command`]
//! and reports the consequences as [`Event`] values. Read access goes through
//! the [`query`] module.

mod context;
mod creature;
mod executor;
mod lifecycle;

use dino_park_core::{
    CellCoord, Command, CreatureId, Event, FlightMode, Gender, Ground, GrowthStage, Item, ItemId,
    ItemKind, Rejection, RemovalCause, Species, WELCOME_BANNER,
};
use rand::Rng;
use tracing::{debug, info};

pub use context::Context;

use creature::Creature;

const DEFAULT_GRID_COLUMNS: u32 = 10;
const DEFAULT_GRID_ROWS: u32 = 10;

/// Represents the authoritative Dino Park world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    columns: u32,
    rows: u32,
    ground: Vec<Ground>,
    items: Vec<Vec<Item>>,
    occupancy: Vec<Option<CreatureId>>,
    creatures: Vec<Creature>,
    next_creature: u32,
    next_item: u32,
    raining: bool,
    tick: u64,
}

impl World {
    /// Creates a new world with an empty dirt grid of default dimensions.
    #[must_use]
    pub fn new() -> Self {
        let mut world = Self {
            banner: WELCOME_BANNER,
            columns: 0,
            rows: 0,
            ground: Vec::new(),
            items: Vec::new(),
            occupancy: Vec::new(),
            creatures: Vec::new(),
            next_creature: 0,
            next_item: 0,
            raining: false,
            tick: 0,
        };
        world.configure(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS);
        world
    }

    fn configure(&mut self, columns: u32, rows: u32) {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        self.columns = columns;
        self.rows = rows;
        self.ground = vec![Ground::Dirt; capacity];
        self.items = vec![Vec::new(); capacity];
        self.occupancy = vec![None; capacity];
        self.creatures.clear();
        self.raining = false;
        self.tick = 0;
    }

    pub(crate) const fn bounds(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    pub(crate) fn ground(&self, cell: CellCoord) -> Option<Ground> {
        self.index(cell)
            .and_then(|index| self.ground.get(index).copied())
    }

    pub(crate) fn ground_mut(&mut self, cell: CellCoord) -> Option<&mut Ground> {
        let index = self.index(cell)?;
        self.ground.get_mut(index)
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<CreatureId> {
        self.index(cell)
            .and_then(|index| self.occupancy.get(index).copied().flatten())
    }

    fn items_at(&self, cell: CellCoord) -> &[Item] {
        self.index(cell)
            .and_then(|index| self.items.get(index))
            .map_or(&[], Vec::as_slice)
    }

    pub(crate) fn is_enterable(&self, cell: CellCoord, mode: FlightMode) -> bool {
        self.occupant(cell).is_none()
            && self
                .ground(cell)
                .map_or(false, |ground| ground.permits(mode))
    }

    fn creature_index(&self, id: CreatureId) -> Option<usize> {
        self.creatures
            .binary_search_by_key(&id, |creature| creature.id)
            .ok()
    }

    pub(crate) fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.creature_index(id)
            .and_then(|index| self.creatures.get(index))
    }

    pub(crate) fn creature_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        let index = self.creature_index(id)?;
        self.creatures.get_mut(index)
    }

    pub(crate) fn spawn(
        &mut self,
        context: &mut Context,
        species: Species,
        stage: GrowthStage,
        gender: Option<Gender>,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Option<CreatureId> {
        let Some(index) = self.index(cell) else {
            reject(Rejection::OutOfBounds, out_events);
            return None;
        };
        if self.occupancy[index].is_some() {
            reject(Rejection::Occupied, out_events);
            return None;
        }
        let mode = if species.can_fly() {
            FlightMode::Flying
        } else {
            FlightMode::Grounded
        };
        if !self.ground[index].permits(mode) {
            reject(Rejection::Unenterable, out_events);
            return None;
        }

        let gender = gender.unwrap_or_else(|| {
            if context.rng().gen_bool(0.5) {
                Gender::Male
            } else {
                Gender::Female
            }
        });
        let id = CreatureId::new(self.next_creature);
        self.next_creature += 1;
        let name = context.next_name(species);
        info!(creature = id.get(), %name, ?stage, ?gender, "creature spawned");
        self.creatures
            .push(Creature::new(id, name, species, stage, gender, cell));
        self.occupancy[index] = Some(id);
        out_events.push(Event::CreatureSpawned {
            creature: id,
            species,
            stage,
            gender,
            cell,
        });
        Some(id)
    }

    pub(crate) fn move_creature(
        &mut self,
        id: CreatureId,
        to: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let Some(from) = self.creature(id).map(|creature| creature.cell) else {
            return false;
        };
        let (Some(from_index), Some(to_index)) = (self.index(from), self.index(to)) else {
            return false;
        };
        self.occupancy[from_index] = None;
        self.occupancy[to_index] = Some(id);
        if let Some(creature) = self.creature_mut(id) {
            creature.cell = to;
        }
        out_events.push(Event::CreatureMoved {
            creature: id,
            from,
            to,
        });
        true
    }

    pub(crate) fn remove_creature(
        &mut self,
        id: CreatureId,
        cause: RemovalCause,
        out_events: &mut Vec<Event>,
    ) -> Option<Creature> {
        let index = self.creature_index(id)?;
        let creature = self.creatures.remove(index);
        if let Some(cell_index) = self.index(creature.cell) {
            self.occupancy[cell_index] = None;
        }
        if let Some(tree) = creature.perch() {
            self.set_tree_occupied(tree, false);
        }
        info!(creature = id.get(), name = %creature.name, ?cause, "creature removed");
        out_events.push(Event::CreatureRemoved {
            creature: id,
            cell: creature.cell,
            cause,
        });
        Some(creature)
    }

    /// Removes the creature and leaves its corpse where it fell.
    pub(crate) fn kill(&mut self, id: CreatureId, cause: RemovalCause, out_events: &mut Vec<Event>) {
        if let Some(creature) = self.remove_creature(id, cause, out_events) {
            let _ = self.place_item(ItemKind::corpse(creature.species), creature.cell, out_events);
        }
    }

    pub(crate) fn place_item(
        &mut self,
        kind: ItemKind,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Option<ItemId> {
        let Some(index) = self.index(cell) else {
            reject(Rejection::OutOfBounds, out_events);
            return None;
        };
        let id = ItemId::new(self.next_item);
        self.next_item += 1;
        self.items[index].push(Item { id, kind });
        out_events.push(Event::ItemPlaced {
            item: id,
            kind,
            cell,
        });
        Some(id)
    }

    fn item_location(&self, id: ItemId) -> Option<(usize, usize)> {
        self.items.iter().enumerate().find_map(|(cell, items)| {
            items
                .iter()
                .position(|item| item.id == id)
                .map(|slot| (cell, slot))
        })
    }

    fn cell_of(&self, index: usize) -> Option<CellCoord> {
        let width = usize::try_from(self.columns).ok()?;
        if width == 0 {
            return None;
        }
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(CellCoord::new(column, row))
    }

    pub(crate) fn find_item(&self, id: ItemId) -> Option<(CellCoord, Item)> {
        let (cell, slot) = self.item_location(id)?;
        Some((self.cell_of(cell)?, self.items[cell][slot]))
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        let (cell, slot) = self.item_location(id)?;
        self.items.get_mut(cell)?.get_mut(slot)
    }

    pub(crate) fn remove_item(&mut self, id: ItemId, out_events: &mut Vec<Event>) -> Option<Item> {
        let (cell, slot) = self.item_location(id)?;
        let item = self.items[cell].remove(slot);
        if let Some(coord) = self.cell_of(cell) {
            out_events.push(Event::ItemRemoved {
                item: id,
                cell: coord,
            });
        }
        Some(item)
    }

    pub(crate) fn set_tree_occupied(&mut self, cell: CellCoord, value: bool) {
        if let Some(Ground::Tree { occupied, .. }) = self.ground_mut(cell) {
            *occupied = value;
        }
    }

    pub(crate) fn leave_perch(&mut self, id: CreatureId) -> bool {
        let Some(creature) = self.creature_mut(id) else {
            return false;
        };
        let Some(flight) = creature.flight.as_mut() else {
            return false;
        };
        let Some(tree) = flight.perch.take() else {
            return false;
        };
        flight.mode = if flight.fuel.is_empty() {
            FlightMode::Grounded
        } else {
            FlightMode::Flying
        };
        creature.immobile = false;
        debug!(creature = id.get(), "left perch");
        self.set_tree_occupied(tree, false);
        true
    }

    fn egg_count(&self) -> usize {
        self.items
            .iter()
            .flatten()
            .filter(|item| matches!(item.kind, ItemKind::Egg { .. }))
            .count()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn reject(reason: Rejection, out_events: &mut Vec<Event>) {
    debug!(?reason, "command rejected");
    out_events.push(Event::CommandRejected { reason });
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(
    world: &mut World,
    context: &mut Context,
    command: Command,
    out_events: &mut Vec<Event>,
) {
    match command {
        Command::ConfigureGrid { columns, rows } => {
            world.configure(columns, rows);
            out_events.push(Event::GridConfigured { columns, rows });
        }
        Command::SetGround { cell, ground } => match world.ground_mut(cell) {
            Some(slot) => *slot = ground,
            None => reject(Rejection::OutOfBounds, out_events),
        },
        Command::SpawnCreature {
            species,
            stage,
            gender,
            cell,
        } => {
            let _ = world.spawn(context, species, stage, gender, cell, out_events);
        }
        Command::PlaceItem { kind, cell } => {
            let _ = world.place_item(kind, cell, out_events);
        }
        Command::AdjustVitals {
            creature,
            hit_points,
            water,
        } => match world.creature_mut(creature) {
            Some(creature) => {
                if let Some(value) = hit_points {
                    creature.hit_points.set(value);
                }
                if let Some(value) = water {
                    creature.water.set(value);
                }
            }
            None => reject(Rejection::UnknownCreature, out_events),
        },
        Command::SetRaining { raining } => {
            if world.raining != raining {
                world.raining = raining;
                out_events.push(Event::RainChanged { raining });
            }
        }
        Command::Tick => lifecycle::advance_clock(world, context, out_events),
        Command::BeginTurn { creature } => {
            lifecycle::begin_turn(world, creature, out_events);
        }
        Command::Act { creature, action } => {
            executor::execute(world, context, creature, action, out_events);
        }
        Command::SetSeekingMate { creature, seeking } => match world.creature_mut(creature) {
            Some(creature) => {
                if let Some(flight) = creature.flight.as_mut() {
                    flight.seeking_mate = seeking;
                }
            }
            None => reject(Rejection::UnknownCreature, out_events),
        },
        Command::LeavePerch { creature } => {
            let _ = world.leave_perch(creature);
        }
        Command::Feed { creature, food } => executor::feed(world, creature, food, out_events),
        Command::RemoveCreature { creature } => {
            if world
                .remove_creature(creature, RemovalCause::Removed, out_events)
                .is_none()
            {
                reject(Rejection::UnknownCreature, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use dino_park_core::{
        Action, CellCoord, CreatureId, CreatureSnapshot, Ground, Item, ItemKind, SpatialQuery,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Number of columns and rows of the grid.
    #[must_use]
    pub fn grid_bounds(world: &World) -> (u32, u32) {
        world.bounds()
    }

    /// Number of clock ticks since the grid was configured.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick
    }

    /// Reports whether it is raining.
    #[must_use]
    pub fn is_raining(world: &World) -> bool {
        world.raining
    }

    /// Ground at the cell, if it lies inside the grid.
    #[must_use]
    pub fn ground_at(world: &World, cell: CellCoord) -> Option<Ground> {
        world.ground(cell)
    }

    /// Items lying on the cell in placement order.
    #[must_use]
    pub fn items_at(world: &World, cell: CellCoord) -> &[Item] {
        world.items_at(cell)
    }

    /// Creature standing on the cell.
    #[must_use]
    pub fn occupant_at(world: &World, cell: CellCoord) -> Option<CreatureId> {
        world.occupant(cell)
    }

    /// Snapshot of a single creature.
    #[must_use]
    pub fn creature(world: &World, creature: CreatureId) -> Option<CreatureSnapshot> {
        world.creature(creature).map(super::Creature::snapshot)
    }

    /// Identifiers of every creature in ascending order.
    #[must_use]
    pub fn creature_ids(world: &World) -> Vec<CreatureId> {
        world.creatures.iter().map(|creature| creature.id).collect()
    }

    /// Snapshots of every creature in ascending identifier order.
    #[must_use]
    pub fn creatures(world: &World) -> Vec<CreatureSnapshot> {
        world.creatures.iter().map(super::Creature::snapshot).collect()
    }

    /// Number of eggs still incubating on the ground.
    #[must_use]
    pub fn egg_count(world: &World) -> usize {
        world.egg_count()
    }

    /// Menu description of an action the creature could take.
    #[must_use]
    pub fn describe(world: &World, creature: CreatureId, action: &Action) -> Option<String> {
        let actor = world.creature(creature)?;
        let target = match action {
            Action::Attack { target } | Action::Hunt { target } => Some(*target),
            Action::Breed { mate } => Some(*mate),
            _ => None,
        }
        .and_then(|target| world.creature(target))
        .map(|target| target.name.as_str());
        Some(action.describe(&actor.name, target))
    }

    /// Text rendering of the park, one line per row.
    #[must_use]
    pub fn render(world: &World) -> String {
        let (columns, rows) = world.bounds();
        let mut text = String::new();
        for row in 0..rows {
            for column in 0..columns {
                let cell = CellCoord::new(column, row);
                text.push(glyph(world, cell));
            }
            text.push('\n');
        }
        text
    }

    fn glyph(world: &World, cell: CellCoord) -> char {
        if let Some(creature) = world.occupant(cell).and_then(|id| world.creature(id)) {
            return creature.species.glyph();
        }
        if let Some(item) = world.items_at(cell).last() {
            return match item.kind {
                ItemKind::Egg { .. } => 'o',
                ItemKind::Corpse { .. } => 'x',
                _ => '%',
            };
        }
        match world.ground(cell) {
            Some(Ground::Dirt) | None => '.',
            Some(Ground::Wall) => '#',
            Some(Ground::Bush { .. }) => '*',
            Some(Ground::Tree { .. }) => '+',
            Some(Ground::Lake { .. }) => '~',
        }
    }

    /// Captures a read-only view implementing [`SpatialQuery`].
    #[must_use]
    pub fn view(world: &World) -> WorldView<'_> {
        WorldView {
            world,
            snapshots: creatures(world),
        }
    }

    /// Immutable view of the world handed to decision making systems.
    #[derive(Debug)]
    pub struct WorldView<'a> {
        world: &'a World,
        snapshots: Vec<CreatureSnapshot>,
    }

    impl WorldView<'_> {
        /// Snapshots of every creature in ascending identifier order.
        #[must_use]
        pub fn creatures(&self) -> &[CreatureSnapshot] {
            &self.snapshots
        }
    }

    impl SpatialQuery for WorldView<'_> {
        fn grid_bounds(&self) -> (u32, u32) {
            self.world.bounds()
        }

        fn ground_at(&self, cell: CellCoord) -> Option<Ground> {
            self.world.ground(cell)
        }

        fn occupant_at(&self, cell: CellCoord) -> Option<CreatureId> {
            self.world.occupant(cell)
        }

        fn creature(&self, creature: CreatureId) -> Option<&CreatureSnapshot> {
            self.snapshots
                .binary_search_by_key(&creature, |snapshot| snapshot.id)
                .ok()
                .and_then(|index| self.snapshots.get(index))
        }

        fn items_at(&self, cell: CellCoord) -> &[Item] {
            self.world.items_at(cell)
        }

        fn is_raining(&self) -> bool {
            self.world.raining
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dino_park_core::Action;

    fn world_with_grid(columns: u32, rows: u32) -> (World, Context, Vec<Event>) {
        let mut world = World::new();
        let mut context = Context::new(11);
        let mut events = Vec::new();
        apply(
            &mut world,
            &mut context,
            Command::ConfigureGrid { columns, rows },
            &mut events,
        );
        (world, context, events)
    }

    fn spawn(
        world: &mut World,
        context: &mut Context,
        species: Species,
        cell: CellCoord,
    ) -> CreatureId {
        let mut events = Vec::new();
        apply(
            world,
            context,
            Command::SpawnCreature {
                species,
                stage: GrowthStage::Adult,
                gender: Some(Gender::Female),
                cell,
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::CreatureSpawned { creature, .. }] => *creature,
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn configure_grid_resets_the_park() {
        let (mut world, mut context, events) = world_with_grid(6, 4);
        assert_eq!(events, vec![Event::GridConfigured { columns: 6, rows: 4 }]);
        assert_eq!(query::grid_bounds(&world), (6, 4));

        let _ = spawn(&mut world, &mut context, Species::Stegosaur, CellCoord::new(1, 1));
        let mut events = Vec::new();
        apply(
            &mut world,
            &mut context,
            Command::ConfigureGrid { columns: 3, rows: 3 },
            &mut events,
        );
        assert!(query::creatures(&world).is_empty());
        assert_eq!(query::occupant_at(&world, CellCoord::new(1, 1)), None);
    }

    #[test]
    fn spawning_rejects_occupied_and_unenterable_cells() {
        let (mut world, mut context, _) = world_with_grid(4, 4);
        let cell = CellCoord::new(2, 2);
        let _ = spawn(&mut world, &mut context, Species::Allosaur, cell);

        let mut events = Vec::new();
        apply(
            &mut world,
            &mut context,
            Command::SpawnCreature {
                species: Species::Stegosaur,
                stage: GrowthStage::Adult,
                gender: None,
                cell,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::CommandRejected {
                reason: Rejection::Occupied
            }]
        );

        let lake = CellCoord::new(0, 0);
        let mut events = Vec::new();
        apply(
            &mut world,
            &mut context,
            Command::SetGround {
                cell: lake,
                ground: Ground::lake(),
            },
            &mut events,
        );
        apply(
            &mut world,
            &mut context,
            Command::SpawnCreature {
                species: Species::Stegosaur,
                stage: GrowthStage::Adult,
                gender: None,
                cell: lake,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::CommandRejected {
                reason: Rejection::Unenterable
            }]
        );

        let mut events = Vec::new();
        apply(
            &mut world,
            &mut context,
            Command::SpawnCreature {
                species: Species::Stegosaur,
                stage: GrowthStage::Adult,
                gender: None,
                cell: CellCoord::new(9, 9),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::CommandRejected {
                reason: Rejection::OutOfBounds
            }]
        );
    }

    #[test]
    fn flyers_may_spawn_over_lakes() {
        let (mut world, mut context, _) = world_with_grid(3, 3);
        let lake = CellCoord::new(1, 1);
        let mut events = Vec::new();
        apply(
            &mut world,
            &mut context,
            Command::SetGround {
                cell: lake,
                ground: Ground::lake(),
            },
            &mut events,
        );
        let id = spawn(&mut world, &mut context, Species::Pterodactyl, lake);
        assert_eq!(query::occupant_at(&world, lake), Some(id));
    }

    #[test]
    fn creatures_are_named_per_species() {
        let (mut world, mut context, _) = world_with_grid(4, 1);
        let first = spawn(&mut world, &mut context, Species::Allosaur, CellCoord::new(0, 0));
        let second = spawn(&mut world, &mut context, Species::Allosaur, CellCoord::new(1, 0));
        let third = spawn(&mut world, &mut context, Species::Stegosaur, CellCoord::new(2, 0));

        let names: Vec<_> = [first, second, third]
            .into_iter()
            .filter_map(|id| query::creature(&world, id))
            .map(|snapshot| snapshot.name)
            .collect();
        assert_eq!(names, vec!["Allosaur1", "Allosaur2", "Stegosaur1"]);
    }

    #[test]
    fn adjust_vitals_clamps_to_the_stat_block() {
        let (mut world, mut context, _) = world_with_grid(2, 2);
        let id = spawn(&mut world, &mut context, Species::Stegosaur, CellCoord::new(0, 0));
        let mut events = Vec::new();
        apply(
            &mut world,
            &mut context,
            Command::AdjustVitals {
                creature: id,
                hit_points: Some(500),
                water: Some(3),
            },
            &mut events,
        );
        let snapshot = query::creature(&world, id).expect("creature");
        assert_eq!(snapshot.hit_points, 100);
        assert_eq!(snapshot.water, 3);
        assert!(events.is_empty());
    }

    #[test]
    fn removing_a_creature_frees_its_cell() {
        let (mut world, mut context, _) = world_with_grid(2, 2);
        let cell = CellCoord::new(1, 0);
        let id = spawn(&mut world, &mut context, Species::Brachiosaur, cell);
        let mut events = Vec::new();
        apply(
            &mut world,
            &mut context,
            Command::RemoveCreature { creature: id },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::CreatureRemoved {
                creature: id,
                cell,
                cause: RemovalCause::Removed
            }]
        );
        assert_eq!(query::occupant_at(&world, cell), None);
        assert!(query::items_at(&world, cell).is_empty());
    }

    #[test]
    fn render_layers_creatures_over_items_over_ground() {
        let (mut world, mut context, _) = world_with_grid(3, 1);
        let mut events = Vec::new();
        apply(
            &mut world,
            &mut context,
            Command::SetGround {
                cell: CellCoord::new(2, 0),
                ground: Ground::lake(),
            },
            &mut events,
        );
        apply(
            &mut world,
            &mut context,
            Command::PlaceItem {
                kind: ItemKind::egg(Species::Stegosaur),
                cell: CellCoord::new(1, 0),
            },
            &mut events,
        );
        let _ = spawn(&mut world, &mut context, Species::Allosaur, CellCoord::new(0, 0));
        assert_eq!(query::render(&world), "ao~\n");
    }

    #[test]
    fn describe_names_the_target() {
        let (mut world, mut context, _) = world_with_grid(2, 1);
        let hunter = spawn(&mut world, &mut context, Species::Allosaur, CellCoord::new(0, 0));
        let prey = spawn(&mut world, &mut context, Species::Stegosaur, CellCoord::new(1, 0));
        assert_eq!(
            query::describe(&world, hunter, &Action::Hunt { target: prey }).as_deref(),
            Some("Allosaur1 attacks Stegosaur1")
        );
    }
}

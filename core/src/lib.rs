#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Dino Park simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Callers submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! changed. Systems read the park through the [`SpatialQuery`] trait and
//! respond exclusively with new commands.

mod species;

use serde::{Deserialize, Serialize};

pub use species::{FoodKind, Serving, Species, SpeciesStats, CORPSE_BITE};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Dino Park.";

/// Turns an egg incubates before it hatches.
pub const INCUBATION_TURNS: u32 = 50;

/// Turns a hunted creature stays off a carnivore's prey list.
pub const ATTACK_COOLDOWN_TURNS: u32 = 20;

/// Water level restored when rain revives a dehydrated creature.
pub const RAIN_REVIVAL_WATER: u32 = 15;

/// Drinks a freshly created lake provides.
pub const LAKE_SIPS: u32 = 25;

/// Fish a freshly created lake holds.
pub const LAKE_FISH: u32 = 5;

/// Hit points a carnivore's strike takes from armoured prey.
pub const HUNT_DAMAGE: u32 = 20;

/// Hit points a carnivore recovers from a successful strike.
pub const HUNT_HEAL: u32 = 20;

/// Probability that a generic attack connects.
pub const ATTACK_HIT_CHANCE: f64 = 0.5;

/// Chebyshev radius around a corpse that must be free of other creatures
/// before a flyer will feed on it.
pub const CONTESTED_CARCASS_RADIUS: u32 = 1;

/// Weapon every creature fights with when it has nothing better.
pub const INTRINSIC_WEAPON: Weapon = Weapon {
    damage: 5,
    verb: "punches",
};

/// Damage dealt by a single successful attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Weapon {
    /// Hit points removed from the target.
    pub damage: u32,
    /// Verb used when narrating the hit.
    pub verb: &'static str,
}

/// Sex assigned to a creature at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male creature.
    Male,
    /// Female creature, the one that carries eggs.
    Female,
}

impl Gender {
    /// Gender a creature needs to be a valid partner.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }
}

/// Growth stage of a creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthStage {
    /// Freshly hatched creature that still has to mature.
    Baby,
    /// Fully grown creature.
    Adult,
}

/// Movement modes. Only flyers ever leave [`FlightMode::Grounded`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightMode {
    /// Walking on the ground.
    Grounded,
    /// Airborne, burning fuel every turn.
    Flying,
}

/// Critical resource that pushed a creature into hibernation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HibernationCause {
    /// Hit points dropped to zero.
    Food,
    /// Water level dropped to zero.
    Water,
}

/// Compass directions a creature may step in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement north and east at once.
    NorthEast,
    /// Movement toward increasing column indices.
    East,
    /// Movement south and east at once.
    SouthEast,
    /// Movement toward increasing row indices.
    South,
    /// Movement south and west at once.
    SouthWest,
    /// Movement toward decreasing column indices.
    West,
    /// Movement north and west at once.
    NorthWest,
}

impl Direction {
    /// Every direction in the order exits are enumerated.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Column and row delta of a single step.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// Lower-case label used in narration.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::NorthEast => "north-east",
            Direction::East => "east",
            Direction::SouthEast => "south-east",
            Direction::South => "south",
            Direction::SouthWest => "south-west",
            Direction::West => "west",
            Direction::NorthWest => "north-west",
        }
    }
}

/// Unique identifier assigned to a creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(u32);

impl CreatureId {
    /// Creates a new creature identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an item lying in the park.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Computes the Chebyshev (king move) distance between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column()
            .abs_diff(other.column())
            .max(self.row().abs_diff(other.row()))
    }

    /// Neighbouring cell in the given direction, if it lies inside the bounds.
    #[must_use]
    pub fn step(self, direction: Direction, bounds: (u32, u32)) -> Option<CellCoord> {
        let (dx, dy) = direction.offset();
        let column = u32::try_from(i64::from(self.column) + dx).ok()?;
        let row = u32::try_from(i64::from(self.row) + dy).ok()?;
        (column < bounds.0 && row < bounds.1).then_some(CellCoord::new(column, row))
    }
}

/// Row-major iterator over every cell of a grid.
#[derive(Clone, Debug)]
pub struct CellScan {
    columns: u32,
    rows: u32,
    next: u64,
}

impl CellScan {
    /// Creates an iterator covering a grid with the provided dimensions.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            next: 0,
        }
    }
}

impl Iterator for CellScan {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.columns == 0 {
            return None;
        }
        let total = u64::from(self.columns) * u64::from(self.rows);
        if self.next >= total {
            return None;
        }
        let column = u32::try_from(self.next % u64::from(self.columns)).ok()?;
        let row = u32::try_from(self.next / u64::from(self.columns)).ok()?;
        self.next += 1;
        Some(CellCoord::new(column, row))
    }
}

/// Coarse classification of a ground cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroundKind {
    /// Bare earth.
    Dirt,
    /// Impassable wall.
    Wall,
    /// Fruit-bearing bush.
    Bush,
    /// Fruit-bearing tree that flyers perch in.
    Tree,
    /// Water source stocked with fish.
    Lake,
}

/// Terrain occupying a single cell together with its mutable stock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ground {
    /// Bare earth.
    Dirt,
    /// Impassable wall.
    Wall,
    /// Bush carrying ripe fruit.
    Bush {
        /// Ripe fruit available to graze.
        fruit: u32,
    },
    /// Tree carrying ripe fruit.
    Tree {
        /// Ripe fruit available to browse.
        fruit: u32,
        /// Whether a flyer is perched in the tree.
        occupied: bool,
    },
    /// Lake providing water and fish.
    Lake {
        /// Drinks left before the lake runs dry.
        sips: u32,
        /// Fish left to catch.
        fish: u32,
    },
}

impl Ground {
    /// Fully stocked lake.
    #[must_use]
    pub const fn lake() -> Self {
        Ground::Lake {
            sips: LAKE_SIPS,
            fish: LAKE_FISH,
        }
    }

    /// Classification of the ground.
    #[must_use]
    pub const fn kind(&self) -> GroundKind {
        match self {
            Ground::Dirt => GroundKind::Dirt,
            Ground::Wall => GroundKind::Wall,
            Ground::Bush { .. } => GroundKind::Bush,
            Ground::Tree { .. } => GroundKind::Tree,
            Ground::Lake { .. } => GroundKind::Lake,
        }
    }

    /// Reports whether a creature moving in the given mode may stand here.
    #[must_use]
    pub const fn permits(&self, mode: FlightMode) -> bool {
        match self {
            Ground::Wall => false,
            Ground::Lake { .. } => matches!(mode, FlightMode::Flying),
            Ground::Dirt | Ground::Bush { .. } | Ground::Tree { .. } => true,
        }
    }

    /// Ripe fruit carried by a bush or tree.
    #[must_use]
    pub const fn fruit(&self) -> u32 {
        match self {
            Ground::Bush { fruit } | Ground::Tree { fruit, .. } => *fruit,
            _ => 0,
        }
    }

    /// Reports whether the cell is a lake with water left to drink.
    #[must_use]
    pub const fn has_water(&self) -> bool {
        matches!(self, Ground::Lake { sips, .. } if *sips > 0)
    }

    /// Reports whether the cell is a lake with fish left to catch.
    #[must_use]
    pub const fn has_fish(&self) -> bool {
        matches!(self, Ground::Lake { fish, .. } if *fish > 0)
    }

    /// Reports whether the cell is a tree with nobody perched in it.
    #[must_use]
    pub const fn is_free_tree(&self) -> bool {
        matches!(self, Ground::Tree { occupied: false, .. })
    }
}

/// Item types that may lie on the ground.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Single piece of fruit.
    Fruit,
    /// Herbivore meal kit.
    VegetarianMealKit,
    /// Carnivore meal kit.
    CarnivoreMealKit,
    /// Incubating egg.
    Egg {
        /// Species the egg hatches into.
        species: Species,
        /// Turns the egg has incubated.
        incubation: u32,
    },
    /// Remains of a dead creature.
    Corpse {
        /// Species of the creature that died.
        species: Species,
        /// Food value left in the corpse.
        food: u32,
        /// Turns since the creature died.
        age: u32,
    },
}

impl ItemKind {
    /// Freshly laid egg of the provided species.
    #[must_use]
    pub const fn egg(species: Species) -> Self {
        ItemKind::Egg {
            species,
            incubation: 0,
        }
    }

    /// Fresh corpse of the provided species.
    #[must_use]
    pub const fn corpse(species: Species) -> Self {
        ItemKind::Corpse {
            species,
            food: species.stats().corpse_food_value,
            age: 0,
        }
    }

    /// Food category the item belongs to.
    #[must_use]
    pub const fn food_kind(&self) -> FoodKind {
        match self {
            ItemKind::Fruit => FoodKind::Fruit,
            ItemKind::VegetarianMealKit => FoodKind::VegetarianMealKit,
            ItemKind::CarnivoreMealKit => FoodKind::CarnivoreMealKit,
            ItemKind::Egg { .. } => FoodKind::Egg,
            ItemKind::Corpse { .. } => FoodKind::Corpse,
        }
    }

    /// Description used when narrating meals.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            ItemKind::Fruit => "fruit".to_owned(),
            ItemKind::VegetarianMealKit => "a vegetarian meal kit".to_owned(),
            ItemKind::CarnivoreMealKit => "a carnivore meal kit".to_owned(),
            ItemKind::Egg { species, .. } => format!("a {} egg", species.name()),
            ItemKind::Corpse { species, .. } => format!("a dead {}", species.name()),
        }
    }
}

/// Item lying on a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Item {
    /// Identifier assigned by the world.
    pub id: ItemId,
    /// What the item is.
    pub kind: ItemKind,
}

/// Where a meal comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FoodSource {
    /// An item lying on the ground.
    Item(ItemId),
    /// Fish swimming in the lake at the cell.
    Fish(CellCoord),
    /// Fruit growing on the bush or tree at the cell.
    Plant(CellCoord),
}

/// What a movement step is heading for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Purpose {
    /// Walking toward water.
    Water,
    /// Walking toward food.
    Food,
    /// Stalking prey.
    Prey,
    /// Approaching a partner.
    Mate,
    /// Heading for a tree to perch in.
    Perch,
    /// Roaming without a goal.
    Wander,
}

impl Purpose {
    const fn label(self) -> &'static str {
        match self {
            Purpose::Water => "water",
            Purpose::Food => "food",
            Purpose::Prey => "prey",
            Purpose::Mate => "a mate",
            Purpose::Perch => "a tree",
            Purpose::Wander => "nothing in particular",
        }
    }
}

/// Single intent produced by a behaviour and consumed once by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Enter or continue hibernation, dying once the limit is reached.
    Hibernate,
    /// Drink from the lake at the cell.
    Drink {
        /// Lake to drink from.
        lake: CellCoord,
    },
    /// Eat from a food source.
    Eat {
        /// Source of the meal.
        food: FoodSource,
    },
    /// Generic weapon attack with a chance to miss.
    Attack {
        /// Creature being attacked.
        target: CreatureId,
    },
    /// Carnivore strike against prey.
    Hunt {
        /// Prey being struck.
        target: CreatureId,
    },
    /// Mate with a partner.
    Breed {
        /// Partner of the opposite gender.
        mate: CreatureId,
    },
    /// Settle into the tree at the cell.
    Perch {
        /// Tree to perch in.
        tree: CellCoord,
    },
    /// Move one cell.
    Step {
        /// Direction of the step.
        direction: Direction,
        /// What the step is heading for.
        purpose: Purpose,
    },
    /// Do nothing for the rest of the turn.
    EndTurn,
}

impl Action {
    /// Name of the action used in "nothing happened" reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Action::Hibernate => "Hibernate",
            Action::Drink { .. } => "Drink",
            Action::Eat { .. } => "Eat",
            Action::Attack { .. } => "Attack",
            Action::Hunt { .. } => "Hunt",
            Action::Breed { .. } => "Breed",
            Action::Perch { .. } => "Perch",
            Action::Step { .. } => "Step",
            Action::EndTurn => "EndTurn",
        }
    }

    /// Menu style description of the action from the actor's point of view.
    #[must_use]
    pub fn describe(&self, actor: &str, target: Option<&str>) -> String {
        let target = target.unwrap_or("something");
        match self {
            Action::Hibernate => format!("{actor} cannot move or do anything until fed"),
            Action::Drink { .. } => format!("{actor} drinks"),
            Action::Eat { .. } => format!("{actor} eats"),
            Action::Attack { .. } | Action::Hunt { .. } => format!("{actor} attacks {target}"),
            Action::Breed { .. } => format!("{actor} is mating with {target}"),
            Action::Perch { .. } => format!("{actor} perches in a tree"),
            Action::Step { direction, purpose } => format!(
                "{actor} moves {} toward {}",
                direction.label(),
                purpose.label()
            ),
            Action::EndTurn => format!("{actor} ends its turn"),
        }
    }
}

/// Reasons a creature left the park.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalCause {
    /// Died after hibernating too long without food.
    Starved,
    /// Died after hibernating too long without water.
    Dehydrated,
    /// Killed in combat; a corpse remains.
    Killed,
    /// Eaten whole by a carnivore.
    Devoured,
    /// Removed by an external command.
    Removed,
}

/// Reasons a structural command was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// The cell lies outside the configured grid.
    OutOfBounds,
    /// Another creature already stands on the cell.
    Occupied,
    /// The ground does not allow the creature to stand on it.
    Unenterable,
    /// The referenced creature does not exist.
    UnknownCreature,
    /// The creature does not eat the offered food.
    Inedible,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the grid with dirt of the provided dimensions.
    ConfigureGrid {
        /// Number of columns.
        columns: u32,
        /// Number of rows.
        rows: u32,
    },
    /// Overwrites the ground of a single cell.
    SetGround {
        /// Cell to change.
        cell: CellCoord,
        /// New ground.
        ground: Ground,
    },
    /// Creates a creature with its species' default stat block.
    SpawnCreature {
        /// Species of the new creature.
        species: Species,
        /// Growth stage of the new creature.
        stage: GrowthStage,
        /// Gender, drawn at random when absent.
        gender: Option<Gender>,
        /// Cell the creature appears on.
        cell: CellCoord,
    },
    /// Drops an item onto a cell.
    PlaceItem {
        /// Item to create.
        kind: ItemKind,
        /// Cell the item lands on.
        cell: CellCoord,
    },
    /// Overrides a creature's vital resources, clamped to their maxima.
    AdjustVitals {
        /// Creature to adjust.
        creature: CreatureId,
        /// New hit points, if changing.
        hit_points: Option<u32>,
        /// New water level, if changing.
        water: Option<u32>,
    },
    /// Starts or stops the rain.
    SetRaining {
        /// Whether it is raining.
        raining: bool,
    },
    /// Advances the park clock: eggs incubate and corpses rot.
    Tick,
    /// Runs the lifecycle bookkeeping that precedes a creature's decision.
    BeginTurn {
        /// Creature whose turn starts.
        creature: CreatureId,
    },
    /// Executes the action a creature decided on.
    Act {
        /// Creature performing the action.
        creature: CreatureId,
        /// Action to perform.
        action: Action,
    },
    /// Marks a flyer as waiting for a partner.
    SetSeekingMate {
        /// Flyer changing its mind.
        creature: CreatureId,
        /// Whether it is waiting for a partner.
        seeking: bool,
    },
    /// Makes a perched flyer leave its tree.
    LeavePerch {
        /// Flyer leaving the tree.
        creature: CreatureId,
    },
    /// Hand-feeds a creature.
    Feed {
        /// Creature being fed.
        creature: CreatureId,
        /// Food handed over.
        food: FoodKind,
    },
    /// Removes a creature without leaving a corpse.
    RemoveCreature {
        /// Creature to remove.
        creature: CreatureId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms the grid was replaced.
    GridConfigured {
        /// Number of columns.
        columns: u32,
        /// Number of rows.
        rows: u32,
    },
    /// Reports that the park clock advanced.
    TimeAdvanced {
        /// Number of ticks elapsed since the grid was configured.
        tick: u64,
    },
    /// Reports a change of weather.
    RainChanged {
        /// Whether it is raining now.
        raining: bool,
    },
    /// Confirms that a creature entered the park.
    CreatureSpawned {
        /// Identifier assigned to the creature.
        creature: CreatureId,
        /// Species of the creature.
        species: Species,
        /// Growth stage of the creature.
        stage: GrowthStage,
        /// Gender of the creature.
        gender: Gender,
        /// Cell the creature occupies.
        cell: CellCoord,
    },
    /// Confirms that a creature moved between two cells.
    CreatureMoved {
        /// Creature that moved.
        creature: CreatureId,
        /// Cell the creature left.
        from: CellCoord,
        /// Cell the creature entered.
        to: CellCoord,
    },
    /// Confirms that a creature left the park.
    CreatureRemoved {
        /// Creature that was removed.
        creature: CreatureId,
        /// Cell it occupied last.
        cell: CellCoord,
        /// Why it was removed.
        cause: RemovalCause,
    },
    /// Reports a baby growing into an adult.
    CreatureMatured {
        /// Creature that matured.
        creature: CreatureId,
    },
    /// Reports a flyer running out of fuel.
    CreatureGrounded {
        /// Flyer that landed.
        creature: CreatureId,
    },
    /// Reports a creature slipping into hibernation.
    CreatureHibernated {
        /// Creature that hibernates.
        creature: CreatureId,
        /// Resource that ran out.
        cause: HibernationCause,
    },
    /// Reports a hibernating creature waking up.
    CreatureRevived {
        /// Creature that woke.
        creature: CreatureId,
        /// Cause of the hibernation that ended.
        cause: HibernationCause,
    },
    /// Reports a creature becoming pregnant.
    CreatureConceived {
        /// Creature now carrying an egg.
        creature: CreatureId,
    },
    /// Confirms an item landed on the ground.
    ItemPlaced {
        /// Identifier assigned to the item.
        item: ItemId,
        /// What the item is.
        kind: ItemKind,
        /// Where it lies.
        cell: CellCoord,
    },
    /// Confirms an item disappeared from the ground.
    ItemRemoved {
        /// Item that disappeared.
        item: ItemId,
        /// Where it lay.
        cell: CellCoord,
    },
    /// Reports an egg being laid.
    EggLaid {
        /// Mother of the egg.
        creature: CreatureId,
        /// Egg item.
        item: ItemId,
        /// Where the egg was laid.
        cell: CellCoord,
    },
    /// Reports an egg hatching.
    EggHatched {
        /// Egg that hatched.
        item: ItemId,
        /// Baby that emerged.
        creature: CreatureId,
        /// Where the egg lay.
        cell: CellCoord,
    },
    /// Reports eco points credited to the park.
    RewardGranted {
        /// Points credited by this event.
        points: u64,
        /// Ledger balance after crediting.
        total: u64,
    },
    /// Reports the effect of an executed action.
    ActionResolved {
        /// Creature that acted.
        creature: CreatureId,
        /// Action that was executed.
        action: Action,
        /// Human readable description of what happened.
        outcome: String,
    },
    /// Reports that a command was refused.
    CommandRejected {
        /// Why the command was refused.
        reason: Rejection,
    },
}

/// Read-only description of a creature as seen by pure systems.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatureSnapshot {
    /// Identifier of the creature.
    pub id: CreatureId,
    /// Display name, e.g. `Allosaur3`.
    pub name: String,
    /// Species of the creature.
    pub species: Species,
    /// Growth stage of the creature.
    pub stage: GrowthStage,
    /// Gender of the creature.
    pub gender: Gender,
    /// Cell the creature occupies.
    pub cell: CellCoord,
    /// Current hit points.
    pub hit_points: u32,
    /// Current water level.
    pub water: u32,
    /// Current movement mode.
    pub mode: FlightMode,
    /// Remaining fuel, zero for species that cannot fly.
    pub fuel: u32,
    /// Cause of an ongoing hibernation.
    pub hibernation: Option<HibernationCause>,
    /// Whether the creature carries an egg.
    pub pregnant: bool,
    /// Whether the creature sits in a tree.
    pub perched: bool,
    /// Whether the creature is unable to move.
    pub immobile: bool,
    /// Whether the creature waits for a partner.
    pub seeking_mate: bool,
    /// Creatures this one attacked recently, in ascending id order.
    pub recently_attacked: Vec<CreatureId>,
}

impl CreatureSnapshot {
    /// Species constants of the creature.
    #[must_use]
    pub fn stats(&self) -> &'static SpeciesStats {
        self.species.stats()
    }

    /// The creature is hungry while below its species' hunger threshold.
    #[must_use]
    pub fn is_hungry(&self) -> bool {
        self.hit_points < self.stats().hunger_threshold
    }

    /// The creature is thirsty while below its species' thirst threshold.
    #[must_use]
    pub fn is_thirsty(&self) -> bool {
        self.water < self.stats().thirst_threshold
    }

    /// Reports whether the creature is hibernating.
    #[must_use]
    pub fn is_hibernating(&self) -> bool {
        self.hibernation.is_some()
    }

    /// Either vital resource has run out.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.hit_points == 0 || self.water == 0
    }

    /// Reports whether the creature has attacked the target recently.
    #[must_use]
    pub fn recently_attacked(&self, target: CreatureId) -> bool {
        self.recently_attacked.binary_search(&target).is_ok()
    }
}

/// Read access to the park consumed by the decision making systems.
pub trait SpatialQuery {
    /// Number of columns and rows of the grid.
    fn grid_bounds(&self) -> (u32, u32);

    /// Ground at the cell, if the cell lies inside the grid.
    fn ground_at(&self, cell: CellCoord) -> Option<Ground>;

    /// Creature standing on the cell.
    fn occupant_at(&self, cell: CellCoord) -> Option<CreatureId>;

    /// Snapshot of the creature with the provided identifier.
    fn creature(&self, creature: CreatureId) -> Option<&CreatureSnapshot>;

    /// Items lying on the cell in the order they were placed.
    fn items_at(&self, cell: CellCoord) -> &[Item];

    /// Reports whether it is currently raining.
    fn is_raining(&self) -> bool;

    /// Reports whether a creature moving in `mode` may step onto the cell.
    fn is_enterable(&self, cell: CellCoord, mode: FlightMode) -> bool {
        self.occupant_at(cell).is_none()
            && self
                .ground_at(cell)
                .map_or(false, |ground| ground.permits(mode))
    }

    /// Enterable neighbours of the cell in [`Direction::ALL`] order.
    fn legal_exits(&self, cell: CellCoord, mode: FlightMode) -> Vec<(Direction, CellCoord)> {
        let bounds = self.grid_bounds();
        Direction::ALL
            .into_iter()
            .filter_map(|direction| {
                let to = cell.step(direction, bounds)?;
                self.is_enterable(to, mode).then_some((direction, to))
            })
            .collect()
    }

    /// Every cell of the grid in row-major order.
    fn cells(&self) -> CellScan {
        let (columns, rows) = self.grid_bounds();
        CellScan::new(columns, rows)
    }
}

/// Status of the simulation after a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnOutcome {
    /// The simulation keeps going.
    Continue,
    /// The park reached its objective.
    Win,
    /// The park failed its objective.
    Loss,
    /// The operator asked to stop.
    Quit,
}

#[cfg(test)]
mod tests {
    use super::{
        Action, CellCoord, CellScan, Direction, FlightMode, Gender, Ground, ItemKind, Purpose,
        Rejection, Species,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn chebyshev_distance_counts_diagonals_once() {
        let origin = CellCoord::new(2, 2);
        assert_eq!(origin.chebyshev_distance(CellCoord::new(3, 3)), 1);
        assert_eq!(origin.chebyshev_distance(CellCoord::new(5, 3)), 3);
    }

    #[test]
    fn step_stays_inside_bounds() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::North, (3, 3)), None);
        assert_eq!(corner.step(Direction::West, (3, 3)), None);
        assert_eq!(
            corner.step(Direction::SouthEast, (3, 3)),
            Some(CellCoord::new(1, 1))
        );
        assert_eq!(CellCoord::new(2, 1).step(Direction::East, (3, 3)), None);
    }

    #[test]
    fn cell_scan_walks_rows_first() {
        let cells: Vec<_> = CellScan::new(2, 2).collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(0, 1),
                CellCoord::new(1, 1),
            ]
        );
        assert_eq!(CellScan::new(0, 4).count(), 0);
    }

    #[test]
    fn lakes_only_admit_flyers_in_the_air() {
        let lake = Ground::lake();
        assert!(!lake.permits(FlightMode::Grounded));
        assert!(lake.permits(FlightMode::Flying));
        assert!(!Ground::Wall.permits(FlightMode::Flying));
        assert!(lake.has_water());
        assert!(!Ground::Lake { sips: 0, fish: 0 }.has_water());
    }

    #[test]
    fn corpses_start_with_species_food_value() {
        assert_eq!(
            ItemKind::corpse(Species::Brachiosaur),
            ItemKind::Corpse {
                species: Species::Brachiosaur,
                food: 100,
                age: 0
            }
        );
    }

    #[test]
    fn step_description_names_direction_and_goal() {
        let action = Action::Step {
            direction: Direction::NorthWest,
            purpose: Purpose::Water,
        };
        assert_eq!(
            action.describe("Stegosaur1", None),
            "Stegosaur1 moves north-west toward water"
        );
        assert_eq!(Gender::Male.opposite(), Gender::Female);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn scenario_contracts_round_trip_through_bincode() {
        assert_round_trip(&Species::Pterodactyl);
        assert_round_trip(&ItemKind::egg(Species::Allosaur));
        assert_round_trip(&Ground::Tree {
            fruit: 3,
            occupied: true,
        });
        assert_round_trip(&Rejection::Occupied);
    }
}

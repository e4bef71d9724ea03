//! Species catalogue and the fixed stat table creatures are built from.

use serde::{Deserialize, Serialize};

use crate::GroundKind;

/// The four dinosaur species that populate the park.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    /// Armoured herbivore that grazes on bushes.
    Stegosaur,
    /// Large herbivore that browses fruit from trees.
    Brachiosaur,
    /// Carnivore that scavenges corpses and hunts smaller species.
    Allosaur,
    /// Flyer that burns fuel while airborne and nests in trees.
    Pterodactyl,
}

impl Species {
    /// Every species in catalogue order.
    pub const ALL: [Species; 4] = [
        Species::Stegosaur,
        Species::Brachiosaur,
        Species::Allosaur,
        Species::Pterodactyl,
    ];

    /// Fixed stat block shared by every creature of the species.
    #[must_use]
    pub const fn stats(self) -> &'static SpeciesStats {
        match self {
            Species::Stegosaur => &STEGOSAUR,
            Species::Brachiosaur => &BRACHIOSAUR,
            Species::Allosaur => &ALLOSAUR,
            Species::Pterodactyl => &PTERODACTYL,
        }
    }

    /// Human readable species name used when naming creatures.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Species::Stegosaur => "Stegosaur",
            Species::Brachiosaur => "Brachiosaur",
            Species::Allosaur => "Allosaur",
            Species::Pterodactyl => "Pterodactyl",
        }
    }

    /// Glyph used by text renderings of the park.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Species::Stegosaur => 's',
            Species::Brachiosaur => 'r',
            Species::Allosaur => 'a',
            Species::Pterodactyl => 'p',
        }
    }

    /// Stable position of the species inside [`Species::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Species::Stegosaur => 0,
            Species::Brachiosaur => 1,
            Species::Allosaur => 2,
            Species::Pterodactyl => 3,
        }
    }

    /// Reports whether the species is able to take to the air.
    #[must_use]
    pub const fn can_fly(self) -> bool {
        matches!(self, Species::Pterodactyl)
    }

    /// Reports whether the species hunts live prey.
    #[must_use]
    pub const fn hunts(self) -> bool {
        matches!(self, Species::Allosaur)
    }

    /// Ground that grows fruit the species can browse directly, if any.
    #[must_use]
    pub const fn forage_ground(self) -> Option<GroundKind> {
        match self {
            Species::Stegosaur => Some(GroundKind::Bush),
            Species::Brachiosaur => Some(GroundKind::Tree),
            Species::Allosaur | Species::Pterodactyl => None,
        }
    }

    /// Serving the species takes from the provided food, if it eats it at all.
    #[must_use]
    pub const fn serving(self, food: FoodKind) -> Option<Serving> {
        match (self, food) {
            (Species::Stegosaur, FoodKind::Fruit) => Some(Serving::Portion(10)),
            (Species::Brachiosaur, FoodKind::Fruit) => Some(Serving::Portion(5)),
            (Species::Stegosaur | Species::Brachiosaur, FoodKind::VegetarianMealKit) => {
                Some(Serving::Portion(200))
            }
            (Species::Allosaur, FoodKind::CarnivoreMealKit) => Some(Serving::Portion(200)),
            (Species::Pterodactyl, FoodKind::CarnivoreMealKit) => Some(Serving::Portion(100)),
            (Species::Allosaur | Species::Pterodactyl, FoodKind::Egg) => {
                Some(Serving::Portion(10))
            }
            (Species::Allosaur | Species::Pterodactyl, FoodKind::Fish) => {
                Some(Serving::Portion(5))
            }
            (Species::Allosaur, FoodKind::Corpse) => Some(Serving::Remaining),
            (Species::Pterodactyl, FoodKind::Corpse) => Some(Serving::Bites(CORPSE_BITE)),
            _ => None,
        }
    }

    /// Hit points restored when a keeper hand-feeds the provided food.
    #[must_use]
    pub const fn hand_fed_value(self, food: FoodKind) -> Option<u32> {
        match (self, food) {
            (Species::Stegosaur | Species::Brachiosaur, FoodKind::Fruit) => Some(20),
            _ => match self.serving(food) {
                Some(Serving::Portion(value)) | Some(Serving::Bites(value)) => Some(value),
                Some(Serving::Remaining) => Some(self.stats().corpse_food_value),
                None => None,
            },
        }
    }
}

/// Hit points a flyer recovers per bite of a corpse.
pub const CORPSE_BITE: u32 = 10;

/// Categories of food recognised by the feeding rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodKind {
    /// Fruit lying on the ground or growing on a plant.
    Fruit,
    /// Packaged meal suitable for herbivores.
    VegetarianMealKit,
    /// Packaged meal suitable for carnivores and flyers.
    CarnivoreMealKit,
    /// Dinosaur egg.
    Egg,
    /// Remains of a dead creature.
    Corpse,
    /// Fish caught from a lake.
    Fish,
}

/// How much of a food source a single meal consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Serving {
    /// Consumes one unit of the source and heals by the fixed amount.
    Portion(u32),
    /// Takes up to the given amount from a corpse's remaining food value.
    Bites(u32),
    /// Devours everything left of a corpse in one meal.
    Remaining,
}

/// Species-specific constants governing survival, growth and breeding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeciesStats {
    /// Hit points of a freshly created adult.
    pub starting_hit_points: u32,
    /// Upper bound on hit points.
    pub max_hit_points: u32,
    /// Water level of a freshly created creature.
    pub starting_water: u32,
    /// Upper bound on the water level.
    pub max_water: u32,
    /// The creature is hungry while its hit points are below this value.
    pub hunger_threshold: u32,
    /// The creature is thirsty while its water level is below this value.
    pub thirst_threshold: u32,
    /// Hit points a creature must exceed to breed.
    pub mating_threshold: u32,
    /// Hibernation turns survived when starving.
    pub food_unconscious_limit: u32,
    /// Hibernation turns survived when dehydrated.
    pub water_unconscious_limit: u32,
    /// Hit points of a newly hatched baby.
    pub baby_hit_points: u32,
    /// Turns a baby needs to become an adult.
    pub maturation_turns: u32,
    /// Turns between conception and laying the egg.
    pub gestation_turns: u32,
    /// Water restored by a single drink.
    pub drink_amount: u32,
    /// Food value of the corpse the species leaves behind.
    pub corpse_food_value: u32,
    /// Turns a corpse of the species lingers before rotting away.
    pub corpse_lifetime: u32,
    /// Eco points credited when an egg of the species hatches.
    pub hatch_reward: u64,
    /// Fuel capacity for flying species, zero otherwise.
    pub max_fuel: u32,
}

const STEGOSAUR: SpeciesStats = SpeciesStats {
    starting_hit_points: 50,
    max_hit_points: 100,
    starting_water: 60,
    max_water: 100,
    hunger_threshold: 90,
    thirst_threshold: 40,
    mating_threshold: 50,
    food_unconscious_limit: 20,
    water_unconscious_limit: 15,
    baby_hit_points: 10,
    maturation_turns: 30,
    gestation_turns: 10,
    drink_amount: 30,
    corpse_food_value: 50,
    corpse_lifetime: 20,
    hatch_reward: 100,
    max_fuel: 0,
};

const BRACHIOSAUR: SpeciesStats = SpeciesStats {
    starting_hit_points: 100,
    max_hit_points: 160,
    starting_water: 60,
    max_water: 200,
    hunger_threshold: 140,
    thirst_threshold: 40,
    mating_threshold: 70,
    food_unconscious_limit: 15,
    water_unconscious_limit: 15,
    baby_hit_points: 20,
    maturation_turns: 50,
    gestation_turns: 30,
    drink_amount: 80,
    corpse_food_value: 100,
    corpse_lifetime: 40,
    hatch_reward: 1000,
    max_fuel: 0,
};

const ALLOSAUR: SpeciesStats = SpeciesStats {
    starting_hit_points: 60,
    max_hit_points: 100,
    starting_water: 60,
    max_water: 100,
    hunger_threshold: 90,
    thirst_threshold: 40,
    mating_threshold: 70,
    food_unconscious_limit: 20,
    water_unconscious_limit: 15,
    baby_hit_points: 20,
    maturation_turns: 50,
    gestation_turns: 40,
    drink_amount: 30,
    corpse_food_value: 50,
    corpse_lifetime: 20,
    hatch_reward: 1000,
    max_fuel: 0,
};

const PTERODACTYL: SpeciesStats = SpeciesStats {
    starting_hit_points: 50,
    max_hit_points: 100,
    starting_water: 60,
    max_water: 100,
    hunger_threshold: 90,
    thirst_threshold: 40,
    mating_threshold: 50,
    food_unconscious_limit: 20,
    water_unconscious_limit: 15,
    baby_hit_points: 10,
    maturation_turns: 30,
    gestation_turns: 10,
    drink_amount: 30,
    corpse_food_value: 30,
    corpse_lifetime: 20,
    hatch_reward: 100,
    max_fuel: 30,
};

#[cfg(test)]
mod tests {
    use super::{FoodKind, Serving, Species};

    #[test]
    fn babies_start_below_adult_hit_points() {
        for species in Species::ALL {
            let stats = species.stats();
            assert!(
                stats.baby_hit_points < stats.starting_hit_points,
                "{species:?} babies should be weaker than adults"
            );
        }
    }

    #[test]
    fn starting_resources_fit_within_maxima() {
        for species in Species::ALL {
            let stats = species.stats();
            assert!(stats.starting_hit_points <= stats.max_hit_points);
            assert!(stats.starting_water <= stats.max_water);
        }
    }

    #[test]
    fn index_matches_catalogue_order() {
        for (position, species) in Species::ALL.into_iter().enumerate() {
            assert_eq!(species.index(), position);
        }
    }

    #[test]
    fn only_the_pterodactyl_flies() {
        let flyers: Vec<_> = Species::ALL.into_iter().filter(|s| s.can_fly()).collect();
        assert_eq!(flyers, vec![Species::Pterodactyl]);
        assert_eq!(Species::Stegosaur.stats().max_fuel, 0);
        assert_eq!(Species::Pterodactyl.stats().max_fuel, 30);
    }

    #[test]
    fn herbivores_refuse_meat() {
        for species in [Species::Stegosaur, Species::Brachiosaur] {
            assert_eq!(species.serving(FoodKind::Corpse), None);
            assert_eq!(species.serving(FoodKind::Egg), None);
            assert_eq!(species.serving(FoodKind::Fish), None);
        }
    }

    #[test]
    fn corpse_servings_differ_between_scavengers() {
        assert_eq!(
            Species::Allosaur.serving(FoodKind::Corpse),
            Some(Serving::Remaining)
        );
        assert_eq!(
            Species::Pterodactyl.serving(FoodKind::Corpse),
            Some(Serving::Bites(10))
        );
    }

    #[test]
    fn hand_fed_fruit_is_richer_than_foraged_fruit() {
        assert_eq!(Species::Stegosaur.hand_fed_value(FoodKind::Fruit), Some(20));
        assert_eq!(Species::Brachiosaur.hand_fed_value(FoodKind::Fruit), Some(20));
        assert_eq!(Species::Allosaur.hand_fed_value(FoodKind::Fruit), None);
        assert_eq!(
            Species::Allosaur.hand_fed_value(FoodKind::CarnivoreMealKit),
            Some(200)
        );
    }
}

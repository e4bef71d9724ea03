use std::collections::BTreeMap;

use dino_park_core::{
    CellCoord, CreatureId, CreatureSnapshot, FlightMode, Gender, GrowthStage, HibernationCause,
    Species,
};

/// Bounded resource such as hit points, water or fuel.
///
/// Every write clamps into `0..=max`, so the value can never leave its range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Gauge {
    value: u32,
    max: u32,
}

impl Gauge {
    pub(crate) fn new(value: u32, max: u32) -> Self {
        Self {
            value: value.min(max),
            max,
        }
    }

    pub(crate) const fn value(&self) -> u32 {
        self.value
    }

    pub(crate) fn set(&mut self, value: u32) {
        self.value = value.min(self.max);
    }

    pub(crate) fn drain(&mut self, amount: u32) {
        self.value = self.value.saturating_sub(amount);
    }

    pub(crate) fn fill(&mut self, amount: u32) {
        self.value = self.value.saturating_add(amount).min(self.max);
    }

    pub(crate) fn refill(&mut self) {
        self.value = self.max;
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.value == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Hibernation {
    pub(crate) cause: HibernationCause,
    pub(crate) unconscious_turns: u32,
}

/// Egg record carried in the stomach between conception and laying.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Pregnancy {
    pub(crate) egg: Species,
    pub(crate) turns: u32,
}

/// State only flyers carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FlightState {
    pub(crate) mode: FlightMode,
    pub(crate) fuel: Gauge,
    pub(crate) perch: Option<CellCoord>,
    pub(crate) seeking_mate: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct Creature {
    pub(crate) id: CreatureId,
    pub(crate) name: String,
    pub(crate) species: Species,
    pub(crate) stage: GrowthStage,
    pub(crate) gender: Gender,
    pub(crate) cell: CellCoord,
    pub(crate) hit_points: Gauge,
    pub(crate) water: Gauge,
    pub(crate) age: u32,
    pub(crate) hibernation: Option<Hibernation>,
    pub(crate) pregnancy: Option<Pregnancy>,
    pub(crate) flight: Option<FlightState>,
    pub(crate) immobile: bool,
    pub(crate) cooldowns: BTreeMap<CreatureId, u32>,
}

impl Creature {
    pub(crate) fn new(
        id: CreatureId,
        name: String,
        species: Species,
        stage: GrowthStage,
        gender: Gender,
        cell: CellCoord,
    ) -> Self {
        let stats = species.stats();
        let hit_points = match stage {
            GrowthStage::Baby => stats.baby_hit_points,
            GrowthStage::Adult => stats.starting_hit_points,
        };
        let flight = species.can_fly().then(|| FlightState {
            mode: FlightMode::Flying,
            fuel: Gauge::new(stats.max_fuel, stats.max_fuel),
            perch: None,
            seeking_mate: false,
        });

        Self {
            id,
            name,
            species,
            stage,
            gender,
            cell,
            hit_points: Gauge::new(hit_points, stats.max_hit_points),
            water: Gauge::new(stats.starting_water, stats.max_water),
            age: 0,
            hibernation: None,
            pregnancy: None,
            flight,
            immobile: false,
            cooldowns: BTreeMap::new(),
        }
    }

    pub(crate) fn mode(&self) -> FlightMode {
        self.flight
            .as_ref()
            .map_or(FlightMode::Grounded, |flight| flight.mode)
    }

    pub(crate) fn perch(&self) -> Option<CellCoord> {
        self.flight.as_ref().and_then(|flight| flight.perch)
    }

    pub(crate) fn is_pregnant(&self) -> bool {
        self.pregnancy.is_some()
    }

    pub(crate) fn snapshot(&self) -> CreatureSnapshot {
        CreatureSnapshot {
            id: self.id,
            name: self.name.clone(),
            species: self.species,
            stage: self.stage,
            gender: self.gender,
            cell: self.cell,
            hit_points: self.hit_points.value(),
            water: self.water.value(),
            mode: self.mode(),
            fuel: self.flight.as_ref().map_or(0, |flight| flight.fuel.value()),
            hibernation: self.hibernation.map(|hibernation| hibernation.cause),
            pregnant: self.is_pregnant(),
            perched: self.perch().is_some(),
            immobile: self.immobile,
            seeking_mate: self
                .flight
                .as_ref()
                .map_or(false, |flight| flight.seeking_mate),
            recently_attacked: self.cooldowns.keys().copied().collect(),
        }
    }
}

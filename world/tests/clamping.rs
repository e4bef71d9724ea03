use dino_park_core::{
    CellCoord, Command, CreatureId, Event, FoodKind, Gender, GrowthStage, Species,
};
use dino_park_world::{apply, query, Context, World};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Nudge {
    Vitals(Option<u32>, Option<u32>),
    Turn,
    Feed(FoodKind),
}

fn nudge() -> impl Strategy<Value = Nudge> {
    prop_oneof![
        (proptest::option::of(any::<u32>()), proptest::option::of(any::<u32>()))
            .prop_map(|(hit_points, water)| Nudge::Vitals(hit_points, water)),
        Just(Nudge::Turn),
        prop_oneof![
            Just(FoodKind::Fruit),
            Just(FoodKind::VegetarianMealKit),
            Just(FoodKind::CarnivoreMealKit),
            Just(FoodKind::Egg),
            Just(FoodKind::Fish),
        ]
        .prop_map(Nudge::Feed),
    ]
}

fn species() -> impl Strategy<Value = Species> {
    prop_oneof![
        Just(Species::Stegosaur),
        Just(Species::Brachiosaur),
        Just(Species::Allosaur),
        Just(Species::Pterodactyl),
    ]
}

proptest! {
    #[test]
    fn vitals_never_leave_their_bounds(
        seed in any::<u64>(),
        species in species(),
        nudges in proptest::collection::vec(nudge(), 0..64),
    ) {
        let mut world = World::new();
        let mut context = Context::new(seed);
        let mut events = Vec::new();
        apply(&mut world, &mut context, Command::SpawnCreature {
            species,
            stage: GrowthStage::Adult,
            gender: Some(Gender::Female),
            cell: CellCoord::new(4, 4),
        }, &mut events);
        let creature = events
            .iter()
            .find_map(|event| match event {
                Event::CreatureSpawned { creature, .. } => Some(*creature),
                _ => None,
            })
            .unwrap_or(CreatureId::new(0));

        let stats = species.stats();
        for nudge in nudges {
            let command = match nudge {
                Nudge::Vitals(hit_points, water) => Command::AdjustVitals { creature, hit_points, water },
                Nudge::Turn => Command::BeginTurn { creature },
                Nudge::Feed(food) => Command::Feed { creature, food },
            };
            apply(&mut world, &mut context, command, &mut events);

            let snapshot = query::creature(&world, creature);
            prop_assert!(snapshot.is_some());
            if let Some(snapshot) = snapshot {
                prop_assert!(snapshot.hit_points <= stats.max_hit_points);
                prop_assert!(snapshot.water <= stats.max_water);
                prop_assert!(snapshot.fuel <= stats.max_fuel);
            }
        }
    }
}

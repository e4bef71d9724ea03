use dino_park_core::Species;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Process-wide simulation state that outlives individual commands.
///
/// The context owns the single random number generator every stochastic rule
/// draws from, the per-species name counters and the eco-point ledger. A
/// context created from the same seed replays the same run.
#[derive(Clone, Debug)]
pub struct Context {
    seed: u64,
    rng: ChaCha8Rng,
    name_codes: [u32; Species::ALL.len()],
    eco_points: u64,
}

impl Context {
    /// Creates a context whose generator is seeded with the provided value.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            name_codes: [0; Species::ALL.len()],
            eco_points: 0,
        }
    }

    /// Restores the state the context had right after construction.
    pub fn reset(&mut self) {
        *self = Self::new(self.seed);
    }

    /// Seed the generator was created from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Generator shared by every random decision in the simulation.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Returns `true` with the provided probability.
    pub fn roll(&mut self, chance: f64) -> bool {
        self.rng.gen_bool(chance.clamp(0.0, 1.0))
    }

    /// Eco points credited so far.
    #[must_use]
    pub const fn eco_points(&self) -> u64 {
        self.eco_points
    }

    pub(crate) fn credit(&mut self, points: u64) -> u64 {
        self.eco_points = self.eco_points.saturating_add(points);
        self.eco_points
    }

    pub(crate) fn next_name(&mut self, species: Species) -> String {
        let code = &mut self.name_codes[species.index()];
        *code += 1;
        format!("{}{}", species.name(), code)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::Context;
    use dino_park_core::Species;
    use rand::Rng;

    #[test]
    fn names_count_per_species() {
        let mut context = Context::new(1);
        assert_eq!(context.next_name(Species::Allosaur), "Allosaur1");
        assert_eq!(context.next_name(Species::Allosaur), "Allosaur2");
        assert_eq!(context.next_name(Species::Stegosaur), "Stegosaur1");
    }

    #[test]
    fn reset_replays_the_generator_and_clears_counters() {
        let mut context = Context::new(7);
        let first: Vec<u32> = (0..4).map(|_| context.rng().gen()).collect();
        let _ = context.next_name(Species::Pterodactyl);
        let _ = context.credit(100);

        context.reset();

        let replayed: Vec<u32> = (0..4).map(|_| context.rng().gen()).collect();
        assert_eq!(first, replayed);
        assert_eq!(context.eco_points(), 0);
        assert_eq!(context.next_name(Species::Pterodactyl), "Pterodactyl1");
    }

    #[test]
    fn roll_honours_certain_outcomes() {
        let mut context = Context::new(3);
        assert!(context.roll(1.0));
        assert!(!context.roll(0.0));
    }
}

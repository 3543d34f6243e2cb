use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks which of the online servers a dispatcher binds to.
pub trait ServerChooser: Send {
    /// Return an index in `0..count`. Never called with `count == 0`.
    fn choose(&mut self, count: usize) -> usize;
}

/// Uniform random choice.
pub struct RandomChooser {
    rng: StdRng,
}

impl RandomChooser {
    /// Reproducible sequence of choices for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for RandomChooser {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl ServerChooser for RandomChooser {
    fn choose(&mut self, count: usize) -> usize {
        self.rng.gen_range(0..count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_in_range() {
        let mut chooser = RandomChooser::from_entropy();
        for count in 1..50 {
            assert!(chooser.choose(count) < count);
        }
    }

    #[test]
    fn same_seed_same_choices() {
        let mut a = RandomChooser::seeded(42);
        let mut b = RandomChooser::seeded(42);
        let left: Vec<usize> = (0..20).map(|_| a.choose(7)).collect();
        let right: Vec<usize> = (0..20).map(|_| b.choose(7)).collect();
        assert_eq!(left, right);
    }
}

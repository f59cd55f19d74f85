use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

/// Picks which free frames receive a new process's pages.
///
/// `free` is sorted ascending. Implementations must return exactly `count`
/// distinct entries of `free`; page `i` goes to the `i`-th returned frame.
pub trait FrameSelector {
    fn select(&mut self, free: &[usize], count: usize) -> Vec<usize>;
}

/// Lowest-numbered free frames first.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstFreeSelector;

impl FrameSelector for FirstFreeSelector {
    fn select(&mut self, free: &[usize], count: usize) -> Vec<usize> {
        free.iter().take(count).copied().collect()
    }
}

/// Uniformly random placement, optionally reproducible from a seed.
#[derive(Debug, Clone)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    pub fn new() -> Self {
        RandomSelector {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomSelector {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSelector for RandomSelector {
    fn select(&mut self, free: &[usize], count: usize) -> Vec<usize> {
        if count > free.len() {
            return Vec::new();
        }
        index::sample(&mut self.rng, free.len(), count)
            .into_iter()
            .map(|i| free[i])
            .collect()
    }
}

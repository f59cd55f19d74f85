use crate::alloc::fit::FitStrategy;
use crate::alloc::result::AllocationResult;
use serde::Serialize;

/// Pick the strategy with the highest score among those that ran.
///
/// Candidates are evaluated First, Best, Worst, Next; a later candidate
/// only wins with a strictly higher score.
pub fn compare_results(
    first: Option<&AllocationResult>,
    best: Option<&AllocationResult>,
    worst: Option<&AllocationResult>,
    next: Option<&AllocationResult>,
) -> Option<FitStrategy> {
    let candidates = FitStrategy::ALL.into_iter().zip([first, best, worst, next]);

    let mut winner: Option<(FitStrategy, f64)> = None;
    for (strategy, result) in candidates {
        let Some(result) = result else { continue };
        let score = result.score();
        match winner {
            Some((_, top)) if score <= top => {}
            _ => winner = Some((strategy, score)),
        }
    }
    winner.map(|(strategy, _)| strategy)
}

/// All four strategies over the same input, plus the winner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub first_fit: AllocationResult,
    pub best_fit: AllocationResult,
    pub worst_fit: AllocationResult,
    pub next_fit: AllocationResult,
    pub best_algorithm: Option<FitStrategy>,
}

impl Comparison {
    pub fn get(&self, strategy: FitStrategy) -> &AllocationResult {
        match strategy {
            FitStrategy::First => &self.first_fit,
            FitStrategy::Best => &self.best_fit,
            FitStrategy::Worst => &self.worst_fit,
            FitStrategy::Next => &self.next_fit,
        }
    }
}

pub fn run_all(blocks: &[u64], processes: &[u64]) -> Comparison {
    let first_fit = FitStrategy::First.run(blocks, processes);
    let best_fit = FitStrategy::Best.run(blocks, processes);
    let worst_fit = FitStrategy::Worst.run(blocks, processes);
    let next_fit = FitStrategy::Next.run(blocks, processes);
    let best_algorithm = compare_results(Some(&first_fit), Some(&best_fit), Some(&worst_fit), Some(&next_fit));

    Comparison {
        first_fit,
        best_fit,
        worst_fit,
        next_fit,
        best_algorithm,
    }
}

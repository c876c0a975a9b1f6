/// Coefficients of the randomized search's "good trial" threshold:
/// `GOOD_THRESHOLD_BASE * GOOD_THRESHOLD_DECAY^team_count` percent.
///
/// Tuned by hand against one event's team count (roughly 30-60 teams). There
/// is no model behind them; both are exposed in `RandomizedSearchConfig` so
/// callers can retune for their own problem sizes.
pub const GOOD_THRESHOLD_BASE: f64 = 98.8;
pub const GOOD_THRESHOLD_DECAY: f64 = 0.988;

/// Outer rounds of the randomized search. Each round ends with one averaged tree.
pub const DEFAULT_SEARCH_ROUNDS: usize = 100;

/// Random permutations scored per round.
pub const DEFAULT_TRIALS_PER_ROUND: usize = 1000;

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 25;

/// Upper bound on insertions plus repairs in the greedy strategy.
///
/// A full run needs at most one insertion per team plus one repair per
/// (rescan, comparison) pair, so this only binds on very large or very
/// contradictory inputs.
pub const DEFAULT_MAX_GREEDY_STEPS: usize = 10_000;

/// Upper bound on bubble passes in the head-to-head refinement.
pub const DEFAULT_MAX_HEAD_TO_HEAD_PASSES: usize = 1000;

/// Tolerance when comparing compliance percentages.
pub const COMPLIANCE_EPSILON: f64 = 1e-9;

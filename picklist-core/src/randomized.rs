/// Randomized ("bogo") search over team orderings.
///
/// Each trial shuffles the teams, gives every team its own level, and scores
/// the tree. The best tree seen anywhere is kept. Trials scoring above a
/// size-dependent "good" threshold also add their rank positions to a
/// per-round sum; at the end of each round the averaged ranks become a tree
/// that competes for the global best too. Candidates are scored on the list
/// they would be reported as (best first, tied levels broken by ascending id),
/// so the tree that wins is the one with the best reported percentage.
///
/// This approximates a feedback-arc-set problem with no optimality guarantee.
/// Different seeds can give different exact orders but tend to agree on the
/// top and bottom of the list.
///
/// Trials are independent. Each derives its RNG from the seed and its global
/// trial index, so a rayon run and a sequential run return the same result.
use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::comparison::Comparison;
use crate::constants::{
    COMPLIANCE_EPSILON, DEFAULT_SEARCH_ROUNDS, DEFAULT_SEED, DEFAULT_TRIALS_PER_ROUND, GOOD_THRESHOLD_BASE,
    GOOD_THRESHOLD_DECAY,
};
use crate::error::{RankingError, TreeError};
use crate::scoring::order_compliance_percent;
use crate::tree::RankingTree;
use crate::types::{IdMap, RankingResult, Strategy, TeamId};

/// Budget and tuning for `rank_by_randomized_search`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RandomizedSearchConfig {
    pub seed: u64,
    /// Outer rounds; each ends by averaging that round's good trials.
    pub rounds: usize,
    pub trials_per_round: usize,
    pub good_threshold_base: f64,
    pub good_threshold_decay: f64,
    /// Stop as soon as some tree satisfies every comparison.
    pub stop_at_full_compliance: bool,
    /// Run each round's trials on the rayon pool.
    pub parallel: bool,
    /// Wall-clock budget, checked between rounds. Hitting it marks the result incomplete.
    pub deadline: Option<Duration>,
}

impl Default for RandomizedSearchConfig {
    fn default() -> Self {
        RandomizedSearchConfig {
            seed: DEFAULT_SEED,
            rounds: DEFAULT_SEARCH_ROUNDS,
            trials_per_round: DEFAULT_TRIALS_PER_ROUND,
            good_threshold_base: GOOD_THRESHOLD_BASE,
            good_threshold_decay: GOOD_THRESHOLD_DECAY,
            stop_at_full_compliance: true,
            parallel: true,
            deadline: None,
        }
    }
}

impl RandomizedSearchConfig {
    /// Compliance percent a trial must exceed to contribute to the rank average.
    pub fn good_threshold(&self, team_count: usize) -> f64 {
        self.good_threshold_base * self.good_threshold_decay.powi(team_count as i32)
    }
}

/// Best trial of a round. Ties keep the lower trial index so the reduction is order-independent.
#[derive(Debug, Clone)]
struct TrialBest {
    trial: u64,
    compliance: f64,
    /// Team indices, worst first.
    permutation: Vec<usize>,
}

/// Per-round fold state. `merge` is commutative and associative.
#[derive(Debug, Clone)]
struct TrialAccumulator {
    best: Option<TrialBest>,
    /// Sum of `level + 1` over good trials, by team index.
    rank_sums: Vec<f64>,
    good_trials: usize,
    trials: usize,
}

impl TrialAccumulator {
    fn new(num_teams: usize) -> Self {
        TrialAccumulator {
            best: None,
            rank_sums: vec![0.0; num_teams],
            good_trials: 0,
            trials: 0,
        }
    }

    fn absorb(mut self, trial: TrialBest, good_threshold: f64) -> Self {
        self.trials += 1;
        if trial.compliance > good_threshold {
            self.good_trials += 1;
            for (level, &idx) in trial.permutation.iter().enumerate() {
                self.rank_sums[idx] += (level + 1) as f64;
            }
        }
        self.best = pick_best(self.best, Some(trial));
        self
    }

    fn merge(mut self, other: TrialAccumulator) -> Self {
        self.trials += other.trials;
        self.good_trials += other.good_trials;
        for (sum, add) in self.rank_sums.iter_mut().zip(other.rank_sums) {
            *sum += add;
        }
        self.best = pick_best(self.best, other.best);
        self
    }
}

fn pick_best(a: Option<TrialBest>, b: Option<TrialBest>) -> Option<TrialBest> {
    match (a, b) {
        (Some(a), Some(b)) => match b.compliance.total_cmp(&a.compliance) {
            Ordering::Greater => Some(b),
            Ordering::Equal if b.trial < a.trial => Some(b),
            _ => Some(a),
        },
        (a, None) => a,
        (None, b) => b,
    }
}

/// One trial: shuffle, build a strict tree, score it. Pure given `(seed, trial)`.
fn run_trial(
    id_map: &IdMap,
    comparisons: &[Comparison],
    seed: u64,
    trial: u64,
) -> Result<TrialBest, TreeError> {
    let mut rng = StdRng::seed_from_u64(seed ^ trial.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    let mut permutation: Vec<usize> = (0..id_map.len()).collect();
    permutation.shuffle(&mut rng);

    let order: Vec<TeamId> = permutation.iter().map(|&idx| id_map.to_id(idx)).collect();
    let tree = RankingTree::from_ordered_list(&order)?;
    let compliance = tree.get_compliance_percent(comparisons);

    Ok(TrialBest { trial, compliance, permutation })
}

fn run_round(
    id_map: &IdMap,
    comparisons: &[Comparison],
    config: &RandomizedSearchConfig,
    round: usize,
    good_threshold: f64,
) -> Result<TrialAccumulator, TreeError> {
    let num_teams = id_map.len();
    let first = (round * config.trials_per_round) as u64;
    let last = first + config.trials_per_round as u64;

    if config.parallel {
        (first..last)
            .into_par_iter()
            .try_fold(
                || TrialAccumulator::new(num_teams),
                |acc, trial| {
                    let outcome = run_trial(id_map, comparisons, config.seed, trial)?;
                    Ok::<_, TreeError>(acc.absorb(outcome, good_threshold))
                },
            )
            .try_reduce(|| TrialAccumulator::new(num_teams), |a, b| Ok(a.merge(b)))
    } else {
        (first..last).try_fold(TrialAccumulator::new(num_teams), |acc, trial| {
            let outcome = run_trial(id_map, comparisons, config.seed, trial)?;
            Ok::<_, TreeError>(acc.absorb(outcome, good_threshold))
        })
    }
}

/// Global best across rounds. Replaced only by a strictly better tree.
struct BestTree {
    tree: RankingTree,
    compliance: f64,
}

impl BestTree {
    fn consider(&mut self, tree: RankingTree, compliance: f64) -> bool {
        if compliance > self.compliance + COMPLIANCE_EPSILON {
            self.tree = tree;
            self.compliance = compliance;
            return true;
        }
        false
    }

    fn is_fully_compliant(&self) -> bool {
        self.compliance >= 100.0 - COMPLIANCE_EPSILON
    }
}

/// Compliance of the best-first list the tree is reported as.
fn reported_compliance(tree: &RankingTree, comparisons: &[Comparison]) -> f64 {
    order_compliance_percent(&tree.to_ordered_list(), comparisons)
}

fn averaged_tree(id_map: &IdMap, rank_sums: &[f64], divisor: f64) -> RankingTree {
    let averages: HashMap<TeamId, f64> = rank_sums
        .iter()
        .enumerate()
        .map(|(idx, sum)| (id_map.to_id(idx), sum / divisor))
        .collect();
    RankingTree::from_scores(&averages)
}

pub fn rank_by_randomized_search(
    teams: &[TeamId],
    comparisons: &[Comparison],
    config: &RandomizedSearchConfig,
) -> Result<RankingResult, RankingError> {
    let id_map = IdMap::from_ids(teams)?;
    id_map.check_comparisons(comparisons)?;
    let good_threshold = config.good_threshold(id_map.len());
    let started = Instant::now();

    // With no trials at all, fall back to a single tier: no team is claimed better than another.
    let flat = RankingTree::from_level_map(&teams.iter().map(|&team| (team, 0)).collect());
    let flat_compliance = reported_compliance(&flat, comparisons);
    let mut best = BestTree { tree: flat, compliance: flat_compliance };

    let mut cumulative = vec![0.0; id_map.len()];
    let mut averaged_rounds = 0usize;
    let mut trials_run = 0usize;
    let mut complete = true;

    if !id_map.is_empty() {
        for round in 0..config.rounds {
            if let Some(deadline) = config.deadline {
                if started.elapsed() >= deadline {
                    warn!(round, rounds = config.rounds, "randomized search deadline reached");
                    complete = false;
                    break;
                }
            }

            let acc = run_round(&id_map, comparisons, config, round, good_threshold)?;
            trials_run += acc.trials;

            if let Some(trial) = acc.best {
                let order: Vec<TeamId> = trial.permutation.iter().map(|&idx| id_map.to_id(idx)).collect();
                best.consider(RankingTree::from_ordered_list(&order)?, trial.compliance);
            }

            if acc.good_trials > 0 {
                let tree = averaged_tree(&id_map, &acc.rank_sums, acc.good_trials as f64);
                let compliance = reported_compliance(&tree, comparisons);
                best.consider(tree, compliance);

                for (total, sum) in cumulative.iter_mut().zip(&acc.rank_sums) {
                    *total += sum / acc.good_trials as f64;
                }
                averaged_rounds += 1;
            }

            debug!(
                round,
                good_trials = acc.good_trials,
                best_compliance = best.compliance,
                "randomized search round finished"
            );

            if config.stop_at_full_compliance && best.is_fully_compliant() {
                break;
            }
        }
    }

    if averaged_rounds > 0 {
        let tree = averaged_tree(&id_map, &cumulative, averaged_rounds as f64);
        let compliance = reported_compliance(&tree, comparisons);
        if best.consider(tree, compliance) {
            debug!(compliance, "cross-round average tree is the best");
        }
    }

    best.tree.validate()?;

    let ordered_entities = best.tree.to_ordered_list();
    let compliance_percent = order_compliance_percent(&ordered_entities, comparisons);

    Ok(RankingResult {
        strategy: Strategy::RandomizedSearch,
        ordered_entities,
        tiers: best.tree.tiers(),
        compliance_percent,
        complete,
        iterations: trials_run,
    })
}

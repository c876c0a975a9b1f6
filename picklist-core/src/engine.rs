/// Ranking engine facade.
///
/// Owns the known team set and the clean comparison set. Raw comparisons are
/// validated once, contradictions are resolved once, and the per-team lookup
/// index is built once; every strategy then runs against the same immutable
/// data. Pure computation: no IO, the caller loads comparisons however it likes.
use std::collections::HashSet;

use tracing::{debug, warn};

use crate::comparison::{Comparison, RawComparison};
use crate::error::{MalformedComparison, RankingError};
use crate::greedy::{rank_by_greedy_insertion, GreedyConfig};
use crate::head_to_head::{refine_head_to_head, HeadToHeadConfig};
use crate::point_tally::rank_by_point_tally;
use crate::randomized::{rank_by_randomized_search, RandomizedSearchConfig};
use crate::resolver::{resolve_contradictions, LookupIndex};
use crate::types::{IdMap, RankingResult, Strategy, TeamId};

/// Per-strategy configuration for `RankingEngine::rank`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub randomized: RandomizedSearchConfig,
    pub greedy: GreedyConfig,
    pub head_to_head: HeadToHeadConfig,
}

/// A raw comparison that failed validation, with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RejectedComparison {
    pub index: usize,
    pub comparison: RawComparison,
    pub reason: MalformedComparison,
}

/// What happened to the input on its way to the clean set.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputSummary {
    /// Raw comparisons supplied.
    pub total: usize,
    /// Comparisons that passed validation, ties included.
    pub accepted: usize,
    pub rejected: Vec<RejectedComparison>,
    pub ties_dropped: usize,
    pub contradictions_removed: usize,
    pub duplicates_removed: usize,
    /// Size of the clean set every strategy ranks against.
    pub clean: usize,
}

#[derive(Debug, Clone)]
pub struct RankingEngine {
    /// Known teams in caller order. Strategies seed and scan in this order.
    id_map: IdMap,
    comparisons: Vec<Comparison>,
    lookup: LookupIndex,
    summary: InputSummary,
}

impl RankingEngine {
    /// Build an engine over `team_ids`.
    ///
    /// The team list itself must be valid (no 0, no duplicates). Individual
    /// comparisons that are malformed or name a team outside the list are
    /// rejected and reported in `summary()`, never fatal.
    pub fn new(team_ids: &[TeamId], raw: &[RawComparison]) -> Result<Self, RankingError> {
        let id_map = IdMap::from_ids(team_ids)?;

        let mut accepted = Vec::with_capacity(raw.len());
        let mut rejected = Vec::new();
        for (index, record) in raw.iter().enumerate() {
            match validate_against(&id_map, record) {
                Ok(comparison) => accepted.push(comparison),
                Err(reason) => {
                    warn!(index, %reason, "rejecting comparison");
                    rejected.push(RejectedComparison {
                        index,
                        comparison: *record,
                        reason,
                    });
                }
            }
        }

        let resolution = resolve_contradictions(&accepted);
        let lookup = LookupIndex::build(id_map.ids(), &resolution.comparisons);
        let summary = InputSummary {
            total: raw.len(),
            accepted: accepted.len(),
            rejected,
            ties_dropped: resolution.ties_dropped,
            contradictions_removed: resolution.contradictions_removed,
            duplicates_removed: resolution.duplicates_removed,
            clean: resolution.comparisons.len(),
        };
        debug!(
            teams = id_map.len(),
            total = summary.total,
            rejected = summary.rejected.len(),
            clean = summary.clean,
            "engine ready"
        );

        Ok(RankingEngine {
            id_map,
            comparisons: resolution.comparisons,
            lookup,
            summary,
        })
    }

    /// Build an engine whose team set is every non-zero team mentioned in `raw`,
    /// sorted ascending.
    pub fn from_comparisons(raw: &[RawComparison]) -> Result<Self, RankingError> {
        let mut teams: Vec<TeamId> = raw
            .iter()
            .flat_map(|record| [record.team_a, record.team_b])
            .filter(|&team| team != 0)
            .collect();
        teams.sort_unstable();
        teams.dedup();
        Self::new(&teams, raw)
    }

    pub fn teams(&self) -> &[TeamId] {
        self.id_map.ids()
    }

    /// The clean comparison set.
    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    pub fn lookup(&self) -> &LookupIndex {
        &self.lookup
    }

    pub fn summary(&self) -> &InputSummary {
        &self.summary
    }

    pub fn rank_by_point_tally(&self) -> Result<RankingResult, RankingError> {
        rank_by_point_tally(self.teams(), &self.comparisons)
    }

    pub fn rank_by_randomized_search(
        &self,
        config: &RandomizedSearchConfig,
    ) -> Result<RankingResult, RankingError> {
        rank_by_randomized_search(self.teams(), &self.comparisons, config)
    }

    pub fn rank_by_greedy_insertion(&self, config: &GreedyConfig) -> Result<RankingResult, RankingError> {
        rank_by_greedy_insertion(self.teams(), &self.comparisons, &self.lookup, config)
    }

    /// Refine an existing order (best first) by adjacent head-to-head swaps.
    ///
    /// Known teams missing from `order` are appended at the bottom in
    /// ascending id order. A team outside the known set, or one listed twice,
    /// is an error.
    pub fn refine_head_to_head(
        &self,
        order: &[TeamId],
        config: &HeadToHeadConfig,
    ) -> Result<RankingResult, RankingError> {
        let mut seen = HashSet::with_capacity(order.len());
        for &team in order {
            if !self.id_map.contains(team) {
                return Err(RankingError::UnknownTeam(team));
            }
            if !seen.insert(team) {
                return Err(RankingError::DuplicateTeam(team));
            }
        }

        let mut full = order.to_vec();
        let mut missing: Vec<TeamId> = self
            .teams()
            .iter()
            .copied()
            .filter(|team| !seen.contains(team))
            .collect();
        missing.sort_unstable();
        full.extend(missing);

        Ok(refine_head_to_head(&full, &self.comparisons, &self.lookup, config))
    }

    /// Run one strategy. `HeadToHead` refines the point-tally order.
    pub fn rank(&self, strategy: Strategy, config: &EngineConfig) -> Result<RankingResult, RankingError> {
        match strategy {
            Strategy::PointTally => self.rank_by_point_tally(),
            Strategy::RandomizedSearch => self.rank_by_randomized_search(&config.randomized),
            Strategy::GreedyInsertion => self.rank_by_greedy_insertion(&config.greedy),
            Strategy::HeadToHead => {
                let baseline = self.rank_by_point_tally()?;
                self.refine_head_to_head(&baseline.ordered_entities, &config.head_to_head)
            }
        }
    }
}

fn validate_against(id_map: &IdMap, record: &RawComparison) -> Result<Comparison, MalformedComparison> {
    let comparison = record.validate()?;
    for team in [comparison.lower_team(), comparison.higher_team()] {
        if !id_map.contains(team) {
            return Err(MalformedComparison::UnknownTeam(team));
        }
    }
    Ok(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(team_a: TeamId, team_b: TeamId, better: TeamId) -> RawComparison {
        RawComparison::new(team_a, team_b, better)
    }

    fn quick_search() -> RandomizedSearchConfig {
        RandomizedSearchConfig {
            rounds: 5,
            trials_per_round: 200,
            ..RandomizedSearchConfig::default()
        }
    }

    #[test]
    fn test_engine_rejects_bad_team_lists() {
        assert_eq!(
            RankingEngine::new(&[1, 2, 1], &[]).unwrap_err(),
            RankingError::DuplicateTeam(1)
        );
        assert_eq!(RankingEngine::new(&[0, 2], &[]).unwrap_err(), RankingError::ReservedTeamId);
    }

    #[test]
    fn test_malformed_comparisons_are_counted_not_fatal() {
        let input = [
            raw(1, 2, 1),
            raw(1, 1, 1),
            raw(0, 2, 2),
            raw(1, 2, 3),
            raw(1, 9, 1),
            raw(2, 3, 2),
        ];
        let engine = RankingEngine::new(&[1, 2, 3], &input).unwrap();
        let summary = engine.summary();

        assert_eq!(summary.total, 6);
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.clean, 2);
        let reasons: Vec<(usize, MalformedComparison)> =
            summary.rejected.iter().map(|r| (r.index, r.reason.clone())).collect();
        assert_eq!(
            reasons,
            vec![
                (1, MalformedComparison::SelfComparison(1)),
                (2, MalformedComparison::ReservedTeam),
                (
                    3,
                    MalformedComparison::InvalidBetterTeam {
                        team_a: 1,
                        team_b: 2,
                        better: 3
                    }
                ),
                (4, MalformedComparison::UnknownTeam(9)),
            ]
        );
    }

    #[test]
    fn test_direct_contradiction_leaves_no_constraints() {
        let engine = RankingEngine::new(&[1, 2], &[raw(1, 2, 1), raw(1, 2, 2)]).unwrap();
        assert!(engine.comparisons().is_empty());
        assert_eq!(engine.summary().contradictions_removed, 2);

        let result = engine.rank_by_point_tally().unwrap();
        assert_eq!(result.compliance_percent, 100.0);
        assert_eq!(result.tiers, vec![vec![1, 2]]);
    }

    #[test]
    fn test_tie_is_excluded_from_every_strategy() {
        let engine = RankingEngine::new(&[1, 2], &[raw(1, 2, 0)]).unwrap();
        assert_eq!(engine.summary().accepted, 1);
        assert_eq!(engine.summary().ties_dropped, 1);
        assert_eq!(engine.summary().clean, 0);
        assert!(engine.lookup().get(1).is_empty());

        let config = EngineConfig {
            randomized: quick_search(),
            ..EngineConfig::default()
        };
        for strategy in [
            Strategy::PointTally,
            Strategy::RandomizedSearch,
            Strategy::GreedyInsertion,
            Strategy::HeadToHead,
        ] {
            let result = engine.rank(strategy, &config).unwrap();
            assert_eq!(result.compliance_percent, 100.0, "{strategy}");
            assert_eq!(result.ordered_entities.len(), 2, "{strategy}");
        }
    }

    #[test]
    fn test_from_comparisons_derives_sorted_teams() {
        let engine = RankingEngine::from_comparisons(&[raw(30, 10, 30), raw(20, 0, 20), raw(10, 20, 10)]).unwrap();
        assert_eq!(engine.teams(), &[10, 20, 30]);
        assert_eq!(engine.summary().rejected.len(), 1);
        assert_eq!(engine.summary().clean, 2);
    }

    #[test]
    fn test_every_strategy_ranks_every_team() {
        let input = [raw(1, 2, 1), raw(2, 3, 2), raw(1, 3, 1), raw(4, 5, 5)];
        let engine = RankingEngine::new(&[1, 2, 3, 4, 5], &input).unwrap();
        let config = EngineConfig {
            randomized: quick_search(),
            ..EngineConfig::default()
        };

        for strategy in [
            Strategy::PointTally,
            Strategy::RandomizedSearch,
            Strategy::GreedyInsertion,
            Strategy::HeadToHead,
        ] {
            let result = engine.rank(strategy, &config).unwrap();
            assert_eq!(result.strategy, strategy);
            let mut teams = result.ordered_entities.clone();
            teams.sort_unstable();
            assert_eq!(teams, vec![1, 2, 3, 4, 5], "{strategy}");
        }
    }

    #[test]
    fn test_point_tally_on_clean_chain() {
        let engine = RankingEngine::new(&[1, 2, 3], &[raw(1, 2, 1), raw(2, 3, 2), raw(1, 3, 1)]).unwrap();
        let result = engine.rank_by_point_tally().unwrap();
        assert_eq!(result.ordered_entities, vec![1, 2, 3]);
        assert_eq!(result.compliance_percent, 100.0);
        assert!(result.complete);
    }

    #[test]
    fn test_refine_appends_missing_teams() {
        let engine = RankingEngine::new(&[5, 4, 3], &[raw(3, 4, 3)]).unwrap();
        let result = engine.refine_head_to_head(&[5], &HeadToHeadConfig::default()).unwrap();
        // Missing teams land at the bottom as [3, 4], then 3 > 4 already holds.
        assert_eq!(result.ordered_entities, vec![5, 3, 4]);
        assert!(result.complete);
    }

    #[test]
    fn test_refine_rejects_unknown_and_duplicate_teams() {
        let engine = RankingEngine::new(&[1, 2], &[]).unwrap();
        let config = HeadToHeadConfig::default();
        assert_eq!(
            engine.refine_head_to_head(&[1, 7], &config).unwrap_err(),
            RankingError::UnknownTeam(7)
        );
        assert_eq!(
            engine.refine_head_to_head(&[1, 1], &config).unwrap_err(),
            RankingError::DuplicateTeam(1)
        );
    }

    #[test]
    fn test_greedy_start_must_be_known() {
        let engine = RankingEngine::new(&[1, 2], &[raw(1, 2, 1)]).unwrap();
        let config = GreedyConfig {
            start: Some(3),
            ..GreedyConfig::default()
        };
        assert_eq!(
            engine.rank_by_greedy_insertion(&config).unwrap_err(),
            RankingError::UnknownTeam(3)
        );
    }
}

use std::collections::HashMap;
use std::fmt;

use crate::comparison::Comparison;
use crate::error::RankingError;

/// Team number. `0` is reserved: it never names a team.
pub type TeamId = u32;

/// Which algorithm produced a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Strategy {
    PointTally,
    RandomizedSearch,
    GreedyInsertion,
    HeadToHead,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::PointTally => "point tally",
            Strategy::RandomizedSearch => "randomized search",
            Strategy::GreedyInsertion => "greedy insertion",
            Strategy::HeadToHead => "head-to-head",
        };
        f.write_str(name)
    }
}

/// Output of every ranking strategy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankingResult {
    pub strategy: Strategy,
    /// Every known team, best first. Tied teams are ordered by ascending id.
    pub ordered_entities: Vec<TeamId>,
    /// Teams grouped by level, best tier first, ids ascending within a tier.
    pub tiers: Vec<Vec<TeamId>>,
    /// Share of clean comparisons satisfied by `ordered_entities`, 0.0 to 100.0.
    pub compliance_percent: f64,
    /// False when a trial, step, or time budget ran out before the strategy finished.
    pub complete: bool,
    /// Work performed: trials, insertion/repair steps, or swap passes.
    pub iterations: usize,
}

/// Maps between caller team ids and dense 0..N indices.
#[derive(Debug, Clone)]
pub(crate) struct IdMap {
    ids: Vec<TeamId>,
    id_to_idx: HashMap<TeamId, usize>,
}

impl IdMap {
    pub fn from_ids(ids: &[TeamId]) -> Result<Self, RankingError> {
        let mut id_to_idx = HashMap::with_capacity(ids.len());
        for (idx, &id) in ids.iter().enumerate() {
            if id == 0 {
                return Err(RankingError::ReservedTeamId);
            }
            if id_to_idx.insert(id, idx).is_some() {
                return Err(RankingError::DuplicateTeam(id));
            }
        }
        Ok(IdMap {
            ids: ids.to_vec(),
            id_to_idx,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[TeamId] {
        &self.ids
    }

    pub fn contains(&self, id: TeamId) -> bool {
        self.id_to_idx.contains_key(&id)
    }

    pub fn to_id(&self, idx: usize) -> TeamId {
        self.ids[idx]
    }

    /// Every team a comparison names must be in the map.
    pub fn check_comparisons(&self, comparisons: &[Comparison]) -> Result<(), RankingError> {
        for comparison in comparisons {
            for team in [comparison.lower_team(), comparison.higher_team()] {
                if !self.contains(team) {
                    return Err(RankingError::UnknownTeam(team));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_map_round_trip() {
        let map = IdMap::from_ids(&[254, 25, 1114]).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.to_id(2), 1114);
        assert!(map.contains(25));
        assert!(!map.contains(9999));
        assert_eq!(map.ids(), &[254, 25, 1114]);
    }

    #[test]
    fn test_id_map_rejects_duplicates_and_zero() {
        assert_eq!(IdMap::from_ids(&[1, 2, 1]).unwrap_err(), RankingError::DuplicateTeam(1));
        assert_eq!(IdMap::from_ids(&[1, 0]).unwrap_err(), RankingError::ReservedTeamId);
    }

    #[test]
    fn test_check_comparisons_names_first_unknown_team() {
        let map = IdMap::from_ids(&[1, 2]).unwrap();
        let known = Comparison::win(1, 2).unwrap();
        let unknown = Comparison::win(1, 99).unwrap();
        assert_eq!(map.check_comparisons(&[known]), Ok(()));
        assert_eq!(map.check_comparisons(&[known, unknown]), Err(RankingError::UnknownTeam(99)));
    }
}

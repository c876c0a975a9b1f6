/// Leveled ranking hierarchy.
///
/// Each team sits on a non-negative level; a higher level means ranked
/// better and teams may share a level. After every mutation the occupied
/// levels form the contiguous range `0..=max_level`. Search strategies clone
/// trees freely to snapshot and roll back.
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::comparison::Comparison;
use crate::error::TreeError;
use crate::scoring;
use crate::types::TeamId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingTree {
    levels: HashMap<TeamId, usize>,
}

impl RankingTree {
    pub fn new() -> Self {
        RankingTree::default()
    }

    /// Build a tree from arbitrary level values, compacted to `0..=max_level`
    /// with relative order preserved.
    pub fn from_level_map(map: &HashMap<TeamId, usize>) -> Self {
        let distinct: Vec<usize> = map.values().copied().collect::<BTreeSet<_>>().into_iter().collect();
        let levels = map
            .iter()
            .map(|(&team, level)| {
                // Every value is present in `distinct` by construction.
                let dense = distinct.binary_search(level).unwrap_or(0);
                (team, dense)
            })
            .collect();
        RankingTree { levels }
    }

    /// Team at index `i` gets level `i`: the list is worst first.
    pub fn from_ordered_list(list: &[TeamId]) -> Result<Self, TreeError> {
        let mut levels = HashMap::with_capacity(list.len());
        for (level, &team) in list.iter().enumerate() {
            if levels.insert(team, level).is_some() {
                return Err(TreeError::DuplicateNode(team));
            }
        }
        Ok(RankingTree { levels })
    }

    /// Higher score → higher level. Equal scores share a level.
    pub fn from_scores(scores: &HashMap<TeamId, f64>) -> Self {
        let mut distinct: Vec<f64> = scores.values().copied().collect();
        distinct.sort_by(f64::total_cmp);
        distinct.dedup_by(|a, b| a.total_cmp(b) == Ordering::Equal);

        let levels = scores
            .iter()
            .map(|(&team, score)| {
                let dense = distinct.binary_search_by(|probe| probe.total_cmp(score)).unwrap_or(0);
                (team, dense)
            })
            .collect();
        RankingTree { levels }
    }

    pub fn level_map(&self) -> &HashMap<TeamId, usize> {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn contains_node(&self, team: TeamId) -> bool {
        self.levels.contains_key(&team)
    }

    pub fn get_level(&self, team: TeamId) -> Option<usize> {
        self.levels.get(&team).copied()
    }

    /// Highest occupied level; 0 for an empty tree.
    pub fn get_max_level(&self) -> usize {
        self.levels.values().copied().max().unwrap_or(0)
    }

    /// Seed an empty tree with its first team at level 0.
    pub fn add_node(&mut self, team: TeamId) -> Result<(), TreeError> {
        if self.contains_node(team) {
            return Err(TreeError::DuplicateNode(team));
        }
        if !self.is_empty() {
            return Err(TreeError::NotEmpty(team));
        }
        self.levels.insert(team, 0);
        Ok(())
    }

    /// Place `team` on a new level directly above `relative`.
    pub fn add_node_above(&mut self, team: TeamId, relative: TeamId) -> Result<(), TreeError> {
        let level = self.placement_level(team, relative)?;
        self.open_level(level + 1);
        self.levels.insert(team, level + 1);
        Ok(())
    }

    /// Place `team` on a new level directly below `relative`.
    pub fn add_node_below(&mut self, team: TeamId, relative: TeamId) -> Result<(), TreeError> {
        let level = self.placement_level(team, relative)?;
        self.open_level(level);
        self.levels.insert(team, level);
        Ok(())
    }

    /// Place `team` on the same level as `relative`.
    pub fn add_node_alongside(&mut self, team: TeamId, relative: TeamId) -> Result<(), TreeError> {
        let level = self.placement_level(team, relative)?;
        self.levels.insert(team, level);
        Ok(())
    }

    /// Move `team` up one level. From the top level this opens a new top
    /// level holding only `team`.
    pub fn promote(&mut self, team: TeamId) -> Result<(), TreeError> {
        let level = self.get_level(team).ok_or(TreeError::MissingNode(team))?;
        self.levels.insert(team, level + 1);
        self.close_level_if_empty(level);
        Ok(())
    }

    /// Move `team` down one level. No-op at level 0.
    pub fn demote(&mut self, team: TeamId) -> Result<(), TreeError> {
        let level = self.get_level(team).ok_or(TreeError::MissingNode(team))?;
        if level == 0 {
            return Ok(());
        }
        self.levels.insert(team, level - 1);
        self.close_level_if_empty(level);
        Ok(())
    }

    /// Ties are vacuously compliant. A comparison touching a team outside the tree is not.
    pub fn is_comparison_compliant(&self, comparison: &Comparison) -> bool {
        let (Some(better), Some(worse)) = (comparison.better_team(), comparison.worse_team()) else {
            return true;
        };
        match (self.get_level(better), self.get_level(worse)) {
            (Some(b), Some(w)) => b > w,
            _ => false,
        }
    }

    pub fn get_compliance_percent(&self, comparisons: &[Comparison]) -> f64 {
        scoring::compliance_percent(self, comparisons)
    }

    /// All teams, best first; ties broken by ascending team id.
    pub fn to_ordered_list(&self) -> Vec<TeamId> {
        let mut entries: Vec<(TeamId, usize)> = self.levels.iter().map(|(&t, &l)| (t, l)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.into_iter().map(|(team, _)| team).collect()
    }

    /// Teams grouped by level, best tier first.
    pub fn tiers(&self) -> Vec<Vec<TeamId>> {
        if self.is_empty() {
            return Vec::new();
        }
        let max_level = self.get_max_level();
        let mut tiers = vec![Vec::new(); max_level + 1];
        for team in self.to_ordered_list() {
            let level = self.levels[&team];
            tiers[max_level - level].push(team);
        }
        tiers.retain(|tier| !tier.is_empty());
        tiers
    }

    /// Check that every level in `0..=max_level` is occupied.
    pub fn validate(&self) -> Result<(), TreeError> {
        if self.is_empty() {
            return Ok(());
        }
        let max_level = self.get_max_level();
        let mut occupied = vec![false; max_level + 1];
        for &level in self.levels.values() {
            occupied[level] = true;
        }
        match occupied.iter().position(|o| !o) {
            Some(missing) => Err(TreeError::LevelGap { missing, max_level }),
            None => Ok(()),
        }
    }

    fn placement_level(&self, team: TeamId, relative: TeamId) -> Result<usize, TreeError> {
        if self.contains_node(team) {
            return Err(TreeError::DuplicateNode(team));
        }
        self.get_level(relative).ok_or(TreeError::MissingNode(relative))
    }

    /// Shift every level at or above `level` up by one, leaving `level` empty.
    fn open_level(&mut self, level: usize) {
        for value in self.levels.values_mut() {
            if *value >= level {
                *value += 1;
            }
        }
    }

    /// Compact the levels above `level` down by one if nothing sits on `level`.
    fn close_level_if_empty(&mut self, level: usize) {
        if self.levels.values().any(|&l| l == level) {
            return;
        }
        for value in self.levels.values_mut() {
            if *value > level {
                *value -= 1;
            }
        }
    }
}

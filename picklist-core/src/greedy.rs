/// Greedy insertion with local repair.
///
/// Grows one tree from a start team. Scanning the team list, every placed
/// team's comparisons are checked: an unplaced opponent is inserted directly
/// above or below it and the scan restarts from the top (earlier teams must
/// be revalidated against the new shape). A violated comparison between two
/// placed teams triggers a repair that walks the worse team down and,
/// separately, the better team up, keeping the best intermediate tree.
///
/// Not optimal, and every insertion or repair counts against `max_steps`.
use tracing::{debug, warn};

use crate::comparison::Comparison;
use crate::constants::{COMPLIANCE_EPSILON, DEFAULT_MAX_GREEDY_STEPS};
use crate::error::{RankingError, TreeError};
use crate::resolver::LookupIndex;
use crate::scoring::{order_compliance_percent, placed_compliance_percent};
use crate::tree::RankingTree;
use crate::types::{IdMap, RankingResult, Strategy, TeamId};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GreedyConfig {
    /// Budget of insertions plus repairs.
    pub max_steps: usize,
    /// Team to seed the tree with. Defaults to the first team in the list.
    pub start: Option<TeamId>,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        GreedyConfig {
            max_steps: DEFAULT_MAX_GREEDY_STEPS,
            start: None,
        }
    }
}

enum ScanOutcome {
    Settled,
    BudgetExhausted,
}

struct GreedyBuilder<'a> {
    teams: &'a [TeamId],
    comparisons: &'a [Comparison],
    lookup: &'a LookupIndex,
    tree: RankingTree,
    steps: usize,
    max_steps: usize,
}

impl GreedyBuilder<'_> {
    fn take_step(&mut self) -> bool {
        if self.steps >= self.max_steps {
            return false;
        }
        self.steps += 1;
        true
    }

    /// Scan until no placed team has an unplaced opponent.
    fn scan(&mut self) -> Result<ScanOutcome, TreeError> {
        let mut i = 0;
        'rescan: while i < self.teams.len() {
            let team = self.teams[i];
            if !self.tree.contains_node(team) {
                i += 1;
                continue;
            }

            for comparison in self.lookup.get(team) {
                let other = comparison.other(team);

                if !self.tree.contains_node(other) {
                    if !self.take_step() {
                        return Ok(ScanOutcome::BudgetExhausted);
                    }
                    match comparison.better_team() {
                        Some(better) if better == team => self.tree.add_node_below(other, team)?,
                        Some(_) => self.tree.add_node_above(other, team)?,
                        None => self.tree.add_node_alongside(other, team)?,
                    }
                    i = 0;
                    continue 'rescan;
                }

                if !self.tree.is_comparison_compliant(comparison) {
                    if !self.take_step() {
                        return Ok(ScanOutcome::BudgetExhausted);
                    }
                    self.repair(comparison)?;
                }
            }
            i += 1;
        }
        Ok(ScanOutcome::Settled)
    }

    /// Try demoting the worse team to the floor, then promoting the better
    /// team to the top, each from the same snapshot. Keep whichever
    /// intermediate tree scored best; keep the snapshot if neither improved.
    fn repair(&mut self, comparison: &Comparison) -> Result<(), TreeError> {
        let (Some(better), Some(worse)) = (comparison.better_team(), comparison.worse_team()) else {
            return Ok(());
        };

        let snapshot = self.tree.clone();
        let mut best_percent = placed_compliance_percent(&self.tree, self.comparisons);
        let start_percent = best_percent;
        let mut best_tree = snapshot.clone();

        while self.level_of(worse)? > 0 {
            self.tree.demote(worse)?;
            let percent = placed_compliance_percent(&self.tree, self.comparisons);
            if percent > best_percent + COMPLIANCE_EPSILON {
                best_percent = percent;
                best_tree = self.tree.clone();
            }
        }

        self.tree = snapshot;
        while self.level_of(better)? < self.tree.get_max_level() {
            self.tree.promote(better)?;
            let percent = placed_compliance_percent(&self.tree, self.comparisons);
            if percent > best_percent + COMPLIANCE_EPSILON {
                best_percent = percent;
                best_tree = self.tree.clone();
            }
        }

        debug!(better, worse, from = start_percent, to = best_percent, "greedy repair");
        self.tree = best_tree;
        Ok(())
    }

    fn level_of(&self, team: TeamId) -> Result<usize, TreeError> {
        self.tree.get_level(team).ok_or(TreeError::MissingNode(team))
    }

    /// A team on level 0; the anchor for teams with no placed opponent.
    fn bottom_anchor(&self) -> Option<TeamId> {
        self.tree.to_ordered_list().last().copied()
    }

    fn place_at_bottom(&mut self, team: TeamId) -> Result<(), TreeError> {
        match self.bottom_anchor() {
            Some(anchor) => self.tree.add_node_alongside(team, anchor),
            None => self.tree.add_node(team),
        }
    }
}

/// `teams` must be valid (no 0, no duplicates) and every comparison must name
/// teams from it; `lookup` is expected to be built from the same two slices.
pub fn rank_by_greedy_insertion(
    teams: &[TeamId],
    comparisons: &[Comparison],
    lookup: &LookupIndex,
    config: &GreedyConfig,
) -> Result<RankingResult, RankingError> {
    let id_map = IdMap::from_ids(teams)?;
    id_map.check_comparisons(comparisons)?;

    let mut builder = GreedyBuilder {
        teams,
        comparisons,
        lookup,
        tree: RankingTree::new(),
        steps: 0,
        max_steps: config.max_steps,
    };

    let start = match config.start {
        Some(team) if !id_map.contains(team) => return Err(RankingError::UnknownTeam(team)),
        Some(team) => Some(team),
        None => teams.first().copied(),
    };

    let mut complete = true;
    if let Some(start) = start {
        builder.tree.add_node(start)?;

        loop {
            if let ScanOutcome::BudgetExhausted = builder.scan()? {
                warn!(max_steps = config.max_steps, "greedy insertion ran out of steps");
                complete = false;
                break;
            }
            // Seed the next disconnected component, if any.
            match teams.iter().copied().find(|&team| !builder.tree.contains_node(team)) {
                Some(next) => builder.place_at_bottom(next)?,
                None => break,
            }
        }

        // Teams never reached before the budget ran out go to the bottom tier.
        for &team in teams {
            if !builder.tree.contains_node(team) {
                builder.place_at_bottom(team)?;
            }
        }
    }

    builder.tree.validate()?;

    let ordered_entities = builder.tree.to_ordered_list();
    let compliance_percent = order_compliance_percent(&ordered_entities, comparisons);

    Ok(RankingResult {
        strategy: Strategy::GreedyInsertion,
        ordered_entities,
        tiers: builder.tree.tiers(),
        compliance_percent,
        complete,
        iterations: builder.steps,
    })
}

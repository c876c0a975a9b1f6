/// picklist-core: Pure-computation ranking from pairwise judgments.
///
/// Pairwise comparisons → contradiction-free clean set → ranked list of teams
/// with a compliance percentage (the share of judgments the ranking honours).
/// No IO: the caller loads comparisons however it likes.
///
/// Teams are identified by caller-provided `u32` numbers; `0` is reserved
/// and means "tie" in the raw `better_team` field.
///
/// # Quick start
///
/// ```rust
/// use picklist_core::{RankingEngine, RawComparison, RandomizedSearchConfig};
///
/// let comparisons = vec![
///     RawComparison::new(254, 1114, 254),
///     RawComparison::new(1114, 2056, 1114),
///     RawComparison::new(254, 2056, 254),
///     RawComparison::new(2056, 118, 0), // tie, ignored by every strategy
/// ];
///
/// let engine = RankingEngine::new(&[254, 1114, 2056, 118], &comparisons).unwrap();
///
/// let tally = engine.rank_by_point_tally().unwrap();
/// assert_eq!(tally.ordered_entities[0], 254);
///
/// let search = engine
///     .rank_by_randomized_search(&RandomizedSearchConfig { rounds: 10, ..Default::default() })
///     .unwrap();
/// for (rank, team) in search.ordered_entities.iter().enumerate() {
///     println!("{}. {}", rank + 1, team);
/// }
/// println!("compliance {:.1}%", search.compliance_percent);
/// ```

pub mod comparison;
pub mod constants;
pub mod engine;
pub mod error;
pub mod greedy;
pub mod head_to_head;
pub mod point_tally;
pub mod randomized;
pub mod resolver;
pub mod scoring;
pub mod tree;
pub mod types;

// Re-export primary public API at crate root.
pub use comparison::{Comparison, Outcome, RawComparison};
pub use engine::{EngineConfig, InputSummary, RankingEngine, RejectedComparison};
pub use error::{MalformedComparison, RankingError, TreeError};
pub use greedy::{rank_by_greedy_insertion, GreedyConfig};
pub use head_to_head::{refine_head_to_head, HeadToHeadConfig};
pub use point_tally::{rank_by_point_tally, tally_points};
pub use randomized::{rank_by_randomized_search, RandomizedSearchConfig};
pub use resolver::{resolve_contradictions, LookupIndex, Resolution};
pub use scoring::{compliance_percent, order_compliance_percent};
pub use tree::RankingTree;
pub use types::{RankingResult, Strategy, TeamId};

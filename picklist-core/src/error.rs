/// Error types for the ranking engine.
///
/// Data problems in individual comparisons are not errors: they are rejected
/// and counted (see `MalformedComparison`). `RankingError` is reserved for
/// problems with the entity set itself and for structural bugs in the tree.
use thiserror::Error;

use crate::types::TeamId;

/// Structural failures of a `RankingTree` mutation or invariant check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("team {0} is not in the tree")]
    MissingNode(TeamId),

    #[error("team {0} is already in the tree")]
    DuplicateNode(TeamId),

    /// `add_node` only seeds an empty tree; later nodes need a relative placement.
    #[error("cannot add team {0} without a relative placement: tree is not empty")]
    NotEmpty(TeamId),

    #[error("level {missing} is empty but the tree reaches level {max_level}")]
    LevelGap { missing: usize, max_level: usize },
}

/// Why a single raw comparison was rejected during validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MalformedComparison {
    #[error("team 0 is reserved and cannot be compared")]
    ReservedTeam,

    #[error("team {0} compared against itself")]
    SelfComparison(TeamId),

    #[error("better team {better} is neither {team_a} nor {team_b}")]
    InvalidBetterTeam {
        team_a: TeamId,
        team_b: TeamId,
        better: TeamId,
    },

    #[error("team {0} is not in the known team set")]
    UnknownTeam(TeamId),
}

/// Errors that abort a ranking run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingError {
    #[error("team 0 is reserved and cannot be ranked")]
    ReservedTeamId,

    #[error("duplicate team {0} in the team list")]
    DuplicateTeam(TeamId),

    #[error("team {0} is not in the team list")]
    UnknownTeam(TeamId),

    #[error("ranking tree invariant violated: {0}")]
    Tree(#[from] TreeError),
}

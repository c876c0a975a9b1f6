/// Pairwise judgments between two teams.
///
/// A `Comparison` is an immutable value: an unordered pair of distinct teams
/// plus an `Outcome`. The pair is stored canonically (lower id first) so two
/// judgments about the same matchup compare and hash equal regardless of the
/// order the teams were reported in.
use crate::error::MalformedComparison;
use crate::types::TeamId;

/// Which side of a comparison won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Better(TeamId),
    Tie,
}

/// Serialization form of a comparison. `better_team == 0` means a tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawComparison {
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub better_team: TeamId,
}

impl RawComparison {
    pub fn new(team_a: TeamId, team_b: TeamId, better_team: TeamId) -> Self {
        RawComparison { team_a, team_b, better_team }
    }

    /// Check the record's internal consistency and convert it to a `Comparison`.
    ///
    /// Membership in a known team set is checked by the engine, not here.
    pub fn validate(&self) -> Result<Comparison, MalformedComparison> {
        let outcome = if self.better_team == 0 {
            Outcome::Tie
        } else {
            Outcome::Better(self.better_team)
        };
        Comparison::new(self.team_a, self.team_b, outcome)
    }
}

impl From<Comparison> for RawComparison {
    fn from(comparison: Comparison) -> Self {
        RawComparison {
            team_a: comparison.lower_team(),
            team_b: comparison.higher_team(),
            better_team: comparison.better_team().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comparison {
    lower: TeamId,
    higher: TeamId,
    outcome: Outcome,
}

impl Comparison {
    pub fn new(team_a: TeamId, team_b: TeamId, outcome: Outcome) -> Result<Self, MalformedComparison> {
        if team_a == 0 || team_b == 0 {
            return Err(MalformedComparison::ReservedTeam);
        }
        if team_a == team_b {
            return Err(MalformedComparison::SelfComparison(team_a));
        }
        if let Outcome::Better(better) = outcome {
            if better != team_a && better != team_b {
                return Err(MalformedComparison::InvalidBetterTeam { team_a, team_b, better });
            }
        }

        Ok(Comparison {
            lower: team_a.min(team_b),
            higher: team_a.max(team_b),
            outcome,
        })
    }

    /// `better` beat `worse`.
    pub fn win(better: TeamId, worse: TeamId) -> Result<Self, MalformedComparison> {
        Comparison::new(better, worse, Outcome::Better(better))
    }

    pub fn tie(team_a: TeamId, team_b: TeamId) -> Result<Self, MalformedComparison> {
        Comparison::new(team_a, team_b, Outcome::Tie)
    }

    pub fn lower_team(&self) -> TeamId {
        self.lower
    }

    pub fn higher_team(&self) -> TeamId {
        self.higher
    }

    pub fn is_tie(&self) -> bool {
        self.outcome == Outcome::Tie
    }

    pub fn better_team(&self) -> Option<TeamId> {
        match self.outcome {
            Outcome::Better(team) => Some(team),
            Outcome::Tie => None,
        }
    }

    /// The non-better member. `None` for a tie.
    pub fn worse_team(&self) -> Option<TeamId> {
        self.better_team().map(|better| self.other(better))
    }

    pub fn contains(&self, team: TeamId) -> bool {
        team == self.lower || team == self.higher
    }

    /// The opposite member of the pair. Callers must pass a member.
    pub fn other(&self, team: TeamId) -> TeamId {
        debug_assert!(self.contains(team), "team {team} is not part of {self:?}");
        if team == self.lower { self.higher } else { self.lower }
    }

    pub fn same_pair(&self, other: &Comparison) -> bool {
        self.lower == other.lower && self.higher == other.higher
    }

    /// Same unordered pair, opposite non-tie winners.
    pub fn contradicts(&self, other: &Comparison) -> bool {
        match (self.better_team(), other.better_team()) {
            (Some(a), Some(b)) => self.same_pair(other) && a != b,
            _ => false,
        }
    }
}

//! Turn arbitration for salvo.
//!
//! There is no "current turn" field anywhere in the ledger. Each team owns a
//! [`TurnToken`] holding a floating priority, and the turn belongs to whichever
//! team's priority wins the comparison below. Both tokens start from a coin
//! flip (independent uniform draws); after every completed move the mover's
//! priority drops to [`MOVER_PRIORITY`] and the opponent's rises to
//! [`OPPONENT_PRIORITY`], in the same commit as the shot.
//!
//! ## Red wins ties
//!
//! Red may act iff `p_red >= p_blue`; blue may act iff `p_blue > p_red`.
//! The comparison is deliberately asymmetric so that exactly one side holds
//! the turn even when the coin flip produces equal values. Games in progress
//! depend on this, so it must not be symmetrised.

use rand::Rng;
use salvo_types::{Team, TurnToken};

/// Priority given to the team that just moved.
pub const MOVER_PRIORITY: f64 = 0.1;

/// Priority given to the team that moves next.
pub const OPPONENT_PRIORITY: f64 = 0.9;

/// Who may act, derived from the turn tokens of one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Fewer than two tokens exist (or a priority is not a number).
    /// Nobody may act; callers wait rather than fail.
    NotStarted,
    /// Red holds the turn.
    RedTurn,
    /// Blue holds the turn.
    BlueTurn,
}

impl TurnState {
    /// Arbitrate from the tokens present in a snapshot.
    pub fn from_tokens(tokens: &[TurnToken]) -> Self {
        let priority_of = |team: Team| tokens.iter().find(|t| t.team == team).map(|t| t.priority);

        let (Some(red), Some(blue)) = (priority_of(Team::Red), priority_of(Team::Blue)) else {
            return TurnState::NotStarted;
        };

        if red >= blue {
            TurnState::RedTurn
        } else if blue > red {
            TurnState::BlueTurn
        } else {
            // Only reachable when a priority is NaN.
            TurnState::NotStarted
        }
    }

    /// Whether `team` may act in this state.
    pub fn can_act(self, team: Team) -> bool {
        self.holder() == Some(team)
    }

    /// The team holding the turn, if the game has started.
    pub fn holder(self) -> Option<Team> {
        match self {
            TurnState::NotStarted => None,
            TurnState::RedTurn => Some(Team::Red),
            TurnState::BlueTurn => Some(Team::Blue),
        }
    }

    /// Whether both coin flips are in.
    pub fn is_started(self) -> bool {
        self != TurnState::NotStarted
    }
}

/// Token values to commit after `mover` completes a move.
pub fn advance(mover: Team) -> [TurnToken; 2] {
    [
        TurnToken::new(mover, MOVER_PRIORITY),
        TurnToken::new(mover.opponent(), OPPONENT_PRIORITY),
    ]
}

/// Draw a coin-flip priority, uniform in the open interval `(0, 1)`.
pub fn coin_flip<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let value: f64 = rng.gen();
        if value > 0.0 {
            return value;
        }
    }
}

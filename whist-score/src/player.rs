use std::fmt::{Display, Formatter};
use serde::{Serialize, Deserialize};

/// Whist player
/// Lives for the whole game session; the score carries over from round to round.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Player {
    /// Player name, unique within a game
    pub name: String,

    /// Cumulative score, only changed by scoring a round
    score: i64,

    /// Outcome of the current round for a miserie player.
    /// `None` until the caller records it.
    pub succeeded_round: Option<bool>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Player {
        Player {
            name: name.into(),
            score: 0,
            succeeded_round: None,
        }
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub(crate) fn add_points(&mut self, points: i64) {
        self.score += points;
    }

    /// Forget the outcome of the previous round
    pub fn reset_round(&mut self) {
        self.succeeded_round = None;
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

//! Score keeping for whist.
//!
//! After a round is played, the round type (abondance or one of the miserie
//! variants) looks up what every player earns in the point tables and adds
//! it to their score.
//!
//! ```
//! use whist_score::{Miserie, MiserieKind, Player, PointSystem};
//!
//! let points = PointSystem::builtin().unwrap();
//! let mut players: Vec<Player> = ["Ann", "Bert", "Cis", "Dirk"]
//!     .iter()
//!     .map(|n| Player::new(*n))
//!     .collect();
//! players[0].succeeded_round = Some(false);
//!
//! let (playing, others) = players.split_at_mut(1);
//! let playing = playing.iter_mut().collect();
//! let others = others.iter_mut().collect();
//! Miserie::new(MiserieKind::KleineMiserie, playing, others)
//!     .unwrap()
//!     .assign_points(&points)
//!     .unwrap();
//!
//! let scores: Vec<i64> = players.iter().map(|p| p.score()).collect();
//! assert_eq!(scores, vec![-18, 12, 12, 12]);
//! ```

extern crate log;
extern crate serde;
extern crate serde_json;
extern crate thiserror;

#[cfg(test)]
mod tests {
    use crate::{Abondance, Miserie, MiserieKind, Player, PointSystem, RoundError};

    fn generate_players() -> (Player, Player, Player, Player) {
        (
            Player::new("Player1"),
            Player::new("Player2"),
            Player::new("Player3"),
            Player::new("Player4"),
        )
    }

    mod scenarios {
        use super::*;

        /// One failed kleine miserie against three others
        #[test]
        fn kleine_miserie_failed() {
            let points = PointSystem::builtin().unwrap();
            let (mut p1, mut p2, mut p3, mut p4) = generate_players();
            p1.succeeded_round = Some(false);

            let others = vec![&mut p2, &mut p3, &mut p4];
            let kind = MiserieKind::KleineMiserie;
            let mut round = Miserie::new(kind, vec![&mut p1], others).unwrap();
            round.assign_points(&points).unwrap();
            drop(round);

            let scores: Vec<i64> = [&p1, &p2, &p3, &p4].iter().map(|p| p.score()).collect();
            assert_eq!(scores, vec![-18, 12, 12, 12]);
        }

        /// Scoring the same round twice counts it twice
        #[test]
        fn repeated_scoring_adds_up() {
            let points = PointSystem::builtin().unwrap();
            let (mut p1, mut p2, mut p3, mut p4) = generate_players();
            p1.succeeded_round = Some(false);

            let others = vec![&mut p2, &mut p3, &mut p4];
            let kind = MiserieKind::KleineMiserie;
            let mut round = Miserie::new(kind, vec![&mut p1], others).unwrap();
            round.assign_points(&points).unwrap();
            round.assign_points(&points).unwrap();
            drop(round);

            let scores: Vec<i64> = [&p1, &p2, &p3, &p4].iter().map(|p| p.score()).collect();
            assert_eq!(scores, vec![-36, 24, 24, 24]);
        }

        #[test]
        fn abondance_bids_below_nine_and_above_thirteen() {
            for &number_of_tricks in [7, 8, 14].iter() {
                let (mut p1, mut p2, mut p3, mut p4) = generate_players();
                let others = vec![&mut p1, &mut p3, &mut p4];
                let result = Abondance::new(number_of_tricks, vec![&mut p2], others);
                assert_eq!(result.err(), Some(RoundError::InvalidNumberOfTricks(number_of_tricks)));
            }
        }
    }
}

pub mod error;
pub mod game;
pub mod player;
pub mod points;
pub mod round;

pub use error::*;
pub use game::*;
pub use player::*;
pub use points::*;
pub use round::*;

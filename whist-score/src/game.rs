use log::info;
use serde::{Serialize, Deserialize};
use crate::error::GameError;
use crate::player::Player;
use crate::points::PointSystem;
use crate::round::*;

/// Players at a whist table
pub const PLAYER_COUNT: usize = 4;

/// What the playing side declared
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Declaration {
    /// Abondance for the given number of tricks
    Abondance(u8),
    Miserie(MiserieKind),
}

/// A scored round
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RoundRecord {
    pub declaration: Declaration,

    /// Names of the playing players
    pub playing: Vec<String>,

    /// Score change per player name, playing players first
    pub deltas: Vec<(String, i64)>,
}

/// A scoring session: four players and the rounds they played
pub struct Game {
    players: Vec<Player>,
    points: PointSystem,
    history: Vec<RoundRecord>,
}

impl Game {
    pub fn new<S: AsRef<str>>(names: &[S], points: PointSystem) -> Result<Game, GameError> {
        if names.len() != PLAYER_COUNT {
            return Err(GameError::PlayerCount {
                expected: PLAYER_COUNT,
                actual: names.len(),
            });
        }

        let mut players: Vec<Player> = Vec::with_capacity(PLAYER_COUNT);
        for name in names {
            let name: &str = name.as_ref();
            if players.iter().any(|p| p.name == name) {
                return Err(GameError::DuplicateName(name.to_string()));
            }
            players.push(Player::new(name));
        }

        Ok(Game {
            players,
            points,
            history: vec![],
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    /// Names and scores, best first
    pub fn standings(&self) -> Vec<(&str, i64)> {
        let mut standings: Vec<(&str, i64)> = self
            .players
            .iter()
            .map(|p| (p.name.as_str(), p.score()))
            .collect();
        standings.sort_by(|a, b| b.1.cmp(&a.1));
        standings
    }

    /// Sets the miserie outcome of the player at `seat` for the coming round
    pub fn record_success(&mut self, seat: usize, succeeded: bool) -> Result<(), GameError> {
        let player = self.players.get_mut(seat).ok_or(GameError::UnknownSeat(seat))?;
        player.succeeded_round = Some(succeeded);
        Ok(())
    }

    /// Scores one round.
    ///
    /// `playing` lists the seats of the playing players; everybody else is an
    /// other player. A failed round leaves scores and recorded outcomes
    /// untouched; a scored round clears the recorded outcomes.
    pub fn play(
        &mut self,
        declaration: Declaration,
        playing: &[usize],
        outcome: &RoundOutcome,
    ) -> Result<&RoundRecord, GameError> {
        let record = score_round(&mut self.players, &self.points, declaration, playing, outcome)?;
        for player in self.players.iter_mut() {
            player.reset_round();
        }

        info!("round {}: {:?} {:?}", self.history.len() + 1, declaration, record.deltas);
        self.history.push(record);
        Ok(&self.history[self.history.len() - 1])
    }
}

fn score_round(
    players: &mut [Player],
    points: &PointSystem,
    declaration: Declaration,
    playing: &[usize],
    outcome: &RoundOutcome,
) -> Result<RoundRecord, GameError> {
    let (playing_players, other_players) = split_seats(players, playing)?;
    let mut round = create_round(declaration, playing_players, other_players)?;

    let names: Vec<String> = round
        .playing_players()
        .into_iter()
        .chain(round.other_players())
        .map(|p| p.name.clone())
        .collect();
    let deltas = assign_points(&mut *round, points, outcome)?;

    Ok(RoundRecord {
        declaration,
        playing: names[..playing.len()].to_vec(),
        deltas: names.into_iter().zip(deltas).collect(),
    })
}

/// Builds the round type for a declaration
pub fn create_round<'round>(
    declaration: Declaration,
    playing_players: Vec<&'round mut Player>,
    other_players: Vec<&'round mut Player>,
) -> Result<Box<dyn RoundType + 'round>, GameError> {
    let round: Box<dyn RoundType + 'round> = match declaration {
        Declaration::Abondance(number_of_tricks) => {
            Box::new(Abondance::new(number_of_tricks, playing_players, other_players)?)
        }
        Declaration::Miserie(kind) => Box::new(Miserie::new(kind, playing_players, other_players)?),
    };
    Ok(round)
}

/// Playing players in the order of `playing`, the others in seat order
fn split_seats<'a>(
    players: &'a mut [Player],
    playing: &[usize],
) -> Result<(Vec<&'a mut Player>, Vec<&'a mut Player>), GameError> {
    let mut seats: Vec<Option<&'a mut Player>> = players.iter_mut().map(Some).collect();

    let mut playing_players = Vec::with_capacity(playing.len());
    for &seat in playing {
        let player = seats
            .get_mut(seat)
            .ok_or(GameError::UnknownSeat(seat))?
            .take()
            .ok_or(GameError::DuplicateSeat(seat))?;
        playing_players.push(player);
    }

    let other_players = seats.into_iter().flatten().collect();
    Ok((playing_players, other_players))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RoundError;

    fn new_game() -> Game {
        let names = ["Player1", "Player2", "Player3", "Player4"];
        Game::new(&names, PointSystem::builtin().unwrap()).unwrap()
    }

    fn scores(game: &Game) -> Vec<i64> {
        game.players().iter().map(|p| p.score()).collect()
    }

    #[test]
    fn needs_four_unique_players() {
        let points = PointSystem::builtin().unwrap();
        assert_eq!(
            Game::new(&["Player1", "Player2", "Player3"], points.clone()).err(),
            Some(GameError::PlayerCount { expected: 4, actual: 3 })
        );
        assert_eq!(
            Game::new(&["Player1", "Player2", "Player3", "Player1"], points).err(),
            Some(GameError::DuplicateName("Player1".to_string()))
        );
    }

    #[test]
    fn scores_accumulate_over_rounds() {
        let mut game = new_game();

        let record = game
            .play(
                Declaration::Miserie(MiserieKind::KleineMiserie),
                &[0],
                &RoundOutcome::Succeeded(vec![false]),
            )
            .unwrap()
            .clone();
        assert_eq!(record.playing, vec!["Player1".to_string()]);
        assert_eq!(scores(&game), vec![-18, 12, 12, 12]);

        game.play(Declaration::Abondance(9), &[2], &RoundOutcome::TricksAchieved(9)).unwrap();
        assert_eq!(scores(&game), vec![-18 - 5, 12 - 5, 12 + 15, 12 - 5]);

        assert_eq!(game.history().len(), 2);
        assert_eq!(game.standings()[0], ("Player3", 27));
        assert_eq!(game.player("Player1").map(|p| p.score()), Some(-23));
    }

    #[test]
    fn playing_order_follows_the_declaration() {
        let mut game = new_game();
        let record = game
            .play(
                Declaration::Miserie(MiserieKind::Piccolo),
                &[3, 1],
                &RoundOutcome::Succeeded(vec![true, false]),
            )
            .unwrap();

        let names: Vec<&str> = record.deltas.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Player4", "Player2", "Player1", "Player3"]);
        assert_eq!(record.deltas[0].1, 24);
        assert_eq!(record.deltas[1].1, -24);
        assert_eq!(scores(&game), vec![16, -24, 16, 24]);
    }

    #[test]
    fn recorded_outcomes_are_cleared_after_each_round() {
        let mut game = new_game();
        let kleine = Declaration::Miserie(MiserieKind::KleineMiserie);
        game.record_success(0, true).unwrap();

        let result = game.play(kleine, &[0, 1], &RoundOutcome::Recorded);
        assert_eq!(
            result.err(),
            Some(GameError::Round(RoundError::OutcomeNotRecorded("Player2".to_string())))
        );
        let result = game.play(kleine, &[0, 5], &RoundOutcome::Recorded);
        assert_eq!(result.err(), Some(GameError::UnknownSeat(5)));

        // failed rounds keep what was recorded so far
        assert_eq!(game.players()[0].succeeded_round, Some(true));
        assert_eq!(scores(&game), vec![0, 0, 0, 0]);
        assert!(game.history().is_empty());

        game.record_success(1, false).unwrap();
        game.play(kleine, &[0, 1], &RoundOutcome::Recorded).unwrap();
        assert_eq!(scores(&game), vec![18, -18, 12, 12]);
        assert!(game.players().iter().all(|p| p.succeeded_round.is_none()));

        let result = game.play(kleine, &[0], &RoundOutcome::Recorded);
        assert_eq!(
            result.err(),
            Some(GameError::Round(RoundError::OutcomeNotRecorded("Player1".to_string())))
        );
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn bad_seats_are_rejected() {
        let mut game = new_game();
        assert_eq!(
            game.play(Declaration::Abondance(10), &[4], &RoundOutcome::TricksAchieved(10)).err(),
            Some(GameError::UnknownSeat(4))
        );
        assert_eq!(
            game.play(
                Declaration::Miserie(MiserieKind::Piccolo),
                &[0, 0],
                &RoundOutcome::Succeeded(vec![true, true])
            )
            .err(),
            Some(GameError::DuplicateSeat(0))
        );
        assert_eq!(game.record_success(7, true), Err(GameError::UnknownSeat(7)));
    }

    #[test]
    fn illegal_declarations_are_rejected() {
        let mut game = new_game();
        assert_eq!(
            game.play(Declaration::Abondance(8), &[0], &RoundOutcome::TricksAchieved(8)).err(),
            Some(GameError::Round(RoundError::InvalidNumberOfTricks(8)))
        );
        assert_eq!(
            game.play(Declaration::Abondance(9), &[0, 1, 2, 3], &RoundOutcome::TricksAchieved(9))
                .err(),
            Some(GameError::Round(RoundError::NoOtherPlayers))
        );
        assert!(game.history().is_empty());
    }

    #[test]
    fn create_round_dispatches_on_the_declaration() {
        let mut p1 = Player::new("Player1");
        let mut p2 = Player::new("Player2");
        let round = create_round(
            Declaration::Miserie(MiserieKind::GroteMiserieOpTafel),
            vec![&mut p1],
            vec![&mut p2],
        )
        .unwrap();
        assert_eq!(round.name(), "grote_miserie_op_tafel");
        assert_eq!(round.playing_players()[0].name, "Player1");
        assert_eq!(round.other_players()[0].name, "Player2");
    }
}

use std::fmt::{Display, Formatter};
use std::iter;
use std::ops::RangeInclusive;
use std::str::FromStr;
use log::debug;
use serde::{Serialize, Deserialize};
use crate::error::RoundError;
use crate::player::Player;
use crate::points::PointSystem;

/// Tricks in a hand
pub const MAX_TRICKS: u8 = 13;

/// Legal abondance declarations
pub const ABONDANCE_TRICKS: RangeInclusive<u8> = 9..=13;

/// How a round ended
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Tricks taken by the playing side
    TricksAchieved(u8),

    /// Success of every playing player, in playing order
    Succeeded(Vec<bool>),

    /// Read the `succeeded_round` flag of every playing player
    Recorded,
}

impl RoundOutcome {
    fn kind(&self) -> &str {
        match self {
            RoundOutcome::TricksAchieved(_) => "tricks achieved",
            RoundOutcome::Succeeded(_) => "per player",
            RoundOutcome::Recorded => "recorded",
        }
    }
}

/// Round variant
pub trait RoundType {
    /// Name of the variant's row in the point tables
    fn name(&self) -> &str;

    /// Declarer side
    fn playing_players(&self) -> Vec<&Player>;

    /// Defender side
    fn other_players(&self) -> Vec<&Player>;

    /// Playing players first, then the other players
    fn players_mut(&mut self) -> Vec<&mut Player>;

    /// Score change of every player, in the order of `players_mut`
    fn score_deltas(
        &self,
        points: &PointSystem,
        outcome: &RoundOutcome,
    ) -> Result<Vec<i64>, RoundError>;
}

/// Scores a round.
///
/// Every delta is looked up before any score changes, so a failed lookup
/// leaves all players as they were. Returns the applied deltas.
///
/// Calling this twice for the same round counts the round twice.
pub fn assign_points<R: RoundType + ?Sized>(
    round: &mut R,
    points: &PointSystem,
    outcome: &RoundOutcome,
) -> Result<Vec<i64>, RoundError> {
    let deltas = round.score_deltas(points, outcome)?;
    let name = round.name().to_string();
    let players = round.players_mut();
    if players.len() != deltas.len() {
        return Err(RoundError::DeltaCount {
            round: name,
            expected: players.len(),
            actual: deltas.len(),
        });
    }
    for (player, delta) in players.into_iter().zip(deltas.iter()) {
        player.add_points(*delta);
        debug!("{}: {} {:+} -> {}", name, player, delta, player.score());
    }
    Ok(deltas)
}

fn check_outcome_count(playing: usize, outcomes: usize) -> Result<(), RoundError> {
    if playing == outcomes {
        Ok(())
    } else {
        Err(RoundError::OutcomeCount {
            expected: playing,
            actual: outcomes,
        })
    }
}

/// Abondance: the playing side declares to take 9 or more tricks
pub struct Abondance<'round> {
    number_of_tricks: u8,
    playing_players: Vec<&'round mut Player>,
    other_players: Vec<&'round mut Player>,
}

impl<'round> Abondance<'round> {
    pub fn new(
        number_of_tricks: u8,
        playing_players: Vec<&'round mut Player>,
        other_players: Vec<&'round mut Player>,
    ) -> Result<Abondance<'round>, RoundError> {
        if !ABONDANCE_TRICKS.contains(&number_of_tricks) {
            return Err(RoundError::InvalidNumberOfTricks(number_of_tricks));
        }
        if playing_players.is_empty() {
            return Err(RoundError::NoPlayingPlayers);
        }
        if other_players.is_empty() {
            return Err(RoundError::NoOtherPlayers);
        }
        Ok(Abondance {
            number_of_tricks,
            playing_players,
            other_players,
        })
    }

    pub fn number_of_tricks(&self) -> u8 {
        self.number_of_tricks
    }

    pub fn assign_points(
        &mut self,
        points: &PointSystem,
        tricks_achieved: u8,
    ) -> Result<(), RoundError> {
        assign_points(self, points, &RoundOutcome::TricksAchieved(tricks_achieved)).map(|_| ())
    }
}

impl RoundType for Abondance<'_> {
    fn name(&self) -> &str {
        "abondance"
    }

    fn playing_players(&self) -> Vec<&Player> {
        self.playing_players.iter().map(|p| &**p).collect()
    }

    fn other_players(&self) -> Vec<&Player> {
        self.other_players.iter().map(|p| &**p).collect()
    }

    fn players_mut(&mut self) -> Vec<&mut Player> {
        self.playing_players
            .iter_mut()
            .chain(self.other_players.iter_mut())
            .map(|p| &mut **p)
            .collect()
    }

    fn score_deltas(
        &self,
        points: &PointSystem,
        outcome: &RoundOutcome,
    ) -> Result<Vec<i64>, RoundError> {
        let tricks_achieved = match outcome {
            RoundOutcome::TricksAchieved(tricks) => *tricks,
            _ => {
                return Err(RoundError::OutcomeMismatch {
                    round: self.name().to_string(),
                    outcome: outcome.kind().to_string(),
                })
            }
        };

        let (player, others) = points.abondance(self.number_of_tricks, tricks_achieved)?;
        Ok(iter::repeat(player)
            .take(self.playing_players.len())
            .chain(iter::repeat(others).take(self.other_players.len()))
            .collect())
    }
}

/// The miserie family, all scored alike from their own table row
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MiserieKind {
    KleineMiserie,
    GroteMiserie,
    GroteMiserieOpTafel,
    Piccolo,
}

impl MiserieKind {
    pub const ALL: [MiserieKind; 4] = [
        MiserieKind::KleineMiserie,
        MiserieKind::GroteMiserie,
        MiserieKind::GroteMiserieOpTafel,
        MiserieKind::Piccolo,
    ];

    /// Row key in the miserie point table
    pub fn table_key(self) -> &'static str {
        match self {
            MiserieKind::KleineMiserie => "kleine_miserie",
            MiserieKind::GroteMiserie => "grote_miserie",
            MiserieKind::GroteMiserieOpTafel => "grote_miserie_op_tafel",
            MiserieKind::Piccolo => "piccolo",
        }
    }
}

impl Display for MiserieKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.table_key())
    }
}

impl FromStr for MiserieKind {
    type Err = RoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MiserieKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.table_key() == s)
            .ok_or_else(|| RoundError::UnknownRoundType(s.to_string()))
    }
}

/// Miserie round: every playing player tries not to take a single trick
/// (piccolo: exactly one). Each of them succeeds or fails on their own.
pub struct Miserie<'round> {
    kind: MiserieKind,
    playing_players: Vec<&'round mut Player>,
    other_players: Vec<&'round mut Player>,
}

impl<'round> Miserie<'round> {
    /// `other_players` may be empty when everybody plays
    pub fn new(
        kind: MiserieKind,
        playing_players: Vec<&'round mut Player>,
        other_players: Vec<&'round mut Player>,
    ) -> Result<Miserie<'round>, RoundError> {
        if playing_players.is_empty() {
            return Err(RoundError::NoPlayingPlayers);
        }
        Ok(Miserie {
            kind,
            playing_players,
            other_players,
        })
    }

    pub fn kind(&self) -> MiserieKind {
        self.kind
    }

    /// Scores the round from the `succeeded_round` flags of the playing players
    pub fn assign_points(&mut self, points: &PointSystem) -> Result<(), RoundError> {
        assign_points(self, points, &RoundOutcome::Recorded).map(|_| ())
    }

    fn recorded_outcomes(&self) -> Result<Vec<bool>, RoundError> {
        self.playing_players
            .iter()
            .map(|p| {
                p.succeeded_round
                    .ok_or_else(|| RoundError::OutcomeNotRecorded(p.name.clone()))
            })
            .collect()
    }
}

impl RoundType for Miserie<'_> {
    fn name(&self) -> &str {
        self.kind.table_key()
    }

    fn playing_players(&self) -> Vec<&Player> {
        self.playing_players.iter().map(|p| &**p).collect()
    }

    fn other_players(&self) -> Vec<&Player> {
        self.other_players.iter().map(|p| &**p).collect()
    }

    fn players_mut(&mut self) -> Vec<&mut Player> {
        self.playing_players
            .iter_mut()
            .chain(self.other_players.iter_mut())
            .map(|p| &mut **p)
            .collect()
    }

    fn score_deltas(
        &self,
        points: &PointSystem,
        outcome: &RoundOutcome,
    ) -> Result<Vec<i64>, RoundError> {
        let succeeded = match outcome {
            RoundOutcome::Recorded => self.recorded_outcomes()?,
            RoundOutcome::Succeeded(succeeded) => {
                check_outcome_count(self.playing_players.len(), succeeded.len())?;
                succeeded.clone()
            }
            RoundOutcome::TricksAchieved(_) => {
                return Err(RoundError::OutcomeMismatch {
                    round: self.name().to_string(),
                    outcome: outcome.kind().to_string(),
                })
            }
        };

        let row = points.miserie(self.kind)?;
        let failed = succeeded.iter().filter(|s| !**s).count();

        // nobody pays when every playing player made it, or nobody is left to pay
        let others = if failed == 0 || self.other_players.is_empty() {
            0
        } else {
            row.others_failed(failed).ok_or_else(|| {
                RoundError::missing_points(
                    self.name(),
                    format!("punten_anderen_niet_geslaagd.{}", failed),
                )
            })?
        };

        Ok(succeeded
            .iter()
            .map(|&s| if s { row.succeeded } else { row.failed })
            .chain(iter::repeat(others).take(self.other_players.len()))
            .collect())
    }
}

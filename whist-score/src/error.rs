use std::io;
use serde::{Serialize, Deserialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Error)]
pub enum RoundError {
    /// Abondance can only be declared for 9 up to 13 tricks
    #[error("abondance must be declared for 9 to 13 tricks, not {0}")]
    InvalidNumberOfTricks(u8),

    #[error("a round needs at least one playing player")]
    NoPlayingPlayers,

    #[error("abondance needs at least one other player")]
    NoOtherPlayers,

    /// Playing player whose `succeeded_round` was never set
    #[error("no outcome recorded for {0} this round")]
    OutcomeNotRecorded(String),

    #[error("{round} cannot be scored with a {outcome} outcome")]
    OutcomeMismatch { round: String, outcome: String },

    #[error("expected an outcome for {expected} playing players, got {actual}")]
    OutcomeCount { expected: usize, actual: usize },

    /// The point table has no entry for this outcome
    #[error("no points configured for {round} at {key}")]
    MissingPoints { round: String, key: String },

    /// A round type priced a different number of players than it seats
    #[error("{round} returned {actual} score changes for {expected} players")]
    DeltaCount { round: String, expected: usize, actual: usize },

    #[error("unknown round type `{0}`")]
    UnknownRoundType(String),
}

impl RoundError {
    pub(crate) fn missing_points(round: &str, key: impl Into<String>) -> RoundError {
        RoundError::MissingPoints {
            round: round.to_string(),
            key: key.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PointSystemError {
    #[error("unknown point system `{0}`")]
    UnknownTable(String),

    #[error("unable to read point system `{name}`")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed point system `{name}`")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("point system `{name}` is missing `{key}`")]
    MissingKey { name: String, key: String },

    /// Outcome keys are string-encoded counts
    #[error("point system `{name}` has a non-numeric key `{key}`")]
    InvalidKey { name: String, key: String },
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Error)]
pub enum GameError {
    #[error("whist is played by {expected} players, got {actual}")]
    PlayerCount { expected: usize, actual: usize },

    #[error("player name `{0}` is taken")]
    DuplicateName(String),

    #[error("no player at seat {0}")]
    UnknownSeat(usize),

    #[error("seat {0} is named more than once")]
    DuplicateSeat(usize),

    #[error(transparent)]
    Round(#[from] RoundError),
}

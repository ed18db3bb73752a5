//! Point-system tables.
//!
//! Two JSON documents price every round: `abondance_point_system` keyed by the
//! declared trick count, and `miserie_point_system` keyed by variant. Both are
//! read through a [`PointSystemSource`] and checked in full when loaded, so a
//! gap in the configuration shows up before the first round is scored.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use log::{info, trace, warn};
use serde::Deserialize;
use serde_json::Value;
use crate::error::{PointSystemError, RoundError};
use crate::round::{MiserieKind, ABONDANCE_TRICKS, MAX_TRICKS};

pub const ABONDANCE_POINT_SYSTEM: &str = "abondance_point_system";
pub const MISERIE_POINT_SYSTEM: &str = "miserie_point_system";

/// Failed playing players a four player table can have while someone is left to pay
const FAILED_COUNTS: RangeInclusive<usize> = 1..=3;

/// Where point tables come from
pub trait PointSystemSource {
    /// Raw nested table stored under `name`
    fn load(&self, name: &str) -> Result<Value, PointSystemError>;
}

/// The reference tables shipped with the crate
pub struct BuiltinTables;

impl PointSystemSource for BuiltinTables {
    fn load(&self, name: &str) -> Result<Value, PointSystemError> {
        let document = match name {
            ABONDANCE_POINT_SYSTEM => include_str!("../config/abondance_point_system.json"),
            MISERIE_POINT_SYSTEM => include_str!("../config/miserie_point_system.json"),
            _ => return Err(PointSystemError::UnknownTable(name.to_string())),
        };
        parse_document(name, document)
    }
}

/// Tables stored as `<name>.json` files in one directory
pub struct TableDirectory {
    path: PathBuf,
}

impl TableDirectory {
    pub fn new(path: impl Into<PathBuf>) -> TableDirectory {
        TableDirectory { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PointSystemSource for TableDirectory {
    fn load(&self, name: &str) -> Result<Value, PointSystemError> {
        let file = self.path.join(format!("{}.json", name));
        match fs::read_to_string(&file) {
            Ok(document) => parse_document(name, &document),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(PointSystemError::UnknownTable(name.to_string()))
            }
            Err(source) => Err(PointSystemError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }
}

fn parse_document(name: &str, document: &str) -> Result<Value, PointSystemError> {
    serde_json::from_str(document).map_err(|source| PointSystemError::Malformed {
        name: name.to_string(),
        source,
    })
}

#[derive(Deserialize)]
struct RawAbondanceRow {
    player: BTreeMap<String, i64>,
    other_players: BTreeMap<String, i64>,
}

#[derive(Deserialize)]
struct RawMiserieRow {
    punten_geslaagd: i64,
    punten_niet_geslaagd: i64,
    punten_anderen_niet_geslaagd: BTreeMap<String, i64>,
}

/// Points for one declared abondance, by tricks achieved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbondanceRow {
    player: BTreeMap<u8, i64>,
    other_players: BTreeMap<u8, i64>,
}

/// Points for one miserie variant
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MiserieRow {
    /// `punten_geslaagd`, for each playing player that succeeds
    pub succeeded: i64,

    /// `punten_niet_geslaagd`, for each playing player that fails
    pub failed: i64,

    /// `punten_anderen_niet_geslaagd`, keyed by the number of failed playing players
    others_failed: BTreeMap<usize, i64>,
}

impl MiserieRow {
    /// What every other player receives when `failed` playing players failed
    pub fn others_failed(&self, failed: usize) -> Option<i64> {
        self.others_failed.get(&failed).copied()
    }
}

/// Validated point tables for every round type
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointSystem {
    abondance: BTreeMap<u8, AbondanceRow>,
    miserie: BTreeMap<MiserieKind, MiserieRow>,
}

impl PointSystem {
    pub fn builtin() -> Result<PointSystem, PointSystemError> {
        PointSystem::load(&BuiltinTables)
    }

    pub fn load(source: &dyn PointSystemSource) -> Result<PointSystem, PointSystemError> {
        let abondance = source.load(ABONDANCE_POINT_SYSTEM)?;
        let miserie = source.load(MISERIE_POINT_SYSTEM)?;
        let points = PointSystem::from_values(abondance, miserie)?;
        info!(
            "loaded point system with {} abondance and {} miserie rows",
            points.abondance.len(),
            points.miserie.len()
        );
        Ok(points)
    }

    /// Validates the raw abondance and miserie documents
    pub fn from_values(abondance: Value, miserie: Value) -> Result<PointSystem, PointSystemError> {
        Ok(PointSystem {
            abondance: abondance_rows(abondance)?,
            miserie: miserie_rows(miserie)?,
        })
    }

    /// Points for each playing player and for each other player
    pub fn abondance(
        &self,
        number_of_tricks: u8,
        tricks_achieved: u8,
    ) -> Result<(i64, i64), RoundError> {
        trace!("abondance lookup: declared {}, achieved {}", number_of_tricks, tricks_achieved);
        let row = self
            .abondance
            .get(&number_of_tricks)
            .ok_or_else(|| RoundError::missing_points("abondance", number_of_tricks.to_string()))?;
        let player = row.player.get(&tricks_achieved).ok_or_else(|| {
            RoundError::missing_points(
                "abondance",
                format!("{}.player.{}", number_of_tricks, tricks_achieved),
            )
        })?;
        let other_players = row.other_players.get(&tricks_achieved).ok_or_else(|| {
            RoundError::missing_points(
                "abondance",
                format!("{}.other_players.{}", number_of_tricks, tricks_achieved),
            )
        })?;
        Ok((*player, *other_players))
    }

    pub fn miserie(&self, kind: MiserieKind) -> Result<&MiserieRow, RoundError> {
        trace!("miserie lookup: {}", kind);
        self.miserie
            .get(&kind)
            .ok_or_else(|| RoundError::missing_points(kind.table_key(), "row"))
    }
}

fn abondance_rows(document: Value) -> Result<BTreeMap<u8, AbondanceRow>, PointSystemError> {
    let name = ABONDANCE_POINT_SYSTEM;
    let raw: BTreeMap<String, RawAbondanceRow> = from_value(name, document)?;

    let mut rows = BTreeMap::new();
    for (key, row) in raw {
        let declared: u8 = parse_key(name, &key)?;
        if !ABONDANCE_TRICKS.contains(&declared) {
            warn!("ignoring abondance row for {} tricks", declared);
            continue;
        }
        let row = AbondanceRow {
            player: numeric_keys(name, row.player)?,
            other_players: numeric_keys(name, row.other_players)?,
        };
        if rows.insert(declared, row).is_some() {
            return Err(invalid_key(name, &key));
        }
    }

    for declared in ABONDANCE_TRICKS {
        let row = rows
            .get(&declared)
            .ok_or_else(|| missing_key(name, declared.to_string()))?;
        for achieved in 0..=MAX_TRICKS {
            if !row.player.contains_key(&achieved) {
                return Err(missing_key(name, format!("{}.player.{}", declared, achieved)));
            }
            if !row.other_players.contains_key(&achieved) {
                return Err(missing_key(name, format!("{}.other_players.{}", declared, achieved)));
            }
        }
    }
    Ok(rows)
}

fn miserie_rows(document: Value) -> Result<BTreeMap<MiserieKind, MiserieRow>, PointSystemError> {
    let name = MISERIE_POINT_SYSTEM;
    let raw: BTreeMap<String, RawMiserieRow> = from_value(name, document)?;

    let mut rows = BTreeMap::new();
    for (key, row) in raw {
        let kind = match key.parse::<MiserieKind>() {
            Ok(kind) => kind,
            Err(_) => {
                warn!("ignoring unknown miserie row `{}`", key);
                continue;
            }
        };
        rows.insert(
            kind,
            MiserieRow {
                succeeded: row.punten_geslaagd,
                failed: row.punten_niet_geslaagd,
                others_failed: numeric_keys(name, row.punten_anderen_niet_geslaagd)?,
            },
        );
    }

    for &kind in MiserieKind::ALL.iter() {
        let row = rows
            .get(&kind)
            .ok_or_else(|| missing_key(name, kind.table_key()))?;
        for failed in FAILED_COUNTS {
            if row.others_failed(failed).is_none() {
                return Err(missing_key(
                    name,
                    format!("{}.punten_anderen_niet_geslaagd.{}", kind, failed),
                ));
            }
        }
    }
    Ok(rows)
}

fn from_value<T: serde::de::DeserializeOwned>(
    name: &str,
    document: Value,
) -> Result<T, PointSystemError> {
    serde_json::from_value(document).map_err(|source| PointSystemError::Malformed {
        name: name.to_string(),
        source,
    })
}

/// Parses every key of `column`; two spellings of one count (`"9"`, `"09"`) are rejected
fn numeric_keys<K: FromStr + Ord>(
    name: &str,
    column: BTreeMap<String, i64>,
) -> Result<BTreeMap<K, i64>, PointSystemError> {
    let mut parsed = BTreeMap::new();
    for (key, points) in column {
        if parsed.insert(parse_key(name, &key)?, points).is_some() {
            return Err(invalid_key(name, &key));
        }
    }
    Ok(parsed)
}

fn parse_key<K: FromStr>(name: &str, key: &str) -> Result<K, PointSystemError> {
    key.parse().map_err(|_| invalid_key(name, key))
}

fn invalid_key(name: &str, key: &str) -> PointSystemError {
    PointSystemError::InvalidKey {
        name: name.to_string(),
        key: key.to_string(),
    }
}

fn missing_key(name: &str, key: impl Into<String>) -> PointSystemError {
    PointSystemError::MissingKey {
        name: name.to_string(),
        key: key.into(),
    }
}

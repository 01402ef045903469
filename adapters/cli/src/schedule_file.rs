//! JSON wave schedule files.
//!
//! A schedule file is an array of `{ "spawn_time": seconds, "type": "VAN" |
//! "PICKUP", "y": units }` records. Entries the simulation cannot use are
//! dropped with a warning; the rest are returned sorted by spawn time.

use std::{fs, path::Path, time::Duration};

use no_room_core::{EnemyKind, EnemySpawn, LOGICAL_HEIGHT};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct ScheduleRecord {
    spawn_time: f64,
    #[serde(rename = "type")]
    kind: String,
    y: f64,
}

/// Errors that can occur while loading a wave schedule file.
#[derive(Debug, Error)]
pub(crate) enum ScheduleFileError {
    /// The file could not be read.
    #[error("failed to read schedule file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The contents were not an array of schedule records.
    #[error("schedule is not a list of spawn records")]
    InvalidPayload(#[source] serde_json::Error),
}

/// Reads and parses the schedule stored at `path`.
pub(crate) fn load(path: &Path) -> Result<Vec<EnemySpawn>, ScheduleFileError> {
    let contents = fs::read_to_string(path).map_err(|source| ScheduleFileError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let spawns = parse(&contents)?;
    info!(path = %path.display(), entries = spawns.len(), "loaded wave schedule");
    Ok(spawns)
}

/// Parses schedule records, dropping the unusable ones.
pub(crate) fn parse(contents: &str) -> Result<Vec<EnemySpawn>, ScheduleFileError> {
    let records: Vec<ScheduleRecord> =
        serde_json::from_str(contents).map_err(ScheduleFileError::InvalidPayload)?;

    let mut spawns: Vec<EnemySpawn> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| convert(index, record))
        .collect();
    spawns.sort_by_key(|spawn| spawn.spawn_at);
    Ok(spawns)
}

fn convert(index: usize, record: ScheduleRecord) -> Option<EnemySpawn> {
    let Some(kind) = parse_kind(&record.kind) else {
        warn!(index, kind = %record.kind, "dropping schedule entry with unknown type");
        return None;
    };
    let Ok(spawn_at) = Duration::try_from_secs_f64(record.spawn_time) else {
        warn!(index, spawn_time = record.spawn_time, "dropping schedule entry with invalid time");
        return None;
    };
    // Enemies outside the map height would never reach the wall.
    if !(0.0..=f64::from(LOGICAL_HEIGHT)).contains(&record.y) {
        warn!(index, y = record.y, "dropping schedule entry outside the map");
        return None;
    }

    Some(EnemySpawn::new(spawn_at, kind, record.y))
}

fn parse_kind(value: &str) -> Option<EnemyKind> {
    match value {
        "VAN" => Some(EnemyKind::Van),
        "PICKUP" => Some(EnemyKind::Pickup),
        _ => None,
    }
}

/// Schedule used when no file is provided: three short waves on alternating lanes.
#[must_use]
pub(crate) fn default_schedule() -> Vec<EnemySpawn> {
    const WAVES: [(u64, EnemyKind); 3] = [
        (5_000, EnemyKind::Van),
        (30_000, EnemyKind::Pickup),
        (55_000, EnemyKind::Van),
    ];
    const LANES: [f64; 4] = [100.0, 325.0, 550.0, 775.0];

    WAVES
        .iter()
        .flat_map(|&(start, kind)| {
            LANES.iter().enumerate().map(move |(offset, &lane)| {
                EnemySpawn::new(
                    Duration::from_millis(start + 2_000 * offset as u64),
                    kind,
                    lane,
                )
            })
        })
        .collect()
}

//! Schedule file persistence.
//!
//! The file is one JSON object mapping `MM/DD/YYYY` to that day's shifts,
//! written in date order with 4-space indentation. Loading checks only what
//! deserialization needs.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, info};

use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::week::Week;

/// Read a week from `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Week, PlannerError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| PlannerError::Storage(format!("reading {}: {}", path.display(), e)))?;
    from_json(&content)
        .map_err(|e| PlannerError::Storage(format!("parsing {}: {}", path.display(), e)))
}

/// Write `week` to `path`, replacing any existing file.
pub fn save(path: impl AsRef<Path>, week: &Week) -> Result<(), PlannerError> {
    let path = path.as_ref();
    let json = to_json(week)?;
    fs::write(path, json)
        .map_err(|e| PlannerError::Storage(format!("writing {}: {}", path.display(), e)))?;
    debug!(path = %path.display(), days = week.len(), "saved schedule");
    Ok(())
}

/// Open the schedule at `path` for the week around `today`.
///
/// A missing file is created with a fresh week. An existing file is loaded,
/// reconciled onto the current week and written back.
pub fn load_or_create(
    path: impl AsRef<Path>,
    today: NaiveDate,
    config: &PlannerConfig,
) -> Result<Week, PlannerError> {
    let path = path.as_ref();
    let week = if path.exists() {
        Week::reconcile(load(path)?, today, config)?
    } else {
        info!(path = %path.display(), "no schedule file, starting a new week");
        Week::current(today, config)?
    };
    save(path, &week)?;
    Ok(week)
}

/// Serialize a week in the schedule file layout.
pub fn to_json(week: &Week) -> Result<String, PlannerError> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    week.serialize(&mut ser)
        .map_err(|e| PlannerError::Storage(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| PlannerError::Storage(e.to_string()))
}

/// Parse a week from the schedule file layout.
pub fn from_json(json: &str) -> Result<Week, PlannerError> {
    serde_json::from_str(json).map_err(|e| PlannerError::Storage(e.to_string()))
}

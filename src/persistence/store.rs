use super::SheetSnapshot;
use crate::errors::{RestoreError, RestoreResult, SheetError, SheetResult};
use crate::party::PartyState;
use crate::persistence::normalize::coerce_number;
use crate::rules::RuleTables;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const EXPORT_FORMAT: &str = "pokemon-trainer-sheet";
pub const EXPORT_FORMAT_VERSION: u32 = 1;

const MAX_FILE_STEM_LEN: usize = 64;

/// A saved sheet wrapped for sharing as a standalone file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub export_format: String,
    pub export_format_version: u32,
    pub exported_at: String,
    pub state: SheetSnapshot,
}

impl ExportEnvelope {
    pub fn new(party: &PartyState) -> Self {
        Self::at(party, Utc::now())
    }

    pub fn at(party: &PartyState, now: DateTime<Utc>) -> Self {
        Self {
            export_format: EXPORT_FORMAT.to_string(),
            export_format_version: EXPORT_FORMAT_VERSION,
            exported_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            state: party.snapshot_at(now),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Accept either an export envelope or a bare saved payload. Envelopes
/// from another format or format version are refused.
pub fn unwrap_import(raw: &Value) -> RestoreResult<&Value> {
    let Some(object) = raw.as_object() else {
        return Err(RestoreError::NotAnObject);
    };

    let Some(state) = object.get("state").filter(|state| state.is_object()) else {
        return Ok(raw);
    };

    if let Some(format) = object.get("exportFormat").filter(|f| is_truthy(f)) {
        if format.as_str() != Some(EXPORT_FORMAT) {
            return Err(RestoreError::ForeignFormat(
                format.as_str().map_or_else(|| format.to_string(), str::to_string),
            ));
        }
    }
    if let Some(version) = object.get("exportFormatVersion").filter(|v| !v.is_null()) {
        if coerce_number(version) != Some(EXPORT_FORMAT_VERSION as f64) {
            return Err(RestoreError::ForeignFormatVersion(version.to_string()));
        }
    }
    Ok(state)
}

/// File-system safe stem: runs of other characters become `_`, edge
/// underscores are trimmed and the result is capped at 64 characters.
pub fn sanitize_export_filename(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut in_run = false;
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
            cleaned.push(ch);
            in_run = false;
        } else if !in_run {
            cleaned.push('_');
            in_run = true;
        }
    }

    let stem: String = cleaned
        .trim_matches('_')
        .chars()
        .take(MAX_FILE_STEM_LEN)
        .collect();
    if stem.is_empty() {
        "sheet".to_string()
    } else {
        stem
    }
}

/// `{trainer}-sheet.json`. A blank trainer name gives `sheet-sheet.json`.
pub fn export_file_name(trainer_name: &str) -> String {
    format!("{}-sheet.json", sanitize_export_filename(trainer_name))
}

/// Parse an imported file and restore it into `party`.
pub fn import_sheet(text: &str, party: &mut PartyState, tables: &RuleTables) -> SheetResult<()> {
    let raw: Value =
        serde_json::from_str(text).map_err(|err| RestoreError::Parse(err.to_string()))?;
    let payload = unwrap_import(&raw).map_err(|err| {
        tracing::warn!(error = %err, "Rejected imported sheet");
        err
    })?;
    party.restore(payload, tables)
}

/// The on-disk save slot.
#[derive(Debug, Clone)]
pub struct SheetStore {
    path: PathBuf,
}

impl SheetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The saved payload, if the file exists and parses.
    pub fn read(&self) -> Option<Value> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "Could not read saved sheet");
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "Saved sheet is not valid JSON");
                None
            }
        }
    }

    /// Restore the saved sheet into `party`. Returns false when there was
    /// nothing usable to load; a rejected payload leaves `party` as it was.
    pub fn load_into(&self, party: &mut PartyState, tables: &RuleTables) -> bool {
        let Some(payload) = self.read() else {
            return false;
        };
        match party.restore(&payload, tables) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "Ignoring saved sheet");
                false
            }
        }
    }

    /// Write the party. Skipped while a restore is in flight.
    pub fn save(&self, party: &PartyState) -> SheetResult<bool> {
        if party.is_restoring() {
            return Ok(false);
        }
        let json = serde_json::to_string_pretty(&party.snapshot())?;
        write_file(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), "Saved sheet");
        Ok(true)
    }
}

/// Write an export envelope. A directory target gets the default file name
/// for the trainer.
pub fn write_export(target: &Path, party: &PartyState) -> SheetResult<PathBuf> {
    let path = if target.is_dir() {
        target.join(export_file_name(&party.trainer.trainer_name))
    } else {
        target.to_path_buf()
    };
    let json = serde_json::to_string_pretty(&ExportEnvelope::new(party))?;
    write_file(&path, &json)?;
    Ok(path)
}

fn write_file(path: &Path, contents: &str) -> SheetResult<()> {
    fs::write(path, contents).map_err(|source| SheetError::Storage {
        path: path.to_path_buf(),
        source,
    })
}

//! The inventory record submitted to the service.
//!
//! One explicit struct instead of a string-keyed map; wire field names are
//! the Portuguese ones the inventory service expects.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Timestamp format used by the inventory service for `dataColeta`.
pub const COLLECTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Combined hardware + operator data. Hardware fields are always present
/// (placeholder strings on read failure); operator fields stay `None` until
/// the form completes; `collected_at` is stamped at submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(rename = "usuarioLogado")]
    pub logged_user: String,

    #[serde(rename = "nomeDispositivo")]
    pub device_name: String,

    #[serde(rename = "processador")]
    pub processor: String,

    #[serde(rename = "disco")]
    pub disk: String,

    #[serde(rename = "ram")]
    pub ram: String,

    #[serde(rename = "monitores")]
    pub monitors: Vec<String>,

    #[serde(rename = "sistemaOperacional")]
    pub operating_system: String,

    #[serde(rename = "secretaria", skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(rename = "setor", skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,

    #[serde(rename = "matricula", skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,

    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub operator_name: Option<String>,

    #[serde(rename = "observacoes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(rename = "dataColeta", skip_serializing_if = "Option::is_none")]
    pub collected_at: Option<String>,
}

impl InventoryRecord {
    /// Merge operator-entered fields into the record. Empty notes stay `None`
    /// so the field is omitted from the wire payload.
    pub fn apply_operator(&mut self, operator: &OperatorInfo) {
        self.department = Some(operator.department.clone());
        self.sector = Some(operator.sector.clone());
        self.employee_id = Some(operator.employee_id.clone());
        self.operator_name = Some(operator.name.clone());
        let notes = operator.notes.trim();
        self.notes = (!notes.is_empty()).then(|| notes.to_string());
    }

    /// Stamp the collection timestamp. Called by the orchestrator at
    /// submission time, never during hardware collection.
    pub fn stamp_collected_at(&mut self, now: DateTime<Local>) {
        self.collected_at = Some(now.format(COLLECTED_AT_FORMAT).to_string());
    }

    /// Dump the record as pretty JSON to a temp file when `COLETOR_DEBUG_DUMP`
    /// is set. Returns the path written, `None` when the toggle is off.
    pub fn maybe_debug_dump(&self) -> Result<Option<PathBuf>> {
        if !debug_dump_enabled() {
            return Ok(None);
        }
        let path = std::env::temp_dir().join("hardware_data.json");
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize record to JSON")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write debug dump to {}", path.display()))?;
        tracing::info!(path = %path.display(), "debug dump written");
        Ok(Some(path))
    }
}

fn debug_dump_enabled() -> bool {
    matches!(
        std::env::var("COLETOR_DEBUG_DUMP").as_deref(),
        Ok("1") | Ok("true") | Ok("yes") | Ok("on")
    )
}

/// Operator-entered form data. All fields except notes are required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorInfo {
    pub department: String,
    pub sector: String,
    pub employee_id: String,
    pub name: String,
    pub notes: String,
}

impl OperatorInfo {
    /// Validate required fields. Returns the list of messages to show inline;
    /// empty means the form may be submitted.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for (value, label) in [
            (&self.department, "Secretaria"),
            (&self.sector, "Setor"),
            (&self.employee_id, "Matrícula"),
            (&self.name, "Nome"),
        ] {
            if value.trim().is_empty() {
                issues.push(format!("{label} é um campo obrigatório."));
            }
        }
        issues
    }
}

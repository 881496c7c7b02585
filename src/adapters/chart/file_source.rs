//! File Size Chart Source - Size charts stored as JSON or YAML documents.
//!
//! # Document Shape
//!
//! ```yaml
//! unit: in          # cm (default) or in
//! entries:
//!   - { size: S, chest: 38, length: 27, shoulder: 17, waist: 32 }
//!   - { size: M, chest: 40, length: 28, shoulder: 18 }
//! ```
//!
//! A bare list of entries is also accepted and read as centimeters.
//!
//! Rows are read one at a time: a row with a wrong-typed value is excluded
//! like an incomplete one, and the rest of the chart is still scored.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::domain::fit::{ChartIntake, ChartUnit, RawSizeChartEntry};
use crate::domain::foundation::ValidationError;
use crate::ports::{ChartSourceError, SizeChartSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChartFormat {
    Json,
    Yaml,
}

impl ChartFormat {
    fn from_path(path: &Path) -> Result<Self, ChartSourceError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") => Ok(ChartFormat::Json),
            Some("yaml") | Some("yml") => Ok(ChartFormat::Yaml),
            _ => Err(ChartSourceError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Size chart source reading documents from the filesystem.
///
/// Relative locations resolve against the base directory when one is set.
#[derive(Debug, Clone, Default)]
pub struct FileSizeChartSource {
    base_dir: Option<PathBuf>,
}

impl FileSizeChartSource {
    /// Creates a source resolving locations as given.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source resolving relative locations against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, location: &str) -> PathBuf {
        let path = PathBuf::from(location);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        }
    }

    /// Parses chart text in the given format.
    fn parse(text: &str, format: ChartFormat, location: &str) -> Result<ChartIntake, ChartSourceError> {
        let document: Value = match format {
            ChartFormat::Json => serde_json::from_str(text)
                .map_err(|e| ChartSourceError::malformed(location, e.to_string()))?,
            ChartFormat::Yaml => serde_yaml::from_str(text)
                .map_err(|e| ChartSourceError::malformed(location, e.to_string()))?,
        };

        let (unit, rows) = match document {
            Value::Array(rows) => (ChartUnit::Cm, rows),
            Value::Object(mut fields) => {
                let unit = match fields.remove("unit") {
                    None | Some(Value::Null) => ChartUnit::Cm,
                    Some(unit) => serde_json::from_value(unit).map_err(|e| {
                        ChartSourceError::malformed(location, format!("unit: {}", e))
                    })?,
                };
                match fields.remove("entries") {
                    Some(Value::Array(rows)) => (unit, rows),
                    _ => {
                        return Err(ChartSourceError::malformed(
                            location,
                            "expected an `entries` list",
                        ))
                    }
                }
            }
            _ => {
                return Err(ChartSourceError::malformed(
                    location,
                    "expected a list of entries or an object with `entries`",
                ))
            }
        };

        let mut intake = ChartIntake::default();
        for (index, row) in rows.into_iter().enumerate() {
            let label = row_label(&row);
            match serde_json::from_value::<RawSizeChartEntry>(row) {
                Ok(raw) => intake.push_row(index, raw, unit),
                Err(e) => intake.push_excluded(
                    index,
                    label,
                    ValidationError::invalid_format("row", e.to_string()),
                ),
            }
        }
        Ok(intake)
    }
}

/// Best-effort label of a row that failed to read.
fn row_label(row: &Value) -> Option<String> {
    match row.get("size")? {
        Value::String(label) => Some(label.clone()),
        Value::Number(label) => Some(label.to_string()),
        _ => None,
    }
}

#[async_trait]
impl SizeChartSource for FileSizeChartSource {
    async fn load_chart(&self, location: &str) -> Result<ChartIntake, ChartSourceError> {
        let path = self.resolve(location);
        let format = ChartFormat::from_path(&path)?;
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ChartSourceError::Io {
                location: path.display().to_string(),
                source,
            })?;

        let intake = Self::parse(&text, format, location)?;

        for excluded in &intake.excluded {
            warn!(
                chart = %location,
                row = excluded.index,
                size = excluded.size.as_deref().unwrap_or("<unlabelled>"),
                reason = %excluded.reason,
                "Excluding incomplete size chart row"
            );
        }
        debug!(
            chart = %location,
            entries = intake.entries.len(),
            excluded = intake.excluded.len(),
            "Loaded size chart"
        );

        Ok(intake)
    }
}

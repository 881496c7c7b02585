//! Size chart entries and intake of raw manufacturer rows.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::foundation::ValidationError;
use crate::domain::measurement::units::inches_to_cm;

/// One size of one garment, in centimeters.
///
/// Deserialization runs through the same validation as [`SizeChartEntry::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSizeChartEntry")]
pub struct SizeChartEntry {
    size: String,
    chest: f64,
    length: f64,
    shoulder: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    waist: Option<f64>,
}

impl SizeChartEntry {
    /// Creates a validated entry. The label must be non-blank and every
    /// measurement positive.
    pub fn new(
        size: impl Into<String>,
        chest: f64,
        length: f64,
        shoulder: f64,
        waist: Option<f64>,
    ) -> Result<Self, ValidationError> {
        let size = size.into();
        if size.trim().is_empty() {
            return Err(ValidationError::empty_field("size"));
        }
        let waist = match waist {
            Some(w) => Some(ValidationError::require_positive("waist", w)?),
            None => None,
        };
        Ok(Self {
            size,
            chest: ValidationError::require_positive("chest", chest)?,
            length: ValidationError::require_positive("length", length)?,
            shoulder: ValidationError::require_positive("shoulder", shoulder)?,
            waist,
        })
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn chest(&self) -> f64 {
        self.chest
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn shoulder(&self) -> f64 {
        self.shoulder
    }

    pub fn waist(&self) -> Option<f64> {
        self.waist
    }
}

impl TryFrom<RawSizeChartEntry> for SizeChartEntry {
    type Error = ValidationError;

    fn try_from(raw: RawSizeChartEntry) -> Result<Self, Self::Error> {
        raw.into_entry(ChartUnit::Cm)
    }
}

/// Unit a raw chart was published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartUnit {
    #[default]
    Cm,
    #[serde(alias = "inch", alias = "inches")]
    In,
}

impl ChartUnit {
    fn to_cm(self, value: f64) -> f64 {
        match self {
            ChartUnit::Cm => value,
            ChartUnit::In => inches_to_cm(value),
        }
    }
}

/// A chart row as supplied by the catalog, before validation.
///
/// Size labels are opaque: a bare number such as EU `38` is read as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSizeChartEntry {
    #[serde(default, deserialize_with = "size_label")]
    pub size: Option<String>,
    #[serde(default)]
    pub chest: Option<f64>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub shoulder: Option<f64>,
    #[serde(default)]
    pub waist: Option<f64>,
}

fn size_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Integer(i64),
        Decimal(f64),
    }

    Ok(Option::<Label>::deserialize(deserializer)?.map(|label| match label {
        Label::Text(text) => text,
        Label::Integer(n) => n.to_string(),
        Label::Decimal(n) => n.to_string(),
    }))
}

impl RawSizeChartEntry {
    /// Validates the row, converting from `unit` to centimeters.
    pub fn into_entry(self, unit: ChartUnit) -> Result<SizeChartEntry, ValidationError> {
        let size = self.size.ok_or_else(|| ValidationError::empty_field("size"))?;
        let chest = self.chest.ok_or_else(|| ValidationError::empty_field("chest"))?;
        let length = self.length.ok_or_else(|| ValidationError::empty_field("length"))?;
        let shoulder = self
            .shoulder
            .ok_or_else(|| ValidationError::empty_field("shoulder"))?;

        SizeChartEntry::new(
            size,
            unit.to_cm(chest),
            unit.to_cm(length),
            unit.to_cm(shoulder),
            self.waist.map(|w| unit.to_cm(w)),
        )
    }
}

/// A raw row that was left out of scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedEntry {
    /// Position of the row in the raw chart.
    pub index: usize,
    /// Label of the row, if it had one.
    pub size: Option<String>,
    pub reason: ValidationError,
}

/// Result of validating a raw chart: usable entries plus the rows dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartIntake {
    pub entries: Vec<SizeChartEntry>,
    pub excluded: Vec<ExcludedEntry>,
}

impl ChartIntake {
    /// Validates every row independently, preserving chart order.
    ///
    /// An incomplete row never fails the whole chart.
    pub fn from_rows(rows: Vec<RawSizeChartEntry>, unit: ChartUnit) -> Self {
        let mut intake = ChartIntake::default();
        for (index, row) in rows.into_iter().enumerate() {
            intake.push_row(index, row, unit);
        }
        intake
    }

    /// Validates one row, adding it as an entry or an exclusion.
    pub fn push_row(&mut self, index: usize, row: RawSizeChartEntry, unit: ChartUnit) {
        let size = row.size.clone();
        match row.into_entry(unit) {
            Ok(entry) => self.entries.push(entry),
            Err(reason) => self.push_excluded(index, size, reason),
        }
    }

    /// Records a row that could not be read at all.
    pub fn push_excluded(&mut self, index: usize, size: Option<String>, reason: ValidationError) {
        self.excluded.push(ExcludedEntry {
            index,
            size,
            reason,
        });
    }

    pub fn is_complete(&self) -> bool {
        self.excluded.is_empty()
    }
}

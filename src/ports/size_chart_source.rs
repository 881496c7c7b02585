//! Size Chart Source Port - Where garment size charts come from.

use async_trait::async_trait;

use crate::domain::fit::ChartIntake;

/// Port for reading a garment's size chart.
///
/// Implementations validate every row and report incomplete or unreadable
/// rows in the returned intake rather than failing the whole chart.
#[async_trait]
pub trait SizeChartSource: Send + Sync {
    /// Loads the chart identified by `location`.
    async fn load_chart(&self, location: &str) -> Result<ChartIntake, ChartSourceError>;
}

/// Size chart source errors.
#[derive(Debug, thiserror::Error)]
pub enum ChartSourceError {
    /// The chart could not be read.
    #[error("failed to read size chart {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// The chart document is malformed.
    #[error("malformed size chart {location}: {message}")]
    Malformed { location: String, message: String },

    /// The document format is not recognised.
    #[error("unsupported size chart format: {0}")]
    UnsupportedFormat(String),
}

impl ChartSourceError {
    /// Creates a malformed chart error.
    pub fn malformed(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            location: location.into(),
            message: message.into(),
        }
    }
}

//! Size chart adapters - Implementations of the SizeChartSource port.

mod file_source;

pub use file_source::FileSizeChartSource;

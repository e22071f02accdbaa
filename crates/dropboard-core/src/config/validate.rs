//! Configuration validation with range checks.

use crate::accept::AcceptFilter;
use crate::error::ConfigError;
use crate::output::OutputFormat;

use super::Config;

/// Largest `limits.max_file_size_mb` whose byte count still fits in a `u64`.
pub const MAX_FILE_SIZE_MB: u64 = u64::MAX / (1024 * 1024);

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if AcceptFilter::parse(&self.ingest.accept).is_empty() {
            return Err(ConfigError::ValidationError(
                "ingest.accept must name at least one media type or extension".into(),
            ));
        }
        if self.ingest.max_concurrent_decodes == 0 {
            return Err(ConfigError::ValidationError(
                "ingest.max_concurrent_decodes must be > 0".into(),
            ));
        }
        if self.board.command_buffer == 0 {
            return Err(ConfigError::ValidationError(
                "board.command_buffer must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb > MAX_FILE_SIZE_MB {
            return Err(ConfigError::ValidationError(format!(
                "limits.max_file_size_mb must be <= {}",
                MAX_FILE_SIZE_MB
            )));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.thumbnail.size == 0 {
            return Err(ConfigError::ValidationError(
                "thumbnail.size must be > 0".into(),
            ));
        }
        if OutputFormat::parse(&self.output.format).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be \"json\" or \"jsonl\", got {:?}",
                self.output.format
            )));
        }
        Ok(())
    }
}

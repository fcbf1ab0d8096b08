use std::path::PathBuf;

use konfig::{fields, Pass};
use tracing::warn;
use tracing_subscriber::EnvFilter;


const DEFAULT_CONSOLE_OUTPUT_LEVEL_FILTER: &str = "info";
const DEFAULT_LOG_FILE_OUTPUT_LEVEL_FILTER: &str = "debug";


#[derive(Clone, Debug)]
pub struct LoggingConfiguration {
    pub console_output_level_filter: String,

    pub log_file_output_level_filter: String,

    pub log_file_output_directory: PathBuf,
}

impl Default for LoggingConfiguration {
    fn default() -> Self {
        Self {
            console_output_level_filter: DEFAULT_CONSOLE_OUTPUT_LEVEL_FILTER.to_string(),
            log_file_output_level_filter: DEFAULT_LOG_FILE_OUTPUT_LEVEL_FILTER.to_string(),
            log_file_output_directory: PathBuf::from("data/logs"),
        }
    }
}

impl LoggingConfiguration {
    /// Section body for `[logging]`. Fails if either level filter does not parse.
    pub(super) fn fields(&mut self, pass: &mut Pass<'_>) -> bool {
        let all_fields_processed = fields!(
            pass,
            self => console_output_level_filter, log_file_output_level_filter, log_file_output_directory
        );

        all_fields_processed && self.level_filters_are_valid()
    }

    fn level_filters_are_valid(&self) -> bool {
        let filters = [
            ("console_output_level_filter", &self.console_output_level_filter),
            ("log_file_output_level_filter", &self.log_file_output_level_filter),
        ];

        let mut all_valid = true;
        for (field_name, filter) in filters {
            if let Err(error) = EnvFilter::try_new(filter) {
                warn!("Failed to parse field {field_name} ({filter:?}): {error}");
                all_valid = false;
            }
        }

        all_valid
    }

    /// Falls back to the default filter if the configured one is invalid.
    pub fn console_output_level_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.console_output_level_filter)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_CONSOLE_OUTPUT_LEVEL_FILTER))
    }

    /// Falls back to the default filter if the configured one is invalid.
    pub fn log_file_output_level_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_file_output_level_filter)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILE_OUTPUT_LEVEL_FILTER))
    }
}

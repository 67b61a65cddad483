//! `[output]` section: how the reconciliation report is printed

use megaverse_domain::OutputFormat;
use serde::{Deserialize, Serialize};

/// Report rendering settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Report format; `None` means the summary view
    pub format: Option<OutputFormat>,
    /// ANSI colors in the report and progress output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// Format the report is rendered in
    pub fn report_format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    /// Colors stay on only if neither the file nor `--no-color` disabled them
    pub fn color_enabled(&self, no_color_flag: bool) -> bool {
        self.color && !no_color_flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;

    #[test]
    fn test_report_format_defaults_to_summary() {
        assert_eq!(
            FileOutputConfig::default().report_format(),
            OutputFormat::Summary
        );

        let config: FileConfig = toml::from_str("[output]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.output.report_format(), OutputFormat::Json);
    }

    #[test]
    fn test_color_disabled_by_file_or_flag() {
        let config: FileConfig = toml::from_str("[output]\ncolor = false\n").unwrap();
        assert!(!config.output.color_enabled(false));

        let output = FileOutputConfig::default();
        assert!(output.color_enabled(false));
        assert!(!output.color_enabled(true));
    }
}

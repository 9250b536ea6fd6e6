//! Configuration schema types for `pixelmatch.toml`

use serde::{Deserialize, Serialize};

use crate::options::Options;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "pixelmatch.toml";

/// Root of a `pixelmatch.toml` file.
///
/// ```toml
/// [options]
/// threshold = 0.05
/// diff_color = "#FF00FF"
/// diff_mask = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PixelmatchConfig {
    /// Default comparison options
    pub options: Options,
}

impl PixelmatchConfig {
    /// Validate the configuration, returning a list of problems.
    pub fn validate(&self) -> Vec<String> {
        self.options.validate().into_iter().map(|e| format!("options.{e}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn test_empty_config_is_default() {
        let config: PixelmatchConfig = toml::from_str("").unwrap();
        assert_eq!(config, PixelmatchConfig::default());
    }

    #[test]
    fn test_options_table() {
        let config: PixelmatchConfig = toml::from_str(
            r#"
[options]
threshold = 0.05
include_aa = true
aa_color = "rgb(0, 192, 0)"
diff_color_alt = "lime"
"#,
        )
        .unwrap();
        assert_eq!(config.options.threshold, 0.05);
        assert!(config.options.include_aa);
        assert_eq!(config.options.aa_color, Color::rgba(0, 192, 0, 255));
        assert_eq!(config.options.diff_color_alt, Some(Color::rgba(0, 255, 0, 255)));
    }

    #[test]
    fn test_validate_prefixes_field_path() {
        let mut config = PixelmatchConfig::default();
        config.options.threshold = 2.0;
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("options.threshold"));
    }
}

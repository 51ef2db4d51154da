//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::types::{MAX_RESULT_CATEGORIES, MAX_RESULT_TAGS};

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.tagging.image_size == 0 {
            return Err(ConfigError::ValidationError(
                "tagging.image_size must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.tagging.confidence_threshold) {
            return Err(ConfigError::ValidationError(
                "tagging.confidence_threshold must be between 0.0 and 1.0".into(),
            ));
        }
        if !(1..=MAX_RESULT_TAGS).contains(&self.tagging.max_tags) {
            return Err(ConfigError::ValidationError(format!(
                "tagging.max_tags must be between 1 and {MAX_RESULT_TAGS}"
            )));
        }
        if self.classifier.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "classifier.top_n must be > 0".into(),
            ));
        }
        if !(1..=MAX_RESULT_CATEGORIES).contains(&self.classifier.max_categories) {
            return Err(ConfigError::ValidationError(format!(
                "classifier.max_categories must be between 1 and {MAX_RESULT_CATEGORIES}"
            )));
        }
        if !(0.0..=2.0).contains(&self.classifier.temperature) {
            return Err(ConfigError::ValidationError(
                "classifier.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.llm_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.llm_timeout_ms must be > 0".into(),
            ));
        }
        if self.llm.openai.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.openai.endpoint must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_top_n() {
        let mut config = Config::default();
        config.classifier.top_n = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("top_n"));
    }

    #[test]
    fn test_validate_rejects_zero_max_categories() {
        let mut config = Config::default();
        config.classifier.max_categories = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_categories"));
    }

    #[test]
    fn test_validate_rejects_oversized_result_limits() {
        let mut config = Config::default();
        config.tagging.max_tags = 11;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_tags"));

        let mut config = Config::default();
        config.classifier.max_categories = 3;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_categories"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.limits.decode_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("decode_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_invalid_threshold() {
        let mut config = Config::default();
        config.tagging.confidence_threshold = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("confidence_threshold"));

        config.tagging.confidence_threshold = -0.1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("confidence_threshold"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_temperature() {
        let mut config = Config::default();
        config.classifier.temperature = 3.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }
}

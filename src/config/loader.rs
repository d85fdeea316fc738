//! Policy configuration loading.
//!
//! This module provides the [`PolicyLoader`] type for loading the policy
//! configuration from a YAML file and validating it.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult};

use super::types::PolicyConfig;

/// Loads and validates the policy configuration.
///
/// # Example
///
/// ```no_run
/// use roster_core::config::PolicyLoader;
///
/// let policy = PolicyLoader::load("./config/policy.yaml").unwrap();
/// println!("full day at {} hours", policy.attendance.full_day_hours);
/// ```
#[derive(Debug, Clone)]
pub struct PolicyLoader;

impl PolicyLoader {
    /// Loads the policy configuration from the specified YAML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the policy file (e.g. "./config/policy.yaml")
    ///
    /// # Returns
    ///
    /// Returns the validated [`PolicyConfig`] on success, or an error if:
    /// - The file is missing
    /// - The file contains invalid YAML or is missing required fields
    /// - The attendance thresholds are not ordered `0 < half < full`
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<PolicyConfig> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| CoreError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config: PolicyConfig =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParse {
                path: path_str.clone(),
                message: e.to_string(),
            })?;

        Self::validate(&config, &path_str)?;
        Ok(config)
    }

    /// Checks that the loaded thresholds make sense.
    fn validate(config: &PolicyConfig, path: &str) -> CoreResult<()> {
        let half = config.attendance.half_day_hours;
        let full = config.attendance.full_day_hours;

        if half <= Decimal::ZERO {
            return Err(CoreError::ConfigParse {
                path: path.to_string(),
                message: format!("half_day_hours must be positive, got {half}"),
            });
        }
        if half >= full {
            return Err(CoreError::ConfigParse {
                path: path.to_string(),
                message: format!(
                    "half_day_hours ({half}) must be less than full_day_hours ({full})"
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DayCountRule, OverfillRule};
    use std::str::FromStr;

    fn policy_path() -> &'static str {
        "./config/policy.yaml"
    }

    #[test]
    fn test_load_shipped_policy() {
        let result = PolicyLoader::load(policy_path());
        assert!(result.is_ok(), "Failed to load policy: {:?}", result.err());

        let policy = result.unwrap();
        assert_eq!(
            policy.attendance.full_day_hours,
            Decimal::from_str("8.0").unwrap()
        );
        assert_eq!(
            policy.attendance.half_day_hours,
            Decimal::from_str("4.0").unwrap()
        );
        assert_eq!(policy.leave.day_count_rule, DayCountRule::CalendarInclusive);
        assert_eq!(policy.coverage.overfill, OverfillRule::Reject);
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = PolicyLoader::load("/nonexistent/policy.yaml");
        match result {
            Err(CoreError::ConfigNotFound { path }) => {
                assert!(path.contains("policy.yaml"));
            }
            other => panic!("Expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let yaml = r#"
attendance:
  full_day_hours: "4.0"
  half_day_hours: "8.0"
leave:
  day_count_rule: calendar_inclusive
coverage:
  overfill: reject
"#;
        let config: PolicyConfig = serde_yaml::from_str(yaml).unwrap();
        let result = PolicyLoader::validate(&config, "inline");
        assert!(matches!(result, Err(CoreError::ConfigParse { .. })));
    }

    #[test]
    fn test_zero_half_day_rejected() {
        let yaml = r#"
attendance:
  full_day_hours: "8.0"
  half_day_hours: "0"
leave:
  day_count_rule: calendar_inclusive
coverage:
  overfill: reject
"#;
        let config: PolicyConfig = serde_yaml::from_str(yaml).unwrap();
        let result = PolicyLoader::validate(&config, "inline");
        assert!(matches!(result, Err(CoreError::ConfigParse { .. })));
    }
}

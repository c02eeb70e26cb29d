//! Validation helpers shared by every config section

pub use crate::error::ValidationError;

/// A config section that can validate and merge itself
///
/// New sections plug into `Config` without changes to the others.
pub trait ConfigSection: Default {
    /// Returns every problem found, or `Ok` when the section is usable
    fn validate(&self) -> Result<(), Vec<ValidationError>>;

    /// Merges another section into this one, `other` wins
    fn merge(&mut self, other: Self);

    /// Section name as it appears in the TOML file
    fn section_name(&self) -> &'static str;
}

/// Common validators for config values
pub struct Validator;

impl Validator {
    /// Validates that a numeric value is within an inclusive range
    pub fn in_range<T>(value: T, min: T, max: T, field: &str) -> Result<(), ValidationError>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            Err(ValidationError::with_value(
                field,
                format!("must be between {} and {}", min, max),
                value,
            ))
        } else {
            Ok(())
        }
    }

    pub fn not_empty(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(ValidationError::new(field, "must not be empty"))
        } else {
            Ok(())
        }
    }

    /// Validates that a value is one of the allowed options
    pub fn one_of<T>(value: &T, allowed: &[T], field: &str) -> Result<(), ValidationError>
    where
        T: PartialEq + std::fmt::Display,
    {
        if !allowed.contains(value) {
            let allowed_str = allowed
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Err(ValidationError::with_value(
                field,
                format!("must be one of: {}", allowed_str),
                value,
            ))
        } else {
            Ok(())
        }
    }

    /// Validates that a string contains every required fragment
    pub fn contains_all(value: &str, required: &[&str], field: &str) -> Result<(), ValidationError> {
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|part| !value.contains(part))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::with_value(
                field,
                format!("must contain {}", missing.join(" and ")),
                value,
            ))
        }
    }

    /// Collects multiple validation results into a single result
    pub fn collect_errors(
        results: Vec<Result<(), ValidationError>>,
    ) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = results.into_iter().filter_map(|r| r.err()).collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_bounds_are_inclusive() {
        assert!(Validator::in_range(0.5, 0.5, 2.0, "rate").is_ok());
        assert!(Validator::in_range(2.0, 0.5, 2.0, "rate").is_ok());
        assert!(Validator::in_range(2.01, 0.5, 2.0, "rate").is_err());
    }

    #[test]
    fn test_not_empty() {
        assert!(Validator::not_empty("ar.alafasy", "test").is_ok());
        assert!(Validator::not_empty("   ", "test").is_err());
    }

    #[test]
    fn test_one_of() {
        let allowed = ["none", "en.walk", "ur.khan"];
        assert!(Validator::one_of(&"en.walk", &allowed, "test").is_ok());

        let err = Validator::one_of(&"ur.jalandhry", &allowed, "test").unwrap_err();
        assert_eq!(err.value.as_deref(), Some("ur.jalandhry"));
        assert!(err.message.contains("none, en.walk, ur.khan"));
    }

    #[test]
    fn test_contains_all_reports_missing_parts() {
        let ok = Validator::contains_all("{narrator}/{verse}", &["{narrator}", "{verse}"], "t");
        assert!(ok.is_ok());

        let err = Validator::contains_all("/audio/{verse}", &["{narrator}", "{verse}"], "t")
            .unwrap_err();
        assert_eq!(err.message, "must contain {narrator}");
    }

    #[test]
    fn test_collect_errors_some_err() {
        let results = vec![
            Ok(()),
            Err(ValidationError::new("field1", "error1")),
            Ok(()),
            Err(ValidationError::new("field2", "error2")),
        ];
        let result = Validator::collect_errors(results);
        assert_eq!(result.unwrap_err().len(), 2);
    }
}

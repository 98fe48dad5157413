//! Configuration validation errors and semantic validation.

use crate::analysis::AnalysisConfig;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

impl From<ValidationError> for rt_common::Error {
    fn from(err: ValidationError) -> Self {
        rt_common::Error::InvalidConfig(err.to_string())
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Validate an analysis configuration semantically.
pub fn validate_analysis(cfg: &AnalysisConfig) -> ValidationResult<()> {
    if !rt_common::schema::is_compatible(&cfg.schema_version) {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: cfg.schema_version.clone(),
        });
    }

    if cfg.outlier_window < 2 {
        return Err(invalid(
            "outlier_window",
            format!("must be at least 2, got {}", cfg.outlier_window),
        ));
    }

    if !cfg.outlier_threshold.is_finite() || cfg.outlier_threshold <= 0.0 {
        return Err(invalid(
            "outlier_threshold",
            format!("must be positive, got {}", cfg.outlier_threshold),
        ));
    }

    let w = &cfg.confidence;
    for (name, value) in [
        ("confidence.points", w.points),
        ("confidence.span", w.span),
        ("confidence.gain_fit", w.gain_fit),
        ("confidence.cost_fit", w.cost_fit),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(name, format!("must be non-negative, got {}", value)));
        }
    }

    // Weights must sum to one so confidence stays within [0, 1].
    if (w.total() - 1.0).abs() > 1e-6 {
        return Err(ValidationError::SemanticError(format!(
            "Confidence weights must sum to 1.0, got {} (points={}, span={}, gain_fit={}, cost_fit={})",
            w.total(),
            w.points,
            w.span,
            w.gain_fit,
            w.cost_fit,
        )));
    }

    if w.saturation == 0 {
        return Err(invalid("confidence.saturation", "must be at least 1"));
    }

    let tol = &cfg.totals_tolerance;
    if !(tol.absolute >= 0.0 && tol.relative >= 0.0) {
        return Err(invalid(
            "totals_tolerance",
            format!(
                "bounds must be non-negative, got absolute={} relative={}",
                tol.absolute, tol.relative
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        validate_analysis(&AnalysisConfig::default()).unwrap();
    }

    #[test]
    fn rejects_tiny_window() {
        let mut cfg = AnalysisConfig::default();
        cfg.outlier_window = 1;
        let err = validate_analysis(&cfg).unwrap_err();
        assert_eq!(err.code(), 65);
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let mut cfg = AnalysisConfig::default();
        cfg.confidence.gain_fit = 0.5;
        let err = validate_analysis(&cfg).unwrap_err();
        assert!(matches!(err, ValidationError::SemanticError(_)));
    }

    #[test]
    fn rejects_negative_weight() {
        let mut cfg = AnalysisConfig::default();
        cfg.confidence.points = -0.2;
        cfg.confidence.span = 0.6;
        assert!(validate_analysis(&cfg).is_err());
    }

    #[test]
    fn rejects_incompatible_schema() {
        let mut cfg = AnalysisConfig::default();
        cfg.schema_version = "2.0.0".to_string();
        assert!(matches!(
            validate_analysis(&cfg),
            Err(ValidationError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn converts_into_common_error() {
        let err: rt_common::Error = ValidationError::ParseError("bad".into()).into();
        assert_eq!(err.code(), 41);
    }
}

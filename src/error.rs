use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{name} coefficients: expected {expected} values for the filter order, got {actual}")]
    CoefficientLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Coefficient {name}[{index}] is not finite: {value}")]
    NonFiniteCoefficient {
        name: &'static str,
        index: usize,
        value: f64,
    },

    #[error("Leading feedback coefficient A[0] is zero")]
    ZeroLeadingFeedback,

    #[error("Leading feedback coefficient A[0] = {0} is not normalized to 1.0")]
    UnnormalizedFeedback(f64),

    #[error("Config file error: {0}")]
    ConfigFile(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FilterError {
    /// True for errors raised while validating filter parameters.
    ///
    /// An evaluator is never constructed when one of these is returned.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FilterError::Config(_)
                | FilterError::CoefficientLength { .. }
                | FilterError::NonFiniteCoefficient { .. }
                | FilterError::ZeroLeadingFeedback
                | FilterError::UnnormalizedFeedback(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(FilterError::ZeroLeadingFeedback.is_configuration());
        assert!(FilterError::UnnormalizedFeedback(2.0).is_configuration());
        assert!(
            FilterError::CoefficientLength {
                name: "B",
                expected: 3,
                actual: 2
            }
            .is_configuration()
        );
        assert!(!FilterError::ConfigFile("bad".to_string()).is_configuration());
    }

    #[test]
    fn test_length_error_message() {
        let err = FilterError::CoefficientLength {
            name: "A",
            expected: 3,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "A coefficients: expected 3 values for the filter order, got 4"
        );
    }
}

use serde::{Deserialize, Serialize};

use crate::constants::NORMALIZATION_TOLERANCE;
use crate::error::{FilterError, Result};

/// Feedforward (`b`) and feedback (`a`) coefficients of a direct-form IIR filter
///
/// Both sequences hold `order + 1` values. The recurrence assumes `a[0] == 1`;
/// use [`Coefficients::normalized`] to bring arbitrary coefficients into that
/// form before building a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub b: Vec<f64>,
    pub a: Vec<f64>,
}

impl Coefficients {
    pub fn new(b: Vec<f64>, a: Vec<f64>) -> Self {
        Self { b, a }
    }

    /// Second-order low-pass used by the reference simulation
    ///
    /// 3 kHz Butterworth prototype discretized by impulse invariance at
    /// 20 kHz. DC gain is close to unity (~0.998).
    pub fn reference_lowpass() -> Self {
        Self {
            b: vec![0.0, 0.020198, -0.0],
            a: vec![1.0, -1.788622, 0.808858],
        }
    }

    /// Filter order implied by the longer of the two sequences
    pub fn order(&self) -> usize {
        self.b.len().max(self.a.len()).saturating_sub(1)
    }

    /// Check the coefficients against a declared filter order
    ///
    /// # Errors
    /// - `Config` if `order` is zero
    /// - `CoefficientLength` if either sequence is not `order + 1` long
    /// - `NonFiniteCoefficient` if any value is NaN or infinite
    /// - `ZeroLeadingFeedback` if `a[0] == 0`
    /// - `UnnormalizedFeedback` if `a[0]` is not 1.0
    pub fn validate(&self, order: usize) -> Result<()> {
        if order == 0 {
            return Err(FilterError::Config(
                "filter order must be at least 1".to_string(),
            ));
        }

        let expected = order + 1;
        for (name, values) in [("B", &self.b), ("A", &self.a)] {
            if values.len() != expected {
                return Err(FilterError::CoefficientLength {
                    name,
                    expected,
                    actual: values.len(),
                });
            }
            if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite())
            {
                return Err(FilterError::NonFiniteCoefficient { name, index, value });
            }
        }

        let a0 = self.a[0];
        if a0 == 0.0 {
            return Err(FilterError::ZeroLeadingFeedback);
        }
        if (a0 - 1.0).abs() > NORMALIZATION_TOLERANCE {
            return Err(FilterError::UnnormalizedFeedback(a0));
        }

        Ok(())
    }

    /// Divide every coefficient by `a[0]`
    ///
    /// # Errors
    /// Returns `ZeroLeadingFeedback` if `a` is empty or `a[0] == 0`.
    pub fn normalized(&self) -> Result<Self> {
        let a0 = match self.a.first() {
            Some(&a0) if a0 != 0.0 => a0,
            _ => return Err(FilterError::ZeroLeadingFeedback),
        };
        Ok(Self {
            b: self.b.iter().map(|v| v / a0).collect(),
            a: self.a.iter().map(|v| v / a0).collect(),
        })
    }

    /// Gain at 0 Hz, `sum(b) / sum(a)`
    pub fn dc_gain(&self) -> f64 {
        let num: f64 = self.b.iter().sum();
        let den: f64 = self.a.iter().sum();
        num / den
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::reference_lowpass()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_is_valid_second_order() {
        let coeffs = Coefficients::reference_lowpass();
        assert_eq!(coeffs.order(), 2);
        assert!(coeffs.validate(2).is_ok());
    }

    #[test]
    fn test_reference_dc_gain_near_unity() {
        let gain = Coefficients::reference_lowpass().dc_gain();
        assert!((gain - 0.998122).abs() < 1e-5, "DC gain was {}", gain);
    }

    #[test]
    fn test_validate_rejects_zero_order() {
        let coeffs = Coefficients::new(vec![1.0], vec![1.0]);
        assert!(matches!(coeffs.validate(0), Err(FilterError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let coeffs = Coefficients::new(vec![0.5, 0.5], vec![1.0, 0.1, 0.2]);
        match coeffs.validate(2) {
            Err(FilterError::CoefficientLength {
                name,
                expected,
                actual,
            }) => {
                assert_eq!(name, "B");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("Expected length error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_zero_leading_feedback() {
        let coeffs = Coefficients::new(vec![1.0, 0.0], vec![0.0, 0.5]);
        assert!(matches!(
            coeffs.validate(1),
            Err(FilterError::ZeroLeadingFeedback)
        ));
    }

    #[test]
    fn test_validate_rejects_unnormalized_feedback() {
        let coeffs = Coefficients::new(vec![1.0, 0.0], vec![2.0, 0.5]);
        assert!(matches!(
            coeffs.validate(1),
            Err(FilterError::UnnormalizedFeedback(a0)) if a0 == 2.0
        ));
    }

    #[test]
    fn test_validate_rejects_nan() {
        let coeffs = Coefficients::new(vec![1.0, f64::NAN], vec![1.0, 0.5]);
        assert!(matches!(
            coeffs.validate(1),
            Err(FilterError::NonFiniteCoefficient { name: "B", index: 1, .. })
        ));
    }

    #[test]
    fn test_normalized_divides_by_leading_feedback() {
        let coeffs = Coefficients::new(vec![2.0, 4.0], vec![2.0, -1.0]);
        let norm = coeffs.normalized().unwrap();
        assert_eq!(norm.b, vec![1.0, 2.0]);
        assert_eq!(norm.a, vec![1.0, -0.5]);
        assert!(norm.validate(1).is_ok());
    }

    #[test]
    fn test_normalized_rejects_zero_leading_feedback() {
        let coeffs = Coefficients::new(vec![1.0], vec![0.0]);
        assert!(coeffs.normalized().is_err());
        assert!(Coefficients::new(vec![], vec![]).normalized().is_err());
    }
}

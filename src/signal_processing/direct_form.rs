use super::coefficients::Coefficients;
use super::filter::Filter;
use crate::error::Result;

/// Direct-form-I IIR filter with explicit input/output history
///
/// Evaluates the recurrence
///
/// ```text
/// y[n] = sum(b[i] * x[n-i], i = 0..=N) - sum(a[i] * y[n-i], i = 1..=N)
/// ```
///
/// one sample at a time. Both history buffers hold `order + 1` samples with
/// the newest at index 0 and never change length after construction.
///
/// The leading feedback coefficient must already be 1.0; the evaluator does
/// not divide by it. Non-finite input samples are not rejected and propagate
/// through the history like any other value.
///
/// # Example
/// ```
/// use lowpass_sim::signal_processing::DirectFormFilter;
///
/// let mut filter = DirectFormFilter::new(2, &[0.0, 0.020198, 0.0], &[1.0, -1.788622, 0.808858])
///     .unwrap();
/// assert_eq!(filter.process_sample(1.0), 0.0);
/// assert!((filter.process_sample(0.0) - 0.020198).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct DirectFormFilter {
    order: usize,
    b: Vec<f64>,
    a: Vec<f64>,
    x_hist: Vec<f64>,
    y_hist: Vec<f64>,
}

impl DirectFormFilter {
    /// Create a filter of the given order
    ///
    /// # Errors
    /// Returns a configuration error (see [`Coefficients::validate`]) if the
    /// order is zero, a coefficient sequence is not `order + 1` long, a
    /// coefficient is not finite, or `a[0]` is not 1.0.
    pub fn new(order: usize, b: &[f64], a: &[f64]) -> Result<Self> {
        let coeffs = Coefficients::new(b.to_vec(), a.to_vec());
        coeffs.validate(order)?;

        log::debug!(
            "Direct-form-I filter: order {}, b = {:?}, a = {:?}",
            order,
            coeffs.b,
            coeffs.a
        );

        Ok(Self {
            order,
            b: coeffs.b,
            a: coeffs.a,
            x_hist: vec![0.0; order + 1],
            y_hist: vec![0.0; order + 1],
        })
    }

    /// Create a filter whose order is implied by the coefficient lengths
    pub fn from_coefficients(coeffs: &Coefficients) -> Result<Self> {
        Self::new(coeffs.order(), &coeffs.b, &coeffs.a)
    }

    /// Feed one input sample and return the next output sample
    pub fn process_sample(&mut self, x: f64) -> f64 {
        // Oldest sample falls off the end.
        self.x_hist.copy_within(0..self.order, 1);
        self.y_hist.copy_within(0..self.order, 1);

        self.x_hist[0] = x;

        let feedforward: f64 = self
            .b
            .iter()
            .zip(&self.x_hist)
            .map(|(b, x)| b * x)
            .sum();

        // y_hist[0] still holds the previous output here and is skipped
        // together with a[0].
        let feedback: f64 = self
            .a
            .iter()
            .zip(&self.y_hist)
            .skip(1)
            .map(|(a, y)| a * y)
            .sum();

        let y = feedforward - feedback;
        self.y_hist[0] = y;
        y
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn feedforward(&self) -> &[f64] {
        &self.b
    }

    pub fn feedback(&self) -> &[f64] {
        &self.a
    }

    /// Number of retained samples per history buffer (always `order + 1`)
    pub fn history_len(&self) -> usize {
        debug_assert_eq!(self.x_hist.len(), self.y_hist.len());
        self.x_hist.len()
    }
}

impl Filter for DirectFormFilter {
    fn process(&mut self, sample: f32) -> f32 {
        self.process_sample(sample as f64) as f32
    }
}

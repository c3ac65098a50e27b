use std::f64::consts::TAU;

/// Sine test-tone generator with its own time base
///
/// Sample `n` is `amplitude * sin(2 * pi * f * n / fs)`. Time advances by
/// `1 / fs` per sample and is derived from the sample index, so it does not
/// drift over long runs.
#[derive(Debug, Clone)]
pub struct SineOscillator {
    frequency_hz: f64,
    sample_rate: f64,
    amplitude: f64,
    index: u64,
}

impl SineOscillator {
    pub fn new(frequency_hz: f64, sample_rate: f64) -> Self {
        Self {
            frequency_hz,
            sample_rate,
            amplitude: 1.0,
            index: 0,
        }
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Produce the sample at the current time and advance by one step
    pub fn next_sample(&mut self) -> f32 {
        let t = self.time_secs();
        self.index += 1;
        (self.amplitude * (TAU * self.frequency_hz * t).sin()) as f32
    }

    /// Time of the next sample to be produced
    pub fn time_secs(&self) -> f64 {
        self.index as f64 / self.sample_rate
    }

    /// Index of the next sample to be produced
    pub fn sample_index(&self) -> u64 {
        self.index
    }

    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

impl Iterator for SineOscillator {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        Some(self.next_sample())
    }
}

/// Generate `duration_secs` of a unit sine at `freq_hz`
pub fn generate_sine(duration_secs: f32, sample_rate: u32, freq_hz: f32) -> Vec<f32> {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    SineOscillator::new(freq_hz as f64, sample_rate as f64)
        .take(num_samples)
        .collect()
}

/// Unit sample sequence `[1, 0, 0, ...]` of length `len`
pub fn unit_impulse(len: usize) -> Vec<f32> {
    (0..len).map(|i| if i == 0 { 1.0 } else { 0.0 }).collect()
}

use super::{Formatter, SampleOutput};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, sample: &SampleOutput) -> String {
        if self.verbose {
            let ratio = if sample.input != 0.0 {
                format!("{:>8.4}", sample.output / sample.input)
            } else {
                format!("{:>8}", "-")
            };
            format!(
                "#{:<8} t: {:>9.6} s  input: {:>8.4}  output: {:>8.4}  ratio: {}",
                sample.index, sample.time_secs, sample.input, sample.output, ratio
            )
        } else {
            format!(
                "t: {:>9.6} s  input: {:>8.4}  output: {:>8.4}",
                sample.time_secs, sample.input, sample.output
            )
        }
    }
}

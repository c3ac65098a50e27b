use super::{Formatter, SampleOutput};

/// Two labeled traces per line, the layout serial plotters pick up
/// automatically. The input trace is lifted by `visual_offset` so it does not
/// overlap the output.
pub struct PlotterFormatter {
    visual_offset: f32,
}

impl PlotterFormatter {
    pub fn new(visual_offset: f32) -> Self {
        Self { visual_offset }
    }
}

impl Formatter for PlotterFormatter {
    fn format(&self, sample: &SampleOutput) -> String {
        format!(
            "Input:{:.2},Output:{:.2}",
            sample.input + self.visual_offset,
            sample.output
        )
    }
}

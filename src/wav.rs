use hound::{WavSpec, WavWriter};
use std::path::Path;

use crate::output::SampleOutput;

/// Write a run as stereo 32-bit float WAV: left = input, right = output
pub fn save_wav(
    path: &Path,
    samples: &[SampleOutput],
    sample_rate: u32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;

    for sample in samples {
        writer.write_sample(sample.input)?;
        writer.write_sample(sample.output)?;
    }

    writer.finalize()?;
    log::debug!("Wrote {} frames to {}", samples.len(), path.display());
    Ok(())
}

use anyhow::Context;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;

use lowpass_sim::config::{Frequency, SimConfig};
use lowpass_sim::output::{OutputFormat, create_formatter};
use lowpass_sim::processing::{RunOptions, Simulator, run};
use lowpass_sim::{FilterError, save_wav};

#[derive(Parser, Debug)]
#[command(name = "lowpass-sim")]
#[command(about = "Stream a test tone through a fixed-coefficient IIR low-pass filter", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Stop after this many ticks (runs forever if omitted)
    #[arg(short = 'n', long)]
    ticks: Option<u64>,

    /// Delay between ticks in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Disable the startup and per-tick delays
    #[arg(long)]
    no_delay: bool,

    /// Test tone frequency (e.g., "1000", "1khz", "1000us")
    #[arg(long)]
    test_freq: Option<Frequency>,

    /// Sample rate in Hz
    #[arg(long)]
    sample_rate: Option<f64>,

    /// Visual offset added to the input trace in plotter output
    #[arg(long, allow_negative_numbers = true)]
    offset: Option<f32>,

    /// Record the run to a stereo WAV file (left = input, right = output).
    /// Requires --ticks; recorded runs are not paced.
    #[arg(long, requires = "ticks")]
    record: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SimConfig::default(),
    };
    apply_overrides(&mut config, &args);

    let mut sim = Simulator::new(&config).context("Invalid filter configuration")?;
    let formatter = create_formatter(
        config.output.format,
        config.output.visual_offset,
        args.verbose > 0,
    );

    log::info!(
        "Filter order {}: b = {:?}, a = {:?}",
        config.filter.order,
        config.filter.b,
        config.filter.a
    );
    log::info!(
        "Test tone {} Hz at {} Hz sample rate",
        config.signal.test_freq,
        config.signal.sample_rate
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if matches!(config.output.format, OutputFormat::Plotter | OutputFormat::Text) {
        writeln!(out, "Order {} LPF simulation started", config.filter.order)?;
    }

    thread::sleep(config.output.startup_delay());

    if let (Some(path), Some(ticks)) = (&args.record, args.ticks) {
        let samples = sim.run_block(ticks as usize);
        if let Some(header) = formatter.header() {
            writeln!(out, "{}", header)?;
        }
        for sample in &samples {
            writeln!(out, "{}", formatter.format(sample))?;
        }
        save_wav(path, &samples, config.signal.sample_rate.round() as u32)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Recorded {} ticks to {}", samples.len(), path.display());
        return Ok(());
    }

    let options = RunOptions {
        max_ticks: args.ticks,
        tick_delay: config.output.tick_delay(),
    };

    match run(&mut sim, formatter.as_ref(), &mut out, &options) {
        Ok(written) => {
            log::info!("Wrote {} ticks", written);
            Ok(())
        }
        // Downstream reader went away (e.g. piped into `head`)
        Err(FilterError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn apply_overrides(config: &mut SimConfig, args: &Args) {
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(delay) = args.delay_ms {
        config.output.tick_delay_ms = delay;
    }
    if args.no_delay {
        config.output.tick_delay_ms = 0;
        config.output.startup_delay_ms = 0;
    }
    if let Some(freq) = args.test_freq {
        config.signal.test_freq = freq.as_hz();
    }
    if let Some(rate) = args.sample_rate {
        config.signal.sample_rate = rate;
    }
    if let Some(offset) = args.offset {
        config.output.visual_offset = offset;
    }
}

use anyhow::Context;
use clap::Parser;
use rolling_stats::Stats;
use serde::Serialize;
use std::path::PathBuf;

use lowpass_sim::config::SimConfig;
use lowpass_sim::processing::Simulator;
use lowpass_sim::save_wav;
use lowpass_sim::signal_processing::{
    DirectFormFilter, FrequencyPoint, StabilityReport, frequency_response, impulse_response,
    measure_gain_db, response_at, stability,
};

#[derive(Parser, Debug)]
#[command(name = "analyze_filter")]
#[command(about = "Report poles, frequency response and impulse response of the configured filter", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format: text, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Number of frequency response points between 0 Hz and Nyquist
    #[arg(long, default_value_t = 4096)]
    points: usize,

    /// Number of impulse response samples
    #[arg(long, default_value_t = 100)]
    impulse_len: usize,

    /// Test tone duration in seconds for the steady-state measurement
    #[arg(short, long, default_value_t = 0.5)]
    duration: f32,

    /// Dump the test tone run to WAV (stereo: left=input, right=output)
    #[arg(long)]
    dump_audio: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize)]
struct StatsSummary {
    count: usize,
    mean: f32,
    std_dev: f32,
    min: f32,
    max: f32,
}

impl StatsSummary {
    fn from_stats(stats: &Stats<f32>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
struct ToneAnalysis {
    frequency_hz: f64,
    analytic_gain_db: f64,
    measured_gain_db: Option<f32>,
    steady_state_output: Option<StatsSummary>,
}

#[derive(Debug, Clone, Serialize)]
struct FilterReport {
    order: usize,
    b: Vec<f64>,
    a: Vec<f64>,
    sample_rate: f64,
    dc_gain: f64,
    stability: StabilityReport,
    test_tone: ToneAnalysis,
    impulse_response: Vec<f32>,
    frequency_response: Vec<FrequencyPoint>,
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

    let config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SimConfig::default(),
    };
    config.validate().context("Invalid filter configuration")?;

    let report = analyze(&config, &args)?;

    match args.format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => print_json(&report)?,
    }

    Ok(())
}

fn analyze(config: &SimConfig, args: &Args) -> anyhow::Result<FilterReport> {
    let coeffs = config.filter.coefficients();
    let sample_rate = config.signal.sample_rate;
    let test_freq = config.signal.test_freq;

    let stability = stability(&coeffs).context("Pole computation failed")?;
    let response = frequency_response(&coeffs, sample_rate, args.points);

    let mut filter = DirectFormFilter::from_coefficients(&coeffs)?;
    let impulse = impulse_response(&mut filter, args.impulse_len);

    let num_samples = (args.duration as f64 * sample_rate) as usize;
    let settle = num_samples / 4;

    let mut filter = DirectFormFilter::from_coefficients(&coeffs)?;
    let measured_gain_db = measure_gain_db(
        &mut filter,
        test_freq as f32,
        sample_rate as f32,
        num_samples,
        settle,
    );

    let mut sim = Simulator::new(config)?;
    let run = sim.run_block(num_samples);
    let mut output_stats: Stats<f32> = Stats::new();
    for sample in run.iter().skip(settle) {
        output_stats.update(sample.output);
    }

    if let Some(path) = &args.dump_audio {
        save_wav(path, &run, sample_rate.round() as u32)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Dumped {} frames to {}", run.len(), path.display());
    }

    let analytic = response_at(&coeffs, test_freq, sample_rate).norm();

    Ok(FilterReport {
        order: config.filter.order,
        b: coeffs.b.clone(),
        a: coeffs.a.clone(),
        sample_rate,
        dc_gain: coeffs.dc_gain(),
        stability,
        test_tone: ToneAnalysis {
            frequency_hz: test_freq,
            analytic_gain_db: 20.0 * analytic.log10(),
            measured_gain_db,
            steady_state_output: StatsSummary::from_stats(&output_stats),
        },
        impulse_response: impulse,
        frequency_response: response,
    })
}

fn print_text(report: &FilterReport) {
    println!("Digital Filter Analysis");
    println!("Sampling Frequency: {} Hz", report.sample_rate);
    println!("{}", "-".repeat(40));
    println!("Order: {}", report.order);
    println!("B: {:?}", report.b);
    println!("A: {:?}", report.a);
    println!("DC gain: {:.6}", report.dc_gain);
    println!();

    println!("Poles:");
    for pole in &report.stability.poles {
        println!(
            "  {:>10.6} {:+.6}j  |p| = {:.6}",
            pole.re,
            pole.im,
            pole.norm()
        );
    }
    println!(
        "Max Pole Magnitude: {:.4}",
        report.stability.max_pole_magnitude
    );
    if report.stability.stable {
        println!("Stability: STABLE (all poles inside unit circle)");
    } else {
        println!("Stability: UNSTABLE");
    }
    println!();

    let tone = &report.test_tone;
    println!("Test tone: {} Hz", tone.frequency_hz);
    println!("  Analytic gain: {:.2} dB", tone.analytic_gain_db);
    match tone.measured_gain_db {
        Some(db) => println!("  Measured gain: {:.2} dB", db),
        None => println!("  Measured gain: -"),
    }
    if let Some(ref s) = tone.steady_state_output {
        println!(
            "  Output: mean {:.4}, std {:.4}, min {:.4}, max {:.4} ({} samples)",
            s.mean, s.std_dev, s.min, s.max, s.count
        );
    }
    println!();

    println!(
        "{:<12} {:>12} {:>14} {:>12}",
        "Freq (Hz)", "Magnitude", "Magnitude (dB)", "Phase (rad)"
    );
    println!("{}", "-".repeat(53));
    let step = (report.frequency_response.len() / 16).max(1);
    for point in report.frequency_response.iter().step_by(step) {
        println!(
            "{:<12.1} {:>12.6} {:>14.2} {:>12.4}",
            point.frequency_hz, point.magnitude, point.magnitude_db, point.phase_radians
        );
    }
    println!();

    println!("Impulse response ({} samples):", report.impulse_response.len());
    for (i, chunk) in report.impulse_response.chunks(8).enumerate() {
        let values: Vec<String> = chunk.iter().map(|v| format!("{:>9.6}", v)).collect();
        println!("  [{:>4}] {}", i * 8, values.join(" "));
    }
}

fn print_json(report: &FilterReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

//! Static Mask CLI
//!
//! Filters a headerless rawvideo stream (file or stdin) and writes the
//! masked frames back out as rawvideo. With `--demo` a synthetic pattern
//! replaces the input, which is handy for trying settings.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use static_mask::{
    config::{ConfigError, FileConfig},
    filter::{FilterError, StaticMask},
    frame::{FrameGeometry, PixelFormat},
    metrics::{MetricsError, MetricsRegistry, MetricsSnapshot},
    source::{FrameSource, PatternSource, RawVideoSink, RawVideoSource, SourceError},
};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "static-mask", version, about = "Blank static regions of a rawvideo stream")]
struct Args {
    /// Input rawvideo file, or `-` for stdin.
    #[arg(short, long)]
    input: Option<String>,

    /// Output rawvideo file, or `-` for stdout. Omit to discard frames.
    #[arg(short, long)]
    output: Option<String>,

    /// TOML configuration file; command-line flags take precedence.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frame width in pixels.
    #[arg(long)]
    width: Option<usize>,

    /// Frame height in pixels.
    #[arg(long)]
    height: Option<usize>,

    /// Pixel format, e.g. yuv420p, yuv444p, rgb24.
    #[arg(long = "pix-fmt")]
    pix_fmt: Option<PixelFormat>,

    /// Chunk side length in pixels (4-600).
    #[arg(long)]
    size: Option<u32>,

    /// Normalized difference below which a chunk is masked (0-1000).
    #[arg(long)]
    threshold: Option<f64>,

    /// How many frames back each chunk is compared (1-100).
    #[arg(long = "frame-back")]
    frame_back: Option<u32>,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<u64>,

    /// Write Prometheus text metrics to this file on exit.
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// Use a synthetic moving-block pattern instead of an input stream.
    #[arg(long)]
    demo: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),
    #[error("no input given; pass --input or --demo")]
    NoInput,
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout can carry video.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("static-mask: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Merges the optional config file with command-line overrides.
fn resolve_config(args: &Args) -> Result<FileConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    if let Some(width) = args.width {
        config.input.width = width;
    }
    if let Some(height) = args.height {
        config.input.height = height;
    }
    if let Some(format) = args.pix_fmt {
        config.input.pixel_format = format;
    }
    if let Some(size) = args.size {
        config.mask.size = size;
    }
    if let Some(threshold) = args.threshold {
        config.mask.threshold = threshold;
    }
    if let Some(frame_back) = args.frame_back {
        config.mask.frame_back = frame_back;
    }
    if args.max_frames.is_some() {
        config.output.max_frames = args.max_frames;
    }
    if args.metrics.is_some() {
        config.output.metrics_path = args.metrics.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Synthetic frames generated by `--demo` when no frame limit is given.
const DEMO_FRAMES: u64 = 100;

fn open_source(args: &Args, config: &FileConfig) -> Result<Box<dyn FrameSource>, CliError> {
    if args.demo {
        let limit = config.output.max_frames.unwrap_or(DEMO_FRAMES);
        return Ok(Box::new(PatternSource::default().with_limit(limit)));
    }
    let reader: Box<dyn Read> = match args.input.as_deref() {
        Some("-") => Box::new(io::stdin().lock()),
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => return Err(CliError::NoInput),
    };
    Ok(Box::new(RawVideoSource::new(reader)))
}

fn open_sink(args: &Args) -> Result<Option<RawVideoSink<Box<dyn Write>>>, CliError> {
    let writer: Box<dyn Write> = match args.output.as_deref() {
        Some("-") => Box::new(BufWriter::new(io::stdout().lock())),
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => return Ok(None),
    };
    Ok(Some(RawVideoSink::new(writer)))
}

fn run(args: Args) -> Result<(), CliError> {
    info!("Static Mask v{}", static_mask::VERSION);

    let config = resolve_config(&args)?;
    let geometry: FrameGeometry = config.input.geometry();

    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))?;

    let mut source = open_source(&args, &config)?;
    source.open(geometry)?;
    let mut sink = open_sink(&args)?;

    let mut filter = StaticMask::new(config.mask)?;
    filter.configure(geometry)?;

    let started = Utc::now();
    while running.load(Ordering::SeqCst) {
        if config
            .output
            .max_frames
            .is_some_and(|max| filter.stats().frames >= max)
        {
            break;
        }

        let Some(mut frame) = source.next_frame()? else {
            break;
        };
        filter.process_frame(&mut frame)?;

        if let Some(sink) = sink.as_mut() {
            sink.write_frame(&frame)?;
        }
    }

    if !running.load(Ordering::SeqCst) {
        warn!("Interrupted, stopping between frames");
    }

    if let Some(sink) = sink.as_mut() {
        sink.flush()?;
    }
    source.close();

    let elapsed = Utc::now().signed_duration_since(started);
    let stats = *filter.stats();
    let seconds = elapsed.num_milliseconds() as f64 / 1000.0;
    let fps = if seconds > 0.0 {
        stats.frames as f64 / seconds
    } else {
        0.0
    };
    info!(
        frames = stats.frames,
        masked_ratio = stats.masked_ratio(),
        elapsed_ms = elapsed.num_milliseconds(),
        fps,
        started = %started.to_rfc3339(),
        "Done"
    );

    if let Some(path) = &config.output.metrics_path {
        let registry = MetricsRegistry::new()?;
        registry.update(&MetricsSnapshot::from_filter(&filter));
        std::fs::write(path, registry.encode()?)?;
        info!(path = %path.display(), "Metrics written");
    }

    filter.release();
    Ok(())
}

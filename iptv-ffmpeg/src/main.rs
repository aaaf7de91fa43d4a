use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use ffmpeg_session::{AutoOpener, FramePoller, SourceOpener, StopReason, StreamSession};

mod config;

use config::{OutputFormat, Overrides, PlayerConfig};

#[derive(Parser, Debug)]
#[command(name = "iptv-ffmpeg")]
#[command(about = "Open a video stream and pull decoded frames at a fixed cadence")]
struct Args {
    /// Stream URL or absolute file path (synthetic:// for generated frames)
    #[arg(long, env = "IPTV_URL")]
    url: Option<String>,

    /// Number of frames to poll, 0 polls until the stream ends [default: 100]
    #[arg(short = 'n', long)]
    frames: Option<u64>,

    /// Delay between polls in microseconds [default: 16667]
    #[arg(long)]
    interval_us: Option<u64>,

    /// Keep polls on a fixed clock schedule instead of sleeping after each one
    #[arg(long)]
    paced: bool,

    /// Try hardware-accelerated decoding
    #[arg(long)]
    hw_accel: bool,

    /// Pixel format of delivered frames [default: bgra]
    #[arg(long, value_enum)]
    output_format: Option<OutputFormat>,

    /// JSON config file; command line values take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the FFmpeg version and exit
    #[arg(long)]
    ffmpeg_version: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.ffmpeg_version {
        println!("FFmpeg {}", ffmpeg_source::version());
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let config = match &args.config {
        Some(path) => PlayerConfig::load(path)?,
        None => PlayerConfig::default(),
    }
    .merge(Overrides {
        url: args.url,
        frames: args.frames,
        interval_us: args.interval_us,
        paced: args.paced,
        hw_accel: args.hw_accel,
        output_format: args.output_format,
    });

    log::debug!("config: {config:?}");

    let opener = AutoOpener::new(config.ffmpeg_opener());
    Ok(play(StreamSession::new(opener), &config))
}

fn play<O: SourceOpener>(mut session: StreamSession<O>, config: &PlayerConfig) -> ExitCode {
    if let Err(e) = session.open(&config.url) {
        log::error!("{e}");
        println!("Failed to open stream");
        return ExitCode::FAILURE;
    }
    println!("Stream opened successfully");

    let mut bytes = 0usize;
    let mut last_size = None;
    let mut first_pts = None;
    let mut media_time = Duration::ZERO;
    let report = FramePoller::new(config.poll_config()).run(&mut session, |frame| {
        bytes += frame.data.len();
        last_size = Some((frame.width, frame.height, frame.format));
        if let Some(pts) = frame.pts {
            let first = *first_pts.get_or_insert(pts);
            media_time = pts.since(first, frame.time_base);
        }
    });

    match &report.stop {
        StopReason::IterationLimit => {}
        StopReason::EndOfStream => println!("Stream ended or error."),
        StopReason::Failed(e) => {
            log::error!("{e}");
            println!("Stream ended or error.");
        }
    }

    session.close();

    match last_size {
        Some((width, height, format)) => println!(
            "Read {} frames in {} iterations ({width}x{height} {format:?}, {bytes} bytes, {:.2}s of media)",
            report.frames_read,
            report.iterations,
            media_time.as_secs_f64()
        ),
        None => println!(
            "Read {} frames in {} iterations",
            report.frames_read, report.iterations
        ),
    }

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use ledlog_render::{
    config::Config,
    error::RenderError,
    pipeline::{AnimationRenderer, DispatchReport, JobDispatcher, ProgressReporter, Renderer, StripRenderer},
    source::LocationTable,
};

#[derive(Parser)]
#[command(
    name = "ledlog-render",
    version,
    about = "Render LED render logs as animated GIFs or static PNG timelines",
    long_about = "ledlog-render reads CSV render logs (one row per frame, R,G,B per LED) and turns each one into an image: a looping GIF with every LED at its physical position, or a PNG with one pixel row per frame."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write outputs here instead of next to each input
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Do not draw progress bars
    #[arg(long, global = true)]
    no_progress: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Animate logs as looping GIFs using fixed LED positions
    Gif {
        /// Render logs to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// CSV of x,y positions, one row per LED
        #[arg(short = 'l', long)]
        led_locations: PathBuf,

        /// Matrix rows
        #[arg(long)]
        height: Option<u32>,

        /// Matrix columns
        #[arg(long)]
        width: Option<u32>,

        /// Files rendered at the same time
        #[arg(short, long)]
        workers: Option<usize>,

        /// Skip the gifsicle pass
        #[arg(long)]
        no_optimize: bool,
    },

    /// Stack each frame as one pixel row of a PNG
    Png {
        /// Render logs to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Rows per column; picked from the frame count when omitted
        #[arg(long)]
        height: Option<u32>,

        /// LEDs per frame
        #[arg(short, long)]
        num_leds: Option<usize>,

        /// Files rendered at the same time
        #[arg(short, long)]
        workers: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();
    let progress = ProgressReporter::new(!cli.no_progress);

    // Initialize logging; lines are printed between progress bar redraws
    let log_level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(progress.log_writer())
        .init();

    match run(cli, progress) {
        Ok(report) if report.is_success() => {}
        Ok(report) => {
            for (input, e) in report.failed() {
                eprintln!("failed: {}: {}", input.display(), e.user_message());
            }
            std::process::exit(1);
        }
        Err(e) => {
            match e.downcast_ref::<RenderError>() {
                Some(render_error) if render_error.is_setup_error() => {
                    error!("Nothing rendered: {}", render_error.user_message());
                }
                _ => error!("{:#}", e),
            }
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli, progress: ProgressReporter) -> Result<DispatchReport> {
    debug!("Starting ledlog-render v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };

    if let Some(dir) = cli.output_dir {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating output directory {:?}", dir))?;
        config.output.dir = Some(dir);
    }
    if cli.no_progress {
        config.output.progress = false;
    }
    let progress = if config.output.progress {
        progress
    } else {
        ProgressReporter::hidden()
    };

    let (renderer, files) = match cli.command {
        Command::Gif {
            files,
            led_locations,
            height,
            width,
            workers,
            no_optimize,
        } => {
            if let Some(height) = height {
                config.animation.height = height;
            }
            if let Some(width) = width {
                config.animation.width = width;
            }
            if let Some(workers) = workers {
                config.jobs.workers = workers;
            }
            if no_optimize {
                config.output.optimizer.enabled = false;
            }
            config.validate()?;

            let locations = LocationTable::load(&led_locations)?;
            let renderer: Box<dyn Renderer> = Box::new(AnimationRenderer::new(&config, Arc::new(locations)));
            (renderer, files)
        }
        Command::Png {
            files,
            height,
            num_leds,
            workers,
        } => {
            if height.is_some() {
                config.strip.height = height;
            }
            if let Some(num_leds) = num_leds {
                config.strip.num_leds = num_leds;
            }
            if let Some(workers) = workers {
                config.jobs.workers = workers;
            }
            config.validate()?;

            let renderer: Box<dyn Renderer> = Box::new(StripRenderer::new(&config));
            (renderer, files)
        }
    };

    let dispatcher = JobDispatcher::new(config.jobs.workers, progress);
    let report = dispatcher.run(renderer.as_ref(), &files)?;
    Ok(report)
}

use clap::{Parser, Subcommand};
use jellyscape_common::{MODE_ENV, RunMode, SceneConfig};
use jellyscape_kernel::{SceneInit, SceneSlot};
use jellyscape_render::DebugTextRenderer;
use jellyscape_tools::{FrameStats, SceneInspector};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jellyscape-cli", about = "Headless driver for the jellyfish scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the frame pipeline without a GPU and print each frame
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "3")]
        frames: u32,
        /// Viewport width in logical pixels
        #[arg(long, default_value = "800")]
        width: f32,
        /// Viewport height in logical pixels
        #[arg(long, default_value = "600")]
        height: f32,
        /// Device pixel ratio
        #[arg(long, default_value = "1.0")]
        pixel_ratio: f32,
        /// Simulated time between frames, in milliseconds
        #[arg(long, default_value = "16")]
        frame_ms: f64,
        /// Start in diagnostic mode
        #[arg(long)]
        diagnostic: bool,
        /// Move the cursor to this position (x,y) before the first frame
        #[arg(long, value_parser = parse_point)]
        cursor: Option<(f32, f32)>,
    },
    /// Print the effective scene configuration as YAML
    Config,
}

fn parse_point(s: &str) -> Result<(f32, f32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x = x.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok((x, y))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = SceneConfig::load_or_default(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Info => {
            println!("jellyscape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", jellyscape_render::crate_info());
            println!("tools: {}", jellyscape_tools::crate_info());
            println!(
                "scene: damping={} phase_divisor={}ms max_pixel_ratio={} sprites={}",
                config.damping,
                config.phase_divisor_ms,
                config.max_pixel_ratio,
                config.particle_count + config.bubble_count
            );
        }
        Commands::Simulate {
            frames,
            width,
            height,
            pixel_ratio,
            frame_ms,
            diagnostic,
            cursor,
        } => {
            let mode = RunMode::resolve(diagnostic, std::env::var(MODE_ENV).ok().as_deref());
            let init = SceneInit::new(config, mode, width, height, pixel_ratio);
            let start = init.start;

            let mut slot = SceneSlot::new();
            let scene = slot.get_or_init(init);
            if let Some((x, y)) = cursor {
                scene.pointer_moved(x, y);
            }

            let mut renderer = DebugTextRenderer::new();
            let mut stats = FrameStats::default();
            for i in 1..=frames {
                let now = start + Duration::from_secs_f64(frame_ms * f64::from(i) / 1000.0);
                scene.frame_at(now, &mut renderer)?;
                stats.record(scene.clock().delta_ms());
                print!("{}", renderer.last_frame());
            }

            println!("{}", SceneInspector::summary(scene));
            println!(
                "Frames: {} avg={:.2}ms worst={:.2}ms",
                stats.total_frames(),
                stats.average_ms(),
                stats.worst_ms()
            );
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}

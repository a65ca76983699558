use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use liminal_render::{RenderView, Renderer, TopDownTextRenderer};
use liminal_scene::{SceneKind, SceneRegistry};
use liminal_stream::{StreamStats, Streamer};
use liminal_tools::{RuntimeConfig, SceneInspector};
use liminal_view::{MoveKey, ViewInput, ViewpointController};

/// Simulated tick length for the headless walk.
const TICK_SECONDS: f32 = 1.0 / 60.0;

#[derive(Parser)]
#[command(name = "liminal-cli", about = "Headless harness for the liminal scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// List the scene variants
    Scenes {
        /// Emit the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Walk forward through a scene without a window
    Walk {
        /// Number of simulated ticks
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// Scene to walk (corridor, sea, gallery, stairs)
        #[arg(short, long)]
        scene: Option<SceneKind>,
        /// Runtime tuning file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print a top-down cell map after the run
        #[arg(long)]
        map: bool,
        /// Emit the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a runtime tuning file, or print the defaults
    Config {
        /// File to validate; omitted prints the default YAML
        path: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct WalkReport {
    scene: String,
    ticks: u64,
    position: [f32; 3],
    speed: f32,
    loaded_cells: usize,
    cells_generated: usize,
    cells_evicted: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Info => {
            println!("liminal-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", liminal_scene::crate_info());
            println!("stream: {}", liminal_stream::crate_info());
            println!("view: {}", liminal_view::crate_info());
            println!("shell: {}", liminal_shell::crate_info());
            println!("render: {}", liminal_render::crate_info());
            println!("tools: {}", liminal_tools::crate_info());
        }
        Commands::Scenes { json } => {
            let registry = SceneRegistry::new(&mut rand::rng());
            if json {
                println!("{}", serde_json::to_string_pretty(&registry.infos())?);
            } else {
                println!("{}", SceneInspector::summary(&registry));
                for index in 0..registry.variant_count() {
                    if let Some(summary) = SceneInspector::variant_summary(&registry, index) {
                        println!("{summary}");
                    }
                }
            }
        }
        Commands::Walk {
            ticks,
            scene,
            config,
            map,
            json,
        } => {
            let config = RuntimeConfig::load_or_default(config.as_deref())?;
            let mut rng = rand::rng();
            let mut registry = SceneRegistry::new(&mut rng);

            if let Some(kind) = scene {
                if let Some(index) = registry.index_of(kind) {
                    registry.switch_to(index)?;
                }
            }

            let streamer = Streamer::new(config.stream);
            let mut controller = ViewpointController::new(config.movement);
            controller.handle(ViewInput::Key {
                key: MoveKey::Forward,
                pressed: true,
            });

            let mut generated = 0;
            let mut evicted = 0;
            let mut stats = StreamStats::default();
            for _ in 0..ticks {
                controller.tick();
                stats = streamer.update(
                    registry.active_mut(),
                    controller.viewpoint().position,
                    &mut rng,
                );
                generated += stats.cells_generated;
                evicted += stats.cells_evicted;
                registry.active_mut().advance_ambience(TICK_SECONDS, &mut rng);
            }

            let viewpoint = controller.viewpoint();
            let report = WalkReport {
                scene: registry.active().config().kind.slug().to_string(),
                ticks,
                position: viewpoint.position.to_array(),
                speed: controller.speed(),
                loaded_cells: stats.loaded_cells,
                cells_generated: generated,
                cells_evicted: evicted,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Walk simulation: scene={}, ticks={}", report.scene, ticks);
                println!(
                    "Final position: ({:.1}, {:.1}, {:.1}) at speed {:.3}",
                    report.position[0], report.position[1], report.position[2], report.speed
                );
                println!(
                    "Cells: {} loaded (+{} generated, -{} evicted over the run)",
                    report.loaded_cells, report.cells_generated, report.cells_evicted
                );
            }

            if map {
                let renderer = TopDownTextRenderer::new(streamer.config().cell_size, 5);
                let view = RenderView {
                    eye: viewpoint.position,
                    target: viewpoint.look_target,
                    ..RenderView::default()
                };
                println!("{}", renderer.render(registry.active().graph(), &view));
            }
        }
        Commands::Config { path } => match path {
            Some(path) => {
                let config = RuntimeConfig::load(&path)?;
                println!("OK: {}", path.display());
                print!("{}", config.to_yaml()?);
            }
            None => {
                print!("{}", RuntimeConfig::default().to_yaml()?);
            }
        },
    }

    Ok(())
}

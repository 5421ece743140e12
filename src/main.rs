//! Knights of Eldoria - Entry Point
//!
//! Populates a random scenario, runs it headless and prints a summary as
//! text or JSON. Pass `--render-every N` to watch the grid as it evolves.

use std::path::PathBuf;

use clap::Parser;
use eldoria::core::config::SimulationConfig;
use eldoria::core::error::Result;
use eldoria::render::render_frame;
use eldoria::sentiment::LexiconAnalyzer;
use eldoria::simulation::{populate_random, run_with, RunSummary, World};
use tracing_subscriber::EnvFilter;

/// Knights of Eldoria simulation runner
#[derive(Parser, Debug)]
#[command(name = "eldoria")]
#[command(about = "Run a Knights of Eldoria simulation and report the outcome")]
struct Args {
    /// TOML config file; options it omits keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum steps before the run is cut off
    #[arg(long)]
    steps: Option<u64>,

    /// Grid edge length
    #[arg(long)]
    grid_size: Option<i32>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Print the grid every N steps (0 disables)
    #[arg(long, default_value_t = 0)]
    render_every: u64,

    /// Enable debug logging of every agent decision
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "eldoria=debug" } else { "eldoria=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(steps) = args.steps {
        config.max_steps = steps;
    }
    if let Some(grid_size) = args.grid_size {
        config.grid_size = grid_size;
    }
    config.validate()?;

    let max_steps = config.max_steps;
    let mut world = World::new(config);
    tracing::info!("Knights of Eldoria starting (seed {})", world.seed);

    populate_random(&mut world)?;

    if args.render_every > 0 {
        eprintln!("{}", render_frame(&world));
    }
    let render_every = args.render_every;
    let summary = run_with(&mut world, max_steps, |world, report| {
        if render_every > 0 && (report.step + 1) % render_every == 0 {
            eprintln!("{}", render_frame(world));
        }
    });

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        "text" => print_summary(&summary),
        other => {
            eprintln!("Unknown format '{}', defaulting to text", other);
            print_summary(&summary);
        }
    }

    share_opinions(&world);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("=== Knights of Eldoria ===");
    println!("Seed:        {}", summary.seed);
    println!("Steps:       {}", summary.steps);
    println!("Outcome:     {:?}", summary.end_reason);
    println!("Hunters:     {} alive, {} died", summary.hunters_alive, summary.deaths);
    println!("Knights:     {}", summary.knights);
    println!("Recruits:    {}", summary.recruits);
    println!("Outstanding: {} treasures", summary.treasures_outstanding);
    println!(
        "Stored:      {} treasures worth {:.2}",
        summary.stored_treasures, summary.stored_value
    );
    for hideout in &summary.hideouts {
        println!(
            "  Hideout {} at {}: {} residents, {} treasures worth {:.2}",
            hideout.id.0, hideout.position, hideout.residents, hideout.stored_treasures, hideout.stored_value
        );
    }
}

/// Let the first surviving hunter say a few words
fn share_opinions(world: &World) {
    let Some(hunter) = world.hunters.values().next() else {
        return;
    };
    let analyzer = LexiconAnalyzer::default();
    for text in [
        "I love finding treasure and helping my team.",
        "I'm exhausted and scared of the knights.",
        "Today is just okay.",
    ] {
        hunter.express_opinion(text, &analyzer);
    }
}

//! Plan routes over occupancy grids read from files.
//!
//! Each grid file is one planning cycle, in order. The route and the directive
//! announced for it are printed after every cycle.
//!
//! Usage:
//!   waypath grid.txt
//!   waypath --metric euclidean --goal 13,5 cycle1.txt cycle2.txt

use clap::Parser;
use std::path::{Path, PathBuf};
use waypath::{
    config::{self, Config},
    geometry::{Cell, GridMap, Inflation, MapConversionErr},
    guidance::{self, Announcer},
    input::parse_grid,
    planner::{Planner, Snapshot},
    search::{Metric, Outcome, SearchError},
};

#[cfg(feature = "map-render")]
use waypath::geometry::map::{RenderError, Style};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Grid files, one per planning cycle
    #[arg(required = true)]
    grids: Vec<PathBuf>,

    /// Configuration file path (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start cell, written `row,col`
    #[arg(short, long)]
    start: Option<Cell>,

    /// Goal cell, written `row,col`
    #[arg(short, long)]
    goal: Option<Cell>,

    /// Step-cost model: `diagonal` or `euclidean`
    #[arg(short, long)]
    metric: Option<Metric>,

    /// Give up after expanding this many cells
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Grow obstacles by one cell before planning: `orthogonal` or `diagonal`
    #[arg(long)]
    inflate: Option<Inflation>,

    /// Report that the agent is facing a wall
    #[arg(long)]
    facing_wall: bool,

    /// Write the planned routes to this gif, one frame per grid
    #[cfg(feature = "map-render")]
    #[arg(long)]
    render: Option<PathBuf>,

    /// How tiles are drawn in the gif
    #[cfg(feature = "map-render")]
    #[arg(long, default_value = "fill")]
    style: Style,
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)]
    Config(#[from] config::Error),
    #[error("reading grid {}", .0.display())]
    Grid(PathBuf, #[source] MapConversionErr),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[cfg(feature = "map-render")]
    #[error("rendering routes")]
    Render(#[from] RenderError),
}

fn load_config(args: &Args) -> Result<Config, Error> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_default()?,
    };
    if let Some(metric) = args.metric {
        config.search.metric = metric;
    }
    if args.max_iterations.is_some() {
        config.search.max_iterations = args.max_iterations;
    }
    if args.goal.is_some() {
        config.search.goal = args.goal;
    }
    Ok(config)
}

fn load_grid(path: &Path) -> Result<GridMap, Error> {
    parse_grid(path).map_err(|err| Error::Grid(path.to_owned(), err))
}

fn run(args: Args) -> Result<(), Error> {
    let config = load_config(&args)?;
    log::debug!("{config:?}");

    let mut planner = Planner::new(config.search.clone());
    let mut announcer = Announcer::new(&config.guidance);

    #[cfg(feature = "map-render")]
    let mut frames = Vec::new();

    for path in &args.grids {
        let grid = load_grid(path)?;
        let mut snapshot = Snapshot::new(grid).facing_wall(args.facing_wall);
        if let Some(start) = args.start {
            snapshot = snapshot.with_start(start);
        }
        if let Some(inflation) = args.inflate {
            snapshot.grid = planner.inflate(&snapshot, inflation);
        }

        let plan = planner.plan(&snapshot)?;
        let route = plan.outcome.path().map(|path| path.cells()).unwrap_or_default();
        let overlay = snapshot.grid.overlay(route);

        println!("{}:", path.display());
        print!("{overlay}");
        match &plan.outcome {
            Outcome::Found(path) => {
                let cells = path.iter().map(ToString::to_string).collect::<Vec<_>>();
                println!("route: {}", cells.join(" "));
                println!("cost: {:.3}", path.cost());
                let directives = guidance::directives(path)
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>();
                println!("directives: {}", directives.join(" "));
            }
            Outcome::NoPath => println!("no path from {} to {}", plan.start, plan.goal),
            Outcome::TimedOut { iterations } => {
                println!("gave up after {iterations} iterations")
            }
        }
        if let Some(directive) = announcer.announce(&plan) {
            println!("announce: {directive}");
        }
        println!();

        #[cfg(feature = "map-render")]
        frames.push(overlay);
    }

    #[cfg(feature = "map-render")]
    if let Some(output) = &args.render {
        match frames.as_slice() {
            [] => {}
            [single] => single.render(output, args.style)?,
            [first, ..] => {
                let mut animation = first.prepare_animation(
                    output,
                    std::time::Duration::from_millis(500),
                    args.style,
                )?;
                for frame in &frames {
                    animation.write_frame(frame)?;
                }
            }
        }
        log::info!("wrote {}", output.display());
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Args::parse()) {
        log::error!("{err}");
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            log::error!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}

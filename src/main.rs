use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use force_layout::{
    EdgeSpec, GraphDocument, LayoutEngine, LayoutOptions, ManualScheduler, NodeCategory, NodeSpec,
    TickSnapshot,
};

/// Force-directed graph layout from the command line.
#[derive(Parser, Debug)]
#[command(name = "force-layout")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lay out a graph document (.json, .yaml or .yml)
    Run {
        /// Input graph document
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Lay out the built-in eight node network
    Demo {
        #[command(flatten)]
        layout: LayoutArgs,
    },
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Container width
    #[arg(long, default_value = "600")]
    width: f64,

    /// Container height
    #[arg(long, default_value = "300")]
    height: f64,

    /// Stop after this many frames even if the layout has not settled
    #[arg(long, default_value = "1000")]
    max_ticks: usize,

    /// Emit every tick snapshot instead of only the final one
    #[arg(long)]
    every_tick: bool,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// The landing page network: one hub, four data sources feeding it, three
/// insights coming out of it.
fn demo_document() -> GraphDocument {
    let mut nodes = vec![NodeSpec::new("center", NodeCategory::Hub)];
    let mut edges = Vec::new();
    for i in 1..=4 {
        let id = format!("data{i}");
        edges.push(EdgeSpec::new(id.clone(), "center"));
        nodes.push(NodeSpec::new(id, NodeCategory::Data));
    }
    for i in 1..=3 {
        let id = format!("insight{i}");
        edges.push(EdgeSpec::new("center", id.clone()));
        nodes.push(NodeSpec::new(id, NodeCategory::Insight));
    }

    GraphDocument {
        nodes,
        edges,
        options: LayoutOptions::default(),
    }
}

fn layout(document: GraphDocument, args: &LayoutArgs) -> Result<()> {
    let frames = ManualScheduler::new();
    let mut engine = LayoutEngine::create(
        document.nodes,
        document.edges,
        args.width,
        args.height,
        document.options,
        Box::new(frames.clone()),
    )?;

    let history: Rc<RefCell<Vec<TickSnapshot>>> = Rc::default();
    if args.every_tick {
        let history = history.clone();
        engine.on_tick(move |snapshot| history.borrow_mut().push(snapshot.clone()));
    }

    let mut fired = 0;
    while fired < args.max_ticks {
        let Some(token) = frames.next_frame() else {
            break;
        };
        engine.on_frame(token);
        fired += 1;
    }

    if engine.is_running() {
        warn!(ticks = fired, "layout did not settle within the tick budget");
    } else {
        info!(ticks = fired, "layout settled");
    }

    let json = if args.every_tick {
        serde_json::to_string_pretty(&*history.borrow())?
    } else {
        let last = engine.snapshot().context("layout engine was disposed")?;
        serde_json::to_string_pretty(&last)?
    };
    engine.dispose();

    match &args.output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "layout written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run { input, layout: args } => {
            let document = GraphDocument::read(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            layout(document, &args)?;
        }
        Commands::Demo { layout: args } => {
            layout(demo_document(), &args)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use force_layout::Graph;

    #[test]
    fn cli_parses_run_with_defaults() {
        let cli = Cli::try_parse_from(["force-layout", "run", "--input", "graph.json"]).unwrap();
        match cli.command {
            Commands::Run { input, layout } => {
                assert_eq!(input, PathBuf::from("graph.json"));
                assert_eq!((layout.width, layout.height), (600.0, 300.0));
                assert_eq!(layout.max_ticks, 1000);
                assert!(!layout.every_tick);
                assert!(layout.output.is_none());
            }
            _ => panic!("Expected Run command"),
        }
        assert!(!cli.verbose && !cli.quiet);
    }

    #[test]
    fn cli_parses_demo_with_overrides() {
        let cli = Cli::try_parse_from([
            "force-layout",
            "demo",
            "--width",
            "800",
            "--every-tick",
            "-o",
            "out.json",
            "-v",
        ])
        .unwrap();
        match cli.command {
            Commands::Demo { layout } => {
                assert_eq!(layout.width, 800.0);
                assert!(layout.every_tick);
                assert_eq!(layout.output, Some(PathBuf::from("out.json")));
            }
            _ => panic!("Expected Demo command"),
        }
        assert!(cli.verbose);
    }

    #[test]
    fn cli_requires_a_command() {
        assert!(Cli::try_parse_from(["force-layout"]).is_err());
        assert!(Cli::try_parse_from(["force-layout", "run"]).is_err());
    }

    #[test]
    fn demo_network_is_a_star_around_the_hub() {
        let doc = demo_document();
        assert_eq!(doc.nodes.len(), 8);
        assert_eq!(doc.edges.len(), 7);

        let graph = Graph::build(&doc.nodes, &doc.edges, (300.0, 150.0)).unwrap();
        assert_eq!(graph.degree(graph.index_of("center").unwrap()), 7);
    }
}

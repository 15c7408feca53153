mod app;
mod papers;
mod util;

use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "tea_atlas=info";

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON array of paper records.
    #[arg(long, env = "TEA_ATLAS_DATA", default_value = "papers_final.json")]
    data: PathBuf,

    /// Print the paper graph to stdout instead of opening a window.
    #[arg(long)]
    summary: bool,

    #[arg(long, default_value_t = 1440.0)]
    width: f32,

    #[arg(long, default_value_t = 920.0)]
    height: f32,

    /// Log filter directives; overrides RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

fn init_tracing(directives: Option<&str>) {
    let filter = match directives {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn print_summary(data: &Path) -> anyhow::Result<()> {
    let papers = papers::load_papers(data)
        .with_context(|| format!("loading papers from {}", data.display()))?;
    let graph = papers::build_graph(&papers);

    println!("papers: {}", papers.len());
    println!("nodes: {}", graph.nodes.len());
    println!("edges: {}", graph.edges.len());
    for edge in &graph.edges {
        println!(
            "{}\t{}\t{}",
            graph.nodes[edge.source].id, graph.nodes[edge.target].id, edge.weight
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref());

    if args.summary {
        return print_summary(&args.data);
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    let data = args.data;
    eframe::run_native(
        "TEA Atlas",
        options,
        Box::new(move |cc| Ok(Box::new(app::TeaAtlasApp::new(cc, data)))),
    )
    .map_err(|error| anyhow!("failed to start the window: {error}"))
}

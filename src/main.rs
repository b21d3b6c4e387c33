//! akh-prose CLI: plan text for a semantic graph.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use akh_prose::config::{load_graph, ProseConfig};
use akh_prose::graph::{NodeId, SemanticGraph};
use akh_prose::planner::ContentPlanner;

#[derive(Parser)]
#[command(name = "akh-prose", version, about = "Graph-to-text content planner")]
struct Cli {
    /// Planner, ontology and lexicon configuration (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan paragraphs for a graph document.
    Plan {
        /// Graph document (JSON).
        #[arg(long)]
        graph: PathBuf,

        /// Root node id; defaults to the document's root.
        #[arg(long)]
        root: Option<u64>,

        /// The reader's node id, never referred to by pronoun.
        #[arg(long)]
        user: Option<u64>,

        /// Realize every sibling instead of summarizing long lists.
        #[arg(long)]
        full: bool,

        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show how a graph would be split into paragraphs.
    Segment {
        /// Graph document (JSON).
        #[arg(long)]
        graph: PathBuf,

        /// Root node id; defaults to the document's root.
        #[arg(long)]
        root: Option<u64>,
    },

    /// Validate the configuration and print a summary.
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Paragraph headers and a plain reading of each sentence.
    Text,
    /// The full plan, trees included.
    Json,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ProseConfig::load(path)?,
        None => ProseConfig::default(),
    };

    match cli.command {
        Commands::Plan {
            graph,
            root,
            user,
            full,
            format,
        } => {
            let (mut plan_config, ontology, lexicon) = config.into_parts()?;
            if full {
                plan_config.full_disclosure = true;
            }
            if let Some(user) = user {
                plan_config.user = Some(node_id(user)?);
            }
            let (graph_data, root) = open_graph(&graph, root)?;
            let planner = ContentPlanner::new(&ontology, &lexicon, plan_config);
            let plan = planner.plan(&graph_data, root)?;
            match format {
                Format::Text => println!("{}", plan.preview()),
                Format::Json => {
                    let json = serde_json::to_string_pretty(&plan).into_diagnostic()?;
                    println!("{json}");
                }
            }
        }

        Commands::Segment { graph, root } => {
            let (plan_config, ontology, lexicon) = config.into_parts()?;
            let (graph_data, root) = open_graph(&graph, root)?;
            let planner = ContentPlanner::new(&ontology, &lexicon, plan_config);
            let segmentation = planner.segment(&graph_data, root)?;
            let json = serde_json::to_string_pretty(&segmentation).into_diagnostic()?;
            println!("{json}");
        }

        Commands::Check => {
            let (plan_config, _ontology, lexicon) = config.into_parts()?;
            println!("Configuration OK");
            println!("  templates:         {}", lexicon.len());
            for property in lexicon.properties() {
                println!("    {property}");
            }
            println!("  summary threshold: {}", plan_config.summary_threshold);
            println!("  max conjuncts:     {}", plan_config.max_conjuncts);
            println!("  full disclosure:   {}", plan_config.full_disclosure);
        }
    }

    Ok(())
}

fn node_id(raw: u64) -> Result<NodeId> {
    NodeId::new(raw).ok_or_else(|| miette::miette!("node ids start at 1, got {raw}"))
}

/// Load a graph and settle on the root: the flag wins over the document.
fn open_graph(path: &Path, root: Option<u64>) -> Result<(SemanticGraph, NodeId)> {
    let (graph, document_root) = load_graph(path)?;
    let root = match root {
        Some(raw) => node_id(raw)?,
        None => document_root.ok_or_else(|| {
            miette::miette!(
                help = "Pass --root or set `root` in the graph document.",
                "no root node for {}",
                path.display()
            )
        })?,
    };
    Ok((graph, root))
}

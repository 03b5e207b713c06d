use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod answer;
pub mod bootstrap;
pub mod cli;
pub mod corpus;
pub mod data_dir;
pub mod doc_id;
pub mod document;
pub mod error;
pub mod graph;
pub mod providers;
pub mod report;
pub mod resume;
pub mod service;
pub mod store;
pub mod tokenize;
pub mod walker;

use cli::{Cli, Command};
use corpus::SourceDir;
use data_dir::DataDir;
use providers::{OpenAiClient, OpenAiConfig};
use service::{Dashboard, QueryRequest};
use store::VectorDb;

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("KRONOSCOPE_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Folders { json } => {
            let source = SourceDir::resolve(cli.source_dir.as_deref())?;
            let folders = source.list_folders()?;
            if json {
                println!("{}", serde_json::to_string(&folders)?);
            } else {
                for folder in &folders {
                    println!("{folder}");
                }
            }
        }
        Command::Wordcloud(args) => {
            let source = SourceDir::resolve(cli.source_dir.as_deref())?;
            let text = source.load_lowercased(&args.folders)?;
            let ranked =
                tokenize::rank(&tokenize::tokenize(&text), args.words);
            println!("{}", serde_json::to_string(&ranked)?);
        }
        Command::Ask(ref args) => {
            let dashboard = open_dashboard(&cli)?;
            let answer = dashboard.llm_query(&QueryRequest {
                query: args.query.clone(),
                folders: args.folders.clone(),
            })?;
            println!("{answer}");
        }
        Command::People => {
            let graph = graph::people_graph()?;
            println!("{}", serde_json::to_string(&graph)?);
        }
        Command::Resume { name } => {
            let source = SourceDir::resolve(cli.source_dir.as_deref())?;
            let text = resume::lookup(&source.resumes_dir(), &name)?;
            print!("{text}");
        }
        Command::Report(args) => {
            let data_dir = DataDir::resolve(cli.data_dir.as_deref())?;
            let store = VectorDb::open(&data_dir.vectors_db())?;
            let report = report::generate(&store, &args.sources)?;
            println!("{}", serde_json::to_string(&report)?);
        }
        Command::Bootstrap => {
            let dashboard = open_dashboard(&cli)?;
            let stats = dashboard.bootstrap()?;
            eprintln!(
                "Embedded {} documents ({} unchanged, {} pruned).",
                stats.embedded, stats.skipped, stats.pruned
            );
        }
        Command::Status { json } => {
            cmd_status(&cli, json)?;
        }
        Command::Completions(args) => {
            args.generate();
        }
    }

    Ok(())
}

/// Wire the dashboard service with the hosted OpenAI-compatible provider.
/// Only commands that reach the external model pay the configuration cost.
fn open_dashboard(cli: &Cli) -> error::Result<Dashboard> {
    let source = SourceDir::resolve(cli.source_dir.as_deref())?;
    let data_dir = DataDir::resolve(cli.data_dir.as_deref())?;
    let store = VectorDb::open(&data_dir.vectors_db())?;

    let config = OpenAiConfig::from_env()?;
    let embedder = OpenAiClient::new(config.clone());
    let generator = OpenAiClient::new(config);

    Ok(Dashboard::new(
        source,
        store,
        Box::new(embedder),
        Box::new(generator),
    ))
}

fn cmd_status(cli: &Cli, json: bool) -> error::Result<()> {
    let source = SourceDir::resolve(cli.source_dir.as_deref())?;
    let data_dir = DataDir::resolve(cli.data_dir.as_deref())?;
    let store = VectorDb::open(&data_dir.vectors_db())?;

    let folders = source.list_folders()?;
    let documents = store.list_ids()?.len();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "source_dir": source.root().display().to_string(),
                "data_dir": data_dir.root().display().to_string(),
                "folders": folders,
                "documents": documents,
            })
        );
    } else {
        println!("Source directory: {}", source.root().display());
        println!("Data directory: {}", data_dir.root().display());
        println!("Folders: {}", folders.len());
        for folder in &folders {
            println!("  {folder}");
        }
        println!("Embedded documents: {documents}");
    }
    Ok(())
}

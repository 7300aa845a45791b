use anyhow::{Context, Result};
use boolsearch::batch::{read_queries, BatchRunner};
use boolsearch::config::{ErrorPolicy, SearchConfig};
use boolsearch::index::InvertedIndex;
use boolsearch::output;
use boolsearch::query::{build_tree, search, tokenize};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "boolsearch")]
#[command(about = "Boolean keyword search over an inverted index")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// When to use colors
    #[arg(long, value_enum, global = true)]
    color: Option<ColorMode>,

    /// Worker threads
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Hide progress bars
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorMode {
    Auto,
    Never,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index, answer every query, and write the submission file
    Run {
        #[arg(long)]
        docs_file: PathBuf,
        #[arg(long)]
        queries_file: PathBuf,
        #[arg(long)]
        objects_file: PathBuf,
        /// Output file with relevances
        #[arg(long)]
        submission_file: PathBuf,
        /// What to do with queries that fail to parse
        #[arg(long, value_enum)]
        on_error: Option<ErrorPolicy>,
    },
    /// Evaluate a single query and print matching documents
    Query {
        #[arg(long)]
        docs_file: PathBuf,
        #[arg(trailing_var_arg = true, required = true)]
        query: Vec<String>,
    },
    /// Show tokens and the expression tree of a query
    Parse {
        #[arg(trailing_var_arg = true, required = true)]
        query: Vec<String>,
    },
    /// Show index statistics
    Stats {
        #[arg(long)]
        docs_file: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::default(),
    };
    if let Some(threads) = cli.threads {
        config.threads = Some(threads);
    }
    match cli.color {
        Some(ColorMode::Auto) => config.color = true,
        Some(ColorMode::Never) => config.color = false,
        None => {}
    }
    if cli.no_progress {
        config.progress = false;
    }
    config.init_thread_pool()?;

    match cli.command {
        Commands::Run {
            docs_file,
            queries_file,
            objects_file,
            submission_file,
            on_error,
        } => {
            if let Some(policy) = on_error {
                config.on_error = policy;
            }

            let index = InvertedIndex::open_with_progress(&docs_file, config.progress)?;
            let queries = read_queries(&queries_file, config.on_error)?;
            let (results, summary) = BatchRunner::new(config.on_error)
                .with_progress(config.progress)
                .run(&index, &queries)?;
            let written = results.write_submission_file(&objects_file, &submission_file, &index)?;

            println!(
                "{} queries ({} failed, {} empty), {} objects written ({} relevant) to {}",
                summary.queries,
                summary.failed,
                summary.empty,
                written.rows,
                written.relevant,
                submission_file.display()
            );
        }
        Commands::Query { docs_file, query } => {
            let query = query.join(" ");
            let index = InvertedIndex::open_with_progress(&docs_file, config.progress)?;
            let docs = search(&query, &index).with_context(|| format!("query {:?}", query))?;
            output::print_matches(&query, &index.doc_names(&docs), config.color)?;
        }
        Commands::Parse { query } => {
            let query = query.join(" ");
            let tokens = tokenize(&query);
            let tree = build_tree(&tokens).with_context(|| format!("query {:?}", query))?;
            output::print_parse(&tokens, &tree, config.color)?;
        }
        Commands::Stats { docs_file, json } => {
            let stats = InvertedIndex::open_with_progress(&docs_file, config.progress)?.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                stats.print();
            }
        }
    }

    Ok(())
}

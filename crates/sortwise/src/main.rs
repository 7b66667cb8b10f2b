mod cli;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use sortwise_core::kernel::constants::{APP_NAME, APP_VERSION};
use sortwise_core::storage::metadata_list::load_all;
use sortwise_core::{
    BasicConditionEvaluator, FileMetadataSource, GameState, LoadOrderPipeline, MetadataSource,
    PluginMetadata, Result, ScanList, ScanListExtractor, SortConfig, Strictness,
};

use crate::cli::ReportPrinter;

/// Sortwise: sorts game plugins into a working load order
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute and print a load order
    Sort {
        #[command(flatten)]
        inputs: InputArgs,

        /// Break mutual load-after pairs instead of failing
        #[arg(long)]
        lenient: bool,
    },
    /// Report missing and incompatible files without sorting
    Check {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Metadata list, least specific first; may be repeated
    #[arg(long = "list", value_name = "FILE")]
    lists: Vec<PathBuf>,

    /// Content scan list describing the installed plugins
    #[arg(long, value_name = "FILE")]
    scan: PathBuf,

    /// Game data directory; defaults to treating every scanned plugin as installed
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Sort settings file (JSON, YAML or TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Language to show messages in
    #[arg(long)]
    language: Option<String>,
}

struct Session {
    pipeline: LoadOrderPipeline,
    extractor: ScanListExtractor,
    lists: Vec<Vec<PluginMetadata>>,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(level);
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        eprintln!("Failed to initialize logging: {}", e);
    }
}

async fn open_session(inputs: &InputArgs, strictness: Option<Strictness>) -> Result<Session> {
    let mut config = match &inputs.config {
        Some(path) => SortConfig::load(path)?,
        None => SortConfig::default(),
    };
    if let Some(language) = &inputs.language {
        config.language = language.clone();
    }
    if let Some(strictness) = strictness {
        config.strictness = strictness;
    }
    debug!("Using settings: {:?}", config);

    let sources: Vec<Box<dyn MetadataSource>> = inputs
        .lists
        .iter()
        .map(|path| Box::new(FileMetadataSource::new(path)) as Box<dyn MetadataSource>)
        .collect();
    let lists = load_all(&sources).await?;

    let extractor = ScanListExtractor::new(ScanList::load(&inputs.scan).await?);
    let names = extractor.plugin_names().to_vec();

    let state = match &inputs.data_dir {
        Some(dir) => GameState::from_data_dir(dir)?,
        None => GameState::new().with_files(&names),
    }
    .with_active(&names);

    let pipeline = LoadOrderPipeline::new(Arc::new(BasicConditionEvaluator::new()), state)
        .with_config(config);

    Ok(Session {
        pipeline,
        extractor,
        lists,
    })
}

async fn sort(inputs: &InputArgs, lenient: bool) -> Result<ExitCode> {
    let strictness = lenient.then_some(Strictness::Lenient);
    let session = open_session(inputs, strictness).await?;
    let names = session.extractor.plugin_names().to_vec();

    let report = session
        .pipeline
        .run_with_extractor(&session.extractor, &names, session.lists)
        .await?;

    let printer = ReportPrinter::new(&session.pipeline.config().language);
    printer.print_report(&report);

    if report.is_sorted() {
        info!("Load order computed for {} plugins", report.plugins().len());
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

async fn check(inputs: &InputArgs) -> Result<ExitCode> {
    let session = open_session(inputs, None).await?;
    let names = session.extractor.plugin_names().to_vec();

    let scans = session.pipeline.scan(&session.extractor, &names)?;
    let (_, problems) = session.pipeline.prepare(scans, session.lists).await?;

    ReportPrinter::new(&session.pipeline.config().language).print_problems(&problems);

    if problems.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose);
    info!("{} v{}", APP_NAME, APP_VERSION);

    let result = match &args.command {
        Commands::Sort { inputs, lenient } => sort(inputs, *lenient).await,
        Commands::Check { inputs } => check(inputs).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

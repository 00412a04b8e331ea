use anyhow::{bail, Context};
use cinesim::{
    facet_filter, load_export, ItemId, Pipeline, PipelineConfig, Record, Recommender,
};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Content-based movie similarity index
#[derive(Parser, Debug)]
#[command(name = "cinesim")]
#[command(about = "Build and query a TF-IDF movie similarity matrix", long_about = None)]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge, filter, vectorize and export
    Build(BuildArgs),
    /// Print the items most similar to one item of an export
    Similar(SimilarArgs),
}

#[derive(ClapArgs, Debug)]
struct BuildArgs {
    /// JSON array of primary records (movies)
    #[arg(long)]
    left: PathBuf,

    /// JSON array of secondary records (credits)
    #[arg(long)]
    right: PathBuf,

    /// Pipeline configuration as JSON; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Export directory
    #[arg(short, long, default_value = "./export")]
    out: PathBuf,

    /// Override the configured vocabulary cap
    #[arg(long)]
    max_features: Option<usize>,
}

#[derive(ClapArgs, Debug)]
#[command(group = clap::ArgGroup::new("query").required(true).args(["id", "title"]))]
struct SimilarArgs {
    /// Export directory written by `build`
    #[arg(short, long, default_value = "./export")]
    data: PathBuf,

    #[arg(long)]
    id: Option<String>,

    #[arg(long)]
    title: Option<String>,

    #[arg(short = 'k', long, default_value_t = 10)]
    top_k: usize,

    /// Only keep neighbours with any of these genres
    #[arg(long)]
    genre: Vec<String>,

    /// Only keep neighbours featuring any of these actors
    #[arg(long)]
    actor: Vec<String>,

    /// Only keep neighbours produced in any of these countries
    #[arg(long)]
    country: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Build(build) => run_build(build),
        Command::Similar(similar) => run_similar(similar),
    }
}

fn run_build(args: BuildArgs) -> anyhow::Result<()> {
    info!("Starting cinesim v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            PipelineConfig::from_json(&json)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };
    if let Some(max_features) = args.max_features {
        config.max_features = max_features;
    }

    let pipeline = Pipeline::new(config)?;
    let left = read_records(&args.left)?;
    let right = read_records(&args.right)?;
    info!(left = left.len(), right = right.len(), "sources loaded");

    let output = pipeline.run(&left, &right)?;
    let manifest = output.export(&args.out, &pipeline.config().left_key)?;

    info!(
        items = manifest.items,
        vocabulary = manifest.vocabulary,
        dropped_by_status = output.report.rejected_status,
        "export written to {}",
        args.out.display()
    );
    Ok(())
}

fn run_similar(args: SimilarArgs) -> anyhow::Result<()> {
    let bundle = load_export(&args.data)?;
    let recommender = Recommender::new(bundle.catalog, bundle.matrix)?;

    let id = match (&args.id, &args.title) {
        (Some(raw), _) => match ItemId::parse(raw) {
            Some(id) => id,
            None => bail!("'{}' is not a valid item id", raw),
        },
        (None, Some(title)) => match recommender.find_by_field("title", title) {
            Some(item) => item.id.clone(),
            None => bail!("no item titled '{}'", title),
        },
        (None, None) => bail!("either --id or --title is required"),
    };

    let filter = facet_filter(&[
        ("genres", args.genre.as_slice()),
        ("cast", args.actor.as_slice()),
        ("production_countries", args.country.as_slice()),
    ]);
    let neighbours = recommender.similar(
        &id,
        args.top_k,
        filter.as_ref().map(|f| f as &dyn cinesim::Filter),
    )?;

    for neighbour in neighbours {
        let title = recommender
            .catalog()
            .get(&neighbour.id)
            .and_then(|item| item.get_str("title"))
            .unwrap_or("");
        println!("{:.4}\t{}\t{}", neighbour.score, neighbour.id, title);
    }
    Ok(())
}

fn read_records(path: &Path) -> anyhow::Result<Vec<Record>> {
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&data)
        .with_context(|| format!("{} is not a JSON array of objects", path.display()))
}

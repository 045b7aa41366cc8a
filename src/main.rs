use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use simx::{
    AttrType, CellId, CellRequest, ComparisonSession, EngineConfig, MeasureInput, MeasureRegistry, Scope, Value,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Statistical similarity between table columns and row groups
#[derive(Parser, Debug)]
#[command(name = "simx")]
#[command(about = "Type-dispatched statistical similarity measures", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered measures
    Measures {
        /// Only list measures of this scope (attributes or sets)
        #[arg(long)]
        scope: Option<Scope>,
    },
    /// Compare two samples stored as JSON arrays
    Compare {
        /// JSON array with the first sample
        #[arg(long)]
        a: PathBuf,

        /// JSON array with the second sample
        #[arg(long)]
        b: PathBuf,

        /// Type of the first sample
        #[arg(long)]
        type_a: AttrType,

        /// Type of the second sample
        #[arg(long)]
        type_b: AttrType,

        /// Compare row groups (sets) or whole attributes
        #[arg(long, default_value = "sets")]
        scope: Scope,

        /// JSON array with the full column, used as the resampling baseline
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Measure id; defaults to the first applicable measure
        #[arg(long)]
        measure: Option<String>,

        /// Engine configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Randomizations per permutation estimate
        #[arg(long)]
        permutations: Option<usize>,

        /// RNG seed for reproducible p-values
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn read_values(path: &Path) -> anyhow::Result<Vec<Value>> {
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
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

    debug!("Starting SimX v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Measures { scope } => {
            let measures: Vec<_> = MeasureRegistry::global()
                .iter()
                .filter(|m| scope.map_or(true, |s| m.scope() == s))
                .collect();
            println!("{}", serde_json::to_string_pretty(&measures)?);
        }
        Command::Compare {
            a,
            b,
            type_a,
            type_b,
            scope,
            reference,
            measure,
            config,
            permutations,
            seed,
        } => {
            let mut engine_config = match &config {
                Some(path) => EngineConfig::from_path(path)?,
                None => EngineConfig::default(),
            };
            if let Some(permutations) = permutations {
                engine_config.permutations = permutations;
            }
            if seed.is_some() {
                engine_config.seed = seed;
            }

            engine_config.validate()?;

            let session = ComparisonSession::new(&engine_config)?;
            let selected = match &measure {
                Some(id) => match MeasureRegistry::global().by_id(id) {
                    Some(m) if m.comparison().compares(type_a, type_b) && m.scope() == scope => m.clone(),
                    Some(_) => bail!("measure '{}' does not compare {} with {} ({})", id, type_a, type_b, scope),
                    None => bail!("unknown measure '{}'", id),
                },
                None => session
                    .manager()
                    .default_measure(type_a, type_b, scope)
                    .with_context(|| format!("no measure compares {} with {} ({})", type_a, type_b, scope))?,
            };
            info!("Comparing with {}", selected.id());

            let mut input = MeasureInput::new(read_values(&a)?, read_values(&b)?).with_types(type_a, type_b);
            if let Some(reference) = &reference {
                input = input.with_reference(read_values(reference)?);
            }

            let request = CellRequest {
                cell: CellId::new(format!("{}/{}", a.display(), b.display())),
                measure: selected,
                input,
                input_a: a.display().to_string(),
                input_b: b.display().to_string(),
                filtered: false,
            };

            let batch = session.begin_batch();
            let result = session.compare(&batch, request).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

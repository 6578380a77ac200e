use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

use schemaforge::catalog::TableFilter;
use schemaforge::config::{DbConfig, GenerationConfig};
use schemaforge::schema::{GenerationOutcome, SchemaManager};

#[derive(Debug, Clone, ValueEnum)]
enum Database {
    Postgres,
}

#[derive(Parser, Debug)]
#[command(name = "schemaforge")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Source database type
    database: Database,

    /// Output directory for the generated bundles
    #[arg(short, long, default_value = "./generated")]
    output: PathBuf,

    /// Primary catalog namespace to generate for
    #[arg(long, default_value = "public")]
    namespace: String,

    /// Comma-separated auxiliary namespaces scanned in the same run
    #[arg(long = "aux", value_delimiter = ',', default_value = "auth")]
    aux_namespaces: Vec<String>,

    /// Project identifier, used only to select which catalog to introspect
    #[arg(long, default_value = "")]
    project: String,

    /// Path to .env file for connection config
    #[arg(long, default_value = "./.env")]
    env_file: PathBuf,

    /// Comma-separated list of tables to include (default: all)
    #[arg(long, value_delimiter = ',')]
    tables: Option<Vec<String>>,

    /// Comma-separated list of tables to exclude
    #[arg(long, value_delimiter = ',')]
    exclude: Option<Vec<String>>,

    /// Boost a table's heuristic rank, as name=weight (repeatable)
    #[arg(long = "boost", value_parser = parse_boost)]
    boosts: Vec<(String, i64)>,

    /// Verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_boost(raw: &str) -> Result<(String, i64), String> {
    let (name, weight) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=weight, got '{}'", raw))?;
    let weight = weight
        .parse::<i64>()
        .map_err(|e| format!("invalid boost weight '{}': {}", weight, e))?;
    Ok((name.to_string(), weight))
}

fn main() {
    if let Err(e) = run() {
        error!(error = ?e, "Fatal error");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("schemaforge v{}", env!("CARGO_PKG_VERSION"));
    info!(
        database = ?cli.database,
        output = ?cli.output,
        namespace = ?cli.namespace,
        aux = ?cli.aux_namespaces,
        project = ?cli.project,
        "Starting generation"
    );

    let db_config =
        DbConfig::load(&cli.env_file).context("Failed to load database configuration")?;
    debug!(connection = ?db_config.redacted_connection_string(), "Loaded configuration");

    let filter = TableFilter {
        include: cli.tables,
        exclude: cli.exclude,
    };
    if filter.include.is_some() || filter.exclude.is_some() {
        debug!(filter = ?filter, "Table filter configured");
    }

    let config = GenerationConfig {
        namespace: cli.namespace,
        aux_namespaces: cli.aux_namespaces,
        project: cli.project,
        output_path: cli.output,
        filter,
        boosts: cli.boosts.into_iter().collect::<BTreeMap<_, _>>(),
    };
    let manager = SchemaManager::new(config);

    let outcomes = generate(&cli.database, &db_config, &manager)?;

    let mut complete = true;
    for outcome in &outcomes {
        let written = manager.write(outcome)?;
        info!(
            namespace = ?outcome.namespace,
            files = ?written.len(),
            "Wrote bundle"
        );
        if !outcome.is_complete() {
            complete = false;
            for failure in &outcome.failures {
                error!(namespace = ?outcome.namespace, error = %failure, "Target generation failed");
            }
        }
    }

    if !complete {
        bail!("Generation finished with failures; partial bundles are not valid output");
    }

    info!("Generation complete");
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn generate(
    database: &Database,
    db_config: &DbConfig,
    manager: &SchemaManager,
) -> Result<Vec<GenerationOutcome>> {
    match database {
        Database::Postgres => generate_postgres(db_config, manager),
    }
}

#[cfg(feature = "postgres")]
fn generate_postgres(
    db_config: &DbConfig,
    manager: &SchemaManager,
) -> Result<Vec<GenerationOutcome>> {
    use postgres::NoTls;
    use schemaforge::PostgresIntrospector;

    info!(connection = ?db_config.redacted_connection_string(), "Connecting to PostgreSQL");

    let mut client = postgres::Client::connect(&db_config.postgres_connection_string(), NoTls)
        .with_context(|| {
            format!(
                "Failed to connect to PostgreSQL at {}",
                db_config.redacted_connection_string()
            )
        })?;

    info!("Connected to database");

    let outcomes = {
        let mut introspector = PostgresIntrospector::new(&mut client);
        manager
            .run(&mut introspector)
            .context("Failed to read the catalog")?
    };

    // The catalog connection is done; everything after this point is
    // in-memory derivation and file output.
    drop(client);

    Ok(outcomes)
}

#[cfg(not(feature = "postgres"))]
fn generate_postgres(
    _db_config: &DbConfig,
    _manager: &SchemaManager,
) -> Result<Vec<GenerationOutcome>> {
    bail!("PostgreSQL support not enabled. Rebuild with --features postgres")
}

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use projection_resolver::{
    config,
    query_planner::{self, resolver::errors::ResolverError, ProjectionRequest},
};

/// Projection Resolver - resolve projection expressions against an input schema
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Projection request file (YAML or JSON)
    #[arg(long)]
    input: PathBuf,

    /// Resolver configuration file (YAML). Without it, settings come from
    /// PROJECTION_RESOLVER_* environment variables. Command line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Match field references to input columns ignoring ASCII case
    #[arg(long)]
    case_insensitive: bool,

    /// Maximum number of expressions in the resolved projection [default: 4096]
    #[arg(long)]
    max_projection_width: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl From<&Cli> for config::CliConfig {
    fn from(cli: &Cli) -> Self {
        config::CliConfig {
            case_insensitive: cli.case_insensitive,
            max_projection_width: cli.max_projection_width,
        }
    }
}

fn load_request(path: &Path) -> anyhow::Result<ProjectionRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let request = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML in {}", path.display()))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", path.display()))?,
    };
    Ok(request)
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let resolver_config = config::ResolverConfig::load(cli.config.as_deref(), &cli.into())?;
    log::debug!("Resolver configuration: {:?}", resolver_config);

    let request = load_request(&cli.input)?;
    let resolved = query_planner::evaluate_projection(&request, resolver_config)?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&resolved)?
    } else {
        serde_json::to_string(&resolved)?
    };
    Ok(output)
}

fn main() {
    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let internal = e
                .downcast_ref::<ResolverError>()
                .is_some_and(ResolverError::is_internal);
            std::process::exit(if internal { 2 } else { 1 });
        }
    }
}

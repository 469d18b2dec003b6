use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

use fair_client::config::{load_config, loader, ConfigError};
use fair_client::observability::init_logging;
use fair_client::{
    BlockingFairClient, ClientConfig, DataId, Extracted, JobRequest, JobType, ValidationError,
};

#[derive(Parser)]
#[command(name = "fair-cli")]
#[command(about = "Command-line client for the FAIR data and compute service", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Service origin, overrides the configuration
    #[arg(short = 'u', long)]
    base_url: Option<String>,

    /// Log level, overrides the configuration
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file with JSON metadata
    Upload {
        file: PathBuf,
        #[arg(short, long)]
        metadata: String,
    },
    /// Search registered metadata
    Search { query: String },
    /// Mint a PID for JSON metadata
    Mint {
        metadata: String,
        #[arg(short, long)]
        namespace: Option<String>,
    },
    /// Delete a PID
    Delete { pid: String },
    /// Apply JSON changes to a PID's metadata
    Update { pid: String, changes: String },
    /// Show the metadata of a PID
    Metadata { pid: String },
    /// Create a namespace described by JSON metadata
    Namespace { namespace: String, metadata: String },
    /// Submit a compute job
    Compute(ComputeArgs),
    /// List running compute jobs
    Jobs,
    /// Show the status of a compute job
    Status { pid: String },
    /// Show the evidence graph of a PID
    Evidence { pid: String },
    /// Download the data behind a PID
    Download {
        pid: String,
        /// Target path, defaults to the PID's distribution name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ComputeArgs {
    /// Dataset PID, repeat for several
    #[arg(short, long = "data", required = true)]
    data: Vec<String>,
    #[arg(short, long)]
    script: String,
    /// spark, nipype or custom
    #[arg(short = 't', long = "type")]
    job_type: String,
    /// Container PID, required for custom jobs
    #[arg(short, long)]
    container: Option<String>,
    #[arg(short, long)]
    namespace: Option<String>,
}

impl ComputeArgs {
    /// One `--data` flag submits a single PID, several submit a list.
    fn into_job(mut self) -> Result<JobRequest, ValidationError> {
        let job_type: JobType = self.job_type.parse()?;
        let data_id = if self.data.len() == 1 {
            DataId::Single(self.data.remove(0))
        } else {
            DataId::Many(self.data)
        };

        let mut job = JobRequest::new(data_id, self.script, job_type);
        job.container_id = self.container;
        job.namespace = self.namespace;
        Ok(job)
    }
}

/// Config file (or defaults) with `FAIR_*` environment overrides, then
/// `--base-url` on top.
fn resolve_config(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => loader::from_env()?,
    };
    if let Some(url) = &cli.base_url {
        config.service.base_url = url.clone();
    }
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    let level = cli
        .log_level
        .unwrap_or_else(|| config.observability.log_level.clone());
    init_logging(&level);

    let client = BlockingFairClient::new(config)?;

    match cli.command {
        Commands::Upload { file, metadata } => {
            let metadata = parse_json_arg(&metadata)?;
            print_extracted(client.upload_file(&file, &metadata)?)?;
        }
        Commands::Search { query } => {
            print_extracted(client.search(&query)?)?;
        }
        Commands::Mint { metadata, namespace } => {
            let metadata = parse_json_arg(&metadata)?;
            print_extracted(client.mint_id(&metadata, namespace.as_deref())?)?;
        }
        Commands::Delete { pid } => {
            print_json(&client.delete_id(&pid)?)?;
        }
        Commands::Update { pid, changes } => {
            let changes = parse_json_arg(&changes)?;
            print_json(&client.update_pid(&pid, &changes)?)?;
        }
        Commands::Metadata { pid } => {
            print_json(&client.retrieve_metadata(&pid)?)?;
        }
        Commands::Namespace { namespace, metadata } => {
            let metadata = parse_json_arg(&metadata)?;
            print_json(&client.create_namespace(&namespace, &metadata)?)?;
        }
        Commands::Compute(args) => {
            let job = args.into_job()?;
            println!("{}", client.compute(&job)?);
        }
        Commands::Jobs => {
            print_extracted(client.list_running_jobs()?)?;
        }
        Commands::Status { pid } => {
            print_json(&client.check_job_status(&pid)?)?;
        }
        Commands::Evidence { pid } => {
            print_json(&client.evidence_graph(&pid)?)?;
        }
        Commands::Download { pid, output } => {
            let path = client.download_file(&pid, output.as_deref())?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn parse_json_arg(raw: &str) -> Result<Value, Box<dyn std::error::Error>> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON argument: {}", e).into())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Stdout text for an unwrapped answer, plus a warning when only the raw
/// body came back.
fn render_extracted<T: Serialize>(
    result: Extracted<T>,
) -> Result<(String, Option<String>), serde_json::Error> {
    match result {
        Extracted::Found(value) => Ok((serde_json::to_string_pretty(&value)?, None)),
        Extracted::Raw { field, body } => {
            let warning = format!(
                "Warning: response has no usable {:?} field, showing raw body",
                field
            );
            Ok((serde_json::to_string_pretty(&body)?, Some(warning)))
        }
    }
}

fn print_extracted<T: Serialize>(result: Extracted<T>) -> Result<(), Box<dyn std::error::Error>> {
    let (output, warning) = render_extracted(result)?;
    if let Some(warning) = warning {
        eprintln!("{}", warning);
    }
    println!("{}", output);
    Ok(())
}

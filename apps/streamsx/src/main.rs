//! streamsx - build and submit applications to a Streaming Analytics service
//!
//! Thin CLI over the service crate: it loads configuration, picks the
//! service credentials, runs one command and renders the result.

mod cli;
mod display;
mod error;
mod wait;

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::display::{OperationResult, OutputRenderer};
use crate::error::CliError;
use crate::wait::{wait_for_build, PollPolicy};
use clap::Parser;
use serde_json::Value;
use std::path::Path;
use std::process;
use streamsx_config::Config;
use streamsx_errors::ConfigError;
use streamsx_net::NetClient;
use streamsx_service::{read_archive, StreamsService};
use streamsx_types::{BuildProgress, BuildRequest, BuildStatus, JsonObject};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting streamsx v{}", env!("CARGO_PKG_VERSION"));

    // 1. File config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Environment
    config.merge_env()?;

    // 3. CLI flags
    apply_cli_config(&mut config, &cli.global, &cli.command);

    let descriptor = config.service.service_descriptor().await?;
    let net = NetClient::new(&config.net_config())?;
    let service = StreamsService::from_descriptor(&descriptor, net)?;
    info!(
        service = service.name().unwrap_or("<credentials>"),
        version = %service.version(),
        "using service"
    );

    let renderer = OutputRenderer::new(cli.global.json);
    let policy = PollPolicy {
        interval: config.poll_interval(),
        max_attempts: config.poll.max_attempts,
    };
    let result = execute_command(cli.command, &service, policy).await?;
    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    service: &StreamsService,
    policy: PollPolicy,
) -> Result<OperationResult, CliError> {
    match command {
        Commands::Status { require_running } => {
            let status = if require_running {
                service.ensure_running().await?
            } else {
                service.instance_status().await?
            };
            Ok(OperationResult::Status(status))
        }

        Commands::Submit { bundle, job_config } => {
            let bundle = read_archive(&bundle).await?;
            let job_config = read_json(job_config.as_deref()).await?;
            let job = service.submit_bundle(&bundle, &job_config).await?;
            Ok(OperationResult::Job(job))
        }

        Commands::Build {
            archive,
            name,
            build_config,
            job_config,
            wait,
            ..
        } => {
            let build_name = match name {
                Some(name) => name,
                None => archive
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        CliError::InvalidArguments(format!(
                            "cannot derive a build name from {}; pass --name",
                            archive.display()
                        ))
                    })?,
            };

            let build_options = match read_json(build_config.as_deref()).await? {
                Value::Object(options) => options,
                _ => {
                    return Err(CliError::InvalidArguments(
                        "build options must be a JSON object".to_string(),
                    ))
                }
            };
            let job_config = read_json(job_config.as_deref()).await?;

            let request =
                BuildRequest::new(read_archive(&archive).await?, build_name).with_config(build_options);

            match service.build_and_submit(&request, &job_config).await? {
                BuildProgress::Submitted(job) => Ok(OperationResult::Job(job)),
                BuildProgress::Failed(record) => Ok(OperationResult::Build(record)),
                BuildProgress::Pending(record) if wait => {
                    let record = wait_for_build(service, record, policy).await?;
                    if record.status == BuildStatus::Built {
                        let job = service.submit_built(&record, &job_config).await?;
                        Ok(OperationResult::Job(job))
                    } else {
                        warn!(build_id = %record.id, "build failed");
                        Ok(OperationResult::Build(record))
                    }
                }
                BuildProgress::Pending(record) => Ok(OperationResult::Build(record)),
            }
        }

        Commands::BuildStatus { build_id } => {
            let record = service.get_build(&build_id).await?;
            Ok(OperationResult::Build(record))
        }

        Commands::BuildOutput {
            build_id,
            output_id,
        } => {
            let output = service.get_build_output(&build_id, &output_id).await?;
            Ok(OperationResult::BuildOutput(output))
        }
    }
}

/// Read a JSON document, or an empty object when no path is given
async fn read_json(path: Option<&Path>) -> Result<Value, CliError> {
    let Some(path) = path else {
        return Ok(Value::Object(JsonObject::new()));
    };

    let text = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&text).map_err(|e| {
        CliError::Service(
            ConfigError::ParseError {
                message: format!("{}: {e}", path.display()),
            }
            .into(),
        )
    })
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &GlobalArgs, command: &Commands) {
    let service = &mut config.service;
    if let Some(vcap) = &global.vcap_services {
        service.vcap_services = Some(vcap.clone());
    }
    if let Some(name) = &global.service_name {
        service.service_name = Some(name.clone());
    }
    if let Some(path) = &global.credentials {
        service.credentials_file = Some(path.clone());
    }
    if let Some(endpoint) = &global.endpoint {
        service.endpoint = Some(endpoint.clone());
    }
    if let Some(username) = &global.username {
        service.username = Some(username.clone());
    }
    if let Some(password) = &global.password {
        service.password = Some(password.clone());
    }

    // Command-specific CLI flags
    if let Commands::Build {
        poll_interval,
        max_attempts,
        ..
    } = command
    {
        if let Some(interval) = poll_interval {
            config.poll.interval = *interval;
        }
        if let Some(attempts) = max_attempts {
            config.poll.max_attempts = *attempts;
        }
    }
}

fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;
    let filter = |default: &str| {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default))
    };

    if debug_enabled {
        // Debug mode: structured JSON logs to file
        if let Some(file) = open_log_file() {
            tracing_subscriber::fmt()
                .json()
                .with_writer(file)
                .with_env_filter(filter("info,streamsx=debug,streamsx_service=debug"))
                .init();
            return;
        }
    }

    if json_mode {
        // Keep stdout clean for the JSON result
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter("warn,streamsx=warn"))
            .init();
    }
}

fn open_log_file() -> Option<std::fs::File> {
    let log_dir = dirs::data_local_dir()?.join("streamsx").join("logs");
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {e}");
        return None;
    }

    let log_file = log_dir.join(format!(
        "streamsx-{}.log",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ));
    match std::fs::File::create(&log_file) {
        Ok(file) => {
            eprintln!("Debug logging enabled: {}", log_file.display());
            Some(file)
        }
        Err(e) => {
            eprintln!("Warning: Failed to create log file: {e}");
            None
        }
    }
}

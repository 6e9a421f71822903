//! Command line interface definition

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// streamsx - build and submit applications to a Streaming Analytics service
#[derive(Parser)]
#[command(name = "streamsx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build and submit applications to a Streaming Analytics service")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Args)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Write debug logs to the streamsx log directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// VCAP services document, inline JSON or a file path
    #[arg(long, global = true, value_name = "JSON|PATH")]
    pub vcap_services: Option<String>,

    /// Name of the streaming-analytics service to use
    #[arg(long, global = true, value_name = "NAME")]
    pub service_name: Option<String>,

    /// Bare service credentials file, used instead of VCAP services
    #[arg(long, global = true, value_name = "PATH")]
    pub credentials: Option<PathBuf>,

    /// Override the service REST or resources URL
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Override the V1 user id
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Override the V1 password
    #[arg(long, global = true)]
    pub password: Option<String>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the service instance status
    Status {
        /// Fail unless the instance is enabled and running
        #[arg(long)]
        require_running: bool,
    },

    /// Submit a prebuilt application bundle as a job
    Submit {
        /// Path to the bundle (.sab)
        bundle: PathBuf,

        /// JSON job configuration file
        #[arg(long, value_name = "PATH")]
        job_config: Option<PathBuf>,
    },

    /// Upload an application archive, build it, and submit the result
    Build {
        /// Path to the application archive (.zip)
        archive: PathBuf,

        /// Build name (defaults to the archive file stem)
        #[arg(long)]
        name: Option<String>,

        /// JSON file with extra build options
        #[arg(long, value_name = "PATH")]
        build_config: Option<PathBuf>,

        /// JSON job configuration file
        #[arg(long, value_name = "PATH")]
        job_config: Option<PathBuf>,

        /// Poll until the build settles, then submit the job
        #[arg(long)]
        wait: bool,

        /// Seconds between polls
        #[arg(long, value_name = "SECS")]
        poll_interval: Option<u64>,

        /// Give up after this many polls
        #[arg(long, value_name = "COUNT")]
        max_attempts: Option<u32>,
    },

    /// Show the current state of a build
    #[command(name = "build-status")]
    BuildStatus {
        /// Build identifier
        build_id: String,
    },

    /// Fetch one output of a build
    #[command(name = "build-output")]
    BuildOutput {
        /// Build identifier
        build_id: String,

        /// Output identifier
        output_id: String,
    },
}

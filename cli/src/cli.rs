//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;
use crate::domain::config::{
    COMMAND_TIMEOUT_ENV, DIRECT_DOWNLOAD_ENV, ENTRY_POINT_ENV, SERVICE_KEYWORD_ENV,
    SERVICE_TYPES_ENV, VCAP_SERVICES_ENV, VERIFY_TLS_ENV, WORK_DIR_ENV,
};

/// Seeker agent provisioning for Node.js application staging
#[derive(Parser)]
#[command(
    name = "seeker-provision",
    version,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = FalseyValueParser::new()
    )]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install the Seeker agent into a compiled application (staging hook)
    AfterCompile(AfterCompileArgs),

    /// Resolve the Seeker service credential and print it as JSON
    Resolve(MatchArgs),

    /// Show version
    Version(VersionArgs),
}

/// Which service binding supplies the Seeker credential.
#[derive(Args, Debug, Clone)]
pub struct MatchArgs {
    /// Service-binding catalog (JSON)
    #[arg(
        long,
        env = VCAP_SERVICES_ENV,
        default_value = "",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub vcap_services: String,

    /// Service types accepted as the Seeker service (comma-separated)
    #[arg(
        long,
        env = SERVICE_TYPES_ENV,
        value_delimiter = ',',
        default_value = "seeker-security-service"
    )]
    pub service_types: Vec<String>,

    /// Keyword matched against service names, labels, and tags; empty disables
    #[arg(long, env = SERVICE_KEYWORD_ENV, default_value = "seeker")]
    pub service_keyword: String,
}

/// Arguments of the staging hook.
#[derive(Args, Debug, Clone)]
pub struct AfterCompileArgs {
    /// Compiled application directory
    pub build_dir: PathBuf,

    /// Buildpack cache directory
    pub cache_dir: PathBuf,

    /// Dependencies directory
    pub deps_dir: PathBuf,

    /// Index of this buildpack's layer in the dependencies directory
    pub deps_idx: String,

    #[command(flatten)]
    pub matching: MatchArgs,

    /// Application entry point to load the agent from, relative to BUILD_DIR
    #[arg(long, env = ENTRY_POINT_ENV)]
    pub entry_point: Option<String>,

    /// Download the Node.js agent directly instead of the sensor installer
    #[arg(
        long,
        env = DIRECT_DOWNLOAD_ENV,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub direct_download: Option<String>,

    /// Base directory for the download scratch area and agent package
    #[arg(long, env = WORK_DIR_ENV)]
    pub work_dir: Option<PathBuf>,

    /// Verify the certificate of an https enterprise server
    #[arg(
        long,
        env = VERIFY_TLS_ENV,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub verify_tls: Option<String>,

    /// Kill unzip/npm after this many seconds
    #[arg(long, env = COMMAND_TIMEOUT_ENV)]
    pub command_timeout: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct VersionArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            quiet,
            no_color,
            command,
        } = self;
        let output = OutputFlags { no_color, quiet };
        match command {
            Command::Version(args) => {
                commands::version::run(args.json);
                Ok(())
            }
            Command::Resolve(args) => commands::resolve::run(&args),
            Command::AfterCompile(args) => {
                let settings = commands::after_compile::settings(&args)?;
                let app = AppContext::new(&AppFlags {
                    output,
                    command_timeout: settings.command_timeout,
                });
                commands::after_compile::run(&app, &args, &settings).await
            }
        }
    }
}

//! IAM Role Cloner CLI
//!
//! Clones IAM roles from one AWS profile into another, rewriting an
//! environment pattern in role names, policy documents and tags.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use log::debug;

use iam_role_cloner_core::{
    BuildInfo, CloneOptions, CloneRunOutcome, ListOptions, Reporter, RoleClonerService, StdinInput,
};

#[derive(Parser, Debug)]
#[command(name = "iam-role-cloner")]
#[command(about = "Clone IAM roles between AWS environments with pattern replacement")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clone IAM roles between AWS profiles
    Clone(CloneArgs),
    /// List IAM roles in an AWS profile
    List(ListArgs),
    /// Show version information
    Version {
        /// Show detailed build information
        #[arg(short = 'e', long)]
        detailed: bool,
    },
}

#[derive(Args, Debug)]
struct CloneArgs {
    /// Source AWS profile (prompted for when omitted)
    #[arg(short, long, env = "IAM_ROLE_CLONER_SOURCE_PROFILE")]
    source_profile: Option<String>,

    /// Destination AWS profile (prompted for when omitted)
    #[arg(short, long, env = "IAM_ROLE_CLONER_DEST_PROFILE")]
    dest_profile: Option<String>,

    /// Pattern to replace, e.g. "dev_"
    #[arg(long, env = "IAM_ROLE_CLONER_SOURCE_PATTERN")]
    source_pattern: Option<String>,

    /// Replacement pattern, e.g. "prod_"
    #[arg(long, env = "IAM_ROLE_CLONER_DEST_PATTERN")]
    dest_pattern: Option<String>,

    /// Show what would be done without making any changes
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Log file path (default: iam-clone-<timestamp>.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// AWS profile to use
    #[arg(
        short,
        long,
        env = "AWS_PROFILE",
        value_parser = clap::builder::NonEmptyStringValueParser::new()
    )]
    profile: String,

    /// Filter roles by pattern (case-insensitive)
    #[arg(long)]
    pattern: Option<String>,

    /// Show detailed information for each role
    #[arg(long)]
    details: bool,

    /// Sort roles alphabetically
    #[arg(long)]
    sort: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Clone(args)) => args.verbose,
            Some(Command::List(args)) => args.verbose,
            _ => false,
        }
    }
}

fn build_info() -> BuildInfo {
    BuildInfo::new(
        env!("CARGO_PKG_VERSION"),
        env!("IAM_ROLE_CLONER_GIT_COMMIT"),
        env!("IAM_ROLE_CLONER_BUILD_DATE"),
        env!("IAM_ROLE_CLONER_RUSTC_VERSION"),
    )
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,iam_role_cloner_core=debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn default_log_file() -> PathBuf {
    PathBuf::from(format!(
        "iam-clone-{}.log",
        Local::now().format("%Y%m%d-%H%M%S")
    ))
}

fn print_welcome() {
    println!("Welcome to IAM Role Cloner!");
    println!("===============================");
    println!();
    println!("A tool to clone IAM roles between AWS environments.");
    println!();
    println!("Available commands:");
    println!("  clone    Clone IAM roles between profiles");
    println!("  list     List IAM roles in a profile");
    println!("  version  Show version information");
    println!();
    println!("Use 'iam-role-cloner [command] --help' for more information about a command.");
    println!();
    println!("Examples:");
    println!("  iam-role-cloner clone --help");
    println!("  iam-role-cloner list --profile dev");
}

fn print_version(detailed: bool) {
    let info = build_info();
    if detailed {
        for line in info.detailed_lines() {
            println!("{line}");
        }
    } else {
        println!("{}", info.summary());
    }
}

async fn run_clone(args: CloneArgs) -> Result<ExitCode> {
    let log_file = args.log_file.unwrap_or_else(default_log_file);
    let mut reporter = Reporter::new(args.verbose, Some(log_file.as_path()))
        .with_context(|| format!("Failed to initialize logger for {}", log_file.display()))?;

    let options = CloneOptions {
        source_profile: args.source_profile,
        dest_profile: args.dest_profile,
        source_pattern: args.source_pattern,
        dest_pattern: args.dest_pattern,
        dry_run: args.dry_run,
    };

    let service = RoleClonerService::new();
    let outcome = service
        .clone_roles(options, &mut StdinInput::new(), &mut reporter)
        .await?;

    match outcome {
        CloneRunOutcome::Cancelled => debug!("Clone cancelled at confirmation"),
        CloneRunOutcome::Completed(summary) => debug!(
            "Clone finished: {}/{} roles succeeded",
            summary.success_count(),
            summary.total()
        ),
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_list(args: ListArgs) -> Result<ExitCode> {
    let mut reporter =
        Reporter::new(args.verbose, None).context("Failed to initialize logger")?;

    let options = ListOptions {
        profile: args.profile,
        pattern: args.pattern,
        details: args.details,
        sort: args.sort,
    };

    // List failures are reported but do not change the exit status
    if let Err(e) = RoleClonerService::new()
        .list_roles(&options, &mut reporter)
        .await
    {
        reporter.error(e.to_string());
    }
    Ok(ExitCode::SUCCESS)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let Some(command) = cli.command else {
        print_welcome();
        return Ok(ExitCode::SUCCESS);
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    match command {
        Command::Clone(args) => runtime.block_on(run_clone(args)),
        Command::List(args) => runtime.block_on(run_list(args)),
        Command::Version { detailed } => {
            print_version(detailed);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose());

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

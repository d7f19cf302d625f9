//! linkflags - print Go linker settings describing a git working tree
//!
//! ```text
//! go build -ldflags "$(linkflags .)" ./cmd/server
//! ```
//!
//! Emits `-X <package>.gitCommit`, `-X <package>.gitTreeState` and, when a
//! tag is reachable, `-X <package>.version`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use linkflags_core::{
    derive, DescribePolicy, LinkFlagsConfig, OutputFormat, SystemRunner, DEFAULT_VERSION_PACKAGE,
};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "linkflags")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Derive version linker flags from git state", long_about = None)]
struct Cli {
    /// Path to the git working tree
    #[arg(env = "LINKFLAGS_REPO")]
    path: PathBuf,

    /// Go package receiving the -X settings
    #[arg(long, env = "LINKFLAGS_VERSION_PACKAGE", default_value = DEFAULT_VERSION_PACKAGE)]
    package: String,

    /// git executable
    #[arg(long, env = "LINKFLAGS_GIT", default_value = "git")]
    git: String,

    /// go executable used to pick the setting syntax
    #[arg(long, env = "LINKFLAGS_GO", default_value = "go")]
    go: String,

    /// Output format
    #[arg(long, env = "LINKFLAGS_FORMAT", value_enum, default_value_t = Format::Flags)]
    format: Format,

    /// Fail when git cannot be started for `git describe` instead of omitting the version
    #[arg(long, env = "LINKFLAGS_STRICT_DESCRIBE")]
    strict_describe: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Space-separated -X linker settings
    Flags,
    /// Version info record as JSON
    Json,
}

impl Cli {
    fn config(&self) -> LinkFlagsConfig {
        let policy = if self.strict_describe {
            DescribePolicy::Strict
        } else {
            DescribePolicy::Lenient
        };
        let format = match self.format {
            Format::Flags => OutputFormat::Flags,
            Format::Json => OutputFormat::Json,
        };
        LinkFlagsConfig::new(&self.path)
            .with_version_package(&self.package)
            .with_git_program(&self.git)
            .with_tool_program(&self.go)
            .with_describe_policy(policy)
            .with_format(format)
    }
}

fn run(config: &LinkFlagsConfig) -> Result<String> {
    let derivation = derive(config, &SystemRunner).with_context(|| {
        format!("deriving build identity for {}", config.repo_path.display())
    })?;
    derivation
        .render(config.format)
        .context("failed to render output")
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    linkflags_core::init_tracing(cli.log_json, level);

    match run(&cli.config()) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("linkflags: {err:#}");
            ExitCode::FAILURE
        }
    }
}

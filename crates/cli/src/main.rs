use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use mkpkg_core::config::{DEFAULT_BUILD_DIR, DEFAULT_TIMEOUT};

mod cmd;
mod output;

/// mkpkg - Package declared files into versioned archives with a hash manifest
#[derive(Parser)]
#[command(name = "mkpkg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Package descriptor files to build
    #[arg(required = true, value_name = "PKGFILE")]
    pub pkgfiles: Vec<PathBuf>,

    /// Directory that receives package directories and archives
    #[arg(long, env = "MKPKG_BUILDDIR", default_value = DEFAULT_BUILD_DIR)]
    pub builddir: PathBuf,

    /// Define a substitution variable, usable as $KEY or ${KEY}
    #[arg(short = 'D', value_name = "KEY=VALUE", action = ArgAction::Append)]
    pub define: Vec<String>,

    /// Timeout for a single download, in seconds
    #[arg(long, env = "MKPKG_TIMEOUT", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose { "mkpkg=debug,mkpkg_core=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    cmd::cmd_build(&cli)
}

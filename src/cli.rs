use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{install, list, uninstall, update};

#[derive(Debug, Parser)]
#[command(name = "ppm")]
#[command(about = "PicGo plugin package manager", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// 全サブコマンド共通のオプション
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Base directory holding config.json and node_modules (default: $PPM_HOME or ~/.picgo)
    #[arg(long, global = true, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// npm registry URL passed as --registry=<URL>
    #[arg(long, global = true, value_name = "URL")]
    pub registry: Option<String>,

    /// Package manager executable (default: $PPM_NPM, config npmPath, or "npm")
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub npm: Option<String>,

    /// Print events as JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Install plugins by name, scoped name, or local path
    Install(install::Args),

    /// Uninstall plugins
    Uninstall(uninstall::Args),

    /// Update plugins to their latest allowed version
    Update(update::Args),

    /// List registered plugins
    List(list::Args),
}

//! ppm update コマンド
//!
//! npm update でディスク上のプラグインを更新する。
//! 読み込み済みのレジストリは変更しない。

use super::context::CommandContext;
use crate::cli::GlobalArgs;
use crate::env::parse_env_pair;
use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    /// Plugin names to update
    #[arg(required = true, value_name = "PLUGIN")]
    pub plugins: Vec<String>,

    /// Proxy passed to the package manager as --proxy=<URL>
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Extra environment variable for the package manager (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub env: Vec<(String, String)>,
}

pub async fn run(args: Args, global: &GlobalArgs) -> Result<(), String> {
    let mut ctx = CommandContext::prepare(global)?;
    let options = ctx.call_options(args.proxy, args.env);
    let result = ctx
        .handler
        .update(&args.plugins, &mut ctx.registry, &options)
        .await;
    ctx.finish(result)
}

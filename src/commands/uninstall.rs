use super::context::CommandContext;
use crate::cli::GlobalArgs;
use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    /// Plugin names (e.g. "foo", "picgo-plugin-foo", "@scope/foo")
    #[arg(required = true, value_name = "PLUGIN")]
    pub plugins: Vec<String>,
}

pub async fn run(args: Args, global: &GlobalArgs) -> Result<(), String> {
    let mut ctx = CommandContext::prepare(global)?;
    let result = ctx.handler.uninstall(&args.plugins, &mut ctx.registry).await;
    ctx.finish(result)
}

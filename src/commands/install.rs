use super::context::CommandContext;
use crate::cli::GlobalArgs;
use crate::env::parse_env_pair;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(after_help = "PLUGIN FORMATS:\n  \
    foo                      -> picgo-plugin-foo\n  \
    foo@1.2.0                -> picgo-plugin-foo@1.2.0\n  \
    @scope/foo               -> @scope/picgo-plugin-foo\n  \
    picgo-plugin-foo@beta    -> passed through\n  \
    ./path/to/plugin         -> local directory with package.json")]
pub struct Args {
    /// Plugin names or local paths
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
        .install(&args.plugins, &mut ctx.registry, &options)
        .await;
    ctx.finish(result)
}

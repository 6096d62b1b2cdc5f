use crate::cli::{Cli, Command};

pub mod context;
pub mod install;
pub mod list;
pub mod uninstall;
pub mod update;

pub async fn dispatch(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Install(args) => install::run(args, &cli.global).await,
        Command::Uninstall(args) => uninstall::run(args, &cli.global).await,
        Command::Update(args) => update::run(args, &cli.global).await,
        Command::List(args) => list::run(args, &cli.global),
    }
}

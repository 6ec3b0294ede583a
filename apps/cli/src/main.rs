use anyhow::Context;
use clap::Parser;
use sos::kernel::config::load_config;
use sos::prelude::{SosConfig, Storage, StoredContactRepository};
use sos_cli::args::{Cli, Command};
use sos_cli::{contacts, dispatch, init_logger};
use std::sync::Arc;

#[sos_runtime::main(memory_efficient)]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config: SosConfig =
        load_config(Some(&cli.config)).context("Critical: Configuration is malformed")?;
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }
    let _log = init_logger(&config)?;

    let storage = Storage::builder().root(&config.storage.data_dir).connect().await?;
    let repository = StoredContactRepository::new(&storage)?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::Contacts(args) => contacts::run(&repository, args, &mut stdout).await,
        Command::Dispatch(args) => {
            dispatch::run(&config, Arc::new(repository), &args, &mut stdout).await.map(drop)
        },
    }
}

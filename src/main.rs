mod application;
mod domain;
mod infrastructure;
mod presentation;

use crate::application::builders::resolver_builder::ResolverBuilder;
use crate::infrastructure::config::{Config, STORE_ENV};
use crate::infrastructure::file_store::FileStore;
use crate::presentation::cli::Cli;
use anyhow::Result;
use clap::Parser;
use std::rc::Rc;
use tracing::debug;

/// custom-fsi: redirect F# Interactive to the executable of your choice
///
/// Reads and writes, per IDE version, whether the IDE's F# Interactive tool
/// window should launch a custom executable and which one. The settings live
/// in a registry-like hive file; a profile is offered for editing once its
/// IDE extension has registered itself there.
fn main() {
    let cli = Cli::parse();
    infrastructure::logging::init(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let env_store = std::env::var(STORE_ENV).ok();
    let store = FileStore::new(config.store_path(cli.store.as_deref(), env_store.as_deref())?);
    debug!(hive = %store.path().display(), "using settings hive");

    let resolver = ResolverBuilder::new()
        .store(Rc::new(store))
        .extra_profiles(&config.profiles)
        .build()?;

    cli.run(&resolver)
}

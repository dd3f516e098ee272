mod canon;
mod list;
mod run;

use std::path::Path;

use anyhow::{Context, Result};

use compound_forge::Registry;

use crate::cli::Command;
use crate::display::Context as DisplayContext;

pub fn dispatch(command: Command, ctx: DisplayContext) -> Result<()> {
    match command {
        Command::Run(args) => run::run_pipeline(args, ctx),
        Command::Canon(args) => canon::run_canon(args),
        Command::List(args) => list::run_list(args),
    }
}

fn load_registry(path: Option<&Path>) -> Result<Registry> {
    match path {
        Some(path) => Registry::from_toml_file(path)
            .with_context(|| format!("Failed to load registry '{}'", path.display())),
        None => Ok(Registry::builtin().clone()),
    }
}

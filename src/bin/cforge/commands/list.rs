use anyhow::Result;

use crate::cli::ListArgs;
use crate::display::print_registry_table;

use super::load_registry;

pub fn run_list(args: ListArgs) -> Result<()> {
    let registry = load_registry(args.registry.registry.as_deref())?;
    print_registry_table(&registry);
    Ok(())
}

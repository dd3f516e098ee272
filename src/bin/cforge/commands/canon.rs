use anyhow::{Context, Result};

use compound_forge::canonicalize;

use crate::cli::CanonArgs;
use crate::display::print_canonical_table;

pub fn run_canon(args: CanonArgs) -> Result<()> {
    let results = args
        .smiles
        .into_iter()
        .map(|input| {
            let canonical = canonicalize(&input)
                .with_context(|| format!("Invalid structure '{input}'"))?;
            Ok((input, canonical))
        })
        .collect::<Result<Vec<_>>>()?;

    print_canonical_table(&results);
    Ok(())
}

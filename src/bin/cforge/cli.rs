use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use compound_forge::export::{DEFAULT_OUTPUT_DIR, DEFAULT_STEM};
use compound_forge::resolve::DEFAULT_BASE_URL;

#[derive(Parser)]
#[command(
    name = "cforge",
    about = "Resolve, canonicalize, depict and export compound structures",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process the registry and export JSON, CSV and images
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Canonicalize SMILES strings and print formula and weight
    #[command(visible_alias = "c")]
    Canon(CanonArgs),

    /// Show the compound registry
    #[command(visible_alias = "l")]
    List(ListArgs),
}

impl Command {
    pub fn log_options(&self) -> &LogOptions {
        match self {
            Command::Run(args) => &args.log,
            Command::Canon(args) => &args.log,
            Command::List(args) => &args.log,
        }
    }
}

/// Verbosity options shared by all commands.
#[derive(Args)]
pub struct LogOptions {
    /// Suppress progress output and warnings (for scripting)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args)]
pub struct RegistryOptions {
    /// Registry TOML file (built-in registry if omitted)
    #[arg(long, value_name = "FILE")]
    pub registry: Option<PathBuf>,
}

#[derive(Args)]
#[command(next_help_heading = "Structure Lookup")]
pub struct LookupOptions {
    /// Use curated structures only, without querying PubChem
    #[arg(long)]
    pub offline: bool,

    /// Pause between unsuccessful lookup attempts (milliseconds)
    #[arg(long = "delay-ms", value_name = "MS", default_value = "500")]
    pub delay_ms: u64,

    /// Per-request timeout (seconds)
    #[arg(long = "timeout-secs", value_name = "SECS", default_value = "10")]
    pub timeout_secs: u64,

    /// PubChem PUG-REST base URL
    #[arg(long = "pubchem-url", value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub pubchem_url: String,
}

#[derive(Args)]
#[command(next_help_heading = "Output")]
pub struct OutputOptions {
    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// File name stem of the combined JSON and CSV files
    #[arg(long, value_name = "NAME", default_value = DEFAULT_STEM)]
    pub stem: String,

    /// Skip structure images
    #[arg(long = "no-images")]
    pub no_images: bool,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub registry: RegistryOptions,

    #[command(flatten)]
    pub lookup: LookupOptions,

    #[command(flatten)]
    pub output: OutputOptions,

    #[command(flatten)]
    pub log: LogOptions,
}

#[derive(Args)]
pub struct CanonArgs {
    /// SMILES strings to canonicalize
    #[arg(value_name = "SMILES", required = true)]
    pub smiles: Vec<String>,

    #[command(flatten)]
    pub log: LogOptions,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub registry: RegistryOptions,

    #[command(flatten)]
    pub log: LogOptions,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from(["cforge", "run"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.output.output, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(args.output.stem, DEFAULT_STEM);
        assert_eq!(args.lookup.delay_ms, 500);
        assert_eq!(args.lookup.timeout_secs, 10);
        assert!(!args.lookup.offline);
        assert!(args.registry.registry.is_none());
    }

    #[test]
    fn run_options_parse() {
        let cli = Cli::try_parse_from([
            "cforge", "run", "-o", "out", "--offline", "--no-images", "--delay-ms", "0", "-q",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.output.output, PathBuf::from("out"));
        assert!(args.lookup.offline);
        assert!(args.output.no_images);
        assert_eq!(args.lookup.delay_ms, 0);
        assert!(args.log.quiet);
    }

    #[test]
    fn canon_requires_input() {
        assert!(Cli::try_parse_from(["cforge", "canon"]).is_err());
        let cli = Cli::try_parse_from(["cforge", "c", "CCO", "c1ccccc1"]).unwrap();
        let Command::Canon(args) = cli.command else {
            panic!("expected canon");
        };
        assert_eq!(args.smiles, vec!["CCO", "c1ccccc1"]);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["cforge", "list", "-q", "-v"]).is_err());
    }
}

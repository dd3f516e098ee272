use anyhow::{Context, Result, bail};

use compound_forge::pipeline::{aggregate, process_registry};
use compound_forge::{Category, PipelineConfig, export};

use crate::cli::RunArgs;
use crate::config::build_pipeline_config;
use crate::display::{Context as DisplayContext, EntryProgress, Progress, print_record_summary};

use super::load_registry;

const TOTAL_STEPS: u8 = 3;

pub fn run_pipeline(args: RunArgs, ctx: DisplayContext) -> Result<()> {
    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Loading registry");
    let registry = load_registry(args.registry.registry.as_deref())?;
    if registry.is_empty() {
        bail!("The registry contains no compounds; nothing to do.");
    }
    let config = build_pipeline_config(&args.lookup, &args.output);

    let load_substeps = [
        format!("{} clinical candidates", registry.count(Category::ClinicalCandidate)),
        format!("{} scaffolds", registry.count(Category::Scaffold)),
    ];
    progress.complete_step("Loading registry", &as_strs(&load_substeps));

    let description = "Resolving and canonicalizing structures";
    progress.step(description);
    let (records, resolved, failed) = {
        let mut sink = EntryProgress::new(&progress, description);
        let records = process_registry(&registry, &config, &mut sink)
            .context("Failed to process the registry")?;
        (records, sink.resolved, sink.failed)
    };

    let process_substeps = build_process_substeps(&config, resolved, &failed);
    progress.complete_step(description, &as_strs(&process_substeps));

    if ctx.interactive {
        print_record_summary(&records);
    }

    progress.step("Writing output");
    let report = aggregate(records);
    let summary = export(&report, &config.export).with_context(|| {
        format!(
            "Failed to export results to '{}'",
            config.export.output_dir.display()
        )
    })?;

    let write_substeps = [
        summary.json_path.display().to_string(),
        summary.csv_path.display().to_string(),
        format!("{} per-compound JSON files", summary.record_files.len()),
    ];
    progress.complete_step("Writing output", &as_strs(&write_substeps));

    progress.finish();

    Ok(())
}

fn build_process_substeps(config: &PipelineConfig, resolved: usize, failed: &[String]) -> Vec<String> {
    let mut substeps = vec![match &config.lookup {
        Some(lookup) => format!("Lookup: PubChem ({})", lookup.base_url),
        None => "Lookup: offline (curated structures only)".to_string(),
    }];
    substeps.push(format!("{resolved} structures canonicalized"));
    if !failed.is_empty() {
        substeps.push(format!("No valid structure: {}", failed.join(", ")));
    }
    substeps.push(if config.render.is_some() {
        format!("Images: {}", config.export.image_dir().display())
    } else {
        "Images: skipped".to_string()
    });
    substeps
}

fn as_strs(items: &[String]) -> Vec<&str> {
    items.iter().map(String::as_str).collect()
}

use std::time::Duration;

use compound_forge::{ExportConfig, LookupConfig, PipelineConfig, RenderConfig};

use crate::cli::{LookupOptions, OutputOptions};

pub fn build_lookup_config(opts: &LookupOptions) -> Option<LookupConfig> {
    if opts.offline {
        return None;
    }
    Some(LookupConfig {
        base_url: opts.pubchem_url.trim_end_matches('/').to_string(),
        timeout: Duration::from_secs(opts.timeout_secs),
        delay: Duration::from_millis(opts.delay_ms),
        ..LookupConfig::default()
    })
}

pub fn build_pipeline_config(lookup: &LookupOptions, output: &OutputOptions) -> PipelineConfig {
    PipelineConfig {
        lookup: build_lookup_config(lookup),
        render: (!output.no_images).then(RenderConfig::default),
        export: ExportConfig {
            output_dir: output.output.clone(),
            stem: output.stem.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn lookup(offline: bool) -> LookupOptions {
        LookupOptions {
            offline,
            delay_ms: 250,
            timeout_secs: 3,
            pubchem_url: "https://example.org/rest/pug/".to_string(),
        }
    }

    fn output(no_images: bool) -> OutputOptions {
        OutputOptions {
            output: PathBuf::from("out"),
            stem: "stem".to_string(),
            no_images,
        }
    }

    #[test]
    fn offline_disables_lookup() {
        assert!(build_lookup_config(&lookup(true)).is_none());
    }

    #[test]
    fn lookup_options_are_carried_over() {
        let config = build_lookup_config(&lookup(false)).unwrap();
        assert_eq!(config.base_url, "https://example.org/rest/pug");
        assert_eq!(config.delay, Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn no_images_disables_rendering() {
        let config = build_pipeline_config(&lookup(true), &output(true));
        assert!(config.render.is_none());
        assert_eq!(config.export.output_dir, PathBuf::from("out"));
        assert_eq!(config.export.stem, "stem");

        let config = build_pipeline_config(&lookup(true), &output(false));
        assert_eq!(config.render, Some(RenderConfig::default()));
    }
}

use crate::depict::RenderConfig;
use crate::export::ExportConfig;
use crate::resolve::LookupConfig;

/// Settings for one pipeline run.
///
/// `lookup: None` runs offline (curated structures only) and
/// `render: None` skips image generation.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub lookup: Option<LookupConfig>,
    pub render: Option<RenderConfig>,
    pub export: ExportConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lookup: Some(LookupConfig::default()),
            render: Some(RenderConfig::default()),
            export: ExportConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// No network access and no images.
    pub fn offline() -> Self {
        Self {
            lookup: None,
            render: None,
            export: ExportConfig::default(),
        }
    }
}

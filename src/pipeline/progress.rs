use crate::model::record::CanonicalCompoundRecord;
use crate::model::registry::RegistryEntry;

/// Observer for per-entry pipeline events. All methods default to no-ops.
pub trait ProgressSink {
    fn entry_started(&mut self, _index: usize, _total: usize, _entry: &RegistryEntry) {}

    fn entry_finished(&mut self, _index: usize, _total: usize, _record: &CanonicalCompoundRecord) {}
}

/// A sink that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ProgressSink for NoopSink {}

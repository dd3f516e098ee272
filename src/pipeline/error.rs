use thiserror::Error;

/// Fatal failures of a pipeline run. Per-entry problems (lookup failures,
/// invalid structures, render failures) are never reported here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to set up the structure lookup client")]
    LookupClient(#[source] crate::resolve::LookupError),

    #[error("export failed")]
    Export(#[from] crate::export::Error),
}

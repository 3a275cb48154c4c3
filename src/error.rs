use thiserror::Error;

/// Reasons a stored solver export cannot be turned into a graph.
///
/// Callers of [`crate::ingest`] never see these: a malformed document there
/// means "no graph available" and yields an empty graph.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("invalid graph json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document has no `graph` object")]
    MissingGraph,

    #[error("graph has no `nodes` object")]
    MissingNodes,
}

use thiserror::Error;


/// Errors surfaced by graph construction and route queries
/// A search that exhausts its frontier is not an error - see `PathOutcome::NotFound`
#[derive(Debug, Error)]
pub enum NavigateError {
    #[error("unknown location `{0}`")]
    UnknownLocation(String), // Lookup by id or name failed

    #[error("edge {from} -> {to} references a location that is not in the graph")]
    MalformedEdge { from: String, to: String },

    #[error("edge {from} -> {to} has invalid weight {weight}")]
    InvalidWeight { from: String, to: String, weight: f64 }, // negative or NaN

    #[error("distance threshold must be a non-negative number, got {0}")]
    InvalidThreshold(f64),

    #[error("heuristic estimate {estimate} exceeds cost {weight} of edge {from} -> {to}")]
    InadmissibleHeuristic { from: String, to: String, weight: f64, estimate: f64 },

    #[error("spatial index error: {0}")]
    SpatialIndex(String),

    #[error("failed to parse navigation data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NavigateError>;


impl From<kdtree::ErrorKind> for NavigateError {
    fn from(error: kdtree::ErrorKind) -> Self {
        NavigateError::SpatialIndex(error.to_string())
    }
}

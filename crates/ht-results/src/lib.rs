//! ht-results: loop metrics, run ids, run comparison and trace export.

pub mod export;
pub mod hash;
pub mod metrics;
pub mod types;

pub use export::{read_json, to_csv_string, write_csv, write_json};
pub use hash::compute_run_id;
pub use metrics::{LoopMetrics, compute_loop_metrics};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

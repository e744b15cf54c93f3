//! Content-based hashing for run IDs.

use ht_sim::SimulationParameters;
use sha2::{Digest, Sha256};

/// Version string mixed into every run id.
pub const SOLVER_VERSION: &str = concat!("ht-sim ", env!("CARGO_PKG_VERSION"));

pub fn compute_run_id(params: &SimulationParameters) -> String {
    let mut hasher = Sha256::new();

    let params_json = serde_json::to_string(params).unwrap_or_default();
    hasher.update(params_json.as_bytes());

    hasher.update(SOLVER_VERSION.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

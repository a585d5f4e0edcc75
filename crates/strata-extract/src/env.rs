//! Process environment reader.

use strata_core::EnvSnapshot;
use tracing::debug;

/// Capture the current process environment.
///
/// Names and values that are not valid Unicode are converted lossily.
pub fn read_env() -> EnvSnapshot {
    let snapshot: EnvSnapshot = std::env::vars_os()
        .map(|(key, value)| {
            (
                key.to_string_lossy().into_owned(),
                value.to_string_lossy().into_owned(),
            )
        })
        .collect();
    debug!(variables = snapshot.variables.len(), "environment read");
    snapshot
}

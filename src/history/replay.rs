//! Replay Module
//!
//! Reads an operation's recorded history back in call order.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::backend::SharedBackend;
use crate::error::Result;
use crate::history::OperationId;

// == Call Record ==
/// One recorded call: rendered input tuple and rendered output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallRecord {
    pub input: String,
    pub output: String,
}

// == Replay Report ==
/// History of one operation, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    /// Operation the history belongs to
    pub identity: String,
    /// Number of recorded inputs
    pub calls: usize,
    /// Input/output pairs in call order
    pub records: Vec<CallRecord>,
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was called {} times:", self.identity, self.calls)?;
        for record in &self.records {
            write!(
                f,
                "\n{}(*{}) -> {}",
                self.identity, record.input, record.output
            )?;
        }
        Ok(())
    }
}

// == Replay ==
/// Read-only view over the history lists written by `Instrumented`.
#[derive(Clone)]
pub struct Replay {
    backend: SharedBackend,
}

impl Replay {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    /// Loads the full history of `id`.
    ///
    /// Inputs and outputs are paired by position. When a failed call left the
    /// lists with different lengths, the surplus entries are dropped.
    pub async fn load(&self, id: &OperationId) -> Result<ReplayReport> {
        let inputs = self.backend.lrange(&id.inputs_key(), 0, -1).await?;
        let outputs = self.backend.lrange(&id.outputs_key(), 0, -1).await?;

        if inputs.len() != outputs.len() {
            debug!(
                "{} history is uneven ({} inputs, {} outputs), truncating",
                id,
                inputs.len(),
                outputs.len()
            );
        }

        let records = inputs
            .iter()
            .zip(outputs.iter())
            .map(|(input, output)| CallRecord {
                input: String::from_utf8_lossy(input).into_owned(),
                output: String::from_utf8_lossy(output).into_owned(),
            })
            .collect();

        Ok(ReplayReport {
            identity: id.to_string(),
            calls: inputs.len(),
            records,
        })
    }
}

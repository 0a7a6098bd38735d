//! History Module
//!
//! Turns an operation into one whose call count, inputs and outputs are
//! recorded in the backend, and reads that record back for replay.
//!
//! # Key layout
//! - `{identity}` - invocation counter
//! - `{identity}:inputs` - list of rendered argument tuples
//! - `{identity}:outputs` - list of rendered results

mod identity;
mod instrumented;
mod replay;

pub use identity::OperationId;
pub use instrumented::{call_count, CallArgs, Instrumented, Operation};
pub use replay::{CallRecord, Replay, ReplayReport};

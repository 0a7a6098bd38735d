//! Instrumented Operation Module
//!
//! Decorator that records every call of a wrapped operation in the backend.

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::backend::{KvBackend, SharedBackend};
use crate::error::{CacheError, Result};
use crate::history::OperationId;

// == Call Arguments ==
/// Renders a call's positional arguments for the inputs history.
///
/// The rendering is for display only and is never parsed back.
pub trait CallArgs {
    /// Renders the argument tuple, e.g. `(b'hello',)`.
    fn render_args(&self) -> String;
}

// == Operation ==
/// A fallible asynchronous operation taking one input value.
#[async_trait]
pub trait Operation: Send + Sync {
    type Input: CallArgs + Send + 'static;
    type Output: fmt::Display + Send + 'static;

    async fn invoke(&self, input: Self::Input) -> Result<Self::Output>;
}

// == Instrumented ==
/// Wraps an operation so each call increments its invocation counter and
/// appends the rendered input and output to the history lists.
///
/// Per call, in order:
/// 1. increment the counter (every attempt counts, even failing ones)
/// 2. append the rendered input
/// 3. invoke the wrapped operation; on failure return the error with no output recorded
/// 4. append the rendered output
///
/// The four steps are not atomic as a group. Concurrent callers sharing one
/// identity can interleave, so input `i` and output `i` may come from
/// different calls.
pub struct Instrumented<O> {
    id: OperationId,
    backend: SharedBackend,
    inner: O,
}

impl<O: Operation> Instrumented<O> {
    // == Constructor ==
    /// Wraps `inner`, recording its calls under `id` in `backend`.
    pub fn new(id: impl Into<OperationId>, backend: SharedBackend, inner: O) -> Self {
        Self {
            id: id.into(),
            backend,
            inner,
        }
    }

    /// Identity the calls are recorded under.
    pub fn id(&self) -> &OperationId {
        &self.id
    }

    /// The wrapped operation.
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

#[async_trait]
impl<O: Operation> Operation for Instrumented<O> {
    type Input = O::Input;
    type Output = O::Output;

    async fn invoke(&self, input: Self::Input) -> Result<Self::Output> {
        let call = self.backend.incr(self.id.counter_key()).await?;

        let rendered = input.render_args();
        self.backend
            .rpush(&self.id.inputs_key(), rendered.as_bytes())
            .await?;

        let output = match self.inner.invoke(input).await {
            Ok(output) => output,
            Err(err) => {
                warn!("{} call #{} failed: {}", self.id, call, err);
                return Err(err);
            }
        };

        self.backend
            .rpush(&self.id.outputs_key(), output.to_string().as_bytes())
            .await?;

        debug!("Recorded {} call #{}: {}", self.id, call, rendered);
        Ok(output)
    }
}

// == Call Count ==
/// Reads the invocation counter of `id`. An absent counter reads as zero.
pub async fn call_count(backend: &dyn KvBackend, id: &OperationId) -> Result<i64> {
    match backend.get(id.counter_key()).await? {
        None => Ok(0),
        Some(raw) => String::from_utf8_lossy(&raw)
            .parse()
            .map_err(|e| CacheError::Decode(format!("counter '{}': {}", id, e))),
    }
}

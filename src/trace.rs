//! Step-trace recorder
//!
//! [`apply_all`] is the single fold over an operation log.  Animated replay
//! walks the trace it returns with delays; seeking calls it on a prefix with
//! none.  Both therefore see exactly the same steps and snapshots.
//!
//! An [`EngineError`](crate::error::EngineError) drops that operation's
//! effect, is recorded as a [`TraceFailure`] and the fold carries on from the
//! last good snapshot.

use crate::config::TimingConfig;
use crate::engine::{self, Snapshot, Step, StructureKind};
use crate::error::ValidationError;
use crate::operation::{Operation, OperationId, OperationKind};
use serde::Serialize;
use tracing::{debug, warn};

/// Where one operation's steps sit in the flat trace
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSpan {
    pub operation_id: OperationId,
    /// Position of the operation in the log
    pub index: usize,
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub first_step: usize,
    pub step_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<ValidationError>,
    pub failed: bool,
}

impl OperationSpan {
    /// One past the last step of this operation
    pub fn end_step(&self) -> usize {
        self.first_step + self.step_count
    }

    pub fn contains(&self, step: usize) -> bool {
        (self.first_step..self.end_step()).contains(&step)
    }
}

/// An operation whose engine call failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceFailure {
    pub operation_id: OperationId,
    pub index: usize,
    /// Number of steps recorded before the failure
    pub at_step: usize,
    pub message: String,
}

/// Flat, seekable record of a whole operation log
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Trace {
    pub steps: Vec<Step>,
    /// `frames[i]` is the snapshot shown during `steps[i]`
    pub frames: Vec<Snapshot>,
    pub spans: Vec<OperationSpan>,
    pub failures: Vec<TraceFailure>,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn frame(&self, index: usize) -> Option<&Snapshot> {
        self.frames.get(index)
    }

    /// The span of the operation that emitted step `index`
    pub fn span_of_step(&self, index: usize) -> Option<&OperationSpan> {
        self.spans.iter().find(|span| span.contains(index))
    }

    /// Failures recorded right before step `index`
    pub fn failures_at(&self, index: usize) -> impl Iterator<Item = &TraceFailure> {
        self.failures.iter().filter(move |failure| failure.at_step == index)
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.steps.iter().map(|step| step.duration_ms).sum()
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Fold `ops` over `snapshot`, returning the final snapshot and the trace
pub fn apply_all(
    ops: &[Operation],
    mut snapshot: Snapshot,
    timing: &TimingConfig,
) -> (Snapshot, Trace) {
    let mut trace = Trace::default();

    for (index, op) in ops.iter().enumerate() {
        let first_step = trace.steps.len();
        let mut span = OperationSpan {
            operation_id: op.id,
            index,
            kind: op.kind.clone(),
            first_step,
            step_count: 0,
            rejection: None,
            failed: false,
        };

        match engine::apply(op, &snapshot, timing) {
            Ok(applied) => {
                match &applied.rejection {
                    Some(reason) => {
                        warn!(id = %op.id, kind = %op.kind, %reason, "operation skipped")
                    }
                    None => debug!(
                        id = %op.id,
                        kind = %op.kind,
                        steps = applied.steps.len(),
                        "operation applied"
                    ),
                }
                span.step_count = applied.steps.len();
                span.rejection = applied.rejection;
                trace.steps.extend(applied.steps);
                trace.frames.extend(applied.frames);
                snapshot = applied.snapshot;
            }
            Err(err) => {
                warn!(id = %op.id, kind = %op.kind, error = %err, "operation failed");
                span.failed = true;
                trace.failures.push(TraceFailure {
                    operation_id: op.id,
                    index,
                    at_step: first_step,
                    message: err.to_string(),
                });
            }
        }
        trace.spans.push(span);
    }

    (snapshot, trace)
}

/// Record the trace of `ops` from an empty `kind` structure
pub fn record(kind: StructureKind, ops: &[Operation], timing: &TimingConfig) -> Trace {
    apply_all(ops, Snapshot::empty(kind), timing).1
}

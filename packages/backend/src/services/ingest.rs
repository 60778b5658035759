//! Trace ingestion reducer.
//!
//! Folds a batch of interaction events for one session into the trace
//! chains. All counter mutation funnels through here (and the grader's
//! append), so chains never branch.

use serde::Serialize;

use crate::models::{SessionId, TraceRecord, TrackMode, UnitId};
use crate::store::LearningStore;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),
}

/// Outcome of one batch. Unknown unit ids are skipped by policy, not
/// failed, and reported here for observability.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub applied: usize,
    pub skipped_unit_ids: Vec<UnitId>,
}

/// Applies a batch of interaction events to the trace store.
///
/// Duplicate unit ids in the batch accumulate into one count. Per unit:
/// an existing record for (user, session, unit) is bumped in place; else a
/// new chain node is created from the latest (user, unit) record as
/// baseline. Entries are independent - one bad id never aborts the rest.
///
/// Replaying a batch is cumulative, not idempotent: counters are additive
/// by contract, so callers must not retry blindly.
pub async fn ingest(
    store: &LearningStore,
    session_id: SessionId,
    unit_ids: &[UnitId],
    mode: TrackMode,
) -> Result<IngestReport, IngestError> {
    // One write guard across the whole batch: baseline lookups and chain
    // appends for this user cannot interleave with another request.
    let mut inner = store.write().await;

    let session = inner
        .session(session_id)
        .cloned()
        .ok_or(IngestError::SessionNotFound(session_id))?;

    // Collapse duplicates into counts, preserving first-seen order.
    let mut counts: Vec<(UnitId, u32)> = Vec::new();
    for id in unit_ids {
        match counts.iter_mut().find(|(unit, _)| unit == id) {
            Some((_, count)) => *count += 1,
            None => counts.push((*id, 1)),
        }
    }

    let mut applied = 0usize;
    let mut skipped_unit_ids = Vec::new();

    for (unit_id, count) in counts {
        if inner.unit(unit_id).is_none() {
            skipped_unit_ids.push(unit_id);
            continue;
        }

        match inner.latest_for_session_unit(&session.user_id, session_id, unit_id) {
            // This session already has a record for the unit: update in
            // place, no new chain link.
            Some(existing) => inner.bump_record(existing, mode, count),
            None => {
                let baseline = inner.latest_for_user_unit(&session.user_id, unit_id).cloned();
                let mut record = TraceRecord::new(&session, unit_id, baseline.as_ref());
                record.bump(mode, count);
                inner.push_record(record);
            }
        }
        applied += 1;
    }

    if !skipped_unit_ids.is_empty() {
        tracing::warn!(
            session_id = %session_id,
            skipped = skipped_unit_ids.len(),
            "ingest batch referenced unknown units"
        );
    }

    Ok(IngestReport {
        applied,
        skipped_unit_ids,
    })
}

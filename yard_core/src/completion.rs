//! Session completion and abandonment orchestration.
//!
//! Local persistence is authoritative: the record always lands in the
//! history log and the personal-best flag is decided from local history.
//! Remote Rec Yard writes are best-effort: run status, then the
//! leaderboard submission, then profile stats, each attempted once with
//! failures logged and skipped. A leaderboard outage never blocks the
//! session from reaching its completed state.

use uuid::Uuid;

use crate::history::{self, RecordSink};
use crate::recyard::{RecYardClient, RunStatus};
use crate::types::WorkoutRecord;
use crate::Result;

/// What a finished session amounted to
#[derive(Clone, Debug)]
pub struct CompletionSummary {
    pub record: WorkoutRecord,
    /// True when this duration strictly beat the stored best for the
    /// rule set; ties do not count.
    pub is_new_record: bool,
}

/// Persist a completed workout locally and decide the personal-best flag.
///
/// `prior_records` must be the history loaded before this workout is
/// appended.
pub fn finish_local(
    record: WorkoutRecord,
    prior_records: &[WorkoutRecord],
    sink: &mut dyn RecordSink,
) -> Result<CompletionSummary> {
    let prior_best = history::best_duration(prior_records, &record.rule_set_id);
    let is_new_record = prior_best.map_or(true, |best| record.duration_seconds < best);

    sink.append(&record)?;

    if is_new_record {
        tracing::info!(
            "New personal best for {}: {}s",
            record.rule_set_id,
            record.duration_seconds
        );
    }

    Ok(CompletionSummary {
        record,
        is_new_record,
    })
}

/// Push a completed official run to the Rec Yard, best-effort.
///
/// The three writes run sequentially and independently; a failure in one
/// does not stop the next and nothing is rolled back or retried.
pub async fn finish_official(
    client: &RecYardClient,
    user_id: Uuid,
    run_id: Option<Uuid>,
    record: &WorkoutRecord,
) {
    if let Some(run_id) = run_id {
        if let Err(e) = client.update_run_status(run_id, RunStatus::Complete).await {
            tracing::warn!("Failed to mark run {} complete: {}", run_id, e);
        }
    }

    if let Err(e) = client.submit_workout(user_id, record).await {
        tracing::warn!("Failed to submit workout to the leaderboard: {}", e);
    }

    if let Err(e) = client.update_profile_stats(user_id, record).await {
        tracing::warn!("Failed to update remote profile stats: {}", e);
    }
}

/// Mark an abandoned official run as did-not-finish, best-effort.
pub async fn abandon_official(client: &RecYardClient, run_id: Option<Uuid>) {
    let Some(run_id) = run_id else {
        // The run row never made it to the service; nothing to mark.
        return;
    };

    if let Err(e) = client.update_run_status(run_id, RunStatus::Dnf).await {
        tracing::warn!("Failed to mark run {} as DNF: {}", run_id, e);
    }
}

use chrono::{DateTime, Utc};

use crate::models::{DerivedState, Prono, PronoStatus, PronoView};

/// Compute the read-time state of a prono at instant `at`.
///
/// A match counts as finished as soon as kickoff is reached; a prono is
/// validated once it leaves `pending`. Both facts are independent of every
/// other field.
pub fn derive_state(
    kickoff: DateTime<Utc>,
    status: PronoStatus,
    at: DateTime<Utc>,
) -> DerivedState {
    DerivedState {
        is_finished: kickoff <= at,
        is_validated: status.is_settled(),
    }
}

/// Attach derived state to a stored prono. Every read path goes through here.
pub fn enrich(prono: Prono, at: DateTime<Utc>) -> PronoView {
    let state = derive_state(prono.kickoff, prono.status, at);
    PronoView { prono, state }
}

//! Near-key matching for the stale fallback.
//!
//! Substring match on the cache key: any key containing `page=1` qualifies
//! (so `page=10`..`page=19` do too), as does any key containing the
//! request's `status=` segment.

use crate::models::SearchParams;

const FIRST_PAGE_MARKER: &str = "page=1";

/// Whether `candidate_key` may stand in for a request with `params`.
pub fn is_nearby(candidate_key: &str, params: &SearchParams) -> bool {
    if candidate_key.contains(FIRST_PAGE_MARKER) {
        return true;
    }

    params
        .status_key_segment()
        .is_some_and(|segment| candidate_key.contains(&segment))
}

use std::sync::Arc;

use sequoia_overlay::ClaimStore;
use sequoia_shared::GuildClaim;
use tracing::info;

/// Apply a claims document in the background while frames keep rendering.
/// Spawned from `main` like the other services. The store suspends
/// redraws for the batch and invalidates once at the end.
pub async fn run(store: Arc<ClaimStore>, claims: Vec<GuildClaim>) -> usize {
    let total = claims.len();
    let applied = store.add_claims_batch(claims);
    info!("claim import finished: {applied}/{total} claims");
    applied
}

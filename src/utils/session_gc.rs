use anyhow::Result;
use sqlx::MySqlPool;

/// Deletes sessions that are expired or revoked. Run once at startup; live
/// revocation is handled by the token blacklist.
pub async fn purge_expired_sessions(pool: &MySqlPool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at < NOW() OR revoked = TRUE")
        .execute(pool)
        .await?;

    let purged = result.rows_affected();
    tracing::info!(purged, "Session purge complete");

    Ok(purged)
}

use moka::future::Cache;
use once_cell::sync::Lazy;
use std::time::Duration;

/// Revoked refresh-token jtis. An entry only has to outlive the token
/// it blocks, so the TTL tracks the longest refresh-token lifetime and
/// the cache stays bounded without any sweep logic.
static REVOKED_JTIS: Lazy<Cache<String, bool>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000)
        .time_to_live(Duration::from_secs(7 * 24 * 3600)) // matches the default REFRESH_TOKEN_TTL
        .build()
});

/// Mark a refresh token's jti as spent.
pub async fn revoke(jti: &str) {
    REVOKED_JTIS.insert(jti.to_string(), true).await;
}

/// Check whether a jti has been revoked.
pub async fn is_revoked(jti: &str) -> bool {
    REVOKED_JTIS.get(jti).await.unwrap_or(false)
}

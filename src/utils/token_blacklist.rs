use moka::sync::Cache;
use once_cell::sync::Lazy;
use std::time::Duration;

/// Longest-lived token this has to outlast (refresh TTL upper bound).
const BLACKLIST_TTL_SECS: u64 = 7 * 24 * 60 * 60;
const BLACKLIST_CAPACITY: u64 = 100_000;

/// Revoked jti values. Logout and refresh rotation insert here so a token
/// dies before its `exp`; entries age out once the token would have expired
/// anyway.
static TOKEN_BLACKLIST: Lazy<Cache<String, ()>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(BLACKLIST_CAPACITY)
        .time_to_live(Duration::from_secs(BLACKLIST_TTL_SECS))
        .build()
});

pub fn revoke(jti: &str) {
    TOKEN_BLACKLIST.insert(jti.to_string(), ());
}

pub fn is_revoked(jti: &str) -> bool {
    TOKEN_BLACKLIST.contains_key(jti)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revoked_jti_is_reported() {
        revoke("jti-under-test");
        assert!(is_revoked("jti-under-test"));
        assert!(!is_revoked("some-other-jti"));
    }
}

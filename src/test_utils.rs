//! Shared helpers for the endpoint tests.

use crate::auth::jwt::generate_access_token;
use crate::config::Config;
use crate::store::LeaveStore;
use actix_web::web::Data;
use std::sync::RwLock;

pub const TEST_SECRET: &str = "test-secret";

pub fn test_config() -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        access_token_ttl: 900,
        refresh_token_ttl: 3600,
        rate_login_per_min: 60,
        rate_refresh_per_min: 30,
        rate_protected_per_min: 1000,
        api_prefix: "/api/v1".to_string(),
    }
}

pub fn seeded_store() -> Data<RwLock<LeaveStore>> {
    Data::new(RwLock::new(LeaveStore::seed().expect("seed store")))
}

/// A valid access token for the given manager, signed with the test
/// secret.
pub fn access_token_for(manager_id: u64, username: &str) -> String {
    generate_access_token(manager_id, username.to_string(), TEST_SECRET, 900)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

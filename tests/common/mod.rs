#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use taskdesk::config::Config;
use taskdesk::store::{MemoryCredentialStore, MemoryTaskStore};
use taskdesk::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

/// App state over fresh in-memory stores, with a low bcrypt cost so tests
/// stay fast. `overrides` replace or add configuration variables.
pub fn test_state(overrides: &[(&str, &str)]) -> AppState {
    let mut vars: HashMap<String, String> = [("JWT_SECRET", TEST_SECRET), ("BCRYPT_COST", "4")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    for (k, v) in overrides {
        vars.insert(k.to_string(), v.to_string());
    }

    let config = Config::from_lookup(|key| vars.get(key).cloned()).expect("valid test config");
    AppState::new(
        &config,
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(MemoryTaskStore::new()),
    )
    .expect("app state")
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

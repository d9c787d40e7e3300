//! Fixed test credentials for deterministic tests
//!
//! Using fixed values prevents flaky tests caused by random data.

// Primary user
pub const ALICE_USERNAME: &str = "alice";
pub const ALICE_PASSWORD: &str = "secret";

// Second user, for isolation tests
pub const BOB_USERNAME: &str = "bob";
pub const BOB_PASSWORD: &str = "pw2";

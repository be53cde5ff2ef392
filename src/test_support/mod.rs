//! Shared helpers for in-crate tests.
//!
//! Compiled only under `cfg(test)`; integration tests under `tests/` carry
//! their own copy because they cannot see this module.

pub mod socket_guard;

//! Helpers shared by unit tests.

#[path = "../../tests/support/socket_guard.rs"]
pub(crate) mod socket_guard;

pub(crate) mod raw_http;

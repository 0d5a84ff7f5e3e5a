//! Shared fixtures for integration tests.

pub mod counting_server;

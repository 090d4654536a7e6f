//! Plumbing every Bullana service shares: env-backed config loading, JSON
//! tracing bootstrap, request-id stamping, and health probes.

pub mod config;
pub mod health;
pub mod middleware;
pub mod tracing;

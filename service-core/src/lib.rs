//! service-core: shared HTTP infrastructure for the venue booking service.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

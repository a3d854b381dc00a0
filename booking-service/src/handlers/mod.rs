pub mod auth;
pub mod booking;
pub mod field;
pub mod metrics;
pub mod venue;

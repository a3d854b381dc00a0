//! Business logic for accounts, the venue catalog and bookings.

pub mod auth;
pub mod booking;
pub mod catalog;
mod email;
pub mod error;
pub mod metrics;
pub mod policy;

pub use auth::{AuthService, IssuedToken};
pub use booking::{BookingService, PlayWindow};
pub use catalog::CatalogService;
pub use email::{EmailProvider, EmailService, MockEmailService, SentOtp};
pub use error::ServiceError;

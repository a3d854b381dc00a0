pub mod api_token;
pub mod booking;
pub mod caller;
pub mod field;
pub mod otp_code;
pub mod user;
pub mod venue;

pub use api_token::ApiToken;
pub use booking::{Booking, BookingDetail, FieldBookings, Player};
pub use caller::Caller;
pub use field::{Field, FieldType, FieldWithVenue};
pub use otp_code::OtpCode;
pub use user::{Role, SanitizedUser, User};
pub use venue::{Venue, VenueDetail, VenueField};

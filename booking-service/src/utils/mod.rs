pub mod extract;
pub mod otp;
pub mod password;
pub mod token;
pub mod validation;

pub use extract::{ApiPath, ApiQuery};
pub use password::{hash_password, verify_password, Password, PasswordHashString};
pub use validation::{parse_play_date, ValidatedForm};

//! Domain counters, exported through the process-wide Prometheus recorder.

use metrics::counter;

pub const REGISTRATIONS_TOTAL: &str = "registrations_total";
pub const OTP_VERIFICATIONS_TOTAL: &str = "otp_verifications_total";
pub const BOOKINGS_CREATED_TOTAL: &str = "bookings_created_total";

pub fn record_registration() {
    counter!(REGISTRATIONS_TOTAL).increment(1);
}

pub fn record_otp_verification(outcome: &'static str) {
    counter!(OTP_VERIFICATIONS_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_booking_created() {
    counter!(BOOKINGS_CREATED_TOTAL).increment(1);
}

use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Uniform six digit code in `100000..=999999`.
pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

pub fn hash_otp(otp: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(otp.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare a submitted code against a stored digest in constant time.
pub fn otp_matches(submitted: &str, stored_hash: &str) -> bool {
    let candidate = hash_otp(submitted.trim());
    candidate.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_stay_in_range() {
        for _ in 0..1000 {
            let code: u32 = generate_otp().parse().unwrap();
            assert!((100_000..=999_999).contains(&code));
        }
    }

    #[test]
    fn matches_only_the_issued_code() {
        let stored = hash_otp("482913");
        assert!(otp_matches("482913", &stored));
        assert!(otp_matches(" 482913 ", &stored));
        assert!(!otp_matches("482914", &stored));
        assert!(!otp_matches("", &stored));
    }
}

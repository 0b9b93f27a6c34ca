//! Numeric one-time codes

use rand::rngs::OsRng;
use rand::Rng;

/// Random numeric code of `length` digits; leading zeros are kept.
pub fn generate_otp(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

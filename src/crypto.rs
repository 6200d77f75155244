//! Randomness and digest helpers.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Fills the given buffer with random bytes.
pub fn randomize(buf: &mut [u8]) {
    rand::thread_rng().fill(buf);
}

/// Returns a random alphanumeric string of the given length.
pub fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Returns the hex encoded sha256 digest of the given data, prefixed by the given salt.
pub fn salted_digest(data: &[u8], salt: &[u8]) -> String {
    sha256::digest([salt, data].concat())
}

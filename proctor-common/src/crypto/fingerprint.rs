use sha2::{Digest, Sha256};

/// Computes the SHA-256 content fingerprint of the given data.
///
/// The platform never stores exam content or answer payloads, only this
/// opaque 32-byte digest.
pub fn fingerprint(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Renders a fingerprint as lowercase hex, for logs and API responses.
pub fn to_hex(digest: &[u8; 32]) -> String {
    hex::encode(digest)
}

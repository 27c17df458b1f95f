//! SHA-256 dos bytes exatos do registro

use crate::error::{AnchorError, AnchorResult};
use dpp_record::Record;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;

/// Digest de 32 bytes (serializado como hex minúsculo)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest([u8; 32]);

impl Digest {
    pub const LEN: usize = 32;

    /// SHA-256 de bytes arbitrários
    pub fn of(bytes: &[u8]) -> Self {
        use sha2::Digest as _;
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        Self(out)
    }

    pub fn of_record(record: &Record) -> Self {
        Self::of(record.as_bytes())
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// `None` se o slice não tiver exatamente 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; 32]>::try_from(bytes).ok().map(Self)
    }

    /// Aceita hex com ou sem prefixo `0x`
    pub fn from_hex(s: &str) -> AnchorResult<Self> {
        let trimmed = s.trim();
        let raw = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(raw).map_err(|e| AnchorError::InvalidDigest(e.to_string()))?;
        Self::from_slice(&bytes).ok_or_else(|| {
            AnchorError::InvalidDigest(format!("expected {} bytes, got {}", Self::LEN, bytes.len()))
        })
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Digest {
    type Error = AnchorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            Digest::of(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            Digest::of(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_from_hex_accepts_prefix() {
        let d = Digest::of(b"abc");
        assert_eq!(Digest::from_hex(&format!("0x{}", d.to_hex())).unwrap(), d);
    }

    #[test]
    fn test_from_hex_rejects_wrong_length() {
        assert!(matches!(Digest::from_hex("abcd"), Err(AnchorError::InvalidDigest(_))));
        assert!(matches!(Digest::from_hex("zz"), Err(AnchorError::InvalidDigest(_))));
    }

    #[test]
    fn test_from_slice() {
        assert!(Digest::from_slice(&[0u8; 31]).is_none());
        assert_eq!(Digest::from_slice(&[7u8; 32]), Some(Digest::from_bytes([7u8; 32])));
    }
}

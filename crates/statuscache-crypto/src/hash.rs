// Hash functions used to derive entity tags

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Output of a hash function with algorithm awareness
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashOutput {
    /// The raw bytes of the hash
    data: [u8; 32],
    /// The algorithm used to generate this hash
    algorithm: HashAlgorithm,
}

impl HashOutput {
    /// Create a new hash output from raw bytes with the specified algorithm
    pub fn new(data: [u8; 32], algorithm: HashAlgorithm) -> Self {
        Self { data, algorithm }
    }

    /// Get the raw bytes of the hash
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Convert the hash output to a hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.data)
    }
}

impl fmt::Debug for HashOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashOutput({}, {})", self.algorithm, self.to_hex())
    }
}

/// Hash algorithm options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// BLAKE3 cryptographic hash function
    #[default]
    Blake3,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blake3 => write!(f, "Blake3"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blake3" => Ok(Self::Blake3),
            _ => Err(HashError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

/// Error type for hash and tag operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HashError {
    /// Invalid hex encoding
    #[error("Invalid hash format")]
    InvalidFormat,

    /// Invalid tag length
    #[error("Invalid length: {0} bytes")]
    InvalidLength(usize),

    /// Unsupported hash algorithm
    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Interface for hash functions
pub trait HashFunction: Send + Sync {
    /// Hash the provided data
    fn hash(&self, data: &[u8]) -> HashOutput;

    /// Get the algorithm used by this hash function
    fn algorithm(&self) -> HashAlgorithm;
}

/// BLAKE3 hash function implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3HashFunction;

impl Blake3HashFunction {
    pub fn new() -> Self {
        Self
    }
}

impl HashFunction for Blake3HashFunction {
    fn hash(&self, data: &[u8]) -> HashOutput {
        let hash = blake3::hash(data);
        HashOutput::new(*hash.as_bytes(), HashAlgorithm::Blake3)
    }

    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Blake3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blake3_is_deterministic() {
        let hasher = Blake3HashFunction::new();
        let a = hasher.hash(b"</a>,\n</b>");
        let b = hasher.hash(b"</a>,\n</b>");
        let c = hasher.hash(b"</a>");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.algorithm(), HashAlgorithm::Blake3);
        assert_eq!(a.as_bytes().len(), 32);
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("BLAKE3".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Blake3));
        assert!(matches!(
            "md5".parse::<HashAlgorithm>(),
            Err(HashError::UnsupportedAlgorithm(_))
        ));
    }
}

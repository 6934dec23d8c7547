//! 32-byte digest types used to identify proposals and timelock batches.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! digest_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name([u8; 32]);

        impl $name {
            pub const ZERO: Self = Self([0u8; 32]);

            pub fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }

            /// First four bytes as hex, for log lines.
            pub fn short(&self) -> String {
                hex::encode(&self.0[..4])
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), hex::encode(&self.0[..4]))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", hex::encode(&self.0))
            }
        }
    };
}

digest_type!(
    /// Identity of a proposal, derived from `(actions, description_hash)`.
    ///
    /// Never allocated from a counter: resubmitting identical content always
    /// yields the same id.
    ProposalId
);

digest_type!(
    /// Blake2b-256 digest of a proposal's description text.
    DescriptionHash
);

digest_type!(
    /// Identity of a batch scheduled on the execution queue.
    ScheduleId
);

// Inline hex encoding to avoid adding the `hex` crate as a dependency of types.
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_full_lowercase_hex() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xab;
        bytes[31] = 0x01;
        let id = ProposalId::new(bytes);
        let shown = id.to_string();
        assert_eq!(shown.len(), 64);
        assert!(shown.starts_with("ab00"));
        assert!(shown.ends_with("01"));
    }

    #[test]
    fn debug_is_abbreviated() {
        let id = ScheduleId::new([0x11; 32]);
        assert_eq!(format!("{:?}", id), "ScheduleId(11111111)");
        assert_eq!(id.short(), "11111111");
    }

    #[test]
    fn zero_detection() {
        assert!(DescriptionHash::ZERO.is_zero());
        assert!(!DescriptionHash::new([1; 32]).is_zero());
    }
}

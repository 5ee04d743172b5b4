//! Strongly-typed identifiers for domain entities
//!
//! Patient and claim identifiers arrive on input rows as opaque strings
//! assigned by the upstream billing system; newtype wrappers keep them from
//! being mixed up. Run-scoped identifiers (pipeline runs, audit decisions)
//! are generated here as time-ordered UUIDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new time-ordered identifier (v7)
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new_v7()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }
    };
}

// Run-scoped identifiers
define_id!(RunId, "RUN");
define_id!(DecisionId, "DEC");

macro_rules! define_string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

// Identifiers carried on input rows
define_string_id!(PatientId);
define_string_id!(ClaimNumber);

/// The processing scope key: one source claim for one patient
///
/// Displayed as `patient_claim`, matching the keys the upstream system
/// uses in its delivery sheets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceClaimKey {
    pub patient_id: PatientId,
    pub claim_number: ClaimNumber,
}

impl SourceClaimKey {
    pub fn new(patient_id: PatientId, claim_number: ClaimNumber) -> Self {
        Self {
            patient_id,
            claim_number,
        }
    }
}

impl fmt::Display for SourceClaimKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.patient_id, self.claim_number)
    }
}

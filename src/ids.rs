// Opaque Identifiers - user, group, batch and enrollment ids
//
// Users and groups are keyed by non-blank strings issued elsewhere. Batches,
// batch items and enrollments are UUIDs minted here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{KernelError, Result};
use crate::urn::require_non_blank;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(id: &str) -> Result<Self> {
                require_non_blank(id, $field)?;
                Ok($name(id.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = KernelError;

            fn from_str(s: &str) -> Result<Self> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = KernelError;

            fn try_from(value: String) -> Result<Self> {
                require_non_blank(&value, $field)?;
                Ok($name(value))
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Mints a fresh random (v4) id.
            pub fn generate() -> Self {
                $name(Uuid::new_v4())
            }

            pub fn from_uuid(id: Uuid) -> Self {
                $name(id)
            }

            pub fn parse(value: &str) -> Result<Self> {
                Uuid::parse_str(value).map($name).map_err(|err| {
                    KernelError::format(format!(
                        "Invalid {} '{}': {}",
                        stringify!($name),
                        value,
                        err
                    ))
                })
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0.hyphenated(), f)
            }
        }

        impl FromStr for $name {
            type Err = KernelError;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse(s)
            }
        }
    };
}

string_id!(
    /// Platform user.
    UserId,
    "UserId"
);

string_id!(
    /// Named group of users sharing permissions.
    UserGroupId,
    "UserGroupId"
);

uuid_id!(
    /// Bulk import or payment batch.
    BatchId
);

uuid_id!(
    /// One line of a batch.
    BatchItemId
);

uuid_id!(EnrollmentId);

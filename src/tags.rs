// Tag Vocabularies - closed sets of names used inside URNs
//
// Every tag is looked up case-insensitively and rendered in one canonical
// casing. Account systems and account types are upper case, permission tags
// are lower case.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::KernelError;

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical spelling used in URNs.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }

            /// Case-insensitive lookup by name.
            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|tag| tag.as_str().eq_ignore_ascii_case(name))
            }

            /// Upper-cased, comma separated list of every member (for messages).
            pub fn valid_names() -> String {
                Self::ALL
                    .iter()
                    .map(|tag| tag.as_str().to_ascii_uppercase())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = KernelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_name(s).ok_or_else(|| {
                    KernelError::format(format!(
                        "Invalid {} '{}'. Valid types: {}",
                        $label,
                        s,
                        Self::valid_names()
                    ))
                })
            }
        }

        impl TryFrom<String> for $name {
            type Error = KernelError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for &'static str {
            fn from(tag: $name) -> Self {
                tag.as_str()
            }
        }
    };
}

// ============================================================================
// ACCOUNT VOCABULARIES
// ============================================================================

vocabulary! {
    /// Source system that owns a client account.
    AccountSystem ("account system") {
        /// Canadian demand deposit accounts
        CanDda => "CAN_DDA",
        /// Canadian foreign currency accounts
        CanFca => "CAN_FCA",
        /// Canadian lines of credit
        CanLoc => "CAN_LOC",
        /// Canadian mortgages
        CanMtg => "CAN_MTG",
        UsFin => "US_FIN",
        UsFis => "US_FIS",
        /// Accounts held at another financial institution
        Ofi => "OFI",
        /// Pre-authorized debit registrations
        CanGrads => "CAN_GRADS",
    }
}

vocabulary! {
    /// Product type of an account held in one of the bank's own systems.
    AccountType ("account type") {
        Dda => "DDA",
        Cc => "CC",
        Loc => "LOC",
        Mtg => "MTG",
        /// Pre-authorized payment
        Pap => "PAP",
        /// Pre-authorized debit
        Pdb => "PDB",
    }
}

vocabulary! {
    /// Addressing scheme of an account held at another financial institution.
    OfiAccountType ("OFI account type") {
        Can => "CAN",
        Iban => "IBAN",
        Us => "US",
        Swift => "SWIFT",
    }
}

// ============================================================================
// PERMISSION VOCABULARIES
// ============================================================================

vocabulary! {
    /// Service category segment of an action URN.
    ServiceType ("service type") {
        Direct => "direct",
        Indirect => "indirect",
        Bank => "bank",
        Admin => "admin",
    }
}

vocabulary! {
    /// Verb segment of an action URN.
    ActionType ("action type") {
        View => "view",
        Create => "create",
        Update => "update",
        Delete => "delete",
        Approve => "approve",
        Manage => "manage",
    }
}

// ============================================================================
// PORTAL TYPE
// ============================================================================

vocabulary! {
    /// Which portal a profile belongs to.
    PortalType ("portal type") {
        Client => "CLIENT",
        Indirect => "INDIRECT",
    }
}

impl PortalType {
    /// Classifies a profile URN. Anything that is not an indirect profile
    /// (blank input included) belongs to the client portal.
    pub fn from_profile_urn(profile_urn: &str) -> Self {
        let indirect = profile_urn
            .strip_prefix(crate::profile::INDIRECT_PROFILE_PREFIX)
            .is_some_and(|rest| rest.starts_with(crate::urn::SEPARATOR));
        if indirect {
            PortalType::Indirect
        } else {
            PortalType::Client
        }
    }
}

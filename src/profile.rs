// Profile Identifiers - a profile kind anchored to a client
//
// {profileType}:{clientUrn}                 general profile
// servicing:{srf|cdr client}                servicing profile
// online:srf:{clientNumber}:{sequence}      online banking profile
// indirect-profile:{indirectClientUrn}      indirect portal profile

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::client::{BankClientId, ClientId, IndirectClientId, SrfClientId};
use crate::error::{KernelError, Result};
use crate::urn::{
    canonical_string_serde, positive_sequence, require_non_blank, split_trailing_sequence,
    strip_type_prefix, SEPARATOR,
};

pub const SERVICING_PROFILE_PREFIX: &str = "servicing";
pub const ONLINE_PROFILE_PREFIX: &str = "online";
pub const INDIRECT_PROFILE_PREFIX: &str = "indirect-profile";

/// Only a flat SRF client may anchor online and indirect profiles.
fn require_srf(client_id: ClientId, type_name: &str) -> Result<SrfClientId> {
    match client_id {
        ClientId::Srf(srf) => Ok(srf),
        _ => Err(KernelError::format(format!("{type_name} requires SRF client"))),
    }
}

// ============================================================================
// PROFILE ID
// ============================================================================

/// Open-ended profile identifier: any non-blank profile type over any client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileId {
    profile_type: String,
    client_id: ClientId,
}

impl ProfileId {
    /// The profile type is stored lower-cased.
    ///
    /// A profile type containing `:` is rejected with a `Format` error: the
    /// URN is split at its first colon, so it would not parse back.
    pub fn of(profile_type: &str, client_id: impl Into<ClientId>) -> Result<Self> {
        require_non_blank(profile_type, "ProfileType")?;
        if profile_type.contains(SEPARATOR) {
            return Err(KernelError::format(format!(
                "Invalid profile type '{profile_type}': must not contain '{SEPARATOR}'"
            )));
        }
        Ok(ProfileId {
            profile_type: profile_type.to_lowercase(),
            client_id: client_id.into(),
        })
    }

    pub fn servicing(client_id: impl Into<ClientId>) -> Result<Self> {
        Self::of(SERVICING_PROFILE_PREFIX, client_id)
    }

    /// Splits on the FIRST colon; the rest goes through the client dispatcher
    /// and may nest `indirect:` wrappers.
    pub fn from_urn(urn: &str) -> Result<Self> {
        let (profile_type, client_urn) = urn
            .split_once(SEPARATOR)
            .ok_or_else(|| KernelError::format(format!("Invalid ProfileId URN format: {urn}")))?;
        require_non_blank(profile_type, "ProfileType")?;
        Self::of(profile_type, ClientId::parse(client_urn)?)
    }

    pub fn profile_type(&self) -> &str {
        &self.profile_type
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn urn(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.profile_type, self.client_id)
    }
}

impl FromStr for ProfileId {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_urn(s)
    }
}

canonical_string_serde!(ProfileId);

// ============================================================================
// SERVICING PROFILE
// ============================================================================

/// Servicing profile of a bank-record client (SRF or CDR).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServicingProfileId {
    client_id: BankClientId,
}

impl ServicingProfileId {
    pub fn of(client_id: impl Into<ClientId>) -> Result<Self> {
        let client_id: ClientId = client_id.into();
        let client_id = client_id.as_bank().ok_or_else(|| {
            KernelError::format("ServicingProfileId requires SRF or CDR client")
        })?;
        Ok(ServicingProfileId { client_id })
    }

    pub fn from_urn(urn: &str) -> Result<Self> {
        let client_urn = strip_type_prefix(urn, SERVICING_PROFILE_PREFIX, "ServicingProfileId")?;
        Self::of(ClientId::parse(client_urn)?)
    }

    pub fn client_id(&self) -> &BankClientId {
        &self.client_id
    }

    /// The same profile seen as a general [`ProfileId`].
    pub fn profile_id(&self) -> ProfileId {
        ProfileId {
            profile_type: SERVICING_PROFILE_PREFIX.to_string(),
            client_id: self.client_id.clone().into(),
        }
    }

    pub fn urn(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ServicingProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SERVICING_PROFILE_PREFIX}{SEPARATOR}{}", self.client_id)
    }
}

impl FromStr for ServicingProfileId {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_urn(s)
    }
}

canonical_string_serde!(ServicingProfileId);

// ============================================================================
// ONLINE PROFILE
// ============================================================================

/// Numbered online banking profile of an SRF client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OnlineProfileId {
    client_id: SrfClientId,
    sequence: NonZeroU32,
}

impl OnlineProfileId {
    /// Rejects CDR and indirect clients with "OnlineProfileId requires SRF client".
    pub fn of(client_id: impl Into<ClientId>, sequence: u32) -> Result<Self> {
        let client_id = require_srf(client_id.into(), "OnlineProfileId")?;
        Ok(OnlineProfileId {
            client_id,
            sequence: positive_sequence(sequence)?,
        })
    }

    pub fn from_urn(urn: &str) -> Result<Self> {
        let remainder = strip_type_prefix(urn, ONLINE_PROFILE_PREFIX, "OnlineProfileId")?;
        let (client_urn, sequence) = split_trailing_sequence(remainder, "OnlineProfileId", urn)?;
        let client_id = require_srf(ClientId::parse(client_urn)?, "OnlineProfileId")?;
        Ok(OnlineProfileId {
            client_id,
            sequence,
        })
    }

    pub fn client_id(&self) -> &SrfClientId {
        &self.client_id
    }

    pub fn sequence(&self) -> u32 {
        self.sequence.get()
    }

    pub fn urn(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OnlineProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{ONLINE_PROFILE_PREFIX}{SEPARATOR}{}{SEPARATOR}{}",
            self.client_id, self.sequence
        )
    }
}

impl FromStr for OnlineProfileId {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_urn(s)
    }
}

canonical_string_serde!(OnlineProfileId);

// ============================================================================
// INDIRECT PROFILE
// ============================================================================

/// Profile of an indirect client, anchored to the SRF client it was derived from.
///
/// Only the indirect client appears in the URN, so the anchor must be the
/// client the indirect client wraps directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IndirectProfileId {
    client_id: SrfClientId,
    indirect_client_id: IndirectClientId,
}

impl IndirectProfileId {
    pub fn of(client_id: impl Into<ClientId>, indirect_client_id: IndirectClientId) -> Result<Self> {
        let client_id = require_srf(client_id.into(), "IndirectProfileId")?;
        if indirect_client_id.client_id().as_srf() != Some(&client_id) {
            return Err(KernelError::format(format!(
                "IndirectProfileId indirect client must derive from {client_id}"
            )));
        }
        Ok(IndirectProfileId {
            client_id,
            indirect_client_id,
        })
    }

    pub fn from_urn(urn: &str) -> Result<Self> {
        let indirect_urn = strip_type_prefix(urn, INDIRECT_PROFILE_PREFIX, "IndirectProfileId")?;
        let indirect_client_id = IndirectClientId::parse(indirect_urn)?;
        let client_id = require_srf(indirect_client_id.client_id(), "IndirectProfileId")?;
        Ok(IndirectProfileId {
            client_id,
            indirect_client_id,
        })
    }

    pub fn client_id(&self) -> &SrfClientId {
        &self.client_id
    }

    pub fn indirect_client_id(&self) -> &IndirectClientId {
        &self.indirect_client_id
    }

    pub fn urn(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for IndirectProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{INDIRECT_PROFILE_PREFIX}{SEPARATOR}{}", self.indirect_client_id)
    }
}

impl FromStr for IndirectProfileId {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_urn(s)
    }
}

canonical_string_serde!(IndirectProfileId);

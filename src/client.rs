// Client Identifiers - bank-record clients and nested indirect clients
//
// srf:{clientNumber}
// cdr:{clientNumber}
// indirect:{clientUrn}:{sequence}     (clientUrn may itself be indirect)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::error::{KernelError, Result};
use crate::urn::{
    canonical_string_serde, positive_sequence, require_non_blank, split_trailing_sequence,
    strip_type_prefix, SEPARATOR,
};

pub const SRF_PREFIX: &str = "srf";
pub const CDR_PREFIX: &str = "cdr";
pub const INDIRECT_PREFIX: &str = "indirect";

const CLIENT_PREFIX_ERROR: &str =
    "Invalid ClientId URN format. Expected prefixes: srf:, cdr:, or indirect:";
const BANK_PREFIX_ERROR: &str = "Invalid BankClientId URN format. Expected prefixes: srf: or cdr:";

// ============================================================================
// BANK RECORD CLIENTS
// ============================================================================

/// Client held in the SRF client master.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SrfClientId {
    client_number: String,
}

impl SrfClientId {
    pub fn new(client_number: &str) -> Result<Self> {
        require_non_blank(client_number, "Client number")?;
        Ok(SrfClientId {
            client_number: client_number.to_string(),
        })
    }

    /// Parses `srf:{clientNumber}`; any other prefix is rejected.
    pub fn parse(urn: &str) -> Result<Self> {
        Self::new(strip_type_prefix(urn, SRF_PREFIX, "SrfClientId")?)
    }

    pub fn client_number(&self) -> &str {
        &self.client_number
    }

    pub fn system(&self) -> &'static str {
        SRF_PREFIX
    }

    pub fn urn(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SrfClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SRF_PREFIX}{SEPARATOR}{}", self.client_number)
    }
}

impl FromStr for SrfClientId {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

canonical_string_serde!(SrfClientId);

/// Client held in the CDR client master.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CdrClientId {
    client_number: String,
}

impl CdrClientId {
    pub fn new(client_number: &str) -> Result<Self> {
        require_non_blank(client_number, "Client number")?;
        Ok(CdrClientId {
            client_number: client_number.to_string(),
        })
    }

    /// Parses `cdr:{clientNumber}`; any other prefix is rejected.
    pub fn parse(urn: &str) -> Result<Self> {
        Self::new(strip_type_prefix(urn, CDR_PREFIX, "CdrClientId")?)
    }

    pub fn client_number(&self) -> &str {
        &self.client_number
    }

    pub fn system(&self) -> &'static str {
        CDR_PREFIX
    }

    pub fn urn(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CdrClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CDR_PREFIX}{SEPARATOR}{}", self.client_number)
    }
}

impl FromStr for CdrClientId {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

canonical_string_serde!(CdrClientId);

/// The flat bank-record subset of [`ClientId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BankClientId {
    Srf(SrfClientId),
    Cdr(CdrClientId),
}

impl BankClientId {
    pub fn parse(urn: &str) -> Result<Self> {
        match urn.split_once(SEPARATOR) {
            Some((SRF_PREFIX, number)) => SrfClientId::new(number).map(BankClientId::Srf),
            Some((CDR_PREFIX, number)) => CdrClientId::new(number).map(BankClientId::Cdr),
            _ => Err(KernelError::format(BANK_PREFIX_ERROR)),
        }
    }

    pub fn client_number(&self) -> &str {
        match self {
            BankClientId::Srf(id) => id.client_number(),
            BankClientId::Cdr(id) => id.client_number(),
        }
    }

    pub fn system(&self) -> &'static str {
        match self {
            BankClientId::Srf(id) => id.system(),
            BankClientId::Cdr(id) => id.system(),
        }
    }

    pub fn urn(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BankClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankClientId::Srf(id) => fmt::Display::fmt(id, f),
            BankClientId::Cdr(id) => fmt::Display::fmt(id, f),
        }
    }
}

impl FromStr for BankClientId {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

canonical_string_serde!(BankClientId);

// ============================================================================
// INDIRECT CLIENT
// ============================================================================

/// A client reached through another client, numbered within it.
///
/// The wrapped client can be any [`ClientId`], including another indirect
/// client, so chains nest to arbitrary depth. The chain is held flat: the
/// bank-record client at the bottom plus one sequence per `indirect:` layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IndirectClientId {
    base: BankClientId,
    /// Sequences of the inner layers, innermost first.
    inner: Vec<NonZeroU32>,
    sequence: NonZeroU32,
}

impl IndirectClientId {
    pub fn of(client_id: impl Into<ClientId>, sequence: u32) -> Result<Self> {
        let sequence = positive_sequence(sequence)?;
        Ok(match client_id.into() {
            ClientId::Srf(id) => IndirectClientId::wrap(BankClientId::Srf(id), sequence),
            ClientId::Cdr(id) => IndirectClientId::wrap(BankClientId::Cdr(id), sequence),
            ClientId::Indirect(mut id) => {
                id.inner.push(id.sequence);
                id.sequence = sequence;
                id
            }
        })
    }

    fn wrap(base: BankClientId, sequence: NonZeroU32) -> Self {
        IndirectClientId {
            base,
            inner: Vec::new(),
            sequence,
        }
    }

    /// Parses `indirect:{clientUrn}:{sequence}`.
    ///
    /// Every leading `indirect:` is matched by one trailing sequence, peeled
    /// at the last colon. What is left in the middle must be a bank-record
    /// client.
    pub fn parse(urn: &str) -> Result<Self> {
        let mut remainder = strip_type_prefix(urn, INDIRECT_PREFIX, "IndirectClientId")?;
        let mut layers = 1;
        while let Some(rest) = strip_indirect_prefix(remainder) {
            remainder = rest;
            layers += 1;
        }

        let (nested, sequence) = split_trailing_sequence(remainder, "IndirectClientId", urn)?;
        remainder = nested;
        let mut inner = Vec::with_capacity(layers - 1);
        for _ in 1..layers {
            let (nested, sequence) = split_trailing_sequence(remainder, "IndirectClientId", urn)?;
            inner.push(sequence);
            remainder = nested;
        }
        // Peeled from the outside in.
        inner.reverse();

        Ok(IndirectClientId {
            base: parse_base_client(remainder)?,
            inner,
            sequence,
        })
    }

    /// The wrapped client, rebuilt one layer down.
    pub fn client_id(&self) -> ClientId {
        match self.inner.split_last() {
            None => self.base.clone().into(),
            Some((&sequence, rest)) => ClientId::Indirect(IndirectClientId {
                base: self.base.clone(),
                inner: rest.to_vec(),
                sequence,
            }),
        }
    }

    pub fn sequence(&self) -> u32 {
        self.sequence.get()
    }

    /// The bank-record client at the bottom of the chain.
    pub fn base(&self) -> &BankClientId {
        &self.base
    }

    /// Sequences from the innermost layer outwards.
    pub fn sequences(&self) -> impl Iterator<Item = u32> + '_ {
        self.inner
            .iter()
            .chain(std::iter::once(&self.sequence))
            .map(|sequence| sequence.get())
    }

    /// Number of `indirect:` layers, at least one.
    pub fn depth(&self) -> usize {
        self.inner.len() + 1
    }

    pub fn urn(&self) -> String {
        self.to_string()
    }
}

/// Bank-record prefixes only, reporting failures as a [`ClientId`] error.
fn parse_base_client(urn: &str) -> Result<BankClientId> {
    match urn.split_once(SEPARATOR) {
        Some((SRF_PREFIX, number)) => SrfClientId::new(number).map(BankClientId::Srf),
        Some((CDR_PREFIX, number)) => CdrClientId::new(number).map(BankClientId::Cdr),
        _ => Err(KernelError::format(CLIENT_PREFIX_ERROR)),
    }
}

fn strip_indirect_prefix(urn: &str) -> Option<&str> {
    urn.strip_prefix(INDIRECT_PREFIX)
        .and_then(|rest| rest.strip_prefix(SEPARATOR))
}

impl fmt::Display for IndirectClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.depth() {
            write!(f, "{INDIRECT_PREFIX}{SEPARATOR}")?;
        }
        fmt::Display::fmt(&self.base, f)?;
        for sequence in self.sequences() {
            write!(f, "{SEPARATOR}{sequence}")?;
        }
        Ok(())
    }
}

impl FromStr for IndirectClientId {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

canonical_string_serde!(IndirectClientId);

// ============================================================================
// CLIENT ID
// ============================================================================

/// Any client identifier. Parsing dispatches on the URN prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ClientId {
    Srf(SrfClientId),
    Cdr(CdrClientId),
    Indirect(IndirectClientId),
}

impl ClientId {
    /// Parses any client URN into its variant.
    pub fn parse(urn: &str) -> Result<Self> {
        Self::dispatch(urn).inspect_err(|err| {
            tracing::debug!(urn, reason = %err, "rejected ClientId URN");
        })
    }

    fn dispatch(urn: &str) -> Result<Self> {
        match urn.split_once(SEPARATOR) {
            Some((INDIRECT_PREFIX, _)) => IndirectClientId::parse(urn).map(ClientId::Indirect),
            _ => parse_base_client(urn).map(ClientId::from),
        }
    }

    /// Prefix of the outermost variant.
    pub fn system(&self) -> &'static str {
        match self {
            ClientId::Srf(_) => SRF_PREFIX,
            ClientId::Cdr(_) => CDR_PREFIX,
            ClientId::Indirect(_) => INDIRECT_PREFIX,
        }
    }

    pub fn as_srf(&self) -> Option<&SrfClientId> {
        match self {
            ClientId::Srf(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_indirect(&self) -> Option<&IndirectClientId> {
        match self {
            ClientId::Indirect(id) => Some(id),
            _ => None,
        }
    }

    /// The flat bank-record view, `None` for indirect clients.
    pub fn as_bank(&self) -> Option<BankClientId> {
        match self {
            ClientId::Srf(id) => Some(BankClientId::Srf(id.clone())),
            ClientId::Cdr(id) => Some(BankClientId::Cdr(id.clone())),
            ClientId::Indirect(_) => None,
        }
    }

    pub fn is_indirect(&self) -> bool {
        matches!(self, ClientId::Indirect(_))
    }

    /// The bank-record client at the bottom of an indirect chain.
    pub fn root(&self) -> BankClientId {
        match self {
            ClientId::Srf(id) => BankClientId::Srf(id.clone()),
            ClientId::Cdr(id) => BankClientId::Cdr(id.clone()),
            ClientId::Indirect(id) => id.base().clone(),
        }
    }

    /// Number of `indirect:` wrappers around the root client.
    pub fn depth(&self) -> usize {
        self.as_indirect().map_or(0, IndirectClientId::depth)
    }

    pub fn urn(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientId::Srf(id) => fmt::Display::fmt(id, f),
            ClientId::Cdr(id) => fmt::Display::fmt(id, f),
            ClientId::Indirect(id) => fmt::Display::fmt(id, f),
        }
    }
}

impl FromStr for ClientId {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

canonical_string_serde!(ClientId);

impl From<SrfClientId> for ClientId {
    fn from(id: SrfClientId) -> Self {
        ClientId::Srf(id)
    }
}

impl From<CdrClientId> for ClientId {
    fn from(id: CdrClientId) -> Self {
        ClientId::Cdr(id)
    }
}

impl From<IndirectClientId> for ClientId {
    fn from(id: IndirectClientId) -> Self {
        ClientId::Indirect(id)
    }
}

impl From<BankClientId> for ClientId {
    fn from(id: BankClientId) -> Self {
        match id {
            BankClientId::Srf(id) => ClientId::Srf(id),
            BankClientId::Cdr(id) => ClientId::Cdr(id),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn srf(number: &str) -> SrfClientId {
        SrfClientId::new(number).unwrap()
    }

    #[test]
    fn test_srf_client_id() {
        let id = srf("123456789");
        assert_eq!(id.client_number(), "123456789");
        assert_eq!(id.urn(), "srf:123456789");
        assert_eq!(id.system(), "srf");

        let parsed = SrfClientId::parse("srf:987654321").unwrap();
        assert_eq!(parsed.client_number(), "987654321");
    }

    #[test]
    fn test_bank_clients_require_client_number() {
        assert_eq!(
            SrfClientId::new("   "),
            Err(KernelError::required("Client number"))
        );
        assert_eq!(CdrClientId::new(""), Err(KernelError::required("Client number")));
        assert_eq!(
            ClientId::parse("srf:"),
            Err(KernelError::required("Client number"))
        );
    }

    #[test]
    fn test_variant_parsers_reject_other_prefixes() {
        assert_eq!(
            SrfClientId::parse("cdr:123456"),
            Err(KernelError::format("Invalid SrfClientId URN format"))
        );
        assert_eq!(
            CdrClientId::parse("srf:123456"),
            Err(KernelError::format("Invalid CdrClientId URN format"))
        );
    }

    #[test]
    fn test_cdr_client_id() {
        let id = CdrClientId::parse("cdr:000456").unwrap();
        assert_eq!(id.client_number(), "000456");
        assert_eq!(id.urn(), "cdr:000456");
        assert_eq!(id.system(), "cdr");
    }

    #[test]
    fn test_bank_client_id_parse() {
        let srf = BankClientId::parse("srf:123456789").unwrap();
        assert!(matches!(srf, BankClientId::Srf(_)));
        assert_eq!(srf.system(), "srf");

        let cdr = BankClientId::parse("cdr:000123").unwrap();
        assert_eq!(cdr.client_number(), "000123");
        assert_eq!(cdr.system(), "cdr");

        assert_eq!(
            BankClientId::parse("invalid:123456"),
            Err(KernelError::format(BANK_PREFIX_ERROR))
        );
        assert!(BankClientId::parse("indirect:srf:1:1").is_err());
    }

    #[test]
    fn test_client_id_dispatches_on_prefix() {
        assert!(matches!(ClientId::parse("srf:123456789"), Ok(ClientId::Srf(_))));
        assert!(matches!(ClientId::parse("cdr:000123"), Ok(ClientId::Cdr(_))));
        assert!(matches!(
            ClientId::parse("indirect:srf:123456789:1"),
            Ok(ClientId::Indirect(_))
        ));
    }

    #[test]
    fn test_client_id_rejects_unknown_prefix() {
        for urn in ["unknown:123456", "", "srf", "SRF:123", "ind:123"] {
            assert_eq!(
                ClientId::parse(urn),
                Err(KernelError::format(CLIENT_PREFIX_ERROR)),
                "{urn}"
            );
        }
    }

    #[test]
    fn test_indirect_from_urn() {
        let id = IndirectClientId::parse("indirect:srf:123456789:1").unwrap();
        assert_eq!(id.client_id(), ClientId::Srf(srf("123456789")));
        assert_eq!(id.sequence(), 1);
        assert_eq!(id.urn(), "indirect:srf:123456789:1");
    }

    #[test]
    fn test_indirect_of_validates_sequence() {
        let id = IndirectClientId::of(srf("1"), 4).unwrap();
        assert_eq!(id.urn(), "indirect:srf:1:4");
        assert_eq!(
            IndirectClientId::of(srf("1"), 0),
            Err(KernelError::format("Sequence must be positive"))
        );
    }

    #[test]
    fn test_indirect_parse_errors() {
        assert_eq!(
            IndirectClientId::parse("srf:123456789"),
            Err(KernelError::format("Invalid IndirectClientId URN format"))
        );
        assert_eq!(
            IndirectClientId::parse("indirect:srf:1:0"),
            Err(KernelError::format("Sequence must be positive"))
        );
        assert_eq!(
            IndirectClientId::parse("indirect:srf:1:abc"),
            Err(KernelError::format(
                "Invalid sequence 'abc' in IndirectClientId URN: indirect:srf:1:abc"
            ))
        );
        assert_eq!(
            IndirectClientId::parse("indirect:nocolon"),
            Err(KernelError::format(
                "Invalid IndirectClientId URN format - missing sequence"
            ))
        );
        assert_eq!(
            IndirectClientId::parse("indirect:bogus:1:2"),
            Err(KernelError::format(CLIENT_PREFIX_ERROR))
        );
    }

    #[test]
    fn test_nested_indirect_round_trip() {
        let base = ClientId::Srf(srf("123"));
        let level1 = IndirectClientId::of(base.clone(), 1).unwrap();
        let level2 = IndirectClientId::of(level1, 2).unwrap();
        let level3 = ClientId::from(IndirectClientId::of(level2, 3).unwrap());

        let urn = level3.urn();
        assert_eq!(urn, "indirect:indirect:indirect:srf:123:1:2:3");
        assert_eq!(urn.matches("indirect:").count(), 3);

        let parsed = ClientId::parse(&urn).unwrap();
        assert_eq!(parsed, level3);
        assert_eq!(parsed.urn(), urn);
        assert_eq!(parsed.depth(), 3);
        assert_eq!(parsed.root(), BankClientId::Srf(srf("123")));
        assert_eq!(parsed.as_indirect().unwrap().sequences().collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(
            parsed.as_indirect().unwrap().client_id().urn(),
            "indirect:indirect:srf:123:1:2"
        );
        assert_eq!(parsed.as_indirect().map(IndirectClientId::sequence), Some(3));
    }

    #[test]
    fn test_indirect_sequences_must_be_canonical() {
        for urn in [
            "indirect:srf:1:05",
            "indirect:srf:1:+5",
            "indirect:indirect:srf:1:007:2",
        ] {
            let err = ClientId::parse(urn).unwrap_err();
            assert!(err.to_string().starts_with("Invalid sequence '"), "{urn}: {err}");
        }
        assert_eq!(
            ClientId::parse("indirect:srf:1:-3"),
            Err(KernelError::format("Sequence must be positive"))
        );
        assert_eq!(ClientId::parse("indirect:srf:1:50").unwrap().urn(), "indirect:srf:1:50");
    }

    #[test]
    fn test_deeply_nested_chain() {
        let depth = 20_000;
        let urn = format!(
            "{}srf:1{}",
            "indirect:".repeat(depth),
            ":1".repeat(depth)
        );

        let parsed = ClientId::parse(&urn).unwrap();
        assert_eq!(parsed.depth(), depth);
        assert_eq!(parsed.root(), BankClientId::Srf(srf("1")));
        assert_eq!(parsed.urn(), urn);

        let copy = parsed.clone();
        assert_eq!(copy, parsed);
        let set: HashSet<ClientId> = [parsed, copy].into_iter().collect();
        assert_eq!(set.len(), 1);

        let mut built = ClientId::from(srf("1"));
        for _ in 0..depth {
            built = IndirectClientId::of(built, 1).unwrap().into();
        }
        assert_eq!(built.urn(), urn);
        assert!(format!("{built:?}").len() > depth);
        drop(built);

        let unbalanced = format!("{}srf:1{}", "indirect:".repeat(depth), ":1".repeat(depth - 1));
        assert_eq!(
            ClientId::parse(&unbalanced),
            Err(KernelError::format(CLIENT_PREFIX_ERROR))
        );
    }

    #[test]
    fn test_indirect_over_cdr() {
        let parsed = ClientId::parse("indirect:cdr:000123:9").unwrap();
        let indirect = parsed.as_indirect().unwrap();
        assert_eq!(indirect.client_id().system(), "cdr");
        assert_eq!(indirect.sequence(), 9);
        assert!(parsed.as_bank().is_none());
        assert!(parsed.is_indirect());
    }

    #[test]
    fn test_equality_and_hashing() {
        let a = ClientId::parse("indirect:srf:1:2").unwrap();
        let b = ClientId::from(IndirectClientId::of(srf("1"), 2).unwrap());
        let c = ClientId::parse("indirect:srf:1:3").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(ClientId::parse("srf:1").unwrap(), ClientId::parse("cdr:1").unwrap());

        let set: HashSet<ClientId> = [a.clone(), b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&a));
    }

    #[test]
    fn test_bank_client_converts_into_client_id() {
        let bank = BankClientId::parse("cdr:42").unwrap();
        let client = ClientId::from(bank.clone());
        assert_eq!(client.as_bank(), Some(bank));
        assert_eq!(client.urn(), "cdr:42");
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let id = ClientId::parse("indirect:srf:123456789:1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"indirect:srf:123456789:1\"");
        assert_eq!(serde_json::from_str::<ClientId>(&json).unwrap(), id);

        let srf_json = serde_json::to_string(&srf("5")).unwrap();
        assert_eq!(srf_json, "\"srf:5\"");
        assert!(serde_json::from_str::<SrfClientId>("\"cdr:5\"").is_err());
    }
}

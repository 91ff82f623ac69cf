// Client Account Identifier - per-system account number grammars
//
// URN format: {accountSystem}:{accountType}:{accountNumberSegments}
//
// Rules:
// - CAN_DDA / CAN_FCA / CAN_LOC / CAN_MTG: transit(5):accountNumber(12)
// - US_FIN / US_FIS: any non-blank account number
// - OFI CAN: bank(3):transit(5):accountNumber(12)
// - OFI IBAN: bic(8-11):ibanAccountNumber(up to 34)
// - OFI US: abaRouting(9):accountNumber(up to 17)
// - OFI SWIFT: bic(8-11):bban(up to 34)
// - CAN_GRADS (PAP / PDB only): 10 digits

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{KernelError, Result};
use crate::tags::{AccountSystem, AccountType, OfiAccountType};
use crate::urn::{canonical_string_serde, require_non_blank, SEPARATOR};

// ============================================================================
// GRAMMARS
// ============================================================================

static CANADIAN_DEPOSIT: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9]{5}:[0-9]{12}$"));
static OFI_CAN: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9]{3}:[0-9]{5}:[0-9]{12}$"));
static OFI_BIC_ACCOUNT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[A-Z0-9]{8,11}:[A-Z0-9]{1,34}$"));
static OFI_US: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9]{9}:[A-Z0-9]{1,17}$"));
static GRADS: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9]{10}$"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("account grammar pattern is a valid regex")
}

/// Structural rule an account number string must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grammar {
    CanadianDeposit,
    Unstructured,
    Ofi(OfiAccountType),
    Grads,
}

impl Grammar {
    fn pattern(self) -> Option<&'static Regex> {
        match self {
            Grammar::CanadianDeposit => Some(&*CANADIAN_DEPOSIT),
            Grammar::Unstructured => None,
            Grammar::Ofi(OfiAccountType::Can) => Some(&*OFI_CAN),
            Grammar::Ofi(OfiAccountType::Iban) | Grammar::Ofi(OfiAccountType::Swift) => {
                Some(&*OFI_BIC_ACCOUNT)
            }
            Grammar::Ofi(OfiAccountType::Us) => Some(&*OFI_US),
            Grammar::Grads => Some(&*GRADS),
        }
    }

    fn rejection(self, system: AccountSystem) -> String {
        match self {
            Grammar::CanadianDeposit => format!(
                "Invalid account number segments for {system}. Expected format: transit(5):accountNumber(12)"
            ),
            Grammar::Unstructured => {
                format!("Invalid account number segments for {system}")
            }
            Grammar::Ofi(kind) => {
                let expected = match kind {
                    OfiAccountType::Can => "bank(3):transit(5):accountNumber(12)",
                    OfiAccountType::Iban => "bic(8-11):ibanAccountNumber(up to 34)",
                    OfiAccountType::Us => "abaRouting(9):accountNumber(up to 17)",
                    OfiAccountType::Swift => "bic(8-11):bban(up to 34)",
                };
                format!("Invalid OFI {kind} account number segments. Expected format: {expected}")
            }
            Grammar::Grads => "Invalid GRADS Account: Must be 10 digits".to_string(),
        }
    }

    fn check(self, system: AccountSystem, segments: &str) -> Result<()> {
        match self.pattern() {
            Some(pattern) if !pattern.is_match(segments) => {
                Err(KernelError::format(self.rejection(system)))
            }
            _ => Ok(()),
        }
    }
}

/// Account types a system accepts and the grammar they imply.
#[derive(Debug, Clone, Copy)]
enum SystemRule {
    /// Bank-owned system: a fixed account type subset sharing one grammar.
    Bank {
        types: &'static [AccountType],
        grammar: Grammar,
    },
    /// Other financial institution: the account type picks the grammar.
    OtherInstitution,
}

const BANK_ACCOUNT_TYPES: &[AccountType] = AccountType::ALL;
const GRADS_ACCOUNT_TYPES: &[AccountType] = &[AccountType::Pap, AccountType::Pdb];

fn rule_for(system: AccountSystem) -> SystemRule {
    match system {
        AccountSystem::CanDda
        | AccountSystem::CanFca
        | AccountSystem::CanLoc
        | AccountSystem::CanMtg => SystemRule::Bank {
            types: BANK_ACCOUNT_TYPES,
            grammar: Grammar::CanadianDeposit,
        },
        AccountSystem::UsFin | AccountSystem::UsFis => SystemRule::Bank {
            types: BANK_ACCOUNT_TYPES,
            grammar: Grammar::Unstructured,
        },
        AccountSystem::Ofi => SystemRule::OtherInstitution,
        AccountSystem::CanGrads => SystemRule::Bank {
            types: GRADS_ACCOUNT_TYPES,
            grammar: Grammar::Grads,
        },
    }
}

/// Validates the account type against the system and returns its canonical
/// spelling together with the grammar the segments must follow.
fn resolve(system: AccountSystem, account_type: &str) -> Result<(&'static str, Grammar)> {
    match rule_for(system) {
        SystemRule::Bank { types, grammar } => {
            let kind = AccountType::from_name(account_type)
                .filter(|kind| types.contains(kind))
                .ok_or_else(|| {
                    KernelError::format(format!(
                        "Invalid account type for {system}: {account_type}"
                    ))
                })?;
            Ok((kind.as_str(), grammar))
        }
        SystemRule::OtherInstitution => {
            let kind = OfiAccountType::from_name(account_type).ok_or_else(|| {
                KernelError::format(format!(
                    "Invalid OFI account type: {account_type}. Must be one of: {}",
                    OfiAccountType::valid_names()
                ))
            })?;
            Ok((kind.as_str(), Grammar::Ofi(kind)))
        }
    }
}

// ============================================================================
// CLIENT ACCOUNT ID
// ============================================================================

/// Structured account identifier: system, account type and number segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientAccountId {
    account_system: AccountSystem,
    account_type: String,
    account_number_segments: String,
}

impl ClientAccountId {
    /// Validates the three components as a unit.
    pub fn new(
        account_system: AccountSystem,
        account_type: &str,
        account_number_segments: &str,
    ) -> Result<Self> {
        require_non_blank(account_type, "Account type")?;
        require_non_blank(account_number_segments, "Account number segments")?;

        let (canonical_type, grammar) = resolve(account_system, account_type)?;
        grammar.check(account_system, account_number_segments)?;

        Ok(ClientAccountId {
            account_system,
            account_type: canonical_type.to_string(),
            account_number_segments: account_number_segments.to_string(),
        })
    }

    /// Parses `{accountSystem}:{accountType}:{accountNumberSegments}`.
    pub fn parse(urn: &str) -> Result<Self> {
        Self::parse_components(urn).inspect_err(|err| {
            tracing::debug!(urn, reason = %err, "rejected ClientAccountId URN");
        })
    }

    fn parse_components(urn: &str) -> Result<Self> {
        require_non_blank(urn, "URN")?;

        let mut parts = urn.splitn(3, SEPARATOR);
        let (Some(system), Some(account_type), Some(segments)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(KernelError::format(
                "Invalid ClientAccountId URN format. Expected: {accountSystem}:{accountType}:{accountNumberSegments}",
            ));
        };

        let system = AccountSystem::from_name(system)
            .ok_or_else(|| KernelError::format(format!("Invalid account system: {system}")))?;

        Self::new(system, account_type, segments)
    }

    pub fn account_system(&self) -> AccountSystem {
        self.account_system
    }

    /// Canonical (upper-case) account type.
    pub fn account_type(&self) -> &str {
        &self.account_type
    }

    pub fn account_number_segments(&self) -> &str {
        &self.account_number_segments
    }

    /// Account type as a bank product, `None` for OFI accounts.
    pub fn bank_account_type(&self) -> Option<AccountType> {
        match rule_for(self.account_system) {
            SystemRule::Bank { .. } => AccountType::from_name(&self.account_type),
            SystemRule::OtherInstitution => None,
        }
    }

    /// Addressing scheme for OFI accounts, `None` otherwise.
    pub fn ofi_account_type(&self) -> Option<OfiAccountType> {
        match rule_for(self.account_system) {
            SystemRule::OtherInstitution => OfiAccountType::from_name(&self.account_type),
            SystemRule::Bank { .. } => None,
        }
    }

    /// Canonical string.
    pub fn urn(&self) -> String {
        self.to_string()
    }

    // ------------------------------------------------------------------------
    // GRADS
    // ------------------------------------------------------------------------

    pub fn is_grads(&self) -> bool {
        self.account_system == AccountSystem::CanGrads
    }

    pub fn is_pap(&self) -> bool {
        self.is_grads() && self.bank_account_type() == Some(AccountType::Pap)
    }

    pub fn is_pdb(&self) -> bool {
        self.is_grads() && self.bank_account_type() == Some(AccountType::Pdb)
    }

    /// The raw 10-digit GRADS service account number.
    pub fn gsan(&self) -> Result<&str> {
        if !self.is_grads() {
            return Err(KernelError::format("Not a GRADS account"));
        }
        Ok(&self.account_number_segments)
    }
}

impl fmt::Display for ClientAccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.account_system, self.account_type, self.account_number_segments
        )
    }
}

impl FromStr for ClientAccountId {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

canonical_string_serde!(ClientAccountId);

// ============================================================================
// TESTS
// ============================================================================

// URN Segments - helpers shared by every identifier codec
//
// A URN is a colon-delimited string. Identifiers compose by concatenation,
// so parsers strip a known prefix, peel the trailing local segment and hand
// whatever is left to the next parser.

use std::num::NonZeroU32;

use crate::error::{KernelError, Result};

/// Segment delimiter for every canonical string.
pub const SEPARATOR: char = ':';

/// Fails with `Required` when `value` is empty or whitespace only.
pub(crate) fn require_non_blank(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(KernelError::required(field));
    }
    Ok(())
}

/// Validates a sequence number handed in by a caller.
pub(crate) fn positive_sequence(sequence: u32) -> Result<NonZeroU32> {
    NonZeroU32::new(sequence).ok_or_else(|| KernelError::format("Sequence must be positive"))
}

/// Strips `prefix` (including its trailing colon) or fails naming the type.
pub(crate) fn strip_type_prefix<'a>(urn: &'a str, prefix: &str, type_name: &str) -> Result<&'a str> {
    urn.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix(SEPARATOR))
        .ok_or_else(|| KernelError::format(format!("Invalid {type_name} URN format")))
}

/// Splits `remainder` at its LAST colon into (nested urn, sequence).
///
/// Everything before the last colon is returned untouched for the caller to
/// parse further.
pub(crate) fn split_trailing_sequence<'a>(
    remainder: &'a str,
    type_name: &str,
    urn: &str,
) -> Result<(&'a str, NonZeroU32)> {
    let (nested, segment) = remainder.rsplit_once(SEPARATOR).ok_or_else(|| {
        KernelError::format(format!("Invalid {type_name} URN format - missing sequence"))
    })?;
    Ok((nested, parse_sequence(segment, type_name, urn)?))
}

/// Reads a sequence segment in its canonical form, `[1-9][0-9]*`.
///
/// Zero and negative numbers are reported as non-positive. Signs, leading
/// zeros and values past `u32::MAX` are malformed.
fn parse_sequence(segment: &str, type_name: &str, urn: &str) -> Result<NonZeroU32> {
    let invalid = || {
        KernelError::format(format!(
            "Invalid sequence '{segment}' in {type_name} URN: {urn}"
        ))
    };
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if let Some(magnitude) = segment.strip_prefix('-') {
        return Err(if is_digits(magnitude) {
            KernelError::format("Sequence must be positive")
        } else {
            invalid()
        });
    }
    if !is_digits(segment) {
        return Err(invalid());
    }
    if segment.bytes().all(|b| b == b'0') {
        return Err(KernelError::format("Sequence must be positive"));
    }
    if segment.starts_with('0') {
        return Err(invalid());
    }

    let value: u32 = segment.parse().map_err(|_| invalid())?;
    positive_sequence(value)
}

/// Implements string-based serde and `TryFrom<String>` for a type with
/// `FromStr<Err = KernelError>` and `Display`.
macro_rules! canonical_string_serde {
    ($ty:ty) => {
        impl TryFrom<String> for $ty {
            type Error = $crate::error::KernelError;

            fn try_from(value: String) -> $crate::error::Result<Self> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.to_string()
            }
        }
    };
}

pub(crate) use canonical_string_serde;

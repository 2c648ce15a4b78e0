use std::{fmt, num::NonZeroU64, str::FromStr};

/// The identifier of a traceability item.
///
/// The export uses GitHub-issue-style identifiers such as `#42`. The leading
/// `#` is optional on input and always present on output. The numeric part
/// must be a positive non-zero integer.
///
/// Ordering is numeric, so `#9` sorts before `#10`. This is the only ordering
/// any report relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssueId(NonZeroU64);

impl IssueId {
    /// Create an identifier from a pre-validated issue number.
    #[must_use]
    pub const fn new(number: NonZeroU64) -> Self {
        Self(number)
    }

    /// The numeric issue number.
    #[must_use]
    pub const fn number(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors that can occur when parsing an issue identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The string is empty or its numeric part is not an integer.
    #[error("invalid issue id '{0}': expected '#' followed by a positive integer")]
    Syntax(String),

    /// The numeric part is zero. Issue numbers start at 1.
    #[error("invalid issue id '{0}': issue numbers start at 1")]
    Zero(String),
}

impl FromStr for IssueId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::Syntax(s.to_string()));
        }
        let number = digits
            .parse::<u64>()
            .map_err(|_| Error::Syntax(s.to_string()))?;
        let number = NonZeroU64::new(number).ok_or_else(|| Error::Zero(s.to_string()))?;
        Ok(Self(number))
    }
}

impl TryFrom<String> for IssueId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for IssueId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IssueId> for String {
    fn from(id: IssueId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("#1", 1; "hash one")]
    #[test_case("#42", 42; "hash forty two")]
    #[test_case("126", 126; "bare number")]
    #[test_case("#007", 7; "leading zeros")]
    fn parse_valid(input: &str, expected: u64) {
        let id: IssueId = input.parse().unwrap();
        assert_eq!(id.number(), expected);
    }

    #[test_case(""; "empty")]
    #[test_case("#"; "hash only")]
    #[test_case("#abc"; "alphabetic")]
    #[test_case("#12abc"; "mixed")]
    #[test_case("##5"; "double hash")]
    #[test_case("#-1"; "negative")]
    fn parse_syntax_error(input: &str) {
        assert!(matches!(input.parse::<IssueId>(), Err(Error::Syntax(_))));
    }

    #[test]
    fn parse_zero_is_rejected() {
        assert!(matches!("#0".parse::<IssueId>(), Err(Error::Zero(_))));
    }

    #[test]
    fn display_restores_hash_prefix() {
        let id: IssueId = "92".parse().unwrap();
        assert_eq!(id.to_string(), "#92");
    }

    #[test]
    fn ordering_is_numeric() {
        let a: IssueId = "#9".parse().unwrap();
        let b: IssueId = "#10".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn roundtrip_through_string() {
        let original: IssueId = "#134".parse().unwrap();
        let parsed: IssueId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn serde_string_form() {
        let id: IssueId = serde_json::from_str("\"#55\"").unwrap();
        assert_eq!(id.number(), 55);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"#55\"");
    }

    #[test]
    fn serde_rejects_zero() {
        assert!(serde_json::from_str::<IssueId>("\"#0\"").is_err());
    }
}

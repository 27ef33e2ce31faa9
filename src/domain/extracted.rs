use std::fmt;

/// Why a field could not be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissKind {
    /// An expected DOM element or attribute was absent.
    SelectorMiss,
    /// A text pattern expected to match did not.
    ParseFailure,
}

impl fmt::Display for MissKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissKind::SelectorMiss => write!(f, "selector miss"),
            MissKind::ParseFailure => write!(f, "parse failure"),
        }
    }
}

/// Value-or-absent result of a single field extraction.
///
/// Every pattern and DOM lookup returns one of these instead of raising, so a
/// missing field never aborts the product or the batch. The `marker` names the
/// extraction site and shows up in debug logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted<T> {
    Found(T),
    Missing { kind: MissKind, marker: &'static str },
}

impl<T> Extracted<T> {
    pub fn parse_failure(marker: &'static str) -> Self {
        Extracted::Missing {
            kind: MissKind::ParseFailure,
            marker,
        }
    }

    pub fn selector_miss(marker: &'static str) -> Self {
        Extracted::Missing {
            kind: MissKind::SelectorMiss,
            marker,
        }
    }

    /// Wrap an `Option`, recording a parse failure when it is `None`.
    pub fn from_match(value: Option<T>, marker: &'static str) -> Self {
        match value {
            Some(v) => Extracted::Found(v),
            None => Extracted::parse_failure(marker),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Extracted::Found(_))
    }

    /// Convert to an `Option`, logging the miss at debug level.
    pub fn into_option(self) -> Option<T> {
        match self {
            Extracted::Found(v) => Some(v),
            Extracted::Missing { kind, marker } => {
                tracing::debug!("{} at {}", kind, marker);
                None
            }
        }
    }
}

impl Extracted<String> {
    /// Collapse to a string, empty when missing.
    pub fn or_empty(self) -> String {
        self.into_option().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_match_some() {
        let e = Extracted::from_match(Some(3), "model");
        assert_eq!(e, Extracted::Found(3));
        assert!(e.is_found());
    }

    #[test]
    fn test_from_match_none_is_parse_failure() {
        let e: Extracted<u32> = Extracted::from_match(None, "model");
        assert_eq!(
            e,
            Extracted::Missing {
                kind: MissKind::ParseFailure,
                marker: "model"
            }
        );
        assert_eq!(e.into_option(), None);
    }

    #[test]
    fn test_or_empty() {
        assert_eq!(Extracted::Found("RTX".to_string()).or_empty(), "RTX");
        assert_eq!(Extracted::<String>::selector_miss("price").or_empty(), "");
    }
}

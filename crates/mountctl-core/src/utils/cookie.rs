//! Cookie header parsing
//!
//! Operators paste the `Cookie:` request header copied from a browser's
//! developer tools. Before it is written into `addition.cookie` it is parsed
//! here so obvious copy/paste mistakes show up early.

use crate::error::ValidationError;

/// Ordered `name=value` pairs of a cookie header
#[derive(Debug, Clone, PartialEq)]
pub struct CookieJar {
    pairs: Vec<(String, String)>,
    raw_len: usize,
    skipped: usize,
}

/// Overview of a cookie header, safe to print
#[derive(Debug, Clone, PartialEq)]
pub struct CookieSummary {
    pub field_count: usize,
    pub total_length: usize,
    /// Expected fields that are present, with their value length
    pub present: Vec<(String, usize)>,
    pub missing: Vec<String>,
}

impl CookieJar {
    /// Parse a header such as `a=1; b=2`.
    ///
    /// A leading `Cookie:` label is stripped. Segments without `=` are
    /// skipped; `=` inside a value is kept.
    pub fn parse(header: &str) -> Result<Self, ValidationError> {
        let trimmed = header.trim();
        let body = trimmed
            .strip_prefix("Cookie:")
            .or_else(|| trimmed.strip_prefix("cookie:"))
            .unwrap_or(trimmed)
            .trim();

        let mut pairs = Vec::new();
        let mut skipped = 0;
        for segment in body.split(';').map(str::trim) {
            if segment.is_empty() {
                continue;
            }
            match segment.split_once('=') {
                Some((name, value)) if !name.trim().is_empty() => {
                    pairs.push((name.trim().to_string(), value.trim().to_string()));
                }
                _ => skipped += 1,
            }
        }

        if pairs.is_empty() {
            return Err(ValidationError::empty("cookie"));
        }
        if skipped > 0 {
            log::warn!(
                "dropped {} cookie segment(s) without a name=value pair",
                skipped
            );
        }

        Ok(Self {
            pairs,
            raw_len: body.len(),
            skipped,
        })
    }

    /// Non-empty segments dropped by [`parse`](Self::parse) for lacking `name=value`
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First value stored under `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(n, _)| n.as_str())
    }

    /// Canonical `a=1; b=2` form, as stored in `addition.cookie`
    pub fn to_header(&self) -> String {
        self.pairs
            .iter()
            .map(|(n, v)| format!("{}={}", n, v))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn summary(&self, expected: &[&str]) -> CookieSummary {
        let mut present = Vec::new();
        let mut missing = Vec::new();
        for field in expected {
            match self.get(field) {
                Some(value) => present.push((field.to_string(), value.len())),
                None => missing.push(field.to_string()),
            }
        }

        CookieSummary {
            field_count: self.pairs.len(),
            total_length: self.raw_len,
            present,
            missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_header() {
        let jar = CookieJar::parse("QUTH=abc; QUTH.sig=def; _uc_sso_token=xyz").unwrap();
        assert_eq!(jar.len(), 3);
        assert_eq!(jar.get("QUTH"), Some("abc"));
        assert_eq!(jar.get("QUTH.sig"), Some("def"));
        assert_eq!(
            jar.names().collect::<Vec<_>>(),
            vec!["QUTH", "QUTH.sig", "_uc_sso_token"]
        );
    }

    #[test]
    fn test_parse_keeps_equals_in_value() {
        let jar = CookieJar::parse("__sdid=AARha+ezLP==; __ktd=s8ouf==").unwrap();
        assert_eq!(jar.get("__sdid"), Some("AARha+ezLP=="));
        assert_eq!(jar.get("__ktd"), Some("s8ouf=="));
    }

    #[test]
    fn test_parse_strips_label_and_whitespace() {
        let jar = CookieJar::parse("Cookie:  a=1 ;b=2;  ;noequals; =orphan").unwrap();
        assert_eq!(jar.to_header(), "a=1; b=2");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(CookieJar::parse("").is_err());
        assert!(CookieJar::parse("   ").is_err());
        assert!(CookieJar::parse("just text").is_err());
    }

    #[test]
    fn test_duplicate_names_return_first() {
        let jar = CookieJar::parse("b-user-id=one; b-user-id=two").unwrap();
        assert_eq!(jar.len(), 2);
        assert_eq!(jar.get("b-user-id"), Some("one"));
    }

    #[test]
    fn test_parse_counts_segments_without_value() {
        let jar = CookieJar::parse("a=1; flag; b=2; =orphan;").unwrap();
        assert_eq!(jar.skipped(), 2);
        assert_eq!(jar.to_header(), "a=1; b=2");

        let clean = CookieJar::parse("a=1; b=2;").unwrap();
        assert_eq!(clean.skipped(), 0);
    }

    #[test]
    fn test_summary() {
        let jar = CookieJar::parse("ctoken=abcd; __pus=123456; other=x").unwrap();
        let summary = jar.summary(&["ctoken", "__pus", "__uid"]);
        assert_eq!(summary.field_count, 3);
        assert_eq!(
            summary.present,
            vec![("ctoken".to_string(), 4), ("__pus".to_string(), 6)]
        );
        assert_eq!(summary.missing, vec!["__uid".to_string()]);
        assert_eq!(summary.total_length, "ctoken=abcd; __pus=123456; other=x".len());
    }
}

//! Numeric and range token recognition.

use crate::error::CommandError;

/// True for an unsigned decimal: digits with at most one `.`.
///
/// Signs and exponents are not recognized, so property sub-parsers can tell
/// numbers apart from keywords without ambiguity.
pub fn is_numeric_token(token: &str) -> bool {
    let mut points = 0;
    let mut digits = 0;
    for c in token.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => {
                points += 1;
                if points > 1 {
                    return false;
                }
            }
            _ => return false,
        }
    }
    digits > 0
}

/// True when the whole token parses as a float.
pub fn is_valid_number(token: &str) -> bool {
    token.parse::<f64>().is_ok_and(f64::is_finite)
}

/// True for `lo-hi` (with `lo < hi`) or `lo:hi` (with `lo <= hi`).
pub fn is_numeric_range_token(token: &str) -> bool {
    parse_range(token).is_some()
}

/// Bounds of a range token, inclusive.
pub fn parse_range(token: &str) -> Option<(i64, i64)> {
    let unsigned = |s: &str| -> Option<i64> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok()
    };
    if let Some((lo, hi)) = token.split_once(':') {
        let (lo, hi) = (unsigned(lo)?, unsigned(hi)?);
        return (lo <= hi).then_some((lo, hi));
    }
    let (lo, hi) = token.split_once('-')?;
    let (lo, hi) = (unsigned(lo)?, unsigned(hi)?);
    (lo < hi).then_some((lo, hi))
}

/// Material range of a token: `ALL` gives `(0, qty)`, a number `n` gives
/// `(n, n)` and a range gives its bounds.
pub fn parse_mtl_range(token: &str, qty: usize) -> Option<(usize, usize)> {
    if token.eq_ignore_ascii_case("all") {
        return Some((0, qty));
    }
    if let Some((lo, hi)) = parse_range(token) {
        return Some((usize::try_from(lo).ok()?, usize::try_from(hi).ok()?));
    }
    let n: usize = token.parse().ok()?;
    Some((n, n))
}

/// One identifier operand of a selection-style command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentSpec {
    All,
    Range(i64, i64),
    Single(i64),
}

impl IdentSpec {
    pub fn parse(token: &str) -> Option<Self> {
        if token == "all" {
            return Some(Self::All);
        }
        if let Some((lo, hi)) = parse_range(token) {
            return Some(Self::Range(lo, hi));
        }
        token.parse().ok().map(Self::Single)
    }
}

/// Full-string float conversion for command arguments.
pub fn parse_f64(token: &str) -> Result<f64, CommandError> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CommandError::invalid(format!("Unable to convert {token}"))),
    }
}

pub fn parse_i64(token: &str) -> Result<i64, CommandError> {
    token
        .parse()
        .map_err(|_| CommandError::invalid(format!("Unable to convert {token}")))
}

/// A 1-based count or index that must be positive.
pub fn parse_positive(token: &str) -> Result<usize, CommandError> {
    match parse_i64(token)? {
        n if n > 0 => usize::try_from(n).map_err(|_| CommandError::invalid(format!("Unable to convert {token}"))),
        _ => Err(CommandError::invalid(format!("{token} must be positive"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_tokens() {
        assert!(is_numeric_token("12"));
        assert!(is_numeric_token("0.25"));
        assert!(is_numeric_token(".5"));
        assert!(!is_numeric_token("."));
        assert!(!is_numeric_token("1.2.3"));
        assert!(!is_numeric_token("-1"));
        assert!(!is_numeric_token("1e3"));
        assert!(!is_numeric_token(""));
        assert!(!is_numeric_token("amb"));
    }

    #[test]
    fn ranges() {
        assert_eq!(parse_range("3-7"), Some((3, 7)));
        assert_eq!(parse_range("3:7"), Some((3, 7)));
        assert_eq!(parse_range("4:4"), Some((4, 4)));
        assert_eq!(parse_range("7-3"), None);
        assert_eq!(parse_range("4-4"), None);
        assert_eq!(parse_range("-3"), None);
        assert_eq!(parse_range("a-b"), None);
        assert!(is_numeric_range_token("1-10"));
    }

    #[test]
    fn mtl_ranges() {
        assert_eq!(parse_mtl_range("ALL", 12), Some((0, 12)));
        assert_eq!(parse_mtl_range("all", 3), Some((0, 3)));
        assert_eq!(parse_mtl_range("5", 12), Some((5, 5)));
        assert_eq!(parse_mtl_range("2-4", 12), Some((2, 4)));
        assert_eq!(parse_mtl_range("x", 12), None);
    }

    #[test]
    fn ident_specs() {
        assert_eq!(IdentSpec::parse("all"), Some(IdentSpec::All));
        assert_eq!(IdentSpec::parse("2:5"), Some(IdentSpec::Range(2, 5)));
        assert_eq!(IdentSpec::parse("-2"), Some(IdentSpec::Single(-2)));
        assert_eq!(IdentSpec::parse("two"), None);
    }

    #[test]
    fn float_conversion_is_full_string() {
        assert_eq!(parse_f64("2.5"), Ok(2.5));
        assert_eq!(parse_f64("-1e-3"), Ok(-0.001));
        assert_eq!(parse_f64("2.5x"), Err(CommandError::invalid("Unable to convert 2.5x")));
        assert!(is_valid_number("3"));
        assert!(!is_valid_number("nan"));
    }
}

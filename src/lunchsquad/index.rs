//! User-facing order positions.
//!
//! Listings number orders from 1. Users select them by position (`3`) or by
//! inclusive range (`2-4`); [`resolve`] turns those into 0-based store
//! indices.

use crate::error::IndexError;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Position(usize),
    /// Inclusive on both ends.
    Range(usize, usize),
}

fn parse_position(s: &str) -> Result<usize, IndexError> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err(IndexError::InvalidSelector(
            "positions start at 1".to_string(),
        )),
        Ok(n) => Ok(n),
        Err(_) => Err(IndexError::InvalidSelector(s.to_string())),
    }
}

impl FromStr for Selector {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // a leading '-' is never a range separator
        match s.find('-') {
            Some(dash) if dash > 0 => {
                let start = parse_position(&s[..dash])?;
                let end = parse_position(&s[dash + 1..])?;
                if start > end {
                    return Err(IndexError::InvalidSelector(format!(
                        "{} (range end is before its start)",
                        s
                    )));
                }
                Ok(Selector::Range(start, end))
            }
            _ => parse_position(s).map(Selector::Position),
        }
    }
}

pub fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<Selector>, IndexError> {
    inputs.iter().map(|s| s.as_ref().parse()).collect()
}

/// 0-based indices for `selectors` against a list of `len` orders, in the
/// order given and without duplicates. Fails if any position is missing.
pub fn resolve(selectors: &[Selector], len: usize) -> Result<Vec<usize>, IndexError> {
    let mut out = Vec::new();
    for selector in selectors {
        let (start, end) = match *selector {
            Selector::Position(p) => (p, p),
            Selector::Range(a, b) => (a, b),
        };
        for position in start..=end {
            if position > len {
                return Err(IndexError::NoSuchPosition { position, len });
            }
            if !out.contains(&(position - 1)) {
                out.push(position - 1);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position_and_range() {
        assert_eq!("3".parse::<Selector>().unwrap(), Selector::Position(3));
        assert_eq!("2-4".parse::<Selector>().unwrap(), Selector::Range(2, 4));
        assert_eq!("3-3".parse::<Selector>().unwrap(), Selector::Range(3, 3));
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["0", "-1", "abc", "3-", "4-2", "1-x"] {
            assert!(bad.parse::<Selector>().is_err(), "{} should not parse", bad);
        }
    }

    #[test]
    fn test_resolve_dedups_in_order() {
        let selectors = parse_selectors(&["3", "1-2", "2"]).unwrap();
        assert_eq!(resolve(&selectors, 5).unwrap(), vec![2, 0, 1]);
    }

    #[test]
    fn test_resolve_out_of_range() {
        let selectors = parse_selectors(&["2-4"]).unwrap();
        assert_eq!(
            resolve(&selectors, 3),
            Err(IndexError::NoSuchPosition { position: 4, len: 3 })
        );
    }
}

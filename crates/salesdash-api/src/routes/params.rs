//! Query-string helpers shared by the route handlers

use std::collections::HashMap;

use salesdash_core::{CoreError, MonthPeriod};

pub type Params = HashMap<String, String>;

/// `month` and `year` as a validated period
pub fn period(params: &Params) -> Result<MonthPeriod, CoreError> {
    MonthPeriod::parse(
        params.get("month").map(String::as_str),
        params.get("year").map(String::as_str),
    )
}

/// Optional positive integer; absent or blank is `None`
pub fn positive(params: &Params, name: &str) -> Result<Option<u64>, CoreError> {
    let raw = match params.get(name).map(|v| v.trim()) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Ok(Some(value)),
        _ => Err(CoreError::invalid(format!(
            "{} must be a positive integer, got '{}'",
            name, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_positive() {
        assert_eq!(positive(&params(&[]), "page").unwrap(), None);
        assert_eq!(positive(&params(&[("page", " ")]), "page").unwrap(), None);
        assert_eq!(positive(&params(&[("page", "2")]), "page").unwrap(), Some(2));
        assert!(positive(&params(&[("page", "0")]), "page").is_err());
        assert!(positive(&params(&[("page", "-1")]), "page").is_err());
        assert!(positive(&params(&[("perPage", "ten")]), "perPage").is_err());
    }

    #[test]
    fn test_period() {
        let p = period(&params(&[("month", "3"), ("year", "2022")])).unwrap();
        assert_eq!((p.year(), p.month()), (2022, 3));
        assert!(period(&params(&[("month", "3")])).is_err());
        assert!(period(&params(&[("month", "13"), ("year", "2022")])).is_err());
    }
}

//! Ticker normalization.
//!
//! Price histories and fundamentals snapshots spell the same stock
//! differently: `ADANIPORTS.NS` in one file, `adaniports-eq ` in the other.
//! [`normalize_ticker`] maps both onto one canonical key.

/// Exchange suffixes, checked in this order.
pub const EXCHANGE_SUFFIXES: &[&str] = &[".NS", ".NSE", ".BSE", ".BO"];

/// Series suffixes, checked in this order.
pub const SERIES_SUFFIXES: &[&str] = &["-EQ", "-BE", "-BL", "-BZ"];

/// Canonicalize a raw ticker.
///
/// Uppercases and trims the input, then strips at most one exchange suffix
/// and at most one series suffix, whichever of the two is outermost first.
/// Missing cells should be passed as the empty string; they normalize to the
/// empty string, which never joins the ticker universe.
///
/// # Example
///
/// ```
/// use sintra_data::normalize_ticker;
///
/// assert_eq!(normalize_ticker("ADANIPORTS.NS"), "ADANIPORTS");
/// assert_eq!(normalize_ticker(" sbin-eq "), "SBIN");
/// ```
pub fn normalize_ticker(raw: &str) -> String {
    let mut ticker = raw.trim().to_uppercase();
    let mut exchange_stripped = false;
    let mut series_stripped = false;

    loop {
        if !exchange_stripped && let Some(rest) = strip_any(&ticker, EXCHANGE_SUFFIXES) {
            ticker = rest;
            exchange_stripped = true;
            continue;
        }
        if !series_stripped && let Some(rest) = strip_any(&ticker, SERIES_SUFFIXES) {
            ticker = rest;
            series_stripped = true;
            continue;
        }
        break;
    }

    ticker
}

/// Strip the first matching suffix and trim what remains.
fn strip_any(ticker: &str, suffixes: &[&str]) -> Option<String> {
    suffixes
        .iter()
        .find_map(|suffix| ticker.strip_suffix(suffix))
        .map(|rest| rest.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_suffixes() {
        assert_eq!(normalize_ticker("ADANIPORTS.NS"), "ADANIPORTS");
        assert_eq!(normalize_ticker("RELIANCE.NSE"), "RELIANCE");
        assert_eq!(normalize_ticker("TCS.BSE"), "TCS");
        assert_eq!(normalize_ticker("INFY.BO"), "INFY");
    }

    #[test]
    fn test_series_suffixes() {
        assert_eq!(normalize_ticker("SBIN-EQ"), "SBIN");
        assert_eq!(normalize_ticker("YESBANK-BE"), "YESBANK");
        assert_eq!(normalize_ticker("ABC-BL"), "ABC");
        assert_eq!(normalize_ticker("XYZ-BZ"), "XYZ");
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(normalize_ticker("sbin-eq"), "SBIN");
        assert_eq!(normalize_ticker("SBIN-EQ "), "SBIN");
        assert_eq!(normalize_ticker("  Sbin.ns\t"), "SBIN");
        assert_eq!(normalize_ticker("SBIN -EQ"), "SBIN");
    }

    #[test]
    fn test_both_families_in_either_order() {
        assert_eq!(normalize_ticker("SBIN-EQ.NS"), "SBIN");
        assert_eq!(normalize_ticker("SBIN.NS-EQ"), "SBIN");
    }

    #[test]
    fn test_at_most_one_suffix_per_family() {
        assert_eq!(normalize_ticker("ABC.BO.NS"), "ABC.BO");
        assert_eq!(normalize_ticker("ABC-EQ-BE"), "ABC-EQ");
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            "sbin-eq",
            "SBIN-EQ ",
            "ADANIPORTS.NS",
            "tcs.bse",
            "M&M",
            "BAJAJ-AUTO",
            "SBIN-EQ.NS",
            "",
            "nan",
        ] {
            let once = normalize_ticker(raw);
            assert_eq!(normalize_ticker(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_unrecognized_suffix_kept() {
        assert_eq!(normalize_ticker("BAJAJ-AUTO"), "BAJAJ-AUTO");
        assert_eq!(normalize_ticker("BRK.B"), "BRK.B");
    }

    #[test]
    fn test_empty_and_missing() {
        assert_eq!(normalize_ticker(""), "");
        assert_eq!(normalize_ticker("   "), "");
        assert_eq!(normalize_ticker("nan"), "NAN");
    }
}

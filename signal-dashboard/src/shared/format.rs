//! Display formatting shared by every panel.

/// Placeholder shown for missing or non-finite values.
pub const PLACEHOLDER: &str = "-";

/// Format a USD price with magnitude-dependent precision.
///
/// - `>= 1000` -> 0 decimals
/// - `[1, 1000)` -> 4 decimals
/// - `< 1` -> 8 decimals
pub fn fmt_usd(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    if value >= 1000.0 {
        format!("${:.0}", value)
    } else if value >= 1.0 {
        format!("${:.4}", value)
    } else {
        format!("${:.8}", value)
    }
}

/// Format a large quantity with `K` / `M` suffixes (liquidity, volume)
pub fn fmt_num(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    if value >= 1_000_000.0 {
        format!("{:.2}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.2}K", value / 1_000.0)
    } else {
        format!("{:.2}", value)
    }
}

/// Confidence in `[0, 1]` as a rounded whole percentage.
pub fn confidence_pct(confidence: f64) -> i64 {
    (confidence * 100.0).round() as i64
}

/// Backend ISO-8601 timestamps shown without the `T` separator and `Z` suffix.
pub fn fmt_timestamp(iso: &str) -> String {
    iso.replacen('T', " ", 1).replacen('Z', "", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_usd_precision_bands() {
        assert_eq!(fmt_usd(1500.0), "$1500");
        assert_eq!(fmt_usd(1000.0), "$1000");
        assert_eq!(fmt_usd(2.5), "$2.5000");
        assert_eq!(fmt_usd(1.0), "$1.0000");
        assert_eq!(fmt_usd(0.0000123), "$0.00001230");
        assert_eq!(fmt_usd(110.0), "$110.0000");
    }

    #[test]
    fn test_fmt_usd_non_finite() {
        assert_eq!(fmt_usd(f64::NAN), "-");
        assert_eq!(fmt_usd(f64::INFINITY), "-");
        assert_eq!(fmt_usd(f64::NEG_INFINITY), "-");
    }

    #[test]
    fn test_fmt_num_suffixes() {
        assert_eq!(fmt_num(2_500_000.0), "2.50M");
        assert_eq!(fmt_num(12_340.0), "12.34K");
        assert_eq!(fmt_num(999.5), "999.50");
        assert_eq!(fmt_num(f64::NAN), "-");
    }

    #[test]
    fn test_confidence_pct() {
        assert_eq!(confidence_pct(0.82), 82);
        assert_eq!(confidence_pct(0.005), 1);
        assert_eq!(confidence_pct(0.0), 0);
        assert_eq!(confidence_pct(1.0), 100);
    }

    #[test]
    fn test_fmt_timestamp() {
        assert_eq!(
            fmt_timestamp("2024-05-01T12:30:00.000Z"),
            "2024-05-01 12:30:00.000"
        );
        assert_eq!(fmt_timestamp("yesterday"), "yesterday");
    }
}

//! Order number generation

use chrono::DateTime;
use chrono_tz::Tz;

/// Format an order number: `OS{yyMM}-{seq:04}`, e.g. `OS2501-0007`
///
/// The month prefix follows the business timezone so numbers roll over
/// at local midnight, not UTC.
pub fn format_order_number(sequence: u64, now_millis: i64, tz: Tz) -> String {
    let prefix = DateTime::from_timestamp_millis(now_millis)
        .map(|dt| dt.with_timezone(&tz).format("%y%m").to_string())
        .unwrap_or_else(|| "0000".to_string());
    format!("OS{}-{:04}", prefix, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_format() {
        let tz = chrono_tz::America::Sao_Paulo;
        // 2025-01-15 12:00:00 UTC
        let millis = 1_736_942_400_000;
        assert_eq!(format_order_number(7, millis, tz), "OS2501-0007");
        assert_eq!(format_order_number(12345, millis, tz), "OS2501-12345");
    }
}

//! Time helpers
//!
//! All timestamps in the system are Unix milliseconds (`i64`).
//! Formatting into a human-readable form happens only at rendering
//! edges (receipts, templates) and always in an explicit timezone.

use chrono::DateTime;
use chrono_tz::Tz;

/// Current time as Unix milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Format Unix milliseconds as `dd/mm/yyyy HH:MM` in the given timezone
///
/// Deterministic for a given `(millis, tz)` pair; invalid values render
/// as the raw number rather than panicking.
pub fn format_millis(millis: i64, tz: Tz) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&tz).format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_millis_is_deterministic() {
        let tz: Tz = "America/Sao_Paulo".parse().unwrap();
        // 2025-01-15 12:00:00 UTC => 09:00 in São Paulo (UTC-3)
        let millis = 1_736_942_400_000;
        assert_eq!(format_millis(millis, tz), "15/01/2025 09:00");
        assert_eq!(format_millis(millis, tz), format_millis(millis, tz));
    }

    #[test]
    fn format_millis_survives_out_of_range() {
        let tz: Tz = "America/Sao_Paulo".parse().unwrap();
        assert_eq!(format_millis(i64::MAX, tz), i64::MAX.to_string());
    }
}

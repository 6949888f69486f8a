//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Calendar dates for score entries
//! - Session seeding

/// Milliseconds since the Unix epoch
pub fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        chrono::Utc::now().timestamp_millis() as f64
    }
}

/// Today's date as `YYYY-MM-DD`
pub fn today() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        let iso: String = js_sys::Date::new_0().to_iso_string().into();
        iso.split('T').next().unwrap_or_default().to_string()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        chrono::Utc::now().date_naive().to_string()
    }
}

/// Seed for a new session
pub fn session_seed() -> u64 {
    now_ms() as u64
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_today_format() {
        let date = today();
        assert_eq!(date.len(), 10);
        assert_eq!(date.as_bytes()[4], b'-');
        assert_eq!(date.as_bytes()[7], b'-');
        assert!(chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_seed_advances_with_clock() {
        assert!(session_seed() > 1_600_000_000_000);
    }
}

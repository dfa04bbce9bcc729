// src/app/utils.rs
// Contains utility functions for GridLift, such as elapsed-time formatting.

// --- Utility Functions ---

/// Formats seconds the way duration cells are written: `S秒`, `M分S秒`, `H時間M分` or
/// `D日H時間M分`, picking the coarsest layout that fits.
pub fn format_elapsed(seconds: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = MINUTE * 60;
    const DAY: u64 = HOUR * 24;

    if seconds >= DAY {
        format!(
            "{}日{}時間{}分",
            seconds / DAY,
            seconds % DAY / HOUR,
            seconds % HOUR / MINUTE
        )
    } else if seconds >= HOUR {
        format!("{}時間{}分", seconds / HOUR, seconds % HOUR / MINUTE)
    } else if seconds >= MINUTE {
        format!("{}分{}秒", seconds / MINUTE, seconds % MINUTE)
    } else {
        format!("{}秒", seconds) // Base case: seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::comparator::{classify, parse_duration, CellKind};

    #[test]
    fn picks_coarsest_layout() {
        assert_eq!(format_elapsed(45), "45秒");
        assert_eq!(format_elapsed(90), "1分30秒");
        assert_eq!(format_elapsed(3 * 3600 + 120 + 5), "3時間2分");
        assert_eq!(format_elapsed(2 * 86_400 + 3600 + 60), "2日1時間1分");
    }

    #[test]
    fn formatted_values_parse_back_as_durations() {
        for seconds in [0, 59, 61, 3599, 3600, 86_399, 86_400, 200_000] {
            let text = format_elapsed(seconds);
            assert_eq!(classify(&text), CellKind::Duration, "{text}");
            assert!(parse_duration(&text).is_ok(), "{text}");
        }
    }
}

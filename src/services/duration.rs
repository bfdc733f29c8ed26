//! Episode duration formatting
//!
//! Renders a number of seconds as `HHhMMmSSs`, the label shown next to every
//! episode in listings and on the detail page.

/// Format seconds as zero-padded hours, minutes and seconds.
///
/// Each component is padded to two digits. Hours are not capped, so anything
/// at or beyond 100 hours simply prints a wider hour field.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    format!("{:02}h{:02}m{:02}s", hours, minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_fixed_width(label: &str) -> bool {
        let bytes = label.as_bytes();
        bytes.len() == 9
            && bytes[2] == b'h'
            && bytes[5] == b'm'
            && bytes[8] == b's'
            && [0, 1, 3, 4, 6, 7].iter().all(|&i| bytes[i].is_ascii_digit())
    }

    #[test]
    fn test_format_duration_boundaries() {
        assert_eq!(format_duration(0), "00h00m00s");
        assert_eq!(format_duration(59), "00h00m59s");
        assert_eq!(format_duration(60), "00h01m00s");
        assert_eq!(format_duration(3599), "00h59m59s");
        assert_eq!(format_duration(3600), "01h00m00s");
        assert_eq!(format_duration(3661), "01h01m01s");
    }

    #[test]
    fn test_format_duration_episode_lengths() {
        assert_eq!(format_duration(125), "00h02m05s");
        assert_eq!(format_duration(5400), "01h30m00s");
        assert_eq!(format_duration(86_399), "23h59m59s");
    }

    #[test]
    fn test_format_duration_fixed_width_below_100_hours() {
        for secs in (0..360_000u64).step_by(997) {
            let label = format_duration(secs);
            assert!(is_fixed_width(&label), "unexpected label {label} for {secs}");
        }
        assert!(is_fixed_width(&format_duration(359_999)));
    }

    #[test]
    fn test_format_duration_wide_hours() {
        assert_eq!(format_duration(360_000), "100h00m00s");
        assert_eq!(format_duration(360_061), "100h01m01s");
    }
}

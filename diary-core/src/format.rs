//! Clock and free-text rendering.

use chrono::Timelike;

/// Render a time of day as zero-padded 24-hour `HH:MM`.
pub fn clock<T: Timelike>(t: &T) -> String {
    format!("{:02}:{:02}", t.hour(), t.minute())
}

/// Indent every line after the first by one space, so continuation lines
/// sit under a `" Label: "` prefix. No line break follows the last line.
pub fn indent(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for (i, line) in text.split('\n').enumerate() {
        if i != 0 {
            out.push('\n');
            out.push(' ');
        }
        out.push_str(line);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_clock_zero_pads() {
        let t = NaiveTime::from_hms_opt(7, 5, 59).unwrap();
        assert_eq!(clock(&t), "07:05");
    }

    #[test]
    fn test_clock_is_24_hour() {
        let t = NaiveTime::from_hms_opt(23, 30, 0).unwrap();
        assert_eq!(clock(&t), "23:30");
    }

    #[test]
    fn test_indent_single_line_untouched() {
        assert_eq!(indent("Room 4"), "Room 4");
    }

    #[test]
    fn test_indent_continuation_lines() {
        assert_eq!(indent("A\nB\nC"), "A\n B\n C");
    }

    #[test]
    fn test_indent_keeps_blank_lines() {
        assert_eq!(indent("A\n\nB"), "A\n \n B");
        assert_eq!(indent("A\n"), "A\n ");
    }

    #[test]
    fn test_indent_empty() {
        assert_eq!(indent(""), "");
    }
}

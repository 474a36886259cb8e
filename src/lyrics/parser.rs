//! Synced-lyrics line parser.
//!
//! Each line looks like `[mm:ss.cc] text`. Minutes are a whole number, seconds
//! may carry a fraction. Anything else (metadata tags like `[ar:Artist]`,
//! missing brackets, negative or non-numeric fields) is dropped.

#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    /// Seconds from the start of the track.
    pub timestamp: f64,
    pub text: String,
}

/// Parse a whole synced-lyrics block, ordered by timestamp.
///
/// The sort is stable so lines sharing a timestamp keep provider order.
pub fn parse_synced(content: &str) -> Vec<LyricLine> {
    let mut lines: Vec<LyricLine> = content.lines().filter_map(parse_line).collect();
    lines.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    lines
}

pub fn parse_line(line: &str) -> Option<LyricLine> {
    let rest = line.trim().strip_prefix('[')?;
    let end = rest.find(']')?;
    let timestamp = parse_timestamp(&rest[..end])?;
    Some(LyricLine {
        timestamp,
        text: rest[end + 1..].trim().to_string(),
    })
}

fn parse_timestamp(s: &str) -> Option<f64> {
    let (min, sec) = s.split_once(':')?;
    let min: u32 = min.trim().parse().ok()?;
    let sec: f64 = sec.trim().parse().ok()?;
    if !sec.is_finite() || sec < 0.0 {
        return None;
    }
    Some(f64::from(min) * 60.0 + sec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let l = parse_line("[02:05.50] hello").unwrap();
        assert_eq!(l.timestamp, 125.5);
        assert_eq!(l.text, "hello");

        let l = parse_line("[00:03]no space").unwrap();
        assert_eq!(l.timestamp, 3.0);
        assert_eq!(l.text, "no space");
    }

    #[test]
    fn test_bad_lines_are_dropped() {
        assert_eq!(parse_line("[02:05.50 hello"), None);
        assert_eq!(parse_line("[xx:05.50] hello"), None);
        assert_eq!(parse_line("[ar:Some Artist]"), None);
        assert_eq!(parse_line("[01:-3.0] neg"), None);
        assert_eq!(parse_line("[01:NaN] nan"), None);
        assert_eq!(parse_line("plain words"), None);
        assert_eq!(parse_line(""), None);
    }

    #[test]
    fn test_parse_synced_sorts_and_skips() {
        let lrc = "[ti:Song]\n[00:20.00] third\n[00:00.00] first\ngarbage\n[00:10.00] second\n";
        let lines = parse_synced(lrc);
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[test]
    fn test_equal_timestamps_keep_order() {
        let lines = parse_synced("[00:05.00] a\n[00:05.00] b\n");
        assert_eq!(lines[0].text, "a");
        assert_eq!(lines[1].text, "b");
    }
}

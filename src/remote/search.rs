use super::models::{FlatEntry, SearchResult};
use crate::library::format_duration;
use anyhow::Context;
use tokio::process::Command;

/// `ytsearch<limit>:<query>` through yt-dlp, without resolving each entry.
pub async fn search(query: &str, limit: u32) -> anyhow::Result<Vec<SearchResult>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    tracing::debug!(query, limit, "yt-dlp search");

    let out = Command::new("yt-dlp")
        .args(["--flat-playlist", "-j", "--no-warnings"])
        .arg(format!("ytsearch{}:{query}", limit.max(1)))
        .kill_on_drop(true)
        .output()
        .await
        .context("run yt-dlp")?;
    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        anyhow::bail!("yt-dlp search failed: {}", stderr.trim());
    }

    let stdout = String::from_utf8_lossy(&out.stdout);
    let results: Vec<SearchResult> = stdout.lines().filter_map(parse_search_line).collect();
    tracing::info!(query, count = results.len(), "search done");
    Ok(results)
}

pub fn parse_search_line(line: &str) -> Option<SearchResult> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let entry: FlatEntry = match serde_json::from_str(line) {
        Ok(e) => e,
        Err(e) => {
            tracing::debug!(error = %e, "skipping unparseable search line");
            return None;
        }
    };

    let reference = entry
        .webpage_url
        .or(entry.url)
        .filter(|u| !u.trim().is_empty())?;
    let title = entry
        .title
        .map(|t| sanitize_title(&t))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| reference.clone());
    let duration = entry
        .duration_string
        .filter(|d| !d.is_empty())
        .or_else(|| {
            entry
                .duration
                .filter(|d| d.is_finite() && *d >= 0.0)
                .map(|d| format_duration(d as u64))
        })
        .unwrap_or_default();

    Some(SearchResult {
        title,
        reference,
        duration,
    })
}

/// Control characters (newlines, escapes) would break the list rows.
pub fn sanitize_title(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_control()).collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_entry() {
        let r = parse_search_line(
            r#"{"title":"Daft Punk - One More Time","webpage_url":"https://www.youtube.com/watch?v=FGBhQbmPwH8","url":"https://x","duration_string":"5:21","duration":321}"#,
        )
        .unwrap();
        assert_eq!(r.title, "Daft Punk - One More Time");
        assert_eq!(r.reference, "https://www.youtube.com/watch?v=FGBhQbmPwH8");
        assert_eq!(r.duration, "5:21");
    }

    #[test]
    fn falls_back_to_url_and_numeric_duration() {
        let r = parse_search_line(r#"{"title":"a\u001b[31m\nb","url":"https://y/1","duration":65.4}"#).unwrap();
        assert_eq!(r.title, "a[31mb");
        assert_eq!(r.reference, "https://y/1");
        assert_eq!(r.duration, "1:05");
    }

    #[test]
    fn no_reference_no_result() {
        assert_eq!(parse_search_line(r#"{"title":"x"}"#), None);
        assert_eq!(parse_search_line("not json"), None);
        assert_eq!(parse_search_line(""), None);
    }

    #[test]
    fn live_streams_have_no_duration() {
        let r = parse_search_line(r#"{"title":"radio","url":"https://y/2","duration":null}"#).unwrap();
        assert_eq!(r.duration, "");
    }
}

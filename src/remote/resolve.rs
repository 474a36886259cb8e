use anyhow::Context;
use tokio::process::Command;

/// Anything that is not an http(s) URL is played as a local path.
pub fn is_remote(reference: &str) -> bool {
    let lower = reference.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Turn a page URL into a direct audio stream URL.
pub async fn resolve_audio_url(reference: &str) -> anyhow::Result<String> {
    let out = Command::new("yt-dlp")
        .args(["--no-progress", "--no-playlist", "-f", "bestaudio", "-g"])
        .arg(reference)
        .kill_on_drop(true)
        .output()
        .await
        .context("run yt-dlp")?;
    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        anyhow::bail!("yt-dlp failed: {}", stderr.trim());
    }

    let stdout = String::from_utf8(out.stdout).context("decode yt-dlp stdout")?;
    first_url(&stdout).context("yt-dlp returned empty url")
}

fn first_url(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_detection() {
        assert!(is_remote("https://www.youtube.com/watch?v=x"));
        assert!(is_remote("HTTP://example.com/a.mp3"));
        assert!(!is_remote("/home/me/Music/a.mp3"));
        assert!(!is_remote("relative/https://odd.mp3"));
    }

    #[test]
    fn first_non_empty_line_wins() {
        assert_eq!(first_url("\n  \nhttps://cdn/a\nhttps://cdn/b\n"), Some("https://cdn/a".into()));
        assert_eq!(first_url("\n\n"), None);
    }
}

use crate::app::events::{Event, PlayerEvent};
use anyhow::Context;
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::UnixStream,
    process::{Child, Command},
    sync::mpsc,
};

/// How `loadfile` treats the current playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Replace,
    AppendPlay,
}

impl LoadMode {
    fn as_mpv(self) -> &'static str {
        match self {
            LoadMode::Replace => "replace",
            LoadMode::AppendPlay => "append-play",
        }
    }
}

/// Observed properties, in observe id order.
const OBSERVED: [&str; 8] = [
    "time-pos",
    "duration",
    "pause",
    "idle-active",
    "volume",
    "media-title",
    "filename",
    "metadata",
];

#[derive(Debug)]
pub struct MpvHandle {
    child: Child,
    socket_path: PathBuf,
    writer: tokio::sync::Mutex<tokio::io::WriteHalf<UnixStream>>,
    request_id: AtomicU64,
}

impl MpvHandle {
    pub async fn spawn(
        event_tx: mpsc::Sender<Event>,
        audio_device: Option<&str>,
        volume: u8,
        log_file: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let socket_path = std::env::temp_dir().join(format!("vibefi-mpv-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&socket_path);

        let mut cmd = Command::new("mpv");
        cmd.args(["--no-video", "--idle=yes", "--input-terminal=no", "--really-quiet"]);
        cmd.arg(format!("--volume={}", volume.min(100)));
        if let Some(dev) = audio_device {
            cmd.arg(format!("--audio-device={dev}"));
        }
        if let Some(p) = log_file {
            cmd.arg(format!("--log-file={}", p.display()));
        }
        let child = cmd
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .context("spawn mpv (is it installed?)")?;

        let stream = connect_with_retry(&socket_path).await?;
        let (reader, writer) = tokio::io::split(stream);

        tokio::spawn(read_events_loop(reader, event_tx));

        let this = Self {
            child,
            socket_path,
            writer: tokio::sync::Mutex::new(writer),
            request_id: AtomicU64::new(1),
        };

        this.command(json!(["request_log_messages", "error"])).await?;
        for (id, name) in OBSERVED.iter().enumerate() {
            this.command(json!(["observe_property", id + 1, name])).await?;
        }
        tracing::info!(socket = %this.socket_path.display(), "mpv ready");

        Ok(this)
    }

    pub async fn load(&self, reference: &str, mode: LoadMode) -> anyhow::Result<()> {
        tracing::debug!(reference, mode = mode.as_mpv(), "loadfile");
        self.command(json!(["loadfile", reference, mode.as_mpv()])).await
    }

    pub async fn play(&self) -> anyhow::Result<()> {
        self.set_property("pause", json!(false)).await
    }

    pub async fn toggle_pause(&self) -> anyhow::Result<()> {
        self.command(json!(["cycle", "pause"])).await
    }

    pub async fn stop(&self) -> anyhow::Result<()> {
        self.command(json!(["stop"])).await
    }

    pub async fn seek_relative(&self, seconds: f64) -> anyhow::Result<()> {
        self.command(json!(["seek", seconds, "relative"])).await
    }

    pub async fn set_volume(&self, volume: u8) -> anyhow::Result<()> {
        self.set_property("volume", json!(volume.min(100))).await
    }

    pub async fn set_property(&self, key: &str, value: serde_json::Value) -> anyhow::Result<()> {
        self.command(json!(["set_property", key, value])).await
    }

    /// Send one command array. Every request carries an id so a failure
    /// reply can be told apart from events.
    async fn command(&self, args: serde_json::Value) -> anyhow::Result<()> {
        let request_id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let envelope = json!({ "command": args, "request_id": request_id });
        let mut frame = serde_json::to_string(&envelope).context("encode mpv command")?;
        frame.push('\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(frame.as_bytes()).await.context("send to mpv")?;
        writer.flush().await.context("send to mpv")?;
        Ok(())
    }
}

impl Drop for MpvHandle {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

const CONNECT_ATTEMPTS: u32 = 100;
const CONNECT_BACKOFF: Duration = Duration::from_millis(50);

/// mpv creates the socket some time after it starts.
async fn connect_with_retry(path: &Path) -> anyhow::Result<UnixStream> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match UnixStream::connect(path).await {
            Ok(stream) => return Ok(stream),
            Err(e) if attempt >= CONNECT_ATTEMPTS => {
                return Err(e).with_context(|| format!("mpv socket {} never came up", path.display()));
            }
            Err(_) => tokio::time::sleep(CONNECT_BACKOFF).await,
        }
    }
}

async fn read_events_loop(reader: tokio::io::ReadHalf<UnixStream>, event_tx: mpsc::Sender<Event>) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let Ok(v) = serde_json::from_str::<serde_json::Value>(&line) else {
            continue;
        };
        if let Some(pe) = map_mpv_event(&v)
            && event_tx.send(Event::Player(pe)).await.is_err()
        {
            break;
        }
    }
    tracing::warn!("mpv ipc stream closed");
}

pub(crate) fn map_mpv_event(v: &serde_json::Value) -> Option<PlayerEvent> {
    // Command replies: {"request_id":..., "error":"..."}
    if v.get("request_id").is_some() {
        let err = v.get("error")?.as_str()?;
        return (err != "success").then(|| PlayerEvent::Error(format!("mpv: {err}")));
    }

    match v.get("event")?.as_str()? {
        "property-change" => {
            let data = v.get("data").unwrap_or(&serde_json::Value::Null);
            match v.get("name")?.as_str()? {
                "time-pos" => Some(PlayerEvent::Position(data.as_f64().unwrap_or(0.0))),
                "duration" => Some(PlayerEvent::Duration(data.as_f64().unwrap_or(0.0))),
                "pause" => Some(PlayerEvent::Paused(data.as_bool().unwrap_or(false))),
                "idle-active" => Some(PlayerEvent::Idle(data.as_bool().unwrap_or(true))),
                "volume" => data
                    .as_f64()
                    .map(|v| PlayerEvent::Volume(v.round().clamp(0.0, 100.0) as u8)),
                "media-title" => Some(PlayerEvent::MediaTitle(data.as_str().map(str::to_string))),
                "filename" => Some(PlayerEvent::Filename(data.as_str().map(str::to_string))),
                "metadata" => {
                    let map: HashMap<String, String> = data
                        .as_object()
                        .map(|o| {
                            o.iter()
                                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                                .collect()
                        })
                        .unwrap_or_default();
                    Some(PlayerEvent::Metadata(map))
                }
                _ => None,
            }
        }
        "file-loaded" => Some(PlayerEvent::FileLoaded),
        "end-file" => match v.get("reason").and_then(|x| x.as_str()).unwrap_or("") {
            "error" => {
                let err = v.get("file_error").or_else(|| v.get("error"));
                let err = err.and_then(|x| x.as_str()).unwrap_or("unknown");
                Some(PlayerEvent::LoadFailed(format!("mpv end-file error: {err}")))
            }
            _ => None,
        },
        "log-message" => {
            let level = v.get("level")?.as_str().unwrap_or("info");
            let text = v.get("text")?.as_str().unwrap_or("").trim();
            tracing::warn!(level, text, "mpv log");
            None
        }
        _ => None,
    }
}

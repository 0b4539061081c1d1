use std::fs::OpenOptions;
use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::OnceCell;
use serde_json::json;

#[cfg(any(unix, target_os = "windows"))]
use rand::{distributions::Alphanumeric, Rng};
#[cfg(unix)]
use std::os::unix::net::UnixStream;

fn video_debug_enabled() -> bool {
    static FLAG: OnceCell<bool> = OnceCell::new();
    *FLAG.get_or_init(|| {
        std::env::var("FOLIO_DEBUG_VIDEO")
            .map(|val| {
                let trimmed = val.trim();
                !(trimmed.is_empty()
                    || trimmed.eq_ignore_ascii_case("0")
                    || trimmed.eq_ignore_ascii_case("false")
                    || trimmed.eq_ignore_ascii_case("no")
                    || trimmed.eq_ignore_ascii_case("off"))
            })
            .unwrap_or(false)
    })
}

fn video_debug_writer() -> Option<&'static Mutex<std::fs::File>> {
    static WRITER: OnceCell<Option<Mutex<std::fs::File>>> = OnceCell::new();
    WRITER
        .get_or_init(|| {
            std::env::var("FOLIO_DEBUG_VIDEO_LOG")
                .ok()
                .and_then(|path| {
                    OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(path)
                        .map(Mutex::new)
                        .ok()
                })
        })
        .as_ref()
}

/// Env-gated diagnostics. Silent unless FOLIO_DEBUG_VIDEO is set; writes to
/// FOLIO_DEBUG_VIDEO_LOG when given, stderr otherwise.
pub fn debug_log(message: impl AsRef<str>) {
    if !video_debug_enabled() {
        return;
    }
    if let Some(writer) = video_debug_writer() {
        if let Ok(mut file) = writer.lock() {
            let _ = writeln!(file, "{}", message.as_ref());
            return;
        }
    }
    eprintln!("{}", message.as_ref());
}

#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("video playback target missing")]
    TargetMissing,
    #[error("no media player configured")]
    PlayerMissing,
}

/// One playback request: the target handed to the player plus a window title.
#[derive(Debug, Clone, Default)]
pub struct LaunchRequest {
    pub target: String,
    pub title: String,
}

/// A running playback. Stopping kills the player and reaps the process so no
/// audio keeps playing after the modal is gone. Dropping an unstopped
/// session stops it.
pub trait MediaSession: Send {
    fn toggle_pause(&mut self) -> Result<()>;
    fn stop(&mut self);
}

impl std::fmt::Debug for dyn MediaSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MediaSession")
    }
}

/// The host playback primitive: starting playback may fail (player missing,
/// spawn error) and the caller decides whether that failure is surfaced.
pub trait MediaLauncher: Send + Sync {
    fn launch(&self, request: &LaunchRequest) -> Result<Box<dyn MediaSession>>;
}

/// Plays via an external mpv process in its own window.
pub struct ExternalPlayer {
    mpv_path: String,
    fullscreen: bool,
}

impl ExternalPlayer {
    pub fn new(mpv_path: impl Into<String>, fullscreen: bool) -> Self {
        Self {
            mpv_path: mpv_path.into(),
            fullscreen,
        }
    }
}

impl MediaLauncher for ExternalPlayer {
    fn launch(&self, request: &LaunchRequest) -> Result<Box<dyn MediaSession>> {
        if request.target.trim().is_empty() {
            return Err(PlayerError::TargetMissing.into());
        }
        if self.mpv_path.trim().is_empty() {
            return Err(PlayerError::PlayerMissing.into());
        }

        let ipc_path = unique_ipc_path();
        let mut args = Vec::new();
        args.push(request.target.clone());
        if self.fullscreen {
            args.push("--fullscreen".to_string());
        }
        args.push("--force-window=yes".to_string());
        args.push("--keep-open=no".to_string());
        args.push("--really-quiet".to_string());
        if let Some(path) = &ipc_path {
            args.push(format!("--input-ipc-server={path}"));
        }
        if !request.title.trim().is_empty() {
            args.push(format!("--force-media-title={}", request.title.trim()));
        }

        debug_log(format!(
            "spawning player {} target={} ipc={}",
            self.mpv_path,
            request.target,
            ipc_path.as_deref().unwrap_or("n/a")
        ));

        let mut command = Command::new(&self.mpv_path);
        for arg in &args {
            command.arg(arg);
        }
        command.stdin(Stdio::null());
        command.stdout(Stdio::null());
        command.stderr(Stdio::null());

        let child = command
            .spawn()
            .with_context(|| format!("launch {} to play {}", self.mpv_path, request.target))?;

        Ok(Box::new(PlayerSession {
            child: Some(child),
            ipc_path,
        }))
    }
}

struct PlayerSession {
    child: Option<Child>,
    ipc_path: Option<String>,
}

impl MediaSession for PlayerSession {
    fn toggle_pause(&mut self) -> Result<()> {
        let Some(path) = &self.ipc_path else {
            return Err(anyhow!(
                "Playback controls are not supported on this platform."
            ));
        };
        if self.child.is_none() {
            return Err(anyhow!("playback already stopped"));
        }
        send_ipc_command(path, &json!(["cycle", "pause"]))
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let status = child.wait();
            debug_log(format!(
                "player stopped with status {:?}",
                status.ok().and_then(|s| s.code())
            ));
        }
        if let Some(path) = self.ipc_path.take() {
            cleanup_ipc_path(&path);
        }
    }
}

impl Drop for PlayerSession {
    fn drop(&mut self) {
        self.stop();
    }
}

fn send_ipc_command(path: &str, command: &serde_json::Value) -> Result<()> {
    let payload = json!({ "command": command });
    let serialized = serde_json::to_string(&payload).context("serialize player command")?;
    send_ipc_command_inner(path, &serialized)
}

#[cfg(unix)]
fn send_ipc_command_inner(path: &str, serialized: &str) -> Result<()> {
    let mut stream = UnixStream::connect(path)
        .with_context(|| format!("connect to player IPC socket {path}"))?;
    stream
        .write_all(serialized.as_bytes())
        .context("write player IPC command")?;
    stream
        .write_all(b"\n")
        .context("write player IPC command terminator")?;
    Ok(())
}

#[cfg(target_os = "windows")]
fn send_ipc_command_inner(path: &str, serialized: &str) -> Result<()> {
    let mut pipe = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .with_context(|| format!("connect to player IPC named pipe {path}"))?;
    pipe.write_all(serialized.as_bytes())
        .with_context(|| format!("write player IPC command to {path}"))?;
    pipe.write_all(b"\n")
        .with_context(|| format!("write player IPC command terminator to {path}"))?;
    pipe.flush().ok();
    Ok(())
}

#[cfg(all(not(unix), not(target_os = "windows")))]
fn send_ipc_command_inner(_path: &str, _serialized: &str) -> Result<()> {
    Err(anyhow!(
        "Playback controls are not supported on this platform."
    ))
}

#[cfg(unix)]
fn unique_ipc_path() -> Option<String> {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();
    let mut path = std::env::temp_dir();
    path.push(format!("folio-mpv-{}-{suffix}.sock", std::process::id()));
    Some(path.to_string_lossy().to_string())
}

#[cfg(target_os = "windows")]
fn unique_ipc_path() -> Option<String> {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();
    Some(format!(
        r"\\.\pipe\folio-mpv-{}-{suffix}",
        std::process::id()
    ))
}

#[cfg(all(not(unix), not(target_os = "windows")))]
fn unique_ipc_path() -> Option<String> {
    None
}

#[cfg(unix)]
fn cleanup_ipc_path(path: &str) {
    if let Err(err) = std::fs::remove_file(path) {
        if err.kind() != std::io::ErrorKind::NotFound && video_debug_enabled() {
            debug_log(format!("failed to remove player ipc path {path}: {err}"));
        }
    }
}

#[cfg(not(unix))]
fn cleanup_ipc_path(_path: &str) {}

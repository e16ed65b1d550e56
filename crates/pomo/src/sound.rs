//! Notification sound
//!
//! Sounds are played by an external command-line player on a dedicated
//! worker thread. The timer only ever sends the worker a message and moves
//! on; whether the sound actually plays is never reported back.

use pomo_core::config::SoundConfig;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Players tried in order when a sound file is configured
const PLAYERS: &[&str] = &["paplay", "aplay", "afplay"];

/// Player and file pairs tried in order when no sound file is configured
const SYSTEM_SOUNDS: &[(&str, &str)] = &[
    ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
    ("paplay", "/usr/share/sounds/freedesktop/stereo/bell.oga"),
    ("aplay", "/usr/share/sounds/sound-icons/guitar-11.wav"),
    ("aplay", "/usr/share/sounds/alsa/Front_Center.wav"),
    ("afplay", "/System/Library/Sounds/Glass.aiff"),
];

/// Something that can announce the end of a phase
pub trait Notifier {
    /// Trigger the notification. Must return immediately.
    fn notify(&self);
}

/// Notifier used when sound is disabled or no player is available
#[derive(Debug, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self) {}
}

/// A resolved audio backend: the player binary and the file it plays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundBackend {
    pub player: PathBuf,
    pub file: PathBuf,
}

impl SoundBackend {
    /// Find a usable player and sound file, searching `path_var` for players
    pub fn resolve(config: &SoundConfig, path_var: Option<&OsStr>) -> Option<Self> {
        let path_var = path_var?;

        if let Some(file) = &config.file {
            if !file.is_file() {
                return None;
            }
            return PLAYERS.iter().find_map(|name| {
                find_in_path(name, path_var).map(|player| Self {
                    player,
                    file: file.clone(),
                })
            });
        }

        SYSTEM_SOUNDS.iter().find_map(|(name, file)| {
            let file = Path::new(file);
            if !file.is_file() {
                return None;
            }
            find_in_path(name, path_var).map(|player| Self {
                player,
                file: file.to_path_buf(),
            })
        })
    }
}

fn find_in_path(name: &str, path_var: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Plays sounds on a background worker thread.
///
/// Dropping the player closes the queue and joins the worker, so a sound
/// requested just before exit is still started. Players that are still
/// playing are left running.
pub struct SoundPlayer {
    tx: Option<Sender<()>>,
    worker: Option<JoinHandle<usize>>,
}

impl SoundPlayer {
    /// Start the worker for `backend`
    pub fn spawn(backend: SoundBackend) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel::<()>();

        let worker = thread::Builder::new()
            .name("sound".to_string())
            .spawn(move || {
                let mut started = 0;
                let mut playing: Vec<Child> = Vec::new();
                while rx.recv().is_ok() {
                    playing.retain_mut(|child| !has_exited(child));
                    let result = Command::new(&backend.player)
                        .arg(&backend.file)
                        .stdin(Stdio::null())
                        .stdout(Stdio::null())
                        .stderr(Stdio::null())
                        .spawn();

                    match result {
                        Ok(child) => {
                            started += 1;
                            playing.push(child);
                        }
                        Err(err) => debug!("failed to run sound player: {}", err),
                    }
                }
                started
            })?;

        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    /// Close the queue and wait until every queued sound has been started.
    /// Returns how many players were launched.
    pub fn shutdown(mut self) -> usize {
        self.finish()
    }

    fn finish(&mut self) -> usize {
        drop(self.tx.take());
        match self.worker.take() {
            Some(worker) => worker.join().unwrap_or(0),
            None => 0,
        }
    }
}

impl Notifier for SoundPlayer {
    fn notify(&self) {
        // A dead worker just means no sound
        if let Some(tx) = &self.tx {
            let _ = tx.send(());
        }
    }
}

impl Drop for SoundPlayer {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Reap a finished player, logging a failed exit
fn has_exited(child: &mut Child) -> bool {
    match child.try_wait() {
        Ok(Some(status)) => {
            if !status.success() {
                debug!("sound player exited with {}", status);
            }
            true
        }
        Ok(None) => false,
        Err(_) => true,
    }
}

/// Build the notifier for this run, degrading to silence if audio is
/// disabled or unavailable
pub fn notifier_from_config(config: &SoundConfig) -> Box<dyn Notifier> {
    if !config.enabled {
        info!("sound disabled");
        return Box::new(SilentNotifier);
    }

    let path_var = std::env::var_os("PATH");
    let Some(backend) = SoundBackend::resolve(config, path_var.as_deref()) else {
        info!("no sound player or sound file found, notifications are silent");
        return Box::new(SilentNotifier);
    };

    match SoundPlayer::spawn(backend.clone()) {
        Ok(player) => {
            info!(
                "notification sound: {} {}",
                backend.player.display(),
                backend.file.display()
            );
            Box::new(player)
        }
        Err(err) => {
            info!("failed to start sound worker: {}", err);
            Box::new(SilentNotifier)
        }
    }
}

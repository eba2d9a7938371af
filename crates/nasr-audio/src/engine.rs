//! Audio stream wrapping Kira's AudioManager
//!
//! Plays one streamed sound at a time. Starting a new stream stops the
//! previous one. Degrades gracefully when no audio device is available.

use kira::sound::streaming::{StreamingSoundData, StreamingSoundHandle};
use kira::sound::{FromFileError, PlaybackState};
use kira::{AudioManager, AudioManagerSettings, DefaultBackend, Tween};
use nasr_core::{NasrError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Short fade applied to pause/resume/stop to avoid clicks
const FADE: Tween = Tween {
    duration: Duration::from_millis(10),
    easing: kira::Easing::Linear,
    start_time: kira::StartTime::Immediate,
};

/// One streaming sound over a Kira AudioManager
pub struct AudioStream {
    manager: Option<AudioManager<DefaultBackend>>,
    current: Option<StreamingSoundHandle<FromFileError>>,
    current_path: Option<PathBuf>,
    volume: f64,
}

impl Default for AudioStream {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioStream {
    pub fn new() -> Self {
        // Try to create the audio manager; gracefully fail if no device
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| log::warn!("Audio: no device available ({e}), running silent"))
            .ok();

        Self {
            manager,
            current: None,
            current_path: None,
            volume: 1.0,
        }
    }

    /// Whether audio is actually available
    pub fn is_available(&self) -> bool {
        self.manager.is_some()
    }

    /// Stream a sound file, replacing whatever is playing
    pub fn play(&mut self, path: &Path, looping: bool) -> Result<()> {
        self.stop();

        let Some(manager) = &mut self.manager else {
            return Ok(());
        };

        let mut data = StreamingSoundData::from_file(path).map_err(|e| {
            NasrError::AudioError(format!("Failed to open '{}': {}", path.display(), e))
        })?;
        data = data.volume(amplitude_to_db(self.volume));
        if looping {
            data = data.loop_region(..);
        }

        let handle = manager.play(data).map_err(|e| {
            NasrError::AudioError(format!("Failed to play '{}': {}", path.display(), e))
        })?;

        log::debug!("Audio: streaming {}", path.display());
        self.current = Some(handle);
        self.current_path = Some(path.to_path_buf());
        Ok(())
    }

    pub fn pause(&mut self) {
        if let Some(handle) = &mut self.current {
            handle.pause(FADE);
        }
    }

    pub fn resume(&mut self) {
        if let Some(handle) = &mut self.current {
            handle.resume(FADE);
        }
    }

    pub fn stop(&mut self) {
        if let Some(mut handle) = self.current.take() {
            handle.stop(FADE);
        }
        self.current_path = None;
    }

    /// Set the stream volume as linear amplitude (1.0 = unchanged)
    pub fn set_volume(&mut self, amplitude: f64) {
        self.volume = amplitude.max(0.0);
        if let Some(handle) = &mut self.current {
            handle.set_volume(amplitude_to_db(self.volume), FADE);
        }
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_playing(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|h| h.state() == PlaybackState::Playing)
    }

    /// Path of the current stream, if one was started
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }
}

/// Convert linear amplitude (0.0–2.0) to decibels
pub(crate) fn amplitude_to_db(amplitude: f64) -> kira::Decibels {
    if amplitude <= 0.0 {
        kira::Decibels(-60.0) // silence
    } else {
        kira::Decibels((20.0 * (amplitude as f32).log10()).max(-60.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amplitude_to_db() {
        assert_eq!(amplitude_to_db(0.0).0, -60.0);
        assert!(amplitude_to_db(1.0).0.abs() < 1e-6);
        assert!((amplitude_to_db(2.0).0 - 6.0206).abs() < 0.01);
        assert_eq!(amplitude_to_db(1e-9).0, -60.0);
    }

    #[test]
    fn test_stream_without_playback() {
        // Works with or without an audio device (CI typically has none)
        let mut stream = AudioStream::new();
        assert!(!stream.is_playing());
        assert_eq!(stream.current_path(), None);

        stream.set_volume(0.5);
        assert_eq!(stream.volume(), 0.5);
        stream.set_volume(-1.0);
        assert_eq!(stream.volume(), 0.0);

        stream.pause();
        stream.resume();
        stream.stop();
        assert!(!stream.is_playing());
    }

    #[test]
    fn test_missing_file() {
        let mut stream = AudioStream::new();
        let result = stream.play(Path::new("does/not/exist.ogg"), false);
        if stream.is_available() {
            assert!(matches!(result, Err(NasrError::AudioError(_))));
        } else {
            assert!(result.is_ok());
        }
        assert!(!stream.is_playing());
    }
}

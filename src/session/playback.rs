//! Preview playback
//!
//! One sound previews at a time. Starting a preview always stops whatever
//! is playing first, so at most one request is ever in flight.

use std::fmt;

use log::info;

use crate::error::Result;

/// Lowest and highest accepted volume
pub const VOLUME_RANGE: (f32, f32) = (0.0, 1.0);
/// Lowest and highest accepted pitch
pub const PITCH_RANGE: (f32, f32) = (0.1, 2.0);

/// Where the audio bytes of a preview come from
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackSource {
    /// Platform asset, downloaded from its hash address
    Remote { uri: String },
    /// Audio bundled in the pack
    Archive { path: String, bytes: Vec<u8> },
}

impl fmt::Display for PlaybackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackSource::Remote { uri } => write!(f, "{}", uri),
            PlaybackSource::Archive { path, bytes } => {
                write!(f, "{} ({} bytes)", path, bytes.len())
            }
        }
    }
}

/// A preview handed to the audio sink, with clamped factors
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackRequest {
    pub source: PlaybackSource,
    pub volume: f32,
    pub pitch: f32,
}

/// Output device for previews
pub trait AudioSink: Send {
    /// Begin playing `request`
    fn start(&mut self, request: &PlaybackRequest) -> Result<()>;

    /// Stop the current sound, if any
    fn stop(&mut self);
}

impl<T: AudioSink + ?Sized> AudioSink for Box<T> {
    fn start(&mut self, request: &PlaybackRequest) -> Result<()> {
        (**self).start(request)
    }

    fn stop(&mut self) {
        (**self).stop()
    }
}

/// Sink that only logs what it would play
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn start(&mut self, request: &PlaybackRequest) -> Result<()> {
        info!(
            "Playing {} (volume {:.2}, pitch {:.2})",
            request.source, request.volume, request.pitch
        );
        Ok(())
    }

    fn stop(&mut self) {}
}

/// Exclusive owner of the preview output
#[derive(Debug)]
pub struct PreviewPlayer<S> {
    sink: S,
    current: Option<PlaybackRequest>,
}

impl<S: AudioSink> PreviewPlayer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            current: None,
        }
    }

    /// Stop the current preview and start a new one
    pub fn play(&mut self, source: PlaybackSource, volume: f32, pitch: f32) -> Result<PlaybackRequest> {
        self.stop();

        let request = PlaybackRequest {
            source,
            volume: volume.clamp(VOLUME_RANGE.0, VOLUME_RANGE.1),
            pitch: pitch.clamp(PITCH_RANGE.0, PITCH_RANGE.1),
        };
        self.sink.start(&request)?;
        self.current = Some(request.clone());
        Ok(request)
    }

    pub fn stop(&mut self) {
        self.sink.stop();
        self.current = None;
    }

    /// The preview currently playing
    pub fn current(&self) -> Option<&PlaybackRequest> {
        self.current.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct CountingSink {
        started: usize,
        stopped: usize,
    }

    impl AudioSink for CountingSink {
        fn start(&mut self, _request: &PlaybackRequest) -> Result<()> {
            self.started += 1;
            Ok(())
        }

        fn stop(&mut self) {
            self.stopped += 1;
        }
    }

    fn remote(uri: &str) -> PlaybackSource {
        PlaybackSource::Remote { uri: uri.into() }
    }

    #[test]
    fn test_play_stops_previous() {
        let mut player = PreviewPlayer::new(CountingSink::default());
        player.play(remote("https://res.test/a"), 1.0, 1.0).unwrap();
        player.play(remote("https://res.test/b"), 1.0, 1.0).unwrap();

        assert_eq!(player.sink().started, 2);
        assert_eq!(player.sink().stopped, 2);
        assert_eq!(player.current().unwrap().source, remote("https://res.test/b"));
    }

    #[test]
    fn test_factors_are_clamped() {
        let mut player = PreviewPlayer::new(CountingSink::default());

        let loud = player.play(remote("https://res.test/a"), 3.5, 4.0).unwrap();
        assert_relative_eq!(loud.volume, 1.0);
        assert_relative_eq!(loud.pitch, 2.0);

        let quiet = player.play(remote("https://res.test/a"), -1.0, 0.0).unwrap();
        assert_relative_eq!(quiet.volume, 0.0);
        assert_relative_eq!(quiet.pitch, 0.1);
    }

    #[test]
    fn test_stop_clears_current() {
        let mut player = PreviewPlayer::new(LogSink);
        player.play(remote("https://res.test/a"), 0.5, 1.0).unwrap();
        player.stop();
        assert!(player.current().is_none());
    }
}

//! Session Module
//!
//! The editing session: published tables, the loaded pack and preview
//! playback.

mod playback;
#[allow(clippy::module_inception)]
mod session;
mod tables;

pub use playback::{
    AudioSink, LogSink, PlaybackRequest, PlaybackSource, PreviewPlayer, PITCH_RANGE, VOLUME_RANGE,
};
pub use session::{PreviewOutcome, Session};
pub use tables::SessionTables;

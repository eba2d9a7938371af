//! Nasr Audio - Single audio stream playback (Kira backend)
//!
//! - `AudioStream`: wraps a Kira AudioManager and one streaming sound handle,
//!   running silent when no device is present

pub mod engine;

pub use engine::AudioStream;

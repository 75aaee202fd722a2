//! Local audio devices: microphone capture, speaker playback and WAV file output.
mod microphone;
mod speaker;
mod wav_file;

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;

use speech_console_core::AudioFrame;

pub use microphone::Microphone;
pub use speaker::Speaker;
pub use wav_file::WavFileOutput;

/// A destination for synthesized audio.
#[async_trait]
pub trait AudioOutput: fmt::Debug + Send {
    fn write(&mut self, frame: AudioFrame) -> Result<()>;

    /// Wait until everything written so far reached the device or the file.
    async fn drain(&mut self) -> Result<()>;

    fn finish(self: Box<Self>) -> Result<()>;
}

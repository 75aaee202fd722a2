use std::{
    fmt,
    fs::{File, OpenOptions},
    io::BufWriter,
    path::PathBuf,
};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, error};

use crate::AudioOutput;
use speech_console_core::{AudioFormat, AudioFrame};

/// 16-bit PCM WAV output. The file is finalized on [`AudioOutput::finish`] or on drop.
pub struct WavFileOutput {
    path: PathBuf,
    format: AudioFormat,
    writer: Option<WavWriter<BufWriter<File>>>,
}

// `WavWriter` does not implement `Debug`.
impl fmt::Debug for WavFileOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WavFileOutput")
            .field("path", &self.path)
            .field("format", &self.format)
            .finish()
    }
}

impl WavFileOutput {
    /// Create the file. Fails if it already exists.
    pub fn create(path: impl Into<PathBuf>, format: AudioFormat) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("Creating file {}", path.display()))?;

        let spec = WavSpec {
            channels: format.channels,
            sample_rate: format.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let writer = WavWriter::new(BufWriter::new(file), spec)
            .with_context(|| format!("Writing WAV header to {}", path.display()))?;

        debug!("Writing audio to `{}`", path.display());

        Ok(Self {
            path,
            format,
            writer: Some(writer),
        })
    }

    fn finalize(&mut self) -> Result<()> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        writer
            .finalize()
            .with_context(|| format!("Finalizing {}", self.path.display()))
    }
}

#[async_trait]
impl AudioOutput for WavFileOutput {
    fn write(&mut self, frame: AudioFrame) -> Result<()> {
        if frame.format != self.format {
            bail!(
                "Audio format {:?} does not match the format of the file {:?}",
                frame.format,
                self.format
            );
        }
        let Some(writer) = self.writer.as_mut() else {
            bail!("File {} is already finalized", self.path.display());
        };
        for sample in frame.samples {
            writer.write_sample(sample).context("Writing sample")?;
        }
        Ok(())
    }

    async fn drain(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush().context("Flushing WAV file")?;
        }
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<()> {
        self.finalize()
    }
}

impl Drop for WavFileOutput {
    fn drop(&mut self) {
        if let Err(e) = self.finalize() {
            error!("Failed to finalize audio file: {e:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn written_samples_can_be_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");

        let mut output = Box::new(WavFileOutput::create(&path, AudioFormat::SPEECH).unwrap());
        output
            .write(AudioFrame {
                format: AudioFormat::SPEECH,
                samples: vec![1, -1, 300],
            })
            .unwrap();
        output.drain().await.unwrap();
        output.finish().unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.spec().channels, 1);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![1, -1, 300]);
    }

    #[test]
    fn existing_files_are_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taken.wav");
        std::fs::write(&path, b"keep").unwrap();

        assert!(WavFileOutput::create(&path, AudioFormat::SPEECH).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"keep");
    }

    #[test]
    fn mismatching_frames_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut output =
            WavFileOutput::create(dir.path().join("out.wav"), AudioFormat::SPEECH).unwrap();
        let frame = AudioFrame {
            format: AudioFormat::new(2, 48000),
            samples: vec![0; 4],
        };
        assert!(output.write(frame).is_err());
    }

    #[test]
    fn dropping_finalizes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dropped.wav");
        {
            let mut output = WavFileOutput::create(&path, AudioFormat::SPEECH).unwrap();
            output
                .write(AudioFrame {
                    format: AudioFormat::SPEECH,
                    samples: vec![5; 10],
                })
                .unwrap();
        }
        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.len(), 10);
    }
}

//! Audio formats and frames shared between devices and backends.

use std::{path::PathBuf, time::Duration};

use crate::audio;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AudioFormat {
    pub channels: u16,
    pub sample_rate: u32,
}

impl AudioFormat {
    /// 16 kHz mono, what the speech service produces and expects by default.
    pub const SPEECH: AudioFormat = AudioFormat {
        channels: 1,
        sample_rate: 16000,
    };

    pub fn new(channels: u16, sample_rate: u32) -> Self {
        Self {
            channels,
            sample_rate,
        }
    }
}

/// Interleaved signed 16-bit PCM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrame {
    pub format: AudioFormat,
    pub samples: Vec<i16>,
}

impl AudioFrame {
    pub fn from_le_bytes(format: AudioFormat, bytes: &[u8]) -> Self {
        Self {
            format,
            samples: audio::from_le_bytes(bytes),
        }
    }

    pub fn to_le_bytes(&self) -> Vec<u8> {
        audio::into_le_bytes(&self.samples)
    }

    pub fn duration(&self) -> Duration {
        let per_second = self.format.sample_rate as u64 * self.format.channels.max(1) as u64;
        if per_second == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / per_second as f64)
    }

    pub fn into_mono(self) -> Self {
        if self.format.channels <= 1 {
            return self;
        }
        Self {
            samples: audio::downmix_to_mono(&self.samples, self.format.channels),
            format: AudioFormat::new(1, self.format.sample_rate),
        }
    }
}

/// Where synthesized speech goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSink {
    /// The default audio output device.
    Speaker,
    /// A WAV file that must not exist yet.
    WavFile(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_duration_accounts_for_channels() {
        let frame = AudioFrame {
            format: AudioFormat::new(2, 8000),
            samples: vec![0; 16000],
        };
        assert_eq!(frame.duration(), Duration::from_secs(1));
    }

    #[test]
    fn mono_conversion_halves_stereo_samples() {
        let frame = AudioFrame {
            format: AudioFormat::new(2, 16000),
            samples: vec![2, 4, 6, 8],
        };
        let mono = frame.into_mono();
        assert_eq!(mono.format, AudioFormat::SPEECH);
        assert_eq!(mono.samples, vec![3, 7]);
    }
}

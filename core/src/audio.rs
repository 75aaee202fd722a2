//! PCM sample conversions.

pub fn into_i16(audio: &[f32]) -> Vec<i16> {
    audio
        .iter()
        .map(|sample| (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect()
}

pub fn from_i16(audio: Vec<i16>) -> Vec<f32> {
    audio
        .into_iter()
        .map(|sample| sample as f32 / i16::MAX as f32)
        .collect()
}

pub fn into_le_bytes(audio: &[i16]) -> Vec<u8> {
    let mut result = Vec::with_capacity(audio.len() * 2);
    for sample in audio {
        result.extend_from_slice(&sample.to_le_bytes());
    }
    result
}

/// A trailing odd byte is dropped.
pub fn from_le_bytes(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Average interleaved channels into a single channel.
pub fn downmix_to_mono(audio: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return audio.to_vec();
    }
    audio
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|s| *s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::{AzureRecognizer, AzureSynthesizer, Host};
use audio_io::{AudioOutput, Speaker, WavFileOutput};
use speech_console_core::{AudioFormat, AudioSink, Recognizer, SpeechBackend, Synthesizer};

/// Default voice, see <https://aka.ms/speech/voices/neural> for the full list.
pub const DEFAULT_VOICE: &str = "en-US-AvaMultilingualNeural";
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Connection parameters. Credentials are passed through unchecked, the service rejects them.
#[derive(Debug, Clone)]
pub struct Params {
    pub region: Option<String>,
    pub subscription_key: Option<String>,
    pub language: String,
    pub voice: String,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            region: None,
            subscription_key: None,
            language: DEFAULT_LANGUAGE.into(),
            voice: DEFAULT_VOICE.into(),
        }
    }
}

#[derive(Debug)]
pub struct AzureBackend {
    host: Host,
    language: String,
    voice: String,
}

impl AzureBackend {
    pub fn new(params: Params) -> Self {
        // Host / Auth is lightweight and does not connect.
        let host = Host::from_subscription(
            params.region.unwrap_or_default(),
            params.subscription_key.unwrap_or_default(),
        );
        Self {
            host,
            language: params.language,
            voice: params.voice,
        }
    }
}

#[async_trait]
impl SpeechBackend for AzureBackend {
    async fn recognizer(&self) -> Result<Box<dyn Recognizer + Send>> {
        Ok(Box::new(AzureRecognizer::new(
            self.host.clone(),
            self.language.clone(),
        )))
    }

    async fn synthesizer(&self, sink: AudioSink) -> Result<Box<dyn Synthesizer + Send>> {
        debug!("Opening audio sink: {sink:?}");
        let output: Box<dyn AudioOutput> = match sink {
            AudioSink::Speaker => Box::new(Speaker::open_default()?),
            AudioSink::WavFile(path) => Box::new(WavFileOutput::create(path, AudioFormat::SPEECH)?),
        };
        Ok(Box::new(AzureSynthesizer::new(
            self.host.clone(),
            self.language.clone(),
            self.voice.clone(),
            output,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_are_not_rejected_locally() {
        let backend = AzureBackend::new(Params::default());
        assert_eq!(backend.voice, DEFAULT_VOICE);
        assert_eq!(backend.language, DEFAULT_LANGUAGE);
    }

    #[test]
    fn params_are_passed_to_the_sessions() {
        let params = Params {
            region: Some("westeurope".into()),
            subscription_key: Some("key".into()),
            language: "de-DE".into(),
            voice: "de-DE-KatjaNeural".into(),
        };
        let backend = AzureBackend::new(params);
        assert_eq!(backend.language, "de-DE");
        assert_eq!(backend.voice, "de-DE-KatjaNeural");
    }
}

use std::{fmt, time::Duration};

use anyhow::{Result, bail};
use async_trait::async_trait;
use azure_speech::{
    stream::StreamExt,
    synthesizer::{
        self, AudioFormat,
        ssml::{self, ToSSML, ssml::SerializeOptions},
    },
};
use tracing::{debug, info, warn};

use crate::{Host, cancellation};
use audio_io::AudioOutput;
use speech_console_core::{AudioFrame, SynthesisOutcome, Synthesizer};

/// Synthesis with a fixed voice into an [`AudioOutput`].
pub struct AzureSynthesizer {
    host: Host,
    language: String,
    voice: String,
    output: Box<dyn AudioOutput>,
    client: Option<synthesizer::Client>,
}

// This is because `synthesizer::Client` does not implement `Debug`.
impl fmt::Debug for AzureSynthesizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureSynthesizer")
            .field("language", &self.language)
            .field("voice", &self.voice)
            .field("output", &self.output)
            .field("connected", &self.client.is_some())
            .finish()
    }
}

impl AzureSynthesizer {
    pub fn new(host: Host, language: String, voice: String, output: Box<dyn AudioOutput>) -> Self {
        Self {
            host,
            language,
            voice,
            output,
            client: None,
        }
    }
}

#[async_trait]
impl Synthesizer for AzureSynthesizer {
    async fn speak_text(&mut self, text: &str) -> Result<SynthesisOutcome> {
        if self.client.is_none() {
            // Don't set any language / voice here, we generate SSML directly.
            let config = synthesizer::Config::default()
                .disable_auto_detect_language()
                .enable_session_end()
                .with_audio_format(AudioFormat::Raw16Khz16BitMonoPcm);

            match synthesizer::Client::connect(self.host.auth.clone(), config).await {
                Ok(client) => {
                    info!("Connected to the synthesizer, voice `{}`", self.voice);
                    self.client = Some(client);
                }
                Err(e) => {
                    warn!("Failed to connect to the synthesizer: {e}");
                    return Ok(SynthesisOutcome::Canceled(
                        cancellation::connection_failure(&e),
                    ));
                }
            }
        }

        let request = SynthesizeRequest {
            language: self.language.clone(),
            voice: self.voice.clone(),
            text: text.to_string(),
        };

        let Some(client) = self.client.as_mut() else {
            bail!("Synthesizer is not connected");
        };

        let outcome = synthesize(client, request, self.output.as_mut()).await?;
        if let SynthesisOutcome::Canceled(_) = outcome {
            self.client = None;
        }
        Ok(outcome)
    }

    async fn finish(mut self: Box<Self>) -> Result<()> {
        self.output.drain().await?;
        let Self { output, .. } = *self;
        output.finish()
    }
}

/// Errors of the output are local and returned as `Err`, errors of the service are outcomes.
async fn synthesize(
    client: &mut synthesizer::Client,
    request: SynthesizeRequest,
    output: &mut dyn AudioOutput,
) -> Result<SynthesisOutcome> {
    let mut stream = match client.synthesize(request).await {
        Ok(stream) => stream,
        Err(e) => return Ok(SynthesisOutcome::Canceled(cancellation::connection_failure(&e))),
    };

    let format = speech_console_core::AudioFormat::SPEECH;
    let mut audio = Duration::ZERO;

    while let Some(event) = stream.next().await {
        let event = match event {
            Ok(event) => event,
            Err(e) => {
                warn!("Synthesizer failed: {e}");
                return Ok(SynthesisOutcome::Canceled(cancellation::service_failure(&e)));
            }
        };

        use synthesizer::Event;
        match event {
            Event::Synthesising(_uuid, chunk) => {
                let frame = AudioFrame::from_le_bytes(format, &chunk);
                debug!("Received audio: {:?}", frame.duration());
                audio += frame.duration();
                output.write(frame)?;
            }
            event => {
                debug!("Received: {event:?}")
            }
        };
    }

    output.drain().await?;
    Ok(SynthesisOutcome::Completed { audio })
}

/// This is because we don't want to go through voice and language conversion and therefore we
/// are forced to use SSML directly.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SynthesizeRequest {
    language: String,
    voice: String,
    text: String,
}

impl ToSSML for SynthesizeRequest {
    fn to_ssml(
        &self,
        _language: azure_speech::synthesizer::Language,
        _voice: azure_speech::synthesizer::Voice,
    ) -> azure_speech::Result<String> {
        self.ssml()
    }
}

impl SynthesizeRequest {
    fn ssml(&self) -> azure_speech::Result<String> {
        serialize_to_ssml(&ssml::ssml::speak(
            Some(self.language.as_str()),
            [ssml::ssml::voice(self.voice.as_str(), [self.text.clone()])],
        ))
    }
}

fn serialize_to_ssml(speak: &impl ssml::ssml::Serialize) -> azure_speech::Result<String> {
    speak
        .serialize_to_string(
            &SerializeOptions::default()
                .flavor(ssml::ssml::Flavor::MicrosoftAzureCognitiveSpeechServices),
        )
        .map_err(|e| azure_speech::Error::InternalError(e.to_string()))
}

use std::fmt;

use anyhow::{Result, bail};
use async_stream::stream;
use async_trait::async_trait;
use azure_speech::recognizer::{self, Event};
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::{Host, cancellation};
use audio_io::Microphone;
use speech_console_core::{Cancellation, RecognitionOutcome, Recognizer};

/// Single-utterance recognition from the default microphone.
///
/// The microphone and the service connection are opened on the first call, so that their
/// failures are reported as canceled outcomes.
pub struct AzureRecognizer {
    host: Host,
    language: String,
    microphone: Option<Microphone>,
    client: Option<recognizer::Client>,
}

// This is because `recognizer::Client` does not implement `Debug`.
impl fmt::Debug for AzureRecognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureRecognizer")
            .field("language", &self.language)
            .field("microphone", &self.microphone)
            .field("connected", &self.client.is_some())
            .finish()
    }
}

impl AzureRecognizer {
    pub fn new(host: Host, language: String) -> Self {
        Self {
            host,
            language,
            microphone: None,
            client: None,
        }
    }

    fn config(&self) -> recognizer::Config {
        recognizer::Config::default()
            // Disable profanity filter.
            .set_profanity(recognizer::Profanity::Raw)
            // short-circuit language filter.
            .set_language(recognizer::Language::Custom(self.language.clone()))
            .set_output_format(recognizer::OutputFormat::Detailed)
    }
}

#[async_trait]
impl Recognizer for AzureRecognizer {
    async fn recognize_once(&mut self) -> Result<RecognitionOutcome> {
        if self.microphone.is_none() {
            match Microphone::open_default() {
                Ok(microphone) => self.microphone = Some(microphone),
                Err(e) => {
                    warn!("Failed to open microphone: {e:#}");
                    return Ok(RecognitionOutcome::Canceled(cancellation::device_failure(
                        &e,
                    )));
                }
            }
        }

        if self.client.is_none() {
            match recognizer::Client::connect(self.host.auth.clone(), self.config()).await {
                Ok(client) => {
                    info!("Connected to the recognizer, language `{}`", self.language);
                    self.client = Some(client)
                }
                Err(e) => {
                    warn!("Failed to connect to the recognizer: {e}");
                    return Ok(RecognitionOutcome::Canceled(
                        cancellation::connection_failure(&e),
                    ));
                }
            }
        }

        let (Some(microphone), Some(client)) = (&self.microphone, &mut self.client) else {
            bail!("Recognizer is not ready");
        };

        let outcome = recognize_utterance(client, microphone).await;

        if let RecognitionOutcome::Canceled(_) = outcome {
            // The connection is in an unknown state, reconnect on the next call.
            self.client = None;
        }

        Ok(outcome)
    }

    async fn stop(self: Box<Self>) -> Result<()> {
        debug!("Stopping recognizer");
        // Dropping the microphone joins its capture thread.
        drop(self);
        Ok(())
    }
}

async fn recognize_utterance(
    client: &mut recognizer::Client,
    microphone: &Microphone,
) -> RecognitionOutcome {
    let format = microphone.format();
    let mut frames = microphone.listen();

    let wav_header = hound::WavSpec {
        sample_rate: format.sample_rate,
        channels: format.channels,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
    .into_header_for_infinite_file();

    let audio_stream = Box::pin(stream! {
        yield wav_header;
        while let Some(frame) = frames.recv().await {
            yield frame.to_le_bytes();
        }
    });

    let details = recognizer::Details::microphone("Unknown", "Unknown");

    let mut events = match client
        .recognize(audio_stream, recognizer::ContentType::Wav, details)
        .await
    {
        Ok(events) => events,
        Err(e) => return RecognitionOutcome::Canceled(cancellation::connection_failure(&e)),
    };

    while let Some(event) = events.next().await {
        match event {
            Ok(
                Event::SessionStarted(_)
                | Event::SessionEnded(_)
                | Event::StartDetected(_, _)
                | Event::EndDetected(_, _),
            ) => {}
            Ok(Event::Recognizing(_, recognized, _, _, _)) => {
                debug!("Recognizing: {}", recognized.text)
            }
            Ok(Event::Recognized(_, recognized, _, _, _)) => {
                return if recognized.text.trim().is_empty() {
                    RecognitionOutcome::NoMatch
                } else {
                    RecognitionOutcome::Recognized {
                        text: recognized.text,
                    }
                };
            }
            Ok(Event::UnMatch(_, _, _, _)) => return RecognitionOutcome::NoMatch,
            Err(e) => {
                warn!("Recognizer failed: {e}");
                return RecognitionOutcome::Canceled(cancellation::service_failure(&e));
            }
        }
    }

    debug!("Recognizer event stream ended");
    RecognitionOutcome::Canceled(Cancellation::end_of_stream())
}

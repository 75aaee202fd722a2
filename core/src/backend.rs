//! The abstract interface to a speech backend.
//!
//! ADR: One call is one outcome. Recognizers return after a single utterance, synthesizers after
//! a single text has been rendered to the sink. Sessions drive the calls one at a time.
//!
//! ADR: Everything the service reports, including connection and credential failures, is an
//! outcome (`Canceled` with an error), not an `Err`. So are failures of the input device while
//! recognizing. `Err` is reserved for local failures that make the session impossible, like an
//! output file that cannot be created.
//!
//! ADR: Creating a recognizer or synthesizer must not contact the service. Credentials are not
//! validated locally; their failure shows up in the first outcome.
use std::fmt;

use anyhow::Result;
use async_trait::async_trait;

use crate::{AudioSink, RecognitionOutcome, SynthesisOutcome};

#[async_trait]
pub trait SpeechBackend: fmt::Debug {
    /// A recognizer listening on the default audio input device.
    async fn recognizer(&self) -> Result<Box<dyn Recognizer + Send>>;

    /// A synthesizer rendering to `sink`.
    async fn synthesizer(&self, sink: AudioSink) -> Result<Box<dyn Synthesizer + Send>>;
}

#[async_trait]
pub trait Recognizer: fmt::Debug {
    /// Recognize a single utterance. Blocks until the backend decides that the utterance ended.
    async fn recognize_once(&mut self) -> Result<RecognitionOutcome>;

    /// Release the input device and the service connection.
    async fn stop(self: Box<Self>) -> Result<()>;
}

#[async_trait]
pub trait Synthesizer: fmt::Debug {
    /// Synthesize `text` to the sink. Returns after the audio was delivered to the sink.
    async fn speak_text(&mut self, text: &str) -> Result<SynthesisOutcome>;

    /// Drain and close the sink. Output files are complete only after this returns.
    async fn finish(self: Box<Self>) -> Result<()>;
}

use anyhow::Result;
use derive_more::Display;
use tracing::info;

use crate::{Choice, Report, Terminal, choose, recognition, synthesis};
use speech_console_core::SpeechBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Operation {
    #[display("Text to Speech")]
    TextToSpeech,
    #[display("Speech to text")]
    SpeechToText,
}

impl Choice for Operation {
    const ALL: &'static [Self] = &[Operation::TextToSpeech, Operation::SpeechToText];
}

/// Run one session of the operator's choice. Returns when that session ends.
pub async fn run(backend: &dyn SpeechBackend, terminal: &mut dyn Terminal) -> Result<()> {
    if !terminal.is_interactive() {
        terminal.report(&Report::NotInteractive)?;
        return Ok(());
    }

    let operation: Operation = choose(terminal, "Select the service:")?;
    info!("Operation: {operation}");

    match operation {
        Operation::TextToSpeech => synthesis::run(backend, terminal).await,
        Operation::SpeechToText => recognition::run(backend, terminal).await,
    }
}

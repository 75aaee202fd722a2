use anyhow::Result;
use tracing::debug;

use crate::{Report, Terminal, report_cancellation};
use speech_console_core::{RecognitionOutcome, Recognizer, SpeechBackend};

/// Recognize utterances until the backend cancels.
pub async fn run(backend: &dyn SpeechBackend, terminal: &mut dyn Terminal) -> Result<()> {
    let mut recognizer = backend.recognizer().await?;

    terminal.report(&Report::Listening)?;
    let result = listen(recognizer.as_mut(), terminal).await;

    recognizer.stop().await?;
    result
}

async fn listen(
    recognizer: &mut (dyn Recognizer + Send),
    terminal: &mut dyn Terminal,
) -> Result<()> {
    let mut attempts = 0usize;
    loop {
        let outcome = recognizer.recognize_once().await?;
        attempts += 1;

        let report = match outcome {
            RecognitionOutcome::Recognized { text } => Report::Recognized { text },
            RecognitionOutcome::NoMatch => Report::NoMatch,
            RecognitionOutcome::Canceled(cancellation) => {
                debug!("Recognition canceled after {attempts} attempts");
                return report_cancellation(terminal, &cancellation);
            }
        };
        terminal.report(&report)?;
    }
}

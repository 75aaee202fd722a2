use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use derive_more::Display;
use tracing::{debug, info};

use crate::{Choice, Report, Terminal, choose, report_cancellation};
use speech_console_core::{AudioSink, SpeechBackend, SynthesisOutcome, Synthesizer};

/// Typing this ends console input.
pub const SENTINEL: &str = ":q";

const PROMPT: &str = "> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TextSource {
    Console,
    File,
}

impl Choice for TextSource {
    const ALL: &'static [Self] = &[TextSource::Console, TextSource::File];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Destination {
    Audio,
    File,
}

impl Choice for Destination {
    const ALL: &'static [Self] = &[Destination::Audio, Destination::File];
}

/// Whether a console line ends the input: empty, blank, or exactly the sentinel.
pub fn ends_input(line: &str) -> bool {
    line.trim().is_empty() || line == SENTINEL
}

/// Collect source and destination, then synthesize until the input ends.
///
/// A file is synthesized as a whole in a single request. Console input is synthesized line by
/// line.
pub async fn run(backend: &dyn SpeechBackend, terminal: &mut dyn Terminal) -> Result<()> {
    let source: TextSource = choose(terminal, "Select source")?;
    let destination: Destination = choose(terminal, "Select destination")?;

    let sink = match destination {
        Destination::Audio => AudioSink::Speaker,
        Destination::File => {
            let path = PathBuf::from(terminal.ask("Which is the path of the file to write?")?);
            if path.exists() {
                terminal.report(&Report::OutputFileExists(path))?;
                return Ok(());
            }
            AudioSink::WavFile(path)
        }
    };

    let file_text = match source {
        TextSource::Console => None,
        TextSource::File => {
            let path = PathBuf::from(terminal.ask("Which is the path of the file to read?")?);
            if !path.exists() {
                terminal.report(&Report::InputFileMissing(path))?;
                return Ok(());
            }
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Reading {}", path.display()))?;
            Some(text)
        }
    };

    info!("Synthesizing from {source} to {sink:?}");
    let mut synthesizer = backend.synthesizer(sink.clone()).await?;

    let result = match file_text {
        Some(text) => speak(synthesizer.as_mut(), terminal, &sink, text).await,
        None => speak_lines(synthesizer.as_mut(), terminal, &sink).await,
    };

    let finished = synthesizer.finish().await;
    result?;
    finished
}

async fn speak_lines(
    synthesizer: &mut (dyn Synthesizer + Send),
    terminal: &mut dyn Terminal,
    sink: &AudioSink,
) -> Result<()> {
    loop {
        terminal.report(&Report::AwaitingText)?;
        let Some(line) = terminal.read_line(PROMPT)? else {
            debug!("Console input exhausted");
            return Ok(());
        };
        let line = line.trim_end_matches(['\r', '\n']);
        if ends_input(line) {
            return Ok(());
        }
        speak(synthesizer, terminal, sink, line.to_string()).await?;
    }
}

async fn speak(
    synthesizer: &mut (dyn Synthesizer + Send),
    terminal: &mut dyn Terminal,
    sink: &AudioSink,
    text: String,
) -> Result<()> {
    match synthesizer.speak_text(&text).await? {
        SynthesisOutcome::Completed { audio } => {
            debug!("Synthesized {audio:?} of audio");
            terminal.report(&Report::Synthesized {
                sink: sink.clone(),
                text,
            })
        }
        SynthesisOutcome::Canceled(cancellation) => report_cancellation(terminal, &cancellation),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", true)]
    #[case("   ", true)]
    #[case(":q", true)]
    #[case(" :q ", false)]
    #[case(":q\t", false)]
    #[case(":quit", false)]
    #[case("hello", false)]
    fn input_termination(#[case] line: &str, #[case] ends: bool) {
        assert_eq!(ends_input(line), ends);
    }

    #[test]
    fn menu_labels() {
        let labels: Vec<String> = TextSource::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["Console", "File"]);
        let labels: Vec<String> = Destination::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["Audio", "File"]);
    }
}

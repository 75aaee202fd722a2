//! Everything the sessions tell the operator.

use std::path::PathBuf;

use anyhow::Result;
use derive_more::Display;

use crate::Terminal;
use speech_console_core::{AudioSink, Cancellation, CancellationReason, ErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// One line of session output.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Report {
    #[display("Environment does not support interaction.")]
    NotInteractive,
    #[display("Say something...")]
    Listening,
    #[display("We recognized: {text}")]
    Recognized { text: String },
    #[display("NOMATCH: Speech could not be recognized.")]
    NoMatch,
    #[display("CANCELED: Reason={_0}")]
    Canceled(CancellationReason),
    #[display("CANCELED: ErrorCode={_0}")]
    CancellationCode(ErrorCode),
    #[display("CANCELED: ErrorDetails=[{_0}]")]
    CancellationDetails(String),
    #[display("CANCELED: Did you update the subscription info?")]
    CredentialsHint,
    #[display("Type some text that you want to speak...")]
    AwaitingText,
    #[display("Speech synthesized to {} for text [{text}]", describe_sink(sink))]
    Synthesized { sink: AudioSink, text: String },
    #[display("The file {} exists", _0.display())]
    OutputFileExists(PathBuf),
    #[display("The file {} doesn't exist", _0.display())]
    InputFileMissing(PathBuf),
}

impl Report {
    pub fn severity(&self) -> Severity {
        match self {
            Report::NotInteractive
            | Report::Canceled(_)
            | Report::CancellationCode(_)
            | Report::CancellationDetails(_)
            | Report::CredentialsHint
            | Report::OutputFileExists(_)
            | Report::InputFileMissing(_) => Severity::Error,
            Report::NoMatch => Severity::Warning,
            Report::Recognized { .. } | Report::Synthesized { .. } => Severity::Success,
            Report::Listening | Report::AwaitingText => Severity::Info,
        }
    }

    /// The reason, and for errors the code, the details and a hint about the credentials.
    pub fn for_cancellation(cancellation: &Cancellation) -> Vec<Report> {
        let mut reports = vec![Report::Canceled(cancellation.reason())];
        if let Some(error) = cancellation.error_details() {
            reports.extend([
                Report::CancellationCode(error.code),
                Report::CancellationDetails(error.details.clone()),
                Report::CredentialsHint,
            ]);
        }
        reports
    }
}

pub fn report_cancellation(terminal: &mut dyn Terminal, cancellation: &Cancellation) -> Result<()> {
    for report in Report::for_cancellation(cancellation) {
        terminal.report(&report)?;
    }
    Ok(())
}

fn describe_sink(sink: &AudioSink) -> String {
    match sink {
        AudioSink::Speaker => "speaker".into(),
        AudioSink::WavFile(path) => format!("file {}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_cancellation_expands_to_four_lines() {
        let cancellation = Cancellation::error(ErrorCode::ConnectionFailure, "no route to host");
        let lines: Vec<String> = Report::for_cancellation(&cancellation)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            lines,
            [
                "CANCELED: Reason=Error",
                "CANCELED: ErrorCode=ConnectionFailure",
                "CANCELED: ErrorDetails=[no route to host]",
                "CANCELED: Did you update the subscription info?",
            ]
        );
    }

    #[test]
    fn other_cancellations_only_report_the_reason() {
        assert_eq!(
            Report::for_cancellation(&Cancellation::end_of_stream()),
            [Report::Canceled(CancellationReason::EndOfStream)]
        );
    }

    #[test]
    fn synthesized_names_the_sink() {
        let speaker = Report::Synthesized {
            sink: AudioSink::Speaker,
            text: "hi".into(),
        };
        assert_eq!(speaker.to_string(), "Speech synthesized to speaker for text [hi]");

        let file = Report::Synthesized {
            sink: AudioSink::WavFile("out.wav".into()),
            text: "hi".into(),
        };
        assert_eq!(file.to_string(), "Speech synthesized to file out.wav for text [hi]");
    }

    #[test]
    fn severities() {
        assert_eq!(Report::NoMatch.severity(), Severity::Warning);
        assert_eq!(Report::CredentialsHint.severity(), Severity::Error);
        assert_eq!(Report::Listening.severity(), Severity::Info);
    }
}

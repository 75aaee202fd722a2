use std::time::Duration;

use derive_more::Display;

/// Result of one single-utterance recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionOutcome {
    Recognized { text: String },
    NoMatch,
    Canceled(Cancellation),
}

/// Result of one synthesis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisOutcome {
    /// `audio` is the total duration of the synthesized speech.
    Completed { audio: Duration },
    Canceled(Cancellation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum CancellationReason {
    Error,
    EndOfStream,
    CanceledByUser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorCode {
    ConnectionFailure,
    AuthenticationFailure,
    ServiceError,
    RuntimeError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationError {
    pub code: ErrorCode,
    pub details: String,
}

/// A canceled call. Carries an error exactly when the reason is [`CancellationReason::Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancellation {
    reason: CancellationReason,
    error: Option<CancellationError>,
}

impl Cancellation {
    pub fn error(code: ErrorCode, details: impl Into<String>) -> Self {
        Self {
            reason: CancellationReason::Error,
            error: Some(CancellationError {
                code,
                details: details.into(),
            }),
        }
    }

    pub fn end_of_stream() -> Self {
        Self {
            reason: CancellationReason::EndOfStream,
            error: None,
        }
    }

    pub fn canceled_by_user() -> Self {
        Self {
            reason: CancellationReason::CanceledByUser,
            error: None,
        }
    }

    pub fn reason(&self) -> CancellationReason {
        self.reason
    }

    pub fn error_details(&self) -> Option<&CancellationError> {
        self.error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_error_cancellations_carry_details() {
        let error = Cancellation::error(ErrorCode::AuthenticationFailure, "401");
        assert_eq!(error.reason(), CancellationReason::Error);
        assert_eq!(
            error.error_details(),
            Some(&CancellationError {
                code: ErrorCode::AuthenticationFailure,
                details: "401".into()
            })
        );

        assert!(Cancellation::end_of_stream().error_details().is_none());
        assert!(Cancellation::canceled_by_user().error_details().is_none());
    }

    #[test]
    fn reasons_and_codes_display_their_names() {
        assert_eq!(CancellationReason::EndOfStream.to_string(), "EndOfStream");
        assert_eq!(ErrorCode::ConnectionFailure.to_string(), "ConnectionFailure");
    }
}

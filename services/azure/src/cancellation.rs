//! Maps backend and device failures to cancellations.
use azure_speech::Error;

use speech_console_core::{Cancellation, ErrorCode};

/// The service could not be reached or refused the connection.
pub fn connection_failure(error: &Error) -> Cancellation {
    classify(error, ErrorCode::ConnectionFailure)
}

/// The service failed while processing a request.
pub fn service_failure(error: &Error) -> Cancellation {
    classify(error, ErrorCode::ServiceError)
}

/// A local audio device failed.
pub fn device_failure(error: &anyhow::Error) -> Cancellation {
    Cancellation::error(ErrorCode::RuntimeError, format!("{error:#}"))
}

fn classify(error: &Error, otherwise: ErrorCode) -> Cancellation {
    let code = if rejects_credentials(error) {
        ErrorCode::AuthenticationFailure
    } else {
        otherwise
    };
    Cancellation::error(code, error.to_string())
}

fn rejects_credentials(error: &Error) -> bool {
    match error {
        Error::Forbidden => true,
        // A refused websocket upgrade only carries the HTTP status in its message.
        Error::ConnectionError(details) => {
            const MARKERS: [&str; 4] = ["401", "403", "unauthorized", "forbidden"];
            let details = details.to_lowercase();
            MARKERS.iter().any(|marker| details.contains(marker))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use speech_console_core::CancellationReason;

    use super::*;

    #[rstest]
    #[case(Error::Forbidden, ErrorCode::AuthenticationFailure)]
    #[case(
        Error::ConnectionError("HTTP error: 401 Unauthorized".into()),
        ErrorCode::AuthenticationFailure
    )]
    #[case(
        Error::ConnectionError("failed to lookup address information".into()),
        ErrorCode::ConnectionFailure
    )]
    #[case(Error::InternalError("status 403".into()), ErrorCode::ConnectionFailure)]
    fn connection_errors_are_classified(#[case] error: Error, #[case] code: ErrorCode) {
        let cancellation = connection_failure(&error);
        assert_eq!(cancellation.reason(), CancellationReason::Error);
        let details = cancellation.error_details().unwrap();
        assert_eq!(details.code, code);
        assert_eq!(details.details, error.to_string());
    }

    #[rstest]
    #[case(Error::ServerDisconnect("closed".into()), ErrorCode::ServiceError)]
    #[case(Error::TooManyRequests, ErrorCode::ServiceError)]
    #[case(Error::Forbidden, ErrorCode::AuthenticationFailure)]
    fn service_errors_are_classified(#[case] error: Error, #[case] code: ErrorCode) {
        assert_eq!(service_failure(&error).error_details().unwrap().code, code);
    }

    #[test]
    fn forbidden_keeps_the_service_message() {
        let cancellation = connection_failure(&Error::Forbidden);
        assert_eq!(
            cancellation.error_details().unwrap().details,
            "Invalid credentials"
        );
    }

    #[test]
    fn device_failures_keep_the_context_chain() {
        let error = anyhow::anyhow!("no device").context("Opening microphone");
        let cancellation = device_failure(&error);
        let details = cancellation.error_details().unwrap();
        assert_eq!(details.code, ErrorCode::RuntimeError);
        assert_eq!(details.details, "Opening microphone: no device");
    }
}

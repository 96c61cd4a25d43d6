//! Miette integration for pretty error reporting.

use miette::{Diagnostic, Severity};
use thiserror::Error;

use super::{Sink, TeeError};

/// A diagnostic wrapper for tee errors compatible with miette.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct TeeDiagnostic {
    /// The error message
    pub message: String,

    #[source]
    /// The underlying error source
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,

    #[help]
    /// Help text for the user
    pub help: Option<String>,

    #[diagnostic(severity)]
    /// Severity level
    pub severity: Severity,
}

impl From<TeeError> for TeeDiagnostic {
    fn from(e: TeeError) -> Self {
        match e {
            TeeError::Sink(e) => {
                let help = match e.sink {
                    Sink::LogFile => "Check that the log file is still open and writable",
                    Sink::Display => "Check that the display outlives the redirection",
                };
                TeeDiagnostic {
                    message: format!("[{}] on '{}'", e.sink, e.target),
                    source: Some(Box::new(e.error)),
                    help: Some(help.into()),
                    severity: Severity::Error,
                }
            }
            TeeError::Reentrant { target } => TeeDiagnostic {
                message: format!("re-entrant write into '{target}'"),
                source: None,
                help: Some("Do not write to a redirected stream from inside the event pump".into()),
                severity: Severity::Warning,
            },
            TeeError::Closed { target } => TeeDiagnostic {
                message: format!("write into '{target}' after teardown"),
                source: None,
                help: Some("Drop tee handles before finishing the redirect".into()),
                severity: Severity::Error,
            },
        }
    }
}

impl From<TeeError> for miette::Report {
    fn from(e: TeeError) -> Self {
        miette::Report::new(TeeDiagnostic::from(e))
    }
}

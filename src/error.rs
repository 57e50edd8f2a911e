//! Pipeline error taxonomy.
//!
//! Every error is fatal: the run aborts at the failing step and none of
//! the artifacts written so far are considered valid. Rerunning from the
//! top is the only recovery path.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::engine::EngineError;

/// Pipeline stage, used to identify where a run aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Engine reset and circuit definition load.
    Load,
    /// Monitor creation for every load element.
    Instrument,
    /// Profile generation and injection.
    Synthesize,
    /// Run-mode configuration and solve.
    Simulate,
    /// Monitor readback and metadata extraction.
    Extract,
    /// Artifact writes.
    Persist,
}

impl Step {
    /// Short stage name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Step::Load => "load",
            Step::Instrument => "instrument",
            Step::Synthesize => "synthesize",
            Step::Simulate => "simulate",
            Step::Extract => "extract",
            Step::Persist => "persist",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fatal pipeline error.
#[derive(Debug)]
pub enum PipelineError {
    /// The engine rejected a directive or the connection failed.
    Engine {
        /// Stage that issued the directive.
        step: Step,
        /// Underlying dispatch error.
        source: EngineError,
    },
    /// A textual query response could not be parsed.
    Parse {
        /// Load whose query response was malformed.
        load_name: String,
        /// Raw response text.
        response: String,
        /// Constraint that was violated.
        message: String,
    },
    /// Profile or measurement shapes disagree with the expected element
    /// or timestep counts.
    Shape {
        /// Stage that detected the mismatch.
        step: Step,
        /// Description of the mismatch.
        message: String,
    },
    /// An output artifact could not be written.
    Persist {
        /// Artifact path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Engine { step, source } => {
                write!(f, "{step}: {source}")
            }
            PipelineError::Parse {
                load_name,
                response,
                message,
            } => write!(
                f,
                "extract: bad bus specifier \"{response}\" for load \"{load_name}\": {message}"
            ),
            PipelineError::Shape { step, message } => {
                write!(f, "{step}: shape mismatch: {message}")
            }
            PipelineError::Persist { path, source } => {
                write!(f, "persist: cannot write \"{}\": {source}", path.display())
            }
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Engine { source, .. } => Some(source),
            PipelineError::Persist { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_names_the_step() {
        let err = PipelineError::Engine {
            step: Step::Simulate,
            source: EngineError {
                directive: "solve".to_string(),
                message: "connection closed".to_string(),
            },
        };
        let text = err.to_string();
        assert!(text.starts_with("simulate:"), "got {text}");
        assert!(text.contains("solve"));
    }

    #[test]
    fn parse_error_names_load_and_response() {
        let err = PipelineError::Parse {
            load_name: "load_42".to_string(),
            response: "busonly".to_string(),
            message: "expected at least 2 dot-separated fields".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("load_42"));
        assert!(text.contains("busonly"));
    }

    #[test]
    fn persist_error_names_the_path() {
        let err = PipelineError::Persist {
            path: PathBuf::from("data/load_profile.csv"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("data/load_profile.csv"));
    }
}

use std::path::PathBuf;

/// Coarse classification of [`Error`] used by callers deciding how to report
/// a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Request,
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialise CSV")]
    Csv(#[from] csv::Error),

    #[error("failed to encode list column")]
    Encode(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) | Error::Cli(_) => ErrorKind::Configuration,
            Error::Request { .. } | Error::Status { .. } => ErrorKind::Request,
            Error::Io { .. } | Error::Csv(_) | Error::Encode(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn request(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Request {
            url: url.into(),
            source: source.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_failure_class() {
        assert_eq!(
            Error::Configuration("missing owner".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            Error::Status {
                url: "https://api.github.com/repos/o/r/pulls".into(),
                status: 404,
            }
            .kind(),
            ErrorKind::Request
        );
        assert_eq!(
            Error::request("https://api.github.com", "connection reset").kind(),
            ErrorKind::Request
        );
        let io = Error::Io {
            path: PathBuf::from("out.csv"),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(io.kind(), ErrorKind::Io);
        assert_eq!(io.to_string(), "failed to write out.csv");
    }

    #[test]
    fn status_message_names_endpoint() {
        let err = Error::Status {
            url: "https://api.github.com/repos/o/r/pulls".into(),
            status: 500,
        };
        assert_eq!(
            err.to_string(),
            "HTTP 500 from https://api.github.com/repos/o/r/pulls"
        );
    }
}

use std::path::PathBuf;
use thiserror::Error;

/// Every way a remote similarity search can fail. None of them are retried.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("HTTP request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("BLAST submission was not accepted: {message}")]
    Submission { message: String },

    #[error("BLAST job {rid} failed on the server")]
    JobFailed { rid: String },

    #[error("BLAST job {rid} is unknown to the server (expired?)")]
    JobUnknown { rid: String },

    #[error("BLAST job {rid} reported unexpected status '{status}'")]
    UnexpectedStatus { rid: String, status: String },

    #[error("malformed BLAST report: {message}")]
    MalformedReport { message: String },

    #[error("BLAST report has no hits")]
    NoHits,

    #[error("top hit '{hit_def}' has no high-scoring pair")]
    NoHsp { hit_def: String },

    #[error("top hit '{hit_def}' has a zero alignment length")]
    EmptyAlignment { hit_def: String },

    #[error("cannot access result file {path}: {source}")]
    ResultFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SearchError {
    pub fn submission<S: Into<String>>(message: S) -> Self {
        Self::Submission { message: message.into() }
    }

    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedReport { message: message.into() }
    }
}

pub type SearchResult<T> = Result<T, SearchError>;

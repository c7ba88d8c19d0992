//! Client for the NCBI BLAST URL API (`Blast.cgi`): submit with `CMD=Put`,
//! poll with `CMD=Get` until the XML report is ready.

use reqwest::blocking::Client;
use std::thread;
use std::time::Duration;

use super::error::{SearchError, SearchResult};
use crate::config::BlastSettings;

/// Job handle returned by `CMD=Put`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub rid: String,
    /// Estimated seconds until the report is ready
    pub rtoe: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    Waiting,
    Failed,
    Unknown,
    /// `Status=READY`: one more `CMD=Get` returns the report
    Finished,
    /// Any status marker the API does not document
    Other(String),
    /// No `Status=` marker: the body is the report itself
    Ready(String),
}

pub struct QBlastClient {
    client: Client,
    settings: BlastSettings,
}

impl QBlastClient {
    pub fn new(settings: BlastSettings) -> SearchResult<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(None)
            .build()
            .map_err(|source| SearchError::Http { endpoint: settings.endpoint.clone(), source })?;
        Ok(Self { client, settings })
    }

    /// Run one query to completion and return the raw XML report.
    pub fn run(&self, query: &str) -> SearchResult<String> {
        let job = self.submit(query)?;
        log::debug!("submitted RID={} RTOE={}s", job.rid, job.rtoe);
        thread::sleep(Duration::from_secs(job.rtoe));

        let interval = Duration::from_secs(self.settings.poll_interval_secs);
        loop {
            match self.poll(&job.rid)? {
                PollStatus::Ready(report) => return Ok(report),
                PollStatus::Waiting => {
                    log::debug!("RID={} still waiting", job.rid);
                    thread::sleep(interval);
                }
                PollStatus::Finished => return self.fetch(&job.rid),
                PollStatus::Failed => return Err(SearchError::JobFailed { rid: job.rid }),
                PollStatus::Unknown => return Err(SearchError::JobUnknown { rid: job.rid }),
                PollStatus::Other(status) => {
                    return Err(SearchError::UnexpectedStatus { rid: job.rid, status })
                }
            }
        }
    }

    /// Retrieve the report of a job already reported READY.
    fn fetch(&self, rid: &str) -> SearchResult<String> {
        match self.poll(rid)? {
            PollStatus::Ready(report) => Ok(report),
            other => Err(SearchError::malformed(format!(
                "job {} is READY but the report was not returned ({:?})",
                rid, other
            ))),
        }
    }

    pub fn submit(&self, query: &str) -> SearchResult<Submission> {
        let hitlist = self.settings.hitlist_size.to_string();
        let params = [
            ("CMD", "Put"),
            ("PROGRAM", self.settings.program.as_str()),
            ("DATABASE", self.settings.database.as_str()),
            ("QUERY", query),
            ("HITLIST_SIZE", hitlist.as_str()),
        ];
        let body = self.post(&params)?;
        parse_put_response(&body)
    }

    pub fn poll(&self, rid: &str) -> SearchResult<PollStatus> {
        let params = [("CMD", "Get"), ("RID", rid), ("FORMAT_TYPE", "XML")];
        let body = self.post(&params)?;
        Ok(parse_poll_response(body))
    }

    fn post(&self, params: &[(&str, &str)]) -> SearchResult<String> {
        let endpoint = &self.settings.endpoint;
        let http = |source: reqwest::Error| SearchError::Http { endpoint: endpoint.clone(), source };
        self.client
            .post(endpoint)
            .form(params)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(http)?
            .text()
            .map_err(http)
    }
}

/// Value of `KEY = value` inside the `QBlastInfoBegin`/`QBlastInfoEnd` block.
fn qblast_info<'a>(body: &'a str, key: &str) -> Option<&'a str> {
    let start = body.find("QBlastInfoBegin")?;
    let block = &body[start..];
    let block = &block[..block.find("QBlastInfoEnd").unwrap_or(block.len())];
    block.lines().find_map(|line| {
        let (k, v) = line.split_once('=')?;
        (k.trim() == key).then(|| v.trim())
    })
}

pub fn parse_put_response(body: &str) -> SearchResult<Submission> {
    let rid = match qblast_info(body, "RID") {
        Some(rid) if !rid.is_empty() => rid.to_string(),
        _ => return Err(SearchError::submission(error_message(body))),
    };
    let rtoe = qblast_info(body, "RTOE")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    Ok(Submission { rid, rtoe })
}

pub fn parse_poll_response(body: String) -> PollStatus {
    let status = body
        .find("Status=")
        .map(|i| body[i + "Status=".len()..].lines().next().unwrap_or("").trim().to_string());
    match status.as_deref() {
        None => PollStatus::Ready(body),
        Some("WAITING") => PollStatus::Waiting,
        Some("FAILED") => PollStatus::Failed,
        Some("UNKNOWN") => PollStatus::Unknown,
        Some("READY") => PollStatus::Finished,
        Some(other) => PollStatus::Other(other.to_string()),
    }
}

/// Best-effort extraction of the error text from a `CMD=Put` HTML page.
fn error_message(body: &str) -> String {
    for marker in ["<div class=\"error msInf\">", "<p class=\"error\">"] {
        if let Some(i) = body.find(marker) {
            let rest = &body[i + marker.len()..];
            let end = rest.find('<').unwrap_or(rest.len());
            let msg = rest[..end].trim();
            if !msg.is_empty() {
                return msg.to_string();
            }
        }
    }
    "no RID in response".to_string()
}

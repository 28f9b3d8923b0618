use std::time::Duration;

use thiserror::Error;

/// Failure kinds for one extraction batch.
///
/// Every variant here is fatal to the batch. Per-question DOM misses never
/// surface as errors; they degrade the affected record's fields instead.
#[derive(Debug, Error)]
pub enum ScrapeError {
	/// Login confirmation marker never appeared within the bounded wait
	#[error("authentication failed: {0}")]
	Authentication(String),

	/// A requested dropdown label has no matching option
	#[error("dropdown {dropdown} has no option labeled {label:?}")]
	FilterNotFound { dropdown: String, label: String },

	/// No row on any result page matched the requested chapter
	#[error("chapter {0:?} not found on any result page")]
	ChapterNotFound(String),

	/// The solutions page does not carry the expected reveal-call pattern
	#[error("could not detect test id: no show_sol(<id>, 1) call on solutions page")]
	TestIdNotFound,

	/// A bounded DOM wait expired
	#[error("timed out after {after:?} waiting for {what}")]
	Timeout { what: String, after: Duration },

	/// Transport or script-evaluation failure in the underlying engine
	#[error("browser: {0}")]
	Browser(String),
}

impl From<chromiumoxide::error::CdpError> for ScrapeError {
	fn from(e: chromiumoxide::error::CdpError) -> Self {
		Self::Browser(e.to_string())
	}
}

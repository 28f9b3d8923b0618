use std::fmt;

use serde::{Deserialize, Serialize};

pub mod config;
pub mod driver;
pub mod error;
pub mod login;
pub mod scrape;
pub mod session;
pub mod text;

/// One extracted question, normalized to the flat output schema.
///
/// Records are immutable once produced; a batch is the ordered sequence of
/// records for one test, serialized with camelCase field names.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
	/// Fresh UUID per record, unique within and across runs
	pub question_id: String,
	/// 1-based position of the question within its source test
	pub original_question_number: String,
	/// Cleaned prompt text
	pub question: String,
	/// Cleaned answer choices, in on-page letter order (a..e)
	pub options: Vec<String>,
	/// Text of the option the page marks as correct (bold), if any
	pub correct_answer: Option<String>,
	/// Absolute URL of the explanation image, if any
	pub explanation: Option<String>,
	/// Caller-supplied difficulty tag, copied verbatim
	pub level: u32,
	/// Caller-supplied question-type tag, copied verbatim
	pub question_type: u32,
}

impl fmt::Display for QuestionRecord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Q{}. {}", self.original_question_number, self.question)?;
		for (i, option) in self.options.iter().enumerate() {
			let letter = (b'a' + i as u8) as char;
			let marker = if self.correct_answer.as_deref() == Some(option.as_str()) { "*" } else { " " };
			writeln!(f, " {}{}) {}", marker, letter, option)?;
		}
		if let Some(url) = &self.explanation {
			writeln!(f, "  [explanation: {}]", url)?;
		}
		Ok(())
	}
}

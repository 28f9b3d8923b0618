//! Filter resolution, paginated row search, and per-question extraction.

use std::{sync::LazyLock, time::Duration};

use regex::Regex;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use crate::{
	QuestionRecord,
	driver::{Driver, wait_until},
	error::ScrapeError,
	text::clean_text,
};

/// Sectional-test listing page.
pub const LISTING_URL: &str = "https://www.time4education.com/local/timecms/cat_sectionaltest.php";

/// Wait bound for dropdown population and table renders.
const DOM_WAIT: Duration = Duration::from_secs(7);

const DIFFICULTY_SELECT: &str = "#ltestCat";
const AREA_SELECT: &str = "#areatype";
const ROW: &str = "div.cat-tbl tbody tr";
const NEXT_BUTTON: &str = "#nxtbtn";
const NAV_MARKER: &str = "li.varc-yellow a";

/// The solutions page calls `show_sol(<id>, 1)` from inline script; that id
/// keys every reveal call.
static SHOW_SOL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"show_sol\((\d+),\s*1\)").expect("literal pattern"));

/// Selection parameters for one extraction batch.
#[derive(Clone, Debug)]
pub struct ScrapeRequest {
	/// Difficulty category, by its visible dropdown label
	pub difficulty: String,
	/// Subject area, by its visible dropdown label
	pub area: String,
	/// Chapter name, matched case-insensitively against the listing table
	pub chapter: String,
	/// Tag copied verbatim onto every record
	pub level: u32,
	/// Tag copied verbatim onto every record
	pub question_type: u32,
}

/// Extract every question of the test matching `req`, in question order.
///
/// The driver must already be authenticated. Structural failures abort the
/// whole batch; per-question DOM misses only degrade that record's fields.
pub async fn scrape_chapter<D: Driver + ?Sized>(driver: &D, req: &ScrapeRequest) -> Result<Vec<QuestionRecord>, ScrapeError> {
	let solution_url = find_solution_url(driver, req).await?;
	info!(%solution_url, "solutions page located");

	driver.navigate(&solution_url).await?;
	tokio::time::sleep(Duration::from_secs(1)).await;

	let test_id = find_test_id(driver).await?;
	let total = driver.count(NAV_MARKER).await?;
	info!(test_id, total, "enumerated questions");

	let mut records = Vec::with_capacity(total);
	for qnum in 1..=total {
		let parsed = parse_question(driver, test_id, qnum).await?;
		records.push(QuestionRecord {
			question_id: Uuid::new_v4().to_string(),
			original_question_number: qnum.to_string(),
			question: parsed.question,
			options: parsed.options,
			correct_answer: parsed.correct_answer,
			explanation: parsed.explanation,
			level: req.level,
			question_type: req.question_type,
		});
	}

	Ok(records)
}

/// Resolve both filter dropdowns, then walk the paginated result table until a
/// row's chapter column matches (trimmed, case-insensitive). First match wins.
async fn find_solution_url<D: Driver + ?Sized>(driver: &D, req: &ScrapeRequest) -> Result<String, ScrapeError> {
	driver.navigate(LISTING_URL).await?;

	wait_until("difficulty dropdown", DOM_WAIT, move || async move { Ok(driver.count(DIFFICULTY_SELECT).await? > 0) }).await?;
	if !driver.select_by_label(DIFFICULTY_SELECT, &req.difficulty).await? {
		return Err(ScrapeError::FilterNotFound {
			dropdown: DIFFICULTY_SELECT.to_string(),
			label: req.difficulty.clone(),
		});
	}

	// The area dropdown repopulates in response to the difficulty choice; it
	// only counts as loaded once it holds more than the placeholder option.
	wait_until("area dropdown population", DOM_WAIT, move || async move { Ok(driver.count("#areatype option").await? > 1) }).await?;
	if !driver.select_by_label(AREA_SELECT, &req.area).await? {
		return Err(ScrapeError::FilterNotFound {
			dropdown: AREA_SELECT.to_string(),
			label: req.area.clone(),
		});
	}

	let target = req.chapter.trim().to_lowercase();
	loop {
		wait_until("result rows", DOM_WAIT, move || async move { Ok(driver.count(ROW).await? > 0) }).await?;

		let rows = driver.count(ROW).await?;
		for i in 1..=rows {
			let name_selector = format!("{ROW}:nth-child({i}) td:nth-child(2)");
			let Some(name) = driver.read_text(&name_selector).await? else { continue };
			if name.trim().to_lowercase() == target {
				let link_selector = format!("{ROW}:nth-child({i}) td:nth-child(4) a#solutionlink");
				if let Some(href) = driver.read_attribute(&link_selector, "href").await? {
					return Ok(href);
				}
			}
		}

		// Exhausted this page; advance if the pager allows it.
		if driver.is_visible(NEXT_BUTTON).await? {
			driver.click(NEXT_BUTTON).await?;
			tokio::time::sleep(Duration::from_secs(1)).await;
		} else {
			return Err(ScrapeError::ChapterNotFound(req.chapter.clone()));
		}
	}
}

async fn find_test_id<D: Driver + ?Sized>(driver: &D) -> Result<u64, ScrapeError> {
	let source = driver.page_source().await?;
	let caps = SHOW_SOL_RE.captures(&source).ok_or(ScrapeError::TestIdNotFound)?;
	caps[1].parse::<u64>().map_err(|_| ScrapeError::TestIdNotFound)
}

struct ParsedQuestion {
	question: String,
	options: Vec<String>,
	correct_answer: Option<String>,
	explanation: Option<String>,
}

/// Reveal one question via the page's own `show_sol` hook and read its parts.
/// Any missing DOM piece leaves the matching field empty.
async fn parse_question<D: Driver + ?Sized>(driver: &D, test_id: u64, qnum: usize) -> Result<ParsedQuestion, ScrapeError> {
	driver.evaluate(&format!("show_sol({test_id},{qnum});")).await?;
	// The reveal rewrites the DOM in place with nothing observable to await
	tokio::time::sleep(Duration::from_millis(200)).await;

	let question = clean_text(&driver.read_text("#qst").await?.unwrap_or_default());

	// Lettered options a..e; the list ends at the first absent or hidden slot
	let mut options = Vec::new();
	for i in 1..=5 {
		let selector = format!("#ccch{i}");
		let Some(text) = driver.read_text(&selector).await? else { break };
		if driver.css_value(&selector, "display").await?.as_deref() == Some("none") {
			break;
		}
		options.push(clean_text(&text));
	}

	let mut correct_letter = None;
	if driver.click("input.show-ans").await? {
		tokio::time::sleep(Duration::from_millis(100)).await;
		for idx in 1..=5usize {
			let Some(weight) = driver.css_value(&format!("#ch{idx}"), "font-weight").await? else { continue };
			if weight.contains("700") || weight.contains("bold") {
				correct_letter = Some(idx - 1);
				break;
			}
		}
	} else {
		warn!(qnum, "answer reveal control missing");
	}

	// Map the bold letter onto the option list; a marking past the visible
	// options records no answer
	let correct_answer = correct_letter.and_then(|idx| options.get(idx).cloned());

	let explanation = read_explanation_url(driver).await?;

	Ok(ParsedQuestion { question, options, correct_answer, explanation })
}

/// Expand the collapsible solution panel when present and resolve its image
/// URL against the current page location.
async fn read_explanation_url<D: Driver + ?Sized>(driver: &D) -> Result<Option<String>, ScrapeError> {
	const TOGGLE: &str = "a[data-toggle='collapse']";

	if driver.read_attribute(TOGGLE, "aria-expanded").await?.as_deref() == Some("false") {
		driver.click(TOGGLE).await?;
		tokio::time::sleep(Duration::from_millis(100)).await;
	}

	let Some(src) = driver.read_attribute("div.panel-body img", "src").await? else {
		return Ok(None);
	};

	let current = driver.current_url().await?;
	let absolute = match Url::parse(&current).and_then(|base| base.join(&src)) {
		Ok(url) => url.to_string(),
		Err(_) => src,
	};
	Ok(Some(absolute))
}

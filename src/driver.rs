//! Browser capability interface the extraction flow is written against, plus
//! the chromiumoxide-backed production implementation.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use chromiumoxide::Page;
use serde_json::Value;

use crate::error::ScrapeError;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Minimal surface the scraping flow needs from a browser engine.
///
/// Selector-addressed reads return `None` when nothing matches and `click`
/// reports whether anything was clicked; only structural operations
/// (navigation, script evaluation, transport) can error. This keeps
/// "feature absent" distinct from "browser broke" at the type level.
#[async_trait]
pub trait Driver: Send + Sync {
	async fn navigate(&self, url: &str) -> Result<(), ScrapeError>;

	async fn current_url(&self) -> Result<String, ScrapeError>;

	/// Full HTML of the current document.
	async fn page_source(&self) -> Result<String, ScrapeError>;

	/// Evaluate a script in page context and return its JSON value.
	async fn evaluate(&self, script: &str) -> Result<Value, ScrapeError>;

	/// Number of elements matching `selector`.
	async fn count(&self, selector: &str) -> Result<usize, ScrapeError>;

	/// Whether the first match exists and takes part in layout.
	async fn is_visible(&self, selector: &str) -> Result<bool, ScrapeError>;

	/// Script-click the first match. `Ok(false)` when nothing matches.
	async fn click(&self, selector: &str) -> Result<bool, ScrapeError>;

	/// Rendered text of the first match.
	async fn read_text(&self, selector: &str) -> Result<Option<String>, ScrapeError>;

	/// Attribute of the first match. DOM properties win over raw attributes,
	/// so `href`/`src` come back already resolved.
	async fn read_attribute(&self, selector: &str, name: &str) -> Result<Option<String>, ScrapeError>;

	/// Computed CSS property of the first match.
	async fn css_value(&self, selector: &str, property: &str) -> Result<Option<String>, ScrapeError>;

	/// Set an input's value, firing input/change events.
	async fn type_text(&self, selector: &str, value: &str) -> Result<bool, ScrapeError>;

	/// Select a dropdown option by its visible label (trimmed exact match).
	async fn select_by_label(&self, selector: &str, label: &str) -> Result<bool, ScrapeError>;
}

/// Await `predicate` turning true, polling every 250ms, bounded by `timeout`.
///
/// The single wait primitive for every DOM-dependent step; `what` names the
/// awaited condition in the timeout error.
pub async fn wait_until<F, Fut>(what: &str, timeout: Duration, mut predicate: F) -> Result<(), ScrapeError>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<bool, ScrapeError>>,
{
	let deadline = tokio::time::Instant::now() + timeout;
	loop {
		if predicate().await? {
			return Ok(());
		}
		if tokio::time::Instant::now() >= deadline {
			return Err(ScrapeError::Timeout { what: what.to_string(), after: timeout });
		}
		tokio::time::sleep(POLL_INTERVAL).await;
	}
}

/// Production [`Driver`] over a chromiumoxide page (CDP).
///
/// Every operation is a small script evaluated in page context; results come
/// back as JSON values.
pub struct CdpDriver {
	page: Page,
}

impl CdpDriver {
	pub fn new(page: Page) -> Self {
		Self { page }
	}

	pub fn page(&self) -> &Page {
		&self.page
	}

	async fn eval(&self, script: String) -> Result<Value, ScrapeError> {
		let result = self.page.evaluate(script).await?;
		Ok(result.value().cloned().unwrap_or(Value::Null))
	}
}

/// Quote a string as a JavaScript literal.
fn js_str(s: &str) -> String {
	Value::String(s.to_owned()).to_string()
}

#[async_trait]
impl Driver for CdpDriver {
	async fn navigate(&self, url: &str) -> Result<(), ScrapeError> {
		self.page.goto(url).await?;
		Ok(())
	}

	async fn current_url(&self) -> Result<String, ScrapeError> {
		Ok(self.page.url().await?.unwrap_or_default())
	}

	async fn page_source(&self) -> Result<String, ScrapeError> {
		let value = self.eval("document.documentElement.outerHTML".to_string()).await?;
		Ok(value.as_str().unwrap_or_default().to_string())
	}

	async fn evaluate(&self, script: &str) -> Result<Value, ScrapeError> {
		self.eval(script.to_string()).await
	}

	async fn count(&self, selector: &str) -> Result<usize, ScrapeError> {
		let script = format!("document.querySelectorAll({}).length", js_str(selector));
		Ok(self.eval(script).await?.as_u64().unwrap_or(0) as usize)
	}

	async fn is_visible(&self, selector: &str) -> Result<bool, ScrapeError> {
		let script = format!(
			r#"
			(function() {{
				const el = document.querySelector({});
				return el !== null && el.offsetParent !== null;
			}})()
			"#,
			js_str(selector)
		);
		Ok(self.eval(script).await?.as_bool().unwrap_or(false))
	}

	async fn click(&self, selector: &str) -> Result<bool, ScrapeError> {
		let script = format!(
			r#"
			(function() {{
				const el = document.querySelector({});
				if (el) {{ el.click(); return true; }}
				return false;
			}})()
			"#,
			js_str(selector)
		);
		Ok(self.eval(script).await?.as_bool().unwrap_or(false))
	}

	async fn read_text(&self, selector: &str) -> Result<Option<String>, ScrapeError> {
		let script = format!(
			r#"
			(function() {{
				const el = document.querySelector({});
				return el ? el.innerText : null;
			}})()
			"#,
			js_str(selector)
		);
		Ok(self.eval(script).await?.as_str().map(|s| s.to_string()))
	}

	async fn read_attribute(&self, selector: &str, name: &str) -> Result<Option<String>, ScrapeError> {
		let script = format!(
			r#"
			(function() {{
				const el = document.querySelector({});
				if (!el) return null;
				const name = {};
				const prop = el[name];
				if (typeof prop === 'string') return prop;
				return el.getAttribute(name);
			}})()
			"#,
			js_str(selector),
			js_str(name)
		);
		Ok(self.eval(script).await?.as_str().map(|s| s.to_string()))
	}

	async fn css_value(&self, selector: &str, property: &str) -> Result<Option<String>, ScrapeError> {
		let script = format!(
			r#"
			(function() {{
				const el = document.querySelector({});
				return el ? getComputedStyle(el).getPropertyValue({}) : null;
			}})()
			"#,
			js_str(selector),
			js_str(property)
		);
		Ok(self.eval(script).await?.as_str().map(|s| s.to_string()))
	}

	async fn type_text(&self, selector: &str, value: &str) -> Result<bool, ScrapeError> {
		let script = format!(
			r#"
			(function() {{
				const el = document.querySelector({});
				if (!el) return false;
				el.value = {};
				el.dispatchEvent(new Event('input', {{ bubbles: true }}));
				el.dispatchEvent(new Event('change', {{ bubbles: true }}));
				return true;
			}})()
			"#,
			js_str(selector),
			js_str(value)
		);
		Ok(self.eval(script).await?.as_bool().unwrap_or(false))
	}

	async fn select_by_label(&self, selector: &str, label: &str) -> Result<bool, ScrapeError> {
		let script = format!(
			r#"
			(function() {{
				const select = document.querySelector({});
				if (!select) return false;
				const label = {};
				for (const opt of select.options) {{
					if (opt.textContent.trim() === label) {{
						select.value = opt.value;
						select.dispatchEvent(new Event('change', {{ bubbles: true }}));
						return true;
					}}
				}}
				return false;
			}})()
			"#,
			js_str(selector),
			js_str(label)
		);
		Ok(self.eval(script).await?.as_bool().unwrap_or(false))
	}
}

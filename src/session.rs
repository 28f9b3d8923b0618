//! Scoped browser session: one batch per launch, release guaranteed.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use color_eyre::{Result, eyre::eyre};
use futures::StreamExt;
use tracing::warn;

use crate::{
	QuestionRecord,
	config::AppConfig,
	driver::CdpDriver,
	login,
	scrape::{self, ScrapeRequest},
};

/// Browser configuration for unattended scraping: small fixed window, images
/// off, bounded request timeout.
fn browser_config(visible: bool) -> Result<BrowserConfig> {
	let mut builder = BrowserConfig::builder()
		.window_size(1280, 800)
		.request_timeout(Duration::from_secs(30))
		.arg("--no-sandbox")
		.arg("--disable-gpu")
		.arg("--disable-dev-shm-usage")
		.arg("--blink-settings=imagesEnabled=false");
	if visible {
		builder = builder.with_head();
	}
	builder.build().map_err(|e| eyre!("Failed to build browser config: {}", e))
}

/// Run one extraction batch in a fresh browser session.
///
/// The session is exclusively owned by this call: acquired at batch start,
/// used sequentially, and closed on every exit path, success or failure.
pub async fn run_batch(config: &AppConfig, req: &ScrapeRequest) -> Result<Vec<QuestionRecord>> {
	let (mut browser, mut handler) = Browser::launch(browser_config(config.visible)?).await.map_err(|e| eyre!("Failed to launch browser: {}", e))?;

	// Drain browser events so the connection never stalls
	let events = tokio::spawn(async move {
		while let Some(_event) = handler.next().await {}
	});

	let result = async {
		let page = browser.new_page("about:blank").await.map_err(|e| eyre!("Failed to create page: {}", e))?;
		let driver = CdpDriver::new(page);

		login::login(&driver, config).await?;
		let records = scrape::scrape_chapter(&driver, req).await?;
		Ok::<_, color_eyre::Report>(records)
	}
	.await;

	if let Err(e) = browser.close().await {
		warn!("browser close failed: {e}");
	}
	events.abort();

	result
}

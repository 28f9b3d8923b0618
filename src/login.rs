//! Portal login flow.

use std::time::Duration;

use tracing::info;

use crate::{
	config::AppConfig,
	driver::{Driver, wait_until},
	error::ScrapeError,
};

/// Portal entry point.
pub const BASE_URL: &str = "https://www.time4education.com";

/// URL fragment that only appears once the authenticated course home loads.
const LOGIN_MARKER: &str = "course=MOCK25";

const MODAL_OPENER: &str = "a[data-bs-toggle='modal']";
const LOGIN_FORM: &str = "#login";

/// Open the login modal, submit stored credentials, and wait for the
/// post-login URL marker.
pub async fn login<D: Driver + ?Sized>(driver: &D, config: &AppConfig) -> Result<(), ScrapeError> {
	driver.navigate(BASE_URL).await?;

	wait_until("login modal opener", Duration::from_secs(10), move || async move { driver.is_visible(MODAL_OPENER).await }).await?;
	driver.click(MODAL_OPENER).await?;

	wait_until("login form visibility", Duration::from_secs(10), move || async move { driver.is_visible(LOGIN_FORM).await }).await?;

	driver.type_text("input[name='username']", &config.username).await?;
	driver.type_text("input[name='password']", &config.password).await?;

	// Submission races the navigation it triggers; a lost click response here
	// is not a failed login, the URL wait below decides that.
	let _ = driver.click("input[type=submit]").await;

	info!("credentials submitted, waiting for course home");
	wait_until("post-login URL marker", Duration::from_secs(15), move || async move {
		Ok(driver.current_url().await?.contains(LOGIN_MARKER))
	})
	.await
	.map_err(|e| match e {
		ScrapeError::Timeout { .. } => ScrapeError::Authentication(format!("URL never matched {LOGIN_MARKER:?}")),
		other => other,
	})?;

	info!("login confirmed");
	Ok(())
}

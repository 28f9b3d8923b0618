use std::env;

/// Configuration injected into the extraction routine at call time.
///
/// Recognized options: `username`, `password`. There is no global state; the
/// caller constructs one of these and passes it down.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
	pub username: String,
	pub password: String,
	/// Run with visible browser window (non-headless mode)
	pub visible: bool,
}

impl AppConfig {
	/// Resolve credentials, preferring explicit values over the `T4E_USER` /
	/// `T4E_PASS` environment pair. `None` when either credential is missing.
	pub fn resolve(username: Option<String>, password: Option<String>, visible: bool) -> Option<Self> {
		let username = username.or_else(|| env::var("T4E_USER").ok())?;
		let password = password.or_else(|| env::var("T4E_PASS").ok())?;
		Some(Self { username, password, visible })
	}
}

//! Cleanup rules for scraped prompt and option text.

use std::sync::LazyLock;

use regex::Regex;

/// Ordered rewrite table. The fraction rule must run before brace deletion,
/// otherwise `\frac{3}{4}` loses its arguments to the brace rule.
static REPLACEMENTS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
	[
		(r"\\frac\{(\d+)\}\{(\d+)\}", "$1/$2"),
		(r"[\[\]{}]", ""),
		(r"□", " of "),
		(r"–", "-"),
		(r"×", "*"),
		(r"\s{2,}", " "),
	]
	.into_iter()
	.map(|(pattern, replacement)| (Regex::new(pattern).expect("literal pattern"), replacement))
	.collect()
});

/// Normalize scraped text: collapse LaTeX-style fractions, delete bracket and
/// brace characters, rewrite odd glyphs, squeeze whitespace runs, trim.
///
/// Idempotent: a second pass over already-cleaned text is a no-op.
pub fn clean_text(s: &str) -> String {
	let mut out = s.to_string();
	for (re, replacement) in REPLACEMENTS.iter() {
		out = re.replace_all(&out, *replacement).into_owned();
	}
	out.trim().to_string()
}

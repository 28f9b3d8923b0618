use std::path::PathBuf;

use clap::Parser;
use color_eyre::{Result, eyre::eyre};
use t4e_headless::{config::AppConfig, scrape::ScrapeRequest, session};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "t4e_headless")]
#[command(about = "Scrape T4E sectional-test solutions to JSON", long_about = None)]
struct Args {
	/// Difficulty category, by its visible dropdown label
	#[arg(long, default_value = "Foundation (Topic-based)")]
	difficulty: String,

	/// Subject area, by its visible dropdown label
	#[arg(long, default_value = "Quantitative Ability")]
	area: String,

	/// Chapter name to locate in the test listing (case-insensitive)
	#[arg(long)]
	chapter: String,

	/// Level tag copied onto every record
	#[arg(long, default_value_t = 2)]
	level: u32,

	/// Question-type tag copied onto every record
	#[arg(long, default_value_t = 1)]
	question_type: u32,

	/// Username for portal login (defaults to $T4E_USER)
	#[arg(short, long)]
	username: Option<String>,

	/// Password for portal login (defaults to $T4E_PASS)
	#[arg(short, long)]
	password: Option<String>,

	/// Run with visible browser window (non-headless mode)
	#[arg(long)]
	visible: bool,

	/// Output path for the JSON batch (defaults to <chapter>.json)
	#[arg(short, long)]
	out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let args = Args::parse();
	let config = AppConfig::resolve(args.username, args.password, args.visible)
		.ok_or_else(|| eyre!("Missing credentials: pass --username/--password or set T4E_USER/T4E_PASS"))?;

	let req = ScrapeRequest {
		difficulty: args.difficulty,
		area: args.area,
		chapter: args.chapter,
		level: args.level,
		question_type: args.question_type,
	};

	println!("Scraping chapter {:?} ({} / {})...", req.chapter, req.difficulty, req.area);
	let records = session::run_batch(&config, &req).await?;
	println!("✓ Scraped {} questions", records.len());

	// Bounded preview; the full batch goes to the output file
	let preview = &records[..records.len().min(3)];
	println!("{}", serde_json::to_string_pretty(preview)?);

	let out = args.out.unwrap_or_else(|| PathBuf::from(format!("{}.json", req.chapter.replace(' ', "_"))));
	std::fs::write(&out, serde_json::to_string_pretty(&records)?)?;
	println!("✓ Wrote {} records to {}", records.len(), out.display());

	Ok(())
}

use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use mastery_core::model::LevelId;
use services::{ContentService, ContentServiceConfig, HttpContentService};
use storage::{SessionStore, Storage};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLevel { raw: String },
    InvalidDbUrl { raw: String },
    InvalidContentUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLevel { raw } => write!(f, "invalid --level value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidContentUrl { raw } => {
                write!(f, "invalid --content-url value: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    content: Arc<dyn ContentService>,
    session: Arc<dyn SessionStore>,
    start_level: LevelId,
}

impl UiApp for DesktopApp {
    fn content_service(&self) -> Arc<dyn ContentService> {
        Arc::clone(&self.content)
    }

    fn session_store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.session)
    }

    fn start_level(&self) -> LevelId {
        self.start_level
    }
}

struct Args {
    db_url: String,
    content: Option<ContentServiceConfig>,
    start_level: LevelId,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [ui] [--db <sqlite_url>] [--content-url <url>] [--level <0-6>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite::memory:   (uploads last for one run, like a browser tab)");
    eprintln!("  --level 0");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MASTERY_DB_URL, MASTERY_CONTENT_URL, MASTERY_CONTENT_API_KEY, RUST_LOG");
}

fn parse_level(raw: String) -> Result<LevelId, ArgsError> {
    raw.parse::<u8>()
        .ok()
        .and_then(|value| LevelId::new(value).ok())
        .ok_or(ArgsError::InvalidLevel { raw })
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("MASTERY_DB_URL")
            .ok()
            .map_or_else(|| "sqlite::memory:".into(), normalize_sqlite_url);
        let mut content = ContentServiceConfig::from_env();
        let mut start_level = LevelId::OVERVIEW;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--content-url" => {
                    let value = require_value(args, "--content-url")?;
                    let api_key = std::env::var("MASTERY_CONTENT_API_KEY").ok();
                    let config = ContentServiceConfig::new(&value, api_key)
                        .map_err(|_| ArgsError::InvalidContentUrl { raw: value.clone() })?;
                    content = Some(config);
                }
                "--level" => {
                    start_level = parse_level(require_value(args, "--level")?)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            content,
            start_level,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    match argv.first().map(String::as_str) {
        None => {}
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some("ui") => {
            argv.remove(0);
        }
        Some(first) if first.starts_with("--") => {}
        Some(first) => {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            return Err(
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand").into(),
            );
        }
    }

    let parsed = Args::parse(&mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;

    let content = HttpContentService::new(parsed.content);
    if content.enabled() {
        tracing::info!("content service configured");
    } else {
        tracing::warn!("MASTERY_CONTENT_URL is not set; levels will fail to load");
    }

    let app = DesktopApp {
        content: Arc::new(content),
        session: Arc::clone(&storage.session),
        start_level: parsed.start_level,
    };
    tracing::info!(db = %parsed.db_url, start_level = %parsed.start_level, "launching desktop ui");

    let context = build_app_context(Arc::new(app));

    // Some dev setups default to an always-on-top window.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Mastery")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        tracing::error!(%err, "startup failed");
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|arg| (*arg).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn level_flag_accepts_range() {
        let args = parse(&["--level", "4", "--db", "sqlite::memory:"]).unwrap();
        assert_eq!(args.start_level.value(), 4);
        assert_eq!(args.db_url, "sqlite::memory:");
    }

    #[test]
    fn level_flag_rejects_out_of_range() {
        assert!(matches!(
            parse(&["--level", "7"]),
            Err(ArgsError::InvalidLevel { .. })
        ));
        assert!(matches!(
            parse(&["--level"]),
            Err(ArgsError::MissingValue { flag: "--level" })
        ));
    }

    #[test]
    fn content_url_must_be_absolute() {
        assert!(matches!(
            parse(&["--content-url", "not a url"]),
            Err(ArgsError::InvalidContentUrl { .. })
        ));
        let args = parse(&["--content-url", "http://localhost:8000/api"]).unwrap();
        assert_eq!(
            args.content.unwrap().base_url.as_str(),
            "http://localhost:8000/api/"
        );
    }

    #[test]
    fn relative_db_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/mastery.sqlite3".into());
        assert!(url.starts_with("sqlite:///"), "{url}");
        assert!(url.ends_with("data/mastery.sqlite3"), "{url}");
    }
}

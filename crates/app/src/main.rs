use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use exam_core::Countdown;
use exam_core::model::{ClientSession, ClientSessionDraft, ClientSettingsDraft, PaperId};
use services::{
    ApiConfig, AttemptLoopService, ClientSessionService, Clock, ExamApi, HttpExamApi,
};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDuration { raw: String },
    InvalidPaperId { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDuration { raw } => write!(f, "invalid --duration value: {raw}"),
            ArgsError::InvalidPaperId { raw } => write!(f, "invalid --paper-id value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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
    attempt_loop: Arc<AttemptLoopService>,
    session: ClientSession,
    paper_id: Option<PaperId>,
}

impl UiApp for DesktopApp {
    fn attempt_loop(&self) -> Arc<AttemptLoopService> {
        Arc::clone(&self.attempt_loop)
    }

    fn client_session(&self) -> ClientSession {
        self.session.clone()
    }

    fn default_paper_id(&self) -> Option<PaperId> {
        self.paper_id.clone()
    }
}

struct Args {
    db_url: String,
    api_url: Option<String>,
    token: Option<String>,
    email: Option<String>,
    plan: Option<String>,
    paper_id: Option<PaperId>,
    duration_secs: Option<u32>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--db <sqlite_url>] [--api-url <url>] [--paper-id <id>] \
         [--duration <secs>]"
    );
    eprintln!("                     [--token <jwt> [--email <addr>] [--plan <name>]]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://exam.sqlite3");
    eprintln!("  --api-url from saved settings, else http://localhost:8000/api");
    eprintln!("  --duration from saved settings, else 5399 (01:29:59)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EXAM_DB_URL, EXAM_API_URL, EXAM_API_TOKEN, EXAM_PAPER_ID, EXAM_DURATION_SECS");
    eprintln!("  RUST_LOG (log filter), EXAM_LOG_JSON (emit JSON log lines)");
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_duration(raw: String) -> Result<u32, ArgsError> {
    match raw.trim().parse::<u32>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ArgsError::InvalidDuration { raw }),
    }
}

fn parse_paper_id(raw: String) -> Result<PaperId, ArgsError> {
    PaperId::new(raw.clone()).map_err(|_| ArgsError::InvalidPaperId { raw })
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            db_url: env_value("EXAM_DB_URL")
                .map_or_else(|| "sqlite://exam.sqlite3".into(), normalize_sqlite_url),
            api_url: env_value("EXAM_API_URL"),
            token: env_value("EXAM_API_TOKEN"),
            email: None,
            plan: None,
            paper_id: env_value("EXAM_PAPER_ID").map(parse_paper_id).transpose()?,
            duration_secs: env_value("EXAM_DURATION_SECS")
                .map(parse_duration)
                .transpose()?,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                "--api-url" => parsed.api_url = Some(require_value(args, "--api-url")?),
                "--token" => parsed.token = Some(require_value(args, "--token")?),
                "--email" => parsed.email = Some(require_value(args, "--email")?),
                "--plan" => parsed.plan = Some(require_value(args, "--plan")?),
                "--paper-id" => {
                    parsed.paper_id = Some(parse_paper_id(require_value(args, "--paper-id")?)?);
                }
                "--duration" => {
                    parsed.duration_secs = Some(parse_duration(require_value(args, "--duration")?)?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
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

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    // Ignore the error when a subscriber is already installed.
    let _ = if env_value("EXAM_LOG_JSON").is_some() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;

    let clock = Clock::system();
    let client = ClientSessionService::new(
        clock,
        Arc::clone(&storage.sessions),
        Arc::clone(&storage.settings),
    );

    let stored = client.settings().await?;
    let settings = stored.with_overrides(ClientSettingsDraft {
        api_base_url: parsed.api_url,
        attempt_duration_secs: parsed.duration_secs,
    })?;
    if settings != stored {
        client
            .save_settings(ClientSettingsDraft {
                api_base_url: Some(settings.api_base_url().to_string()),
                attempt_duration_secs: Some(settings.attempt_duration_secs()),
            })
            .await?;
        tracing::info!(api_base_url = settings.api_base_url(), "Saved client settings");
    }

    let session = match parsed.token {
        Some(token) => {
            let draft = ClientSessionDraft {
                auth_token: Some(token),
                email: parsed.email,
                plan_name: parsed.plan,
                ..ClientSessionDraft::new()
            };
            client.sign_in(draft, true).await?
        }
        None => client.load().await?,
    };
    tracing::info!(
        signed_in = session.is_signed_in(),
        plan = ?session.plan(),
        "Loaded client session"
    );

    let api: Arc<dyn ExamApi> = Arc::new(HttpExamApi::new(ApiConfig::from_client(
        &settings, &session,
    )));
    let attempt_loop = Arc::new(
        AttemptLoopService::new(api)
            .with_duration(Countdown::from_secs(settings.attempt_duration_secs())),
    );

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        attempt_loop,
        session,
        paper_id: parsed.paper_id,
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Mock Test")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
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

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "startup failed");
        eprintln!("{err}");
        std::process::exit(2);
    }
}

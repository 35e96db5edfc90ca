//! `sidang` - CLI for the thesis-defense scheduling backend
//!
//! Each invocation opens the stored session, runs one command against the
//! backend, and prints the result. Failures print the user-facing message
//! and exit non-zero.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::BufRead;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use serde::Serialize;
use tracing::warn;

use sidang::calendar::{self, MonthGrid};
use sidang::cli::{
    CalendarArgs, Cli, Command, ConfigCommand, DosenCommand, ListArgs, LoginCommand,
    ProfileCommand, StatusCommand, ThesisCommand,
};
use sidang::pagination::paginate;
use sidang::repository::{AdvisorRepository, ProfileRepository, ScheduleSlot, ThesisRepository};
use sidang::session::{self, SharedSession};
use sidang::view::{self, AdvisorDashboard, StudentDashboard};
use sidang::{
    auth, init_logging, ApiClient, Config, Error, Role, Route, SessionStore, Thesis, ThesisStatus,
    User,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", user_message(&err));
            ExitCode::FAILURE
        }
    }
}

fn user_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<Error>() {
        Some(err) => err.user_message(),
        None => format!("{err:#}"),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // `config validate` must work even when the active file is broken.
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        handle_validate(file.clone());
        return Ok(());
    }

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Config(cmd) => handle_config(&config, cmd),
        Command::Login(cmd) => handle_login(&App::open(config)?, cmd),
        Command::Logout => handle_logout(&App::open(config)?),
        Command::Status(cmd) => handle_status(&App::open(config)?, &cmd).await,
        Command::Profile(cmd) => handle_profile(&App::open(config)?, cmd).await,
        Command::Thesis(cmd) => handle_thesis(&App::open(config)?, cmd).await,
        Command::Dosen(cmd) => handle_dosen(&App::open(config)?, cmd).await,
        Command::Dashboard(args) => handle_dashboard(&App::open(config)?, &args).await,
        Command::Calendar(args) => handle_calendar(&App::open(config)?, &args).await,
    }
}

/// Configuration plus the opened session store.
#[derive(Debug)]
struct App {
    config: Config,
    session: SharedSession,
}

impl App {
    fn open(config: Config) -> sidang::Result<Self> {
        let store = SessionStore::open(config.database_path())?;
        Ok(Self {
            config,
            session: store.shared(),
        })
    }

    fn api(&self) -> sidang::Result<ApiClient> {
        ApiClient::new(&self.config, self.session.clone())
    }

    /// API client for a command that needs a signed-in user.
    fn signed_in(&self) -> sidang::Result<(ApiClient, Role)> {
        let session = session::lock(&self.session)?.require()?;
        Ok((self.api()?, session.role))
    }

    fn route(&self) -> sidang::Result<Route> {
        let store = session::lock(&self.session)?;
        Route::initial(&store)
    }
}

/// Keep a section failure for rendering. Only an expired session is fatal.
fn unless_expired<T>(result: sidang::Result<T>) -> sidang::Result<sidang::Result<T>> {
    match result {
        Err(err) if err.is_session_expired() => Err(err),
        other => Ok(other),
    }
}

/// Profile for a greeting. Only an expired session is fatal.
async fn greeting_profile(api: &ApiClient) -> sidang::Result<Option<User>> {
    match ProfileRepository::new(api.clone()).my_profile().await {
        Ok(user) => Ok(Some(user)),
        Err(err) if err.is_session_expired() => Err(err),
        Err(err) => {
            warn!("Profile unavailable: {}", err);
            Ok(None)
        }
    }
}

fn handle_login(app: &App, cmd: LoginCommand) -> anyhow::Result<()> {
    let token = match cmd.token {
        Some(token) => token,
        None => {
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("failed to read ID token from stdin")?;
            line
        }
    };
    if token.trim().is_empty() {
        return Err(Error::validation("ID token kosong").into());
    }

    let signed = {
        let mut store = session::lock(&app.session)?;
        auth::sign_in(
            &mut store,
            &app.config.auth,
            &token,
            cmd.role.map(Role::from),
        )?
    };

    let who = signed
        .claims
        .email
        .as_deref()
        .unwrap_or(&signed.claims.sub);
    println!("Login berhasil: {who} ({})", signed.session.role.label());
    println!("Halaman awal: {}", app.route()?);
    Ok(())
}

fn handle_logout(app: &App) -> anyhow::Result<()> {
    session::lock(&app.session)?.logout()?;
    println!("Logout berhasil.");
    Ok(())
}

#[derive(Debug, Serialize)]
struct StatusReport {
    logged_in: bool,
    role: Option<Role>,
    route: Route,
    database_path: String,
    base_url: String,
    backend: Option<serde_json::Value>,
    backend_error: Option<String>,
}

async fn handle_status(app: &App, cmd: &StatusCommand) -> anyhow::Result<()> {
    let (logged_in, role) = {
        let store = session::lock(&app.session)?;
        (store.is_login()?, store.role()?)
    };

    let (backend, backend_error) = if cmd.offline {
        (None, None)
    } else {
        match app.api()?.health().await {
            Ok(value) => (Some(value), None),
            Err(err) => (None, Some(err.user_message())),
        }
    };

    let report = StatusReport {
        logged_in,
        role,
        route: app.route()?,
        database_path: app.config.database_path().display().to_string(),
        base_url: app.config.api.base_url.clone(),
        backend,
        backend_error,
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("sidang status");
    println!("-------------");
    println!(
        "Session:       {}",
        match report.role {
            Some(role) if report.logged_in => format!("logged in ({})", role.label()),
            _ => "logged out".to_string(),
        }
    );
    println!("Start route:   {}", report.route);
    println!("Database:      {}", report.database_path);
    println!("Backend:       {}", report.base_url);
    match (&report.backend, &report.backend_error) {
        (Some(value), _) => println!("Health:        {value}"),
        (None, Some(err)) => println!("Health:        {err}"),
        (None, None) => println!("Health:        (skipped)"),
    }
    Ok(())
}

async fn handle_profile(app: &App, cmd: ProfileCommand) -> anyhow::Result<()> {
    let (api, _) = app.signed_in()?;
    let repo = ProfileRepository::new(api);

    match cmd {
        ProfileCommand::Show { json } => {
            let user = repo.my_profile().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                println!("{}", view::profile(&user));
            }
        }
        ProfileCommand::Update { name, prodi } => {
            let user = repo.update_profile(&name, &prodi).await?;
            println!("Profil diperbarui.");
            println!("{}", view::profile(&user));
        }
    }
    Ok(())
}

fn print_page(app: &App, list: &[Thesis], args: &ListArgs, empty: &str) -> anyhow::Result<()> {
    let page = paginate(list, app.config.display.items_per_page, args.page);
    println!("{}", view::thesis_page(&page, args.format.into(), empty)?);
    Ok(())
}

async fn handle_thesis(app: &App, cmd: ThesisCommand) -> anyhow::Result<()> {
    let (api, _) = app.signed_in()?;
    let repo = ThesisRepository::new(api);

    match cmd {
        ThesisCommand::List(args) => {
            let theses = repo.my_theses().await?;
            print_page(app, &theses, &args, "Belum ada pengajuan")?;
        }
        ThesisCommand::Submit { title, doc_url } => {
            let thesis = repo.create_thesis(&title, &doc_url).await?;
            println!("Pengajuan TA terkirim.");
            println!("{}", view::thesis_detail(&thesis));
        }
    }
    Ok(())
}

/// Approved theses with a defense date, earliest first.
fn scheduled(all: Vec<Thesis>) -> Vec<Thesis> {
    let mut list: Vec<Thesis> = all
        .into_iter()
        .filter(|t| t.status == ThesisStatus::Approved && t.scheduled_at.is_some())
        .collect();
    list.sort_by_key(|t| t.scheduled_at);
    list
}

async fn handle_dosen(app: &App, cmd: DosenCommand) -> anyhow::Result<()> {
    let (api, _) = app.signed_in()?;
    let repo = AdvisorRepository::new(api.clone());

    match cmd {
        DosenCommand::Dashboard => {
            let profile = greeting_profile(&api).await?;
            let pending = unless_expired(repo.pending_theses().await)?;
            let all = unless_expired(repo.all_theses().await)?;
            let dashboard = AdvisorDashboard::new(
                profile,
                pending,
                all,
                app.config.display.dashboard_preview,
            );
            println!("{}", dashboard.render());
        }
        DosenCommand::Pending(args) => {
            let theses = repo.pending_theses().await?;
            print_page(app, &theses, &args, "Tidak ada pengajuan pending")?;
        }
        DosenCommand::List(args) => {
            let theses = repo.all_theses().await?;
            print_page(app, &theses, &args, "Belum ada pengajuan")?;
        }
        DosenCommand::Scheduled(args) => {
            let theses = scheduled(repo.all_theses().await?);
            print_page(app, &theses, &args, "Belum ada sidang terjadwal")?;
        }
        DosenCommand::Show { id, json } => {
            let thesis = repo.thesis_detail(&id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&thesis)?);
            } else {
                println!("{}", view::thesis_detail(&thesis));
            }
        }
        DosenCommand::Review { id, decision } => {
            let thesis = repo.review_thesis(&id, decision.as_str()).await?;
            println!(
                "Status TA {} sekarang: {}",
                thesis.id,
                view::status_label(thesis.status)
            );
        }
        DosenCommand::Schedule { id, date, time } => {
            let slot = ScheduleSlot::parse(&date, &time)?;
            let thesis = repo
                .schedule_slot(&id, &slot, Local::now().date_naive())
                .await?;
            println!(
                "Sidang {} dijadwalkan: {}",
                thesis.id,
                view::defense_label(&thesis)
            );
        }
    }
    Ok(())
}

async fn handle_dashboard(app: &App, args: &CalendarArgs) -> anyhow::Result<()> {
    let (api, _) = app.signed_in()?;
    let (month, selected) = calendar::select(
        args.month.as_deref(),
        args.day.as_deref(),
        Local::now().date_naive(),
    )?;

    let profile = greeting_profile(&api).await?;
    let theses = ThesisRepository::new(api).my_theses().await?;

    let grid = MonthGrid::with_theses(month, &theses);
    let dashboard = StudentDashboard { profile, theses };
    println!("{}", dashboard.render(&grid, selected));
    Ok(())
}

async fn handle_calendar(app: &App, args: &CalendarArgs) -> anyhow::Result<()> {
    let (api, role) = app.signed_in()?;
    let (month, selected) = calendar::select(
        args.month.as_deref(),
        args.day.as_deref(),
        Local::now().date_naive(),
    )?;

    let theses = match role {
        Role::Dosen => AdvisorRepository::new(api).all_theses().await?,
        Role::Mahasiswa => ThesisRepository::new(api).my_theses().await?,
    };

    let grid = MonthGrid::with_theses(month, &theses);
    println!("{}", view::calendar_view(&theses, &grid, selected));
    Ok(())
}

fn handle_validate(file: Option<std::path::PathBuf>) {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path)) {
        Ok(_) => println!("Configuration is valid."),
        Err(e) => println!("Configuration error: {e}"),
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[API]");
                println!("  Base URL:           {}", config.api.base_url);
                println!("  Connect timeout:    {}s", config.api.connect_timeout_secs);
                println!("  Read timeout:       {}s", config.api.read_timeout_secs);
                println!("  Write timeout:      {}s", config.api.write_timeout_secs);
                println!();
                println!("[Session]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Auth]");
                println!("  Google client id:   {}", config.auth.google_client_id);
                println!(
                    "  Dosen markers:      {}",
                    config.auth.dosen_email_markers.join(", ")
                );
                println!();
                println!("[Display]");
                println!("  Items per page:     {}", config.display.items_per_page);
                println!("  Dashboard preview:  {}", config.display.dashboard_preview);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => handle_validate(file),
    }
    Ok(())
}

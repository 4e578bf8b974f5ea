use std::io::Write as _;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use notifly::app::App;
use notifly::config::{ClientConfig, RouteStyle};
use notifly::error::ConfigError;
use notifly::forms::{SubmitOutcome, failure_message};
use notifly::guard::{Navigation, Route};
use notifly::shell::{self, Command};

const NOTIFICATIONS_UNAVAILABLE: &str = "Could not load notifications";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "notifly", about = "Sign in, register, and read notifications")]
struct Cli {
    /// Overrides `API_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// `prefixed` (/auth/login) or `bare` (/login). Overrides `API_ROUTE_STYLE`.
    #[arg(long)]
    route_style: Option<String>,

    /// Do not keep server-set cookies between requests.
    #[arg(long, default_value_t = false)]
    no_cookies: bool,

    /// Log request-level detail to stderr.
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = build_config(&cli)?;
    tracing::info!(base_url = %config.base_url, route_style = ?config.route_style, "notifly starting");
    let mut app = App::new(&config)?;

    println!("notifly: {}", config.base_url);
    println!("{}", shell::HELP);
    show_current(&mut app).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} > ", app.route());
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match shell::parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        if !run_command(&mut app, command).await {
            break;
        }
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(style) = &cli.route_style {
        config.route_style = RouteStyle::parse(style)?;
    }
    if cli.no_cookies {
        config.with_credentials = false;
    }
    Ok(config)
}

/// Run one command. Returns `false` when the shell should exit.
async fn run_command(app: &mut App, command: Command) -> bool {
    match command {
        Command::Login(form) => {
            let outcome = app.submit_login(&form).await;
            report(app, &outcome).await;
        }
        Command::Register(form) => {
            let outcome = app.submit_register(&form).await;
            report(app, &outcome).await;
        }
        Command::Open(route) => open(app, route).await,
        Command::Notifications => open(app, Route::Notifications).await,
        Command::WhoAmI => match app.session().current() {
            Some(session) => println!("signed in as user {} (admin: {})", session.user_id, session.is_admin.unwrap_or(false)),
            None => println!("not signed in"),
        },
        Command::Logout => {
            app.logout();
            println!("signed out");
            show_current(app).await;
        }
        Command::Help => println!("{}", shell::HELP),
        Command::Quit => return false,
    }
    true
}

async fn report(app: &mut App, outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Invalid(errors) => print!("{}", shell::render_field_errors(errors)),
        SubmitOutcome::Busy => println!("a submission is already in progress"),
        SubmitOutcome::Succeeded { .. } | SubmitOutcome::Failed(_) => {}
    }
    print_toasts(app);
    if app.pending_redirect().is_some() {
        app.follow_pending_redirect().await;
    }
    if matches!(outcome, SubmitOutcome::Succeeded { .. }) {
        show_current(app).await;
    }
}

async fn open(app: &mut App, route: Route) {
    if let Navigation::Redirect { from, .. } = app.navigate(route) {
        println!("{from} requires sign-in");
    }
    show_current(app).await;
}

async fn show_current(app: &mut App) {
    println!("{}", shell::render_view(app.route()));
    if app.route() != Route::Notifications {
        return;
    }
    match app.notifications().await {
        Ok(items) => println!("{}", shell::render_notifications(&items)),
        Err(err) if err.requires_login() => {
            print_toasts(app);
            println!("{}", shell::render_view(app.route()));
        }
        Err(err) => println!("[error] {}", failure_message(&err, NOTIFICATIONS_UNAVAILABLE)),
    }
}

fn print_toasts(app: &mut App) {
    for toast in app.drain_toasts() {
        println!("{}", shell::render_toast(&toast));
    }
}

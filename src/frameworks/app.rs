// Framework bootstrap for the command-line client.

use crate::domain::{ActionError, GeneratedEmail, Selection, ToneChoice};
use crate::frameworks::cli::{
    Cli, Command, ForgotPasswordArgs, GenerateArgs, HistoryArgs, LoginArgs, ResultArgs,
    RewriteArgs, SignupArgs,
};
use crate::frameworks::config::{ClientConfig, ConfigError};
use crate::interface_adapters::clients::BackendClient;
use crate::interface_adapters::console::{CommandClipboard, ConsoleNotifier};
use crate::interface_adapters::presenter::{render_html, render_text};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::storage::{FileKeyValueStore, InMemoryKeyValueStore};
use crate::use_cases::catalog::load_catalog;
use crate::use_cases::history::NOT_IN_HISTORY;
use crate::use_cases::route_guard::{GuardDecision, Route, guard};
use crate::use_cases::{
    GenerationForm, HistoryBrowser, HistoryTab, PasswordResetFlow, RegenerationForm, ResetStep,
    SessionContext, SignupFlow, SignupStep,
};

use clap::Parser;
use std::process::ExitCode;
use std::{fmt, io, sync::Arc};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader, Lines, Stdin};
use url::Url;

const RESEND: &str = "resend";

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    // stdout carries command output; logs go to stderr.
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

#[derive(Debug)]
pub enum CommandError {
    Config(ConfigError),
    Client(reqwest::Error),
    Io(io::Error),
    LoginRequired,
    Action(ActionError),
    // Input ended before an interactive step was finished.
    Aborted,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Config(err) => write!(f, "configuration error: {err}"),
            CommandError::Client(err) => write!(f, "failed to build http client: {err}"),
            CommandError::Io(err) => write!(f, "i/o error: {err}"),
            CommandError::LoginRequired => f.write_str("please log in first (email-toner login)"),
            CommandError::Action(err) => f.write_str(&err.message()),
            CommandError::Aborted => f.write_str("input ended before the step was completed"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::Config(err)
    }
}

impl From<reqwest::Error> for CommandError {
    fn from(err: reqwest::Error) -> Self {
        CommandError::Client(err)
    }
}

impl From<io::Error> for CommandError {
    fn from(err: io::Error) -> Self {
        CommandError::Io(err)
    }
}

impl From<ActionError> for CommandError {
    fn from(err: ActionError) -> Self {
        CommandError::Action(err)
    }
}

pub async fn run() -> ExitCode {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();
    let cli = Cli::parse();

    match run_cli(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = %err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run_cli(cli: Cli) -> Result<(), CommandError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url.as_deref() {
        config.api_url = Url::parse(api_url).map_err(|source| ConfigError::InvalidUrl {
            value: api_url.to_string(),
            source,
        })?;
    }
    tracing::debug!(api_url = %config.api_url, home = %config.home.display(), "configuration loaded");

    let state = build_state(&config)?;
    state.session.initialize().await;
    execute(cli.command, &state, &config).await
}

/// Wires the backend client, token file and console ports into one state.
pub fn build_state(config: &ClientConfig) -> Result<AppState, reqwest::Error> {
    let client = Arc::new(BackendClient::new(config.api_url.clone(), config.timeout)?);
    let storage = Arc::new(FileKeyValueStore::new(config.state_path()));
    let session = Arc::new(SessionContext::new(client.clone(), storage));
    let clipboard = config
        .clipboard
        .as_deref()
        .and_then(CommandClipboard::from_command_line)
        .unwrap_or_else(CommandClipboard::platform_default);

    Ok(AppState {
        session,
        tones: client.clone(),
        emails: client,
        scratch: Arc::new(InMemoryKeyValueStore::new()),
        clipboard: Arc::new(clipboard),
        notifier: Arc::new(ConsoleNotifier),
        suggest_debounce: config.suggest_debounce,
    })
}

async fn execute(
    command: Command,
    state: &AppState,
    config: &ClientConfig,
) -> Result<(), CommandError> {
    match command {
        Command::Status => {
            let status = if state.session.is_logged_in() {
                "logged in"
            } else {
                "not logged in"
            };
            println!("{status} ({})", config.api_url);
            Ok(())
        }
        Command::Login(args) => login(state, args).await,
        Command::Signup(args) => signup(state, args).await,
        Command::ForgotPassword(args) => forgot_password(state, args).await,
        Command::Logout => {
            state.session.logout().await;
            println!("Logged out.");
            Ok(())
        }
        Command::Catalog => {
            let token = state.session.token();
            let catalog = load_catalog(state.tones.as_ref(), token.as_deref()).await;
            println!("Designations: {}", catalog.designations.join(", "));
            println!("Occasions:    {}", catalog.occasions.join(", "));
            println!("Tones:        {}", catalog.tones.join(", "));
            Ok(())
        }
        Command::Generate(args) => generate(state, args).await,
        Command::Rewrite(args) => rewrite(state, args).await,
        Command::History(args) => history(state, args).await,
    }
}

fn require_login(route: Route, session: &SessionContext) -> Result<(), CommandError> {
    match guard(route, session) {
        GuardDecision::Render(_) => Ok(()),
        GuardDecision::Loading | GuardDecision::Redirect(_) => Err(CommandError::LoginRequired),
    }
}

// Line-based prompts on stderr, answers from stdin.
struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn ask(&mut self, label: &str) -> Result<String, CommandError> {
        eprint!("{label}: ");
        match self.lines.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(CommandError::Aborted),
        }
    }
}

async fn login(state: &AppState, args: LoginArgs) -> Result<(), CommandError> {
    let password = match args.password {
        Some(password) => password,
        None => Prompt::new().ask("Password").await?,
    };
    state.session.login(&args.email, &password).await?;
    println!("Logged in.");
    Ok(())
}

async fn signup(state: &AppState, args: SignupArgs) -> Result<(), CommandError> {
    let mut prompt = Prompt::new();
    let password = match args.password {
        Some(password) => password,
        None => prompt.ask("Password").await?,
    };
    let mut flow = SignupFlow::new(state.session.clone());
    flow.submit(&args.email, &password, &args.name).await?;
    eprintln!("An OTP was sent to {}.", args.email);

    while flow.step() == SignupStep::VerifyOtp {
        let answer = prompt.ask("OTP (or 'resend')").await?;
        let result = if answer.eq_ignore_ascii_case(RESEND) {
            flow.resend_otp().await
        } else {
            flow.verify(&answer).await
        };
        if let Err(err) = result {
            eprintln!("{}", err.message());
        }
    }
    println!("Account created; you are logged in.");
    Ok(())
}

async fn forgot_password(state: &AppState, args: ForgotPasswordArgs) -> Result<(), CommandError> {
    let mut prompt = Prompt::new();
    let mut flow = PasswordResetFlow::new(state.session.clone());
    flow.request(&args.email).await?;
    eprintln!("An OTP was sent to {}.", args.email);

    loop {
        let result = match flow.step() {
            ResetStep::Request => break,
            ResetStep::Verify => {
                let answer = prompt.ask("OTP (or 'resend')").await?;
                if answer.eq_ignore_ascii_case(RESEND) {
                    flow.resend_otp().await
                } else {
                    flow.verify(&answer).await
                }
            }
            ResetStep::Reset => {
                let password = prompt.ask("New password").await?;
                flow.reset(&password).await
            }
            ResetStep::Done => break,
        };
        if let Err(err) = result {
            eprintln!("{}", err.message());
        }
    }
    println!("Password updated; log in with the new password.");
    Ok(())
}

// Catalog values become plain picks; anything else is custom text.
fn tone_selection(value: &str, known: &[String]) -> Selection<ToneChoice> {
    Selection::from_known_or_custom(value, known).map(ToneChoice::picked)
}

fn print_email(email: &GeneratedEmail, html: bool) {
    if html {
        println!("{}", render_html(email));
    } else {
        print!("{}", render_text(email));
    }
}

async fn generate(state: &AppState, args: GenerateArgs) -> Result<(), CommandError> {
    require_login(Route::EmailGen, &state.session)?;
    let mut form = GenerationForm::mount(state.clone()).await;
    let catalog = form.catalog().clone();

    form.set_recipient(Selection::from_known_or_custom(
        &args.recipient,
        &catalog.designations,
    ));
    form.set_occasion(Selection::from_known_or_custom(
        &args.occasion,
        &catalog.occasions,
    ));
    match args.tone.as_deref() {
        Some(tone) => form.set_tone(tone_selection(tone, &catalog.tones)),
        None => {
            if form.settle_suggestion().await
                && let Selection::Option(choice) = form.tone()
            {
                eprintln!("Tone: {choice}");
            }
        }
    }
    if let Some(words) = args.words.as_deref() {
        form.set_word_count(words);
    }

    form.submit().await?;
    if let Some(email) = form.email() {
        print_email(email, args.result.html);
    }
    finish_result(&mut ResultTarget::Generated(&mut form), &args.result).await
}

async fn rewrite(state: &AppState, args: RewriteArgs) -> Result<(), CommandError> {
    require_login(Route::EmailRegen, &state.session)?;
    let original = match args.file.as_ref() {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            text
        }
    };

    let mut form = RegenerationForm::mount(state.clone()).await;
    let tones = form.tone_options();
    form.set_original_email(&original).await;
    form.set_tone(Selection::from_known_or_custom(&args.tone, &tones))
        .await;
    if let Some(words) = args.words.as_deref() {
        form.set_word_count(words).await;
    }

    form.submit().await?;
    if let Some(email) = form.email() {
        print_email(email, args.result.html);
    }
    finish_result(&mut ResultTarget::Rewritten(&mut form), &args.result).await
}

enum ResultTarget<'a> {
    Generated(&'a mut GenerationForm),
    Rewritten(&'a mut RegenerationForm),
}

async fn finish_result(target: &mut ResultTarget<'_>, args: &ResultArgs) -> Result<(), CommandError> {
    if args.copy {
        match target {
            ResultTarget::Generated(form) => form.copy().await?,
            ResultTarget::Rewritten(form) => form.copy().await?,
        }
    }
    if args.save {
        match target {
            ResultTarget::Generated(form) => form.save().await?,
            ResultTarget::Rewritten(form) => form.save().await?,
        };
    }
    Ok(())
}

async fn history(state: &AppState, args: HistoryArgs) -> Result<(), CommandError> {
    require_login(Route::History, &state.session)?;
    let mut browser = HistoryBrowser::mount(state.clone()).await;
    if args.tone != browser.filter() {
        browser.set_filter(&args.tone).await?;
    }
    if args.page > 1 {
        browser.go_to_page(args.page).await?;
    }

    if let Some(id) = args.show.as_deref() {
        if browser.entry(id).is_none() {
            return Err(ActionError::Remote(NOT_IN_HISTORY.to_string()).into());
        }
        print!("{}", render_text(&browser.open(id)));
        return Ok(());
    }
    if let Some(id) = args.copy.as_deref() {
        browser.copy(id).await?;
        return Ok(());
    }

    browser.set_tab(if args.regenerated {
        HistoryTab::Regenerated
    } else {
        HistoryTab::Generated
    });
    for entry in browser.visible() {
        let subject = entry
            .rewritten_email
            .as_ref()
            .map(|email| email.subject.as_str())
            .unwrap_or_default();
        let tone = entry.tone.as_deref().unwrap_or("-");
        println!("{}\t{tone}\t{subject}", entry.id);
    }
    println!("page {}/{}", browser.page(), browser.total_pages());
    Ok(())
}

//! CLI binary rendering the FraudShield dashboard pages in the terminal.

use std::io::{self, Write as _};
use std::process::ExitCode;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use fraudshield::auth::Authenticator;
use fraudshield::dashboard::{AnalyticsPage, Dashboard, OverviewPage};
use fraudshield::format::{format_currency, format_percentage, format_relative_time};
use fraudshield::history::HistoryView;
use fraudshield::models::{
    AnalyticsSummary, AuthSession, CanonicalTransaction, ChatRequest, ChatResponse,
    DEFAULT_ITEMS_PER_PAGE, ModelInfo, PredictionRequest, PredictionResponse, RiskLevel, RiskShare, TrendPoint,
};
use fraudshield::normalize::{SortDirection, SortField};
use fraudshield::storage::InMemoryUserStore;
use fraudshield::view::ViewScope;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use secrecy::ExposeSecret as _;

/// Environment variable holding the backend base URL.
const API_URL_ENV: &str = "FRAUDSHIELD_API_URL";

/// Environment variable holding the optional bearer token.
const TOKEN_ENV: &str = "FRAUDSHIELD_TOKEN";

/// Placeholder for missing values.
const DASH: &str = "\u{2014}";

/// FraudShield dashboard CLI: inspect fraud predictions from the terminal.
#[derive(Debug, Parser)]
#[command(name = "fraudshield", version, about)]
struct Cli {
    /// Backend connection settings.
    #[command(flatten)]
    backend: BackendArgs,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Where and how to reach the scoring backend.
#[derive(Debug, Args)]
struct BackendArgs {
    /// Backend base URL (default: $FRAUDSHIELD_API_URL, then
    /// http://localhost:8000/api/v1).
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,
    /// Fail instead of showing mock data when the backend is unreachable.
    #[arg(long, global = true)]
    no_mock: bool,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Dashboard pages served by the backend.
    #[command(flatten)]
    Page(PageCommand),
    /// Log in with a demo account.
    Login(LoginArgs),
    /// Register a new analyst account for this session.
    Signup(SignupArgs),
}

/// Subcommands that talk to the backend.
#[derive(Debug, Subcommand)]
enum PageCommand {
    /// Headline numbers, risk distribution, hourly trend and recent
    /// transactions.
    Overview,
    /// Model quality metrics with trend and risk distribution.
    Analytics,
    /// One page of prediction history, normalized and sorted.
    History(HistoryArgs),
    /// Score a single transaction.
    Check(CheckArgs),
    /// Delete the whole prediction history on the backend.
    ClearHistory,
    /// Ask the fraud assistant, e.g. `tx amount=1500 attempts=3`.
    Chat(ChatArgs),
}

/// Arguments for the `history` subcommand.
#[derive(Debug, Args)]
struct HistoryArgs {
    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Records per page.
    #[arg(long, default_value_t = DEFAULT_ITEMS_PER_PAGE)]
    limit: u32,
    /// Only show this risk level (low, medium, high, critical).
    #[arg(long, value_parser = parse_risk_level)]
    risk_level: Option<RiskLevel>,
    /// Only show fraudulent (`true`) or legitimate (`false`) predictions.
    #[arg(long)]
    fraud: Option<bool>,
    /// Sort column (id, amount, risk, timestamp).
    #[arg(long, default_value = "timestamp", value_parser = parse_sort_field)]
    sort: SortField,
    /// Sort ascending instead of descending.
    #[arg(long)]
    asc: bool,
}

/// Arguments for the `check` subcommand.
#[derive(Debug, Args)]
struct CheckArgs {
    /// Transaction amount in dollars.
    #[arg(long)]
    amount: f64,
    /// Seconds since the first transaction of the dataset.
    #[arg(long, default_value_t = 0.0)]
    time: f64,
    /// PCA component as `N=VALUE` (N in 1..=28); repeatable.
    #[arg(long = "component", value_name = "N=VALUE", value_parser = parse_component)]
    components: Vec<(usize, f64)>,
}

/// Arguments for the `chat` subcommand.
#[derive(Debug, Args)]
struct ChatArgs {
    /// Message for the assistant.
    message: String,
    /// Session id from an earlier reply, to continue that conversation.
    #[arg(long)]
    session: Option<String>,
}

/// Arguments for the `login` subcommand.
#[derive(Debug, Args)]
struct LoginArgs {
    /// Account email.
    #[arg(long)]
    email: String,
    /// Account password.
    #[arg(long)]
    password: String,
}

/// Arguments for the `signup` subcommand.
#[derive(Debug, Args)]
struct SignupArgs {
    /// Account email.
    #[arg(long)]
    email: String,
    /// Account password.
    #[arg(long)]
    password: String,
    /// Display name.
    #[arg(long)]
    name: String,
}

/// Parses a risk level name for clap.
fn parse_risk_level(s: &str) -> Result<RiskLevel, String> {
    s.parse::<RiskLevel>().map_err(|err| format!("{err}"))
}

/// Parses a sort column name for clap.
fn parse_sort_field(s: &str) -> Result<SortField, String> {
    s.parse::<SortField>().map_err(|err| format!("{err}"))
}

/// Parses an `N=VALUE` component assignment for clap.
fn parse_component(s: &str) -> Result<(usize, f64), String> {
    let (index, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected N=VALUE, got `{s}`"))?;
    let parsed_index = index
        .trim()
        .trim_start_matches(['v', 'V'])
        .parse::<usize>()
        .map_err(|err| format!("bad component index `{index}`: {err}"))?;
    let parsed_value = value
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("bad component value `{value}`: {err}"))?;
    Ok((parsed_index, parsed_value))
}

/// Reads a non-blank environment variable.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Prints an error line to stderr.
fn report(context: &str, err: &fraudshield::FraudShieldError) -> io::Result<()> {
    writeln!(
        io::stderr().lock(),
        "{} {context}: {err}",
        "error:".red().bold()
    )
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(dispatch(cli))
}

/// Builds the dashboard from flags and environment.
fn connect(backend: &BackendArgs) -> fraudshield::Result<Dashboard> {
    let mut builder = Dashboard::builder().mock_fallback(!backend.no_mock);
    if let Some(url) = backend.api_url.clone().or_else(|| env_value(API_URL_ENV)) {
        builder = builder.base_url(url);
    }
    if let Some(token) = env_value(TOKEN_ENV) {
        builder = builder.token(token);
    }
    builder.build()
}

/// Dispatches to the appropriate subcommand handler.
async fn dispatch(cli: Cli) -> io::Result<ExitCode> {
    match cli.command {
        Command::Page(page) => match connect(&cli.backend) {
            Ok(dashboard) => run_page(&dashboard, page).await,
            Err(err) => {
                report("failed to configure backend", &err)?;
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Login(args) => cmd_login(&args).await,
        Command::Signup(args) => cmd_signup(&args).await,
    }
}

/// Dispatches a backend-facing subcommand.
async fn run_page(dashboard: &Dashboard, command: PageCommand) -> io::Result<ExitCode> {
    match command {
        PageCommand::Overview => cmd_overview(dashboard).await,
        PageCommand::Analytics => cmd_analytics(dashboard).await,
        PageCommand::History(args) => cmd_history(dashboard, &args).await,
        PageCommand::Check(args) => cmd_check(dashboard, &args).await,
        PageCommand::ClearHistory => cmd_clear_history(dashboard).await,
        PageCommand::Chat(args) => cmd_chat(dashboard, args).await,
    }
}

/// Executes the `overview` subcommand.
async fn cmd_overview(dashboard: &Dashboard) -> io::Result<ExitCode> {
    let scope = ViewScope::new();
    let spinner = make_spinner("Loading overview...");
    let result = dashboard.load_overview(&scope.token()).await;
    spinner.finish_and_clear();

    match result {
        Ok(page) => {
            if page.summary.is_none() {
                writeln!(
                    io::stdout().lock(),
                    "{}",
                    "Overview unavailable: the backend did not answer.".dimmed()
                )?;
                return Ok(ExitCode::FAILURE);
            }
            print_overview(&page)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report("failed to load overview", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `analytics` subcommand.
async fn cmd_analytics(dashboard: &Dashboard) -> io::Result<ExitCode> {
    let scope = ViewScope::new();
    let spinner = make_spinner("Loading analytics...");
    let result = dashboard.load_analytics(&scope.token()).await;
    spinner.finish_and_clear();

    match result {
        Ok(page) => {
            if page.model_info.is_none() {
                writeln!(
                    io::stdout().lock(),
                    "{}",
                    "Analytics unavailable: the backend did not answer.".dimmed()
                )?;
                return Ok(ExitCode::FAILURE);
            }
            print_analytics(&page)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report("failed to load analytics", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Builds the history view state from the command-line arguments.
fn history_view(args: &HistoryArgs) -> HistoryView {
    let mut view = HistoryView::new();
    view.set_items_per_page(args.limit);
    view.set_filters(args.risk_level, args.fraud);
    view.set_page(args.page);
    if view.sort_state().field != args.sort {
        view.select_sort(args.sort);
    }
    if args.asc {
        view.select_sort(args.sort);
    }
    view
}

/// Executes the `history` subcommand.
async fn cmd_history(dashboard: &Dashboard, args: &HistoryArgs) -> io::Result<ExitCode> {
    let mut view = history_view(args);
    let scope = ViewScope::new();
    let spinner = make_spinner("Loading history...");
    let result = view.refresh(dashboard, &scope.token()).await;
    spinner.finish_and_clear();

    match result {
        Ok(()) => {
            print_history(&view)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report("failed to load history", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `check` subcommand: scores one transaction.
async fn cmd_check(dashboard: &Dashboard, args: &CheckArgs) -> io::Result<ExitCode> {
    let mut request = PredictionRequest::new(args.amount, args.time);
    for &(index, value) in &args.components {
        request = match request.with_component(index, value) {
            Ok(updated) => updated,
            Err(err) => {
                report("invalid component", &err)?;
                return Ok(ExitCode::FAILURE);
            }
        };
    }

    let spinner = make_spinner("Scoring transaction...");
    let result = dashboard.predict(&request).await;
    spinner.finish_and_clear();

    match result {
        Ok(response) => {
            print_prediction(&response)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report("prediction failed", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `clear-history` subcommand.
async fn cmd_clear_history(dashboard: &Dashboard) -> io::Result<ExitCode> {
    let spinner = make_spinner("Clearing history...");
    let result = dashboard.clear_history().await;
    spinner.finish_and_clear();

    match result {
        Ok(response) => {
            let message = if response.message.is_empty() {
                "History cleared."
            } else {
                response.message.as_str()
            };
            writeln!(io::stdout().lock(), "{}", message.green().bold())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report("failed to clear history", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `chat` subcommand.
async fn cmd_chat(dashboard: &Dashboard, args: ChatArgs) -> io::Result<ExitCode> {
    let request = ChatRequest {
        message: args.message,
        session_id: args.session,
    };
    let spinner = make_spinner("Waiting for the assistant...");
    let result = dashboard.chat(&request).await;
    spinner.finish_and_clear();

    match result {
        Ok(response) => {
            print_chat(&response)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report("chat failed", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `login` subcommand against the demo accounts.
async fn cmd_login(args: &LoginArgs) -> io::Result<ExitCode> {
    let auth = Authenticator::new(InMemoryUserStore::with_demo_users());
    match auth.login(&args.email, &args.password).await {
        Ok(session) => {
            print_session("Logged in", &session)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report("login failed", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `signup` subcommand.
async fn cmd_signup(args: &SignupArgs) -> io::Result<ExitCode> {
    let auth = Authenticator::new(InMemoryUserStore::with_demo_users());
    match auth.signup(&args.email, &args.password, &args.name).await {
        Ok(session) => {
            print_session("Signed up", &session)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report("signup failed", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Prints the user and token of a session.
fn print_session(headline: &str, session: &AuthSession) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "{} {}",
        headline.green().bold(),
        format_args!("as {} <{}>", session.user.name, session.user.email).dimmed()
    )?;
    writeln!(out, "  {} {}", "Role:".bold(), session.user.role)?;
    writeln!(out, "  {} {}", "Token:".bold(), session.token.expose_secret())?;
    Ok(())
}

/// Foreground color of a risk level.
const fn risk_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Low => Color::Green,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::High => Color::Red,
        RiskLevel::Critical => Color::Magenta,
    }
}

/// Human-readable sort direction.
const fn direction_label(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "ascending",
        SortDirection::Descending => "descending",
    }
}

/// Prints the overview page.
fn print_overview(page: &OverviewPage) -> io::Result<()> {
    if let Some(summary) = page.summary.as_ref() {
        print_summary(summary)?;
    }
    print_risk_table(&page.risk_distribution)?;
    print_trend_table(&page.trends)?;
    print_transactions_table("Recent Transactions", &page.recent_transactions)
}

/// Prints the analytics page.
fn print_analytics(page: &AnalyticsPage) -> io::Result<()> {
    if let Some(info) = page.model_info.as_ref() {
        print_model_info(info)?;
    }
    print_risk_table(&page.risk_distribution)?;
    print_trend_table(&page.trends)
}

/// Prints the headline numbers.
fn print_summary(summary: &AnalyticsSummary) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let updated = format_relative_time(&summary.last_updated, Utc::now())
        .unwrap_or_else(|| summary.last_updated.clone());
    writeln!(
        out,
        "{} {}",
        "Overview".green().bold(),
        format_args!("(updated {updated})").dimmed()
    )?;
    writeln!(out)?;

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Metric").fg(Color::Cyan),
        Cell::new("Value").fg(Color::Cyan),
    ]);
    let rows = [
        ("Transactions", summary.total_transactions.to_string()),
        ("Fraud detected", summary.fraud_detected.to_string()),
        ("Fraud rate", format_percentage(summary.fraud_rate)),
        (
            "Amount processed",
            format_currency(summary.total_amount_processed),
        ),
        ("Fraud blocked", format_currency(summary.fraud_amount_blocked)),
    ];
    for (name, value) in rows {
        _ = table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    writeln!(out, "{table}")?;
    writeln!(out)?;
    Ok(())
}

/// Prints the model quality metrics.
fn print_model_info(info: &ModelInfo) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", "Model Performance".green().bold())?;
    writeln!(out)?;

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Metric").fg(Color::Cyan),
        Cell::new("Score").fg(Color::Cyan),
    ]);
    let rows = [
        ("Accuracy", info.accuracy),
        ("Precision", info.precision),
        ("Recall", info.recall),
        ("F1 score", info.f1_score),
    ];
    for (name, score) in rows {
        _ = table.add_row(vec![Cell::new(name), Cell::new(format_percentage(score))]);
    }
    writeln!(out, "{table}")?;
    writeln!(out)?;
    Ok(())
}

/// Prints predictions per risk bucket.
fn print_risk_table(shares: &[RiskShare]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if shares.is_empty() {
        writeln!(out, "{}", "No risk distribution.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Risk").fg(Color::Cyan),
        Cell::new("Count").fg(Color::Cyan),
        Cell::new("Share").fg(Color::Cyan),
    ]);
    for share in shares {
        _ = table.add_row(vec![
            Cell::new(share.risk_level.as_str()).fg(risk_color(share.risk_level)),
            Cell::new(share.count),
            Cell::new(format!("{:.1}%", share.percentage)),
        ]);
    }

    writeln!(out, "{}", "Risk Distribution".green().bold())?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    writeln!(out)?;
    Ok(())
}

/// Prints the hourly fraud trend.
fn print_trend_table(points: &[TrendPoint]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if points.is_empty() {
        writeln!(out, "{}", "No trend data.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Hour").fg(Color::Cyan),
        Cell::new("Transactions").fg(Color::Cyan),
        Cell::new("Fraud").fg(Color::Cyan),
        Cell::new("Rate").fg(Color::Cyan),
    ]);
    for point in points {
        let fraud_cell = if point.fraud_detected > 0 {
            Cell::new(point.fraud_detected).fg(Color::Red)
        } else {
            Cell::new(point.fraud_detected).fg(Color::DarkGrey)
        };
        _ = table.add_row(vec![
            Cell::new(&point.timestamp),
            Cell::new(point.total_transactions),
            fraud_cell,
            Cell::new(format!("{:.2}%", point.fraud_rate)),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "Fraud Trend".green().bold(),
        format_args!("({} hours)", points.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    writeln!(out)?;
    Ok(())
}

/// Prints normalized transactions in a table.
fn print_transactions_table(title: &str, txs: &[CanonicalTransaction]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if txs.is_empty() {
        writeln!(out, "{}", "No transactions found.".dimmed())?;
        return Ok(());
    }

    let now = Utc::now();
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("When").fg(Color::Cyan),
        Cell::new("Amount").fg(Color::Cyan),
        Cell::new("Risk").fg(Color::Cyan),
        Cell::new("Level").fg(Color::Cyan),
        Cell::new("Fraud").fg(Color::Cyan),
    ]);

    for tx in txs {
        let when = format_relative_time(&tx.timestamp, now).unwrap_or_else(|| tx.timestamp.clone());
        let level_cell = tx.risk_level().map_or_else(
            || Cell::new(DASH).fg(Color::DarkGrey),
            |level| Cell::new(level.as_str()).fg(risk_color(level)),
        );
        let fraud_cell = if tx.is_fraud() {
            Cell::new("yes").fg(Color::Red)
        } else {
            Cell::new("no").fg(Color::DarkGrey)
        };
        _ = table.add_row(vec![
            Cell::new(&tx.id),
            Cell::new(when),
            Cell::new(format_currency(tx.amount)),
            Cell::new(format!("{:.1}", tx.risk_score)),
            level_cell,
            fraud_cell,
        ]);
    }

    writeln!(
        out,
        "{} {}",
        title.green().bold(),
        format_args!("({})", txs.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints the current history page.
fn print_history(view: &HistoryView) -> io::Result<()> {
    let snapshot = view.snapshot();
    let sort = view.sort_state();
    print_transactions_table("Transaction History", &view.rows())?;
    writeln!(
        io::stdout().lock(),
        "{}",
        format_args!(
            "page {} of {}, {} total, sorted by {} {}",
            snapshot.page,
            snapshot.total_pages,
            snapshot.total,
            sort.field,
            direction_label(sort.direction)
        )
        .dimmed()
    )
}

/// Prints a prediction verdict with its contributing factors.
fn print_prediction(response: &PredictionResponse) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if response.is_fraud {
        writeln!(out, "{}", "FRAUD DETECTED".red().bold())?;
    } else {
        writeln!(out, "{}", "Legitimate transaction".green().bold())?;
    }
    writeln!(out, "  {} {}", "Transaction:".bold(), response.transaction_id)?;
    writeln!(
        out,
        "  {} {}",
        "Fraud probability:".bold(),
        format_percentage(response.fraud_probability)
    )?;
    writeln!(
        out,
        "  {} {:.1} ({})",
        "Risk score:".bold(),
        response.risk_score,
        response.risk_level.as_str()
    )?;
    writeln!(
        out,
        "  {} {}",
        "Confidence:".bold(),
        format_percentage(response.confidence)
    )?;

    if response.factors.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Feature").fg(Color::Cyan),
        Cell::new("Impact").fg(Color::Cyan),
        Cell::new("Value").fg(Color::Cyan),
    ]);
    for factor in &response.factors {
        _ = table.add_row(vec![
            Cell::new(&factor.feature),
            Cell::new(&factor.impact),
            Cell::new(format!("{:.4}", factor.value)),
        ]);
    }
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints an assistant reply, with its verdict when the message described
/// a transaction.
fn print_chat(response: &ChatResponse) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", response.reply)?;
    if let Some(verdict) = response.result.as_ref() {
        writeln!(out)?;
        let mut table = Table::new();
        _ = table.load_preset(UTF8_FULL);
        _ = table.set_header(vec![
            Cell::new("Amount").fg(Color::Cyan),
            Cell::new("Attempts (10 min)").fg(Color::Cyan),
            Cell::new("Score").fg(Color::Cyan),
            Cell::new("Decision").fg(Color::Cyan),
        ]);
        let (amount, attempts) = response.tx.map_or_else(
            || (DASH.to_owned(), DASH.to_owned()),
            |tx| (format_currency(tx.amount), tx.attempts_10min.to_string()),
        );
        _ = table.add_row(vec![
            Cell::new(amount),
            Cell::new(attempts),
            Cell::new(format!("{}/100", verdict.risk_score)),
            Cell::new(&verdict.decision),
        ]);
        writeln!(out, "{table}")?;
        writeln!(out, "{}", verdict.advice.dimmed())?;
    }
    writeln!(out, "{} {}", "Session:".dimmed(), response.session_id.dimmed())?;
    Ok(())
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend(server: &MockServer, no_mock: bool) -> BackendArgs {
        BackendArgs {
            api_url: Some(format!("{}/api/v1", server.uri())),
            no_mock,
        }
    }

    async fn failing_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        server
    }

    // ── argument parsing ─────────────────────────────────────────────

    #[test]
    fn parse_component_valid() {
        assert_eq!(parse_component("14=-2.5").unwrap(), (14, -2.5));
        assert_eq!(parse_component("v17 = 0.3").unwrap(), (17, 0.3));
    }

    #[test]
    fn parse_component_invalid() {
        assert!(parse_component("14").is_err());
        assert!(parse_component("x=1").is_err());
        assert!(parse_component("3=abc").is_err());
    }

    #[test]
    fn parse_risk_and_sort() {
        assert_eq!(parse_risk_level("high").unwrap(), RiskLevel::High);
        assert!(parse_risk_level("extreme").is_err());
        assert_eq!(parse_sort_field("risk").unwrap(), SortField::RiskScore);
        assert!(parse_sort_field("name").is_err());
    }

    #[test]
    fn cli_parses_history_flags() {
        let cli = Cli::try_parse_from([
            "fraudshield",
            "--no-mock",
            "history",
            "--page",
            "3",
            "--limit",
            "50",
            "--risk-level",
            "critical",
            "--fraud",
            "true",
            "--sort",
            "amount",
            "--asc",
        ])
        .unwrap();
        assert!(cli.backend.no_mock);
        let Command::Page(PageCommand::History(args)) = cli.command else {
            panic!("expected history command");
        };
        assert_eq!(args.page, 3);
        assert_eq!(args.limit, 50);
        assert_eq!(args.risk_level, Some(RiskLevel::Critical));
        assert_eq!(args.fraud, Some(true));
        assert_eq!(args.sort, SortField::Amount);
        assert!(args.asc);
    }

    #[test]
    fn cli_parses_repeated_components() {
        let cli = Cli::try_parse_from([
            "fraudshield",
            "check",
            "--amount",
            "120.5",
            "--component",
            "1=0.5",
            "--component",
            "28=-1",
        ])
        .unwrap();
        let Command::Page(PageCommand::Check(args)) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(args.amount, 120.5);
        assert_eq!(args.components, vec![(1, 0.5), (28, -1.0)]);
    }

    // ── history view setup ───────────────────────────────────────────

    fn history_args(sort: SortField, asc: bool) -> HistoryArgs {
        HistoryArgs {
            page: 2,
            limit: 10,
            risk_level: None,
            fraud: Some(false),
            sort,
            asc,
        }
    }

    #[test]
    fn history_view_keeps_requested_page_after_filters() {
        let view = history_view(&history_args(SortField::Timestamp, false));
        assert_eq!(view.query().page, 2);
        assert_eq!(view.query().items_per_page, 10);
        assert_eq!(view.query().is_fraud, Some(false));
    }

    #[test]
    fn history_view_default_sort_is_newest_first() {
        let view = history_view(&history_args(SortField::Timestamp, false));
        assert_eq!(view.sort_state().field, SortField::Timestamp);
        assert_eq!(view.sort_state().direction, SortDirection::Descending);
    }

    #[test]
    fn history_view_ascending_sort() {
        let view = history_view(&history_args(SortField::Amount, true));
        assert_eq!(view.sort_state().field, SortField::Amount);
        assert_eq!(view.sort_state().direction, SortDirection::Ascending);

        let by_time = history_view(&history_args(SortField::Timestamp, true));
        assert_eq!(by_time.sort_state().direction, SortDirection::Ascending);
    }

    // ── command handlers ─────────────────────────────────────────────

    #[tokio::test]
    async fn login_with_demo_account() {
        let args = LoginArgs {
            email: "demo@fraudshield.com".to_owned(),
            password: "demo123".to_owned(),
        };
        assert_eq!(cmd_login(&args).await.unwrap(), ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails() {
        let args = LoginArgs {
            email: "demo@fraudshield.com".to_owned(),
            password: "nope".to_owned(),
        };
        assert_eq!(cmd_login(&args).await.unwrap(), ExitCode::FAILURE);
    }

    #[tokio::test]
    async fn signup_with_taken_email_fails() {
        let args = SignupArgs {
            email: "admin@fraudshield.com".to_owned(),
            password: "pw".to_owned(),
            name: "Copy".to_owned(),
        };
        assert_eq!(cmd_signup(&args).await.unwrap(), ExitCode::FAILURE);
    }

    #[tokio::test]
    async fn overview_falls_back_to_mock_data() {
        let server = failing_server().await;
        let dashboard = connect(&backend(&server, false)).unwrap();
        let code = run_page(&dashboard, PageCommand::Overview).await.unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn overview_without_mock_fails() {
        let server = failing_server().await;
        let dashboard = connect(&backend(&server, true)).unwrap();
        let code = run_page(&dashboard, PageCommand::Overview).await.unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[tokio::test]
    async fn analytics_falls_back_to_mock_data() {
        let server = failing_server().await;
        let dashboard = connect(&backend(&server, false)).unwrap();
        let code = run_page(&dashboard, PageCommand::Analytics).await.unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn check_uses_mock_prediction_offline() {
        let server = failing_server().await;
        let dashboard = connect(&backend(&server, false)).unwrap();
        let args = CheckArgs {
            amount: 99.0,
            time: 10.0,
            components: vec![(14, -3.0)],
        };
        let code = run_page(&dashboard, PageCommand::Check(args)).await.unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn check_rejects_out_of_range_component() {
        let server = failing_server().await;
        let dashboard = connect(&backend(&server, false)).unwrap();
        let args = CheckArgs {
            amount: 99.0,
            time: 0.0,
            components: vec![(29, 1.0)],
        };
        let code = run_page(&dashboard, PageCommand::Check(args)).await.unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[tokio::test]
    async fn history_renders_backend_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/predict/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"transaction_id": "txn_1", "amount": 4200, "risk_score": 80, "risk_level": "HIGH", "is_fraud": true},
                    {"transaction_id": "txn_2", "amount": 1250, "risk_score": 5, "risk_level": "LOW"}
                ],
                "page": 1,
                "total_items": 2,
                "total_pages": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dashboard = connect(&backend(&server, true)).unwrap();
        let code = run_page(
            &dashboard,
            PageCommand::History(history_args(SortField::Amount, false)),
        )
        .await
        .unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn clear_history_reports_backend_failure() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/predict/history"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dashboard = connect(&backend(&server, false)).unwrap();
        let code = run_page(&dashboard, PageCommand::ClearHistory).await.unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[tokio::test]
    async fn chat_prints_assistant_verdict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "session_id": "s-9",
                "tx": {"amount": 3500.0, "attempts_10min": 7},
                "result": {"risk_score": 100, "decision": "BLOQUEAR", "advice": "Block it."},
                "reply": "Score 100/100"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dashboard = connect(&backend(&server, false)).unwrap();
        let args = ChatArgs {
            message: "tx amount=3500 attempts=7".to_owned(),
            session: None,
        };
        let code = run_page(&dashboard, PageCommand::Chat(args)).await.unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn chat_has_no_offline_fallback() {
        let server = failing_server().await;
        let dashboard = connect(&backend(&server, false)).unwrap();
        let args = ChatArgs {
            message: "hola".to_owned(),
            session: Some("s-1".to_owned()),
        };
        let code = run_page(&dashboard, PageCommand::Chat(args)).await.unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }
}

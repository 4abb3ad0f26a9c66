//! Bloom CLI - Command-line interface for Bloom Core
//!
//! Commands:
//! - predict: Predict phase and next period from a cycle history
//! - calendar: Classify every day in a date range
//! - stats: Summarize a cycle history
//! - reply: Answer a single chat message
//! - chat: Interactive conversation on stdin
//! - doctor: Diagnose configuration

use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bloom_core::chat::{ChatContext, ChatSession, ReplyEngine};
use bloom_core::cycle::{
    cycle_insight, parse_date, phase_tip, CalendarDay, CycleHistory, CyclePrediction,
    CyclePredictor, PredictorConfig, MAX_PERIOD_LENGTH_DAYS,
};
use bloom_core::{CycleError, BLOOM_VERSION, PRODUCER_NAME};

/// Environment variable controlling log output
const LOG_ENV: &str = "BLOOM_LOG";

/// Bloom - On-device cycle prediction and wellness replies
#[derive(Parser)]
#[command(name = "bloom")]
#[command(version = BLOOM_VERSION)]
#[command(about = "Cycle predictions and wellness chat replies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the current phase and next period
    Predict {
        /// Cycle history file (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<String>,

        /// Predictor config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Classify every day in a date range
    Calendar {
        /// Cycle history file (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// First date (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Last date (YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// Predictor config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Summarize a cycle history
    Stats {
        /// Cycle history file (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Answer a single chat message
    Reply {
        /// Message to answer
        message: String,

        /// Chat context file (JSON)
        #[arg(long)]
        context: Option<PathBuf>,

        /// Seed for reproducible replies
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Interactive conversation, one message per line on stdin
    Chat {
        /// Chat context file (JSON), reloaded before every reply
        #[arg(long)]
        context: Option<PathBuf>,

        /// User name when no context file is given
        #[arg(long, default_value = "")]
        user: String,

        /// Seed for reproducible replies
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Diagnose configuration
    Doctor {
        /// Check a predictor config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Check a chat context file
        #[arg(long)]
        context: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// JSON array of cycle entries
    Json,
    /// Newline-delimited JSON (one entry per line)
    Ndjson,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable text
    Text,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), BloomCliError> {
    match cli.command {
        Commands::Predict {
            input,
            input_format,
            today,
            config,
            output_format,
        } => cmd_predict(
            &input,
            input_format,
            today.as_deref(),
            config.as_deref(),
            output_format,
        ),

        Commands::Calendar {
            input,
            input_format,
            from,
            to,
            config,
            output_format,
        } => cmd_calendar(
            &input,
            input_format,
            &from,
            &to,
            config.as_deref(),
            output_format,
        ),

        Commands::Stats {
            input,
            input_format,
            json,
        } => cmd_stats(&input, input_format, json),

        Commands::Reply {
            message,
            context,
            seed,
        } => cmd_reply(&message, context.as_deref(), seed),

        Commands::Chat {
            context,
            user,
            seed,
        } => cmd_chat(context.as_deref(), &user, seed),

        Commands::Doctor {
            config,
            context,
            json,
        } => cmd_doctor(config.as_deref(), context.as_deref(), json),
    }
}

fn cmd_predict(
    input: &Path,
    input_format: InputFormat,
    today: Option<&str>,
    config: Option<&Path>,
    output_format: OutputFormat,
) -> Result<(), BloomCliError> {
    let history = load_history(input, &input_format)?;
    let predictor = load_predictor(config)?;
    let today = match today {
        Some(value) => parse_date(value)?,
        None => chrono::Local::now().date_naive(),
    };

    info!(entries = history.len(), %today, "predicting cycle");
    let prediction = predictor.predict(&history, today)?;

    match output_format {
        OutputFormat::Text => print!("{}", format_prediction(&prediction)),
        OutputFormat::Json => println!("{}", serde_json::to_string(&prediction)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(&prediction)?),
    }

    Ok(())
}

fn cmd_calendar(
    input: &Path,
    input_format: InputFormat,
    from: &str,
    to: &str,
    config: Option<&Path>,
    output_format: OutputFormat,
) -> Result<(), BloomCliError> {
    let history = load_history(input, &input_format)?;
    let predictor = load_predictor(config)?;
    let from = parse_date(from)?;
    let to = parse_date(to)?;

    info!(entries = history.len(), %from, %to, "building calendar");
    let days = predictor.calendar(&history, from, to)?;

    match output_format {
        OutputFormat::Text => print!("{}", format_calendar(&days)),
        OutputFormat::Json => println!("{}", serde_json::to_string(&days)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(&days)?),
    }

    Ok(())
}

fn cmd_stats(input: &Path, input_format: InputFormat, json: bool) -> Result<(), BloomCliError> {
    let history = load_history(input, &input_format)?;
    let stats = CyclePredictor::default().stats(&history);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let days = |value: Option<f32>| {
        value
            .map(|v| format!("{:.1} days", v))
            .unwrap_or_else(|| "n/a".to_string())
    };
    let whole_days = |value: Option<i64>| {
        value
            .map(|v| format!("{} days", v))
            .unwrap_or_else(|| "n/a".to_string())
    };

    println!("Cycle Statistics");
    println!("================");
    println!("Logged periods:   {}", stats.total_cycles);
    println!("Average cycle:    {}", days(stats.avg_cycle_length));
    println!("Average period:   {}", days(stats.avg_period_length));
    println!("Shortest cycle:   {}", whole_days(stats.shortest_cycle));
    println!("Longest cycle:    {}", whole_days(stats.longest_cycle));
    if let Some(last) = stats.last_period_start {
        println!("Last period:      {}", last);
    }
    println!("\n{}", cycle_insight(&stats));

    Ok(())
}

fn cmd_reply(message: &str, context: Option<&Path>, seed: Option<u64>) -> Result<(), BloomCliError> {
    let ctx = match context {
        Some(path) => load_context(path)?,
        None => ChatContext::default(),
    };
    let mut engine = build_engine(seed);
    let mut session = ChatSession::new();

    println!("{}", engine.reply_in_session(message, &ctx, &mut session));
    Ok(())
}

fn cmd_chat(context: Option<&Path>, user: &str, seed: Option<u64>) -> Result<(), BloomCliError> {
    let mut engine = build_engine(seed);
    let mut session = ChatSession::new();
    let interactive = atty::is(atty::Stream::Stdin);

    info!(session_id = %session.id, "chat session started");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    if interactive {
        write!(stdout, "> ")?;
        stdout.flush()?;
    }

    for line in stdin.lock().lines() {
        let line = line?;
        if matches!(line.trim(), "quit" | "exit") {
            break;
        }

        // Reload so edits to the context file show up mid-conversation
        let ctx = match context {
            Some(path) => load_context(path)?,
            None => ChatContext::new(user),
        };

        let reply = engine.reply_in_session(&line, &ctx, &mut session);
        writeln!(stdout, "{}\n", reply)?;

        if interactive {
            write!(stdout, "> ")?;
        }
        stdout.flush()?;
    }

    info!(session_id = %session.id, turns = session.turns, "chat session ended");
    Ok(())
}

fn cmd_doctor(
    config: Option<&Path>,
    context: Option<&Path>,
    json: bool,
) -> Result<(), BloomCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Bloom Core version {}", BLOOM_VERSION),
    });

    if let Some(path) = config {
        checks.push(check_file(path, "config", |content| {
            PredictorConfig::from_json(content)
                .map(|c| {
                    format!(
                        "Config valid (default cycle {} days, window {} cycles)",
                        c.default_cycle_length, c.trailing_window
                    )
                })
                .map_err(|e| format!("Invalid config JSON: {}", e))
        }));
    } else {
        let defaults = PredictorConfig::default();
        checks.push(DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "Using defaults (default cycle {} days, window {} cycles)",
                defaults.default_cycle_length, defaults.trailing_window
            ),
        });
    }

    if let Some(path) = context {
        checks.push(check_file(path, "context", |content| {
            ChatContext::from_json(content)
                .map(|ctx| {
                    let missing = ctx.missing_metrics().len();
                    match ctx.valid_mind_score() {
                        Some(score) => format!(
                            "Context valid (mind score {}, {} metrics not logged)",
                            score, missing
                        ),
                        None => format!(
                            "Context valid (no mind score, {} metrics not logged)",
                            missing
                        ),
                    }
                })
                .map_err(|e| format!("Invalid context JSON: {}", e))
        }));
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive chat)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (scripted chat ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: BLOOM_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Bloom Doctor Report");
        println!("===================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(BloomCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn read_input(input: &Path) -> Result<String, BloomCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        debug!(path = %input.display(), "reading input");
        Ok(fs::read_to_string(input)?)
    }
}

fn load_history(input: &Path, input_format: &InputFormat) -> Result<CycleHistory, BloomCliError> {
    let data = read_input(input)?;
    let history = match input_format {
        InputFormat::Json => CycleHistory::parse_array(&data)?,
        InputFormat::Ndjson => CycleHistory::parse_ndjson(&data)?,
    };
    debug!(entries = history.len(), "loaded cycle history");
    Ok(history)
}

fn load_predictor(config: Option<&Path>) -> Result<CyclePredictor, BloomCliError> {
    let config = match config {
        Some(path) => {
            debug!(path = %path.display(), "loading predictor config");
            PredictorConfig::from_json(&fs::read_to_string(path)?)?
        }
        None => PredictorConfig::default(),
    };
    Ok(CyclePredictor::new(config))
}

fn load_context(path: &Path) -> Result<ChatContext, BloomCliError> {
    debug!(path = %path.display(), "loading chat context");
    Ok(ChatContext::from_json(&fs::read_to_string(path)?)?)
}

fn build_engine(seed: Option<u64>) -> ReplyEngine {
    match seed {
        Some(seed) => ReplyEngine::with_seed(seed),
        None => ReplyEngine::new(),
    }
}

fn check_file(
    path: &Path,
    name: &str,
    validate: impl Fn(&str) -> Result<String, String>,
) -> DoctorCheck {
    if !path.exists() {
        return DoctorCheck {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: format!("{} does not exist", path.display()),
        };
    }

    match fs::read_to_string(path) {
        Ok(content) => match validate(&content) {
            Ok(message) => DoctorCheck {
                name: name.to_string(),
                status: CheckStatus::Ok,
                message,
            },
            Err(message) => DoctorCheck {
                name: name.to_string(),
                status: CheckStatus::Error,
                message,
            },
        },
        Err(e) => DoctorCheck {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: format!("Cannot read {}: {}", path.display(), e),
        },
    }
}

fn format_prediction(prediction: &CyclePrediction) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", prediction.summary()));
    out.push_str(&format!(
        "Next period:     {} to {}",
        prediction.next_period_date, prediction.next_period_end
    ));
    if prediction.days_late > 0 {
        out.push_str(&format!(" ({} days late)\n", prediction.days_late));
    } else {
        out.push_str(&format!(
            " (in {} days)\n",
            prediction.days_until_next_period
        ));
    }
    out.push_str(&format!("Ovulation:       {}\n", prediction.ovulation_date));
    match prediction.fertile_window {
        Some(window) => out.push_str(&format!(
            "Fertile window:  {} to {}\n",
            window.start, window.end
        )),
        None => out.push_str("Fertile window:  n/a\n"),
    }
    out.push_str(&format!(
        "Confidence:      {:.0}%\n",
        prediction.confidence * 100.0
    ));
    out.push_str(&format!("\nTip: {}\n", phase_tip(prediction.state.phase)));
    out.push_str(&format!("Insight: {}\n", prediction.insight));
    out
}

fn format_calendar(days: &[CalendarDay]) -> String {
    let mut out = String::new();
    let mut current_month: Option<(i32, u32)> = None;
    for day in days {
        let month = (day.date.year(), day.date.month());
        if current_month != Some(month) {
            out.push_str(&format!("\n{}\n", day.date.format("%B %Y")));
            current_month = Some(month);
        }
        out.push_str(&format!(
            "  {}  day {:>2}  {:<9}{}\n",
            format_day(day.date),
            day.day_of_cycle,
            day.phase.as_str(),
            if day.projected { "  (projected)" } else { "" }
        ));
    }
    out
}

fn format_day(date: NaiveDate) -> String {
    date.format("%a %d").to_string()
}

// Error types

#[derive(Debug)]
enum BloomCliError {
    Io(io::Error),
    Cycle(CycleError),
    Json(serde_json::Error),
    DoctorFailed,
}

impl From<io::Error> for BloomCliError {
    fn from(e: io::Error) -> Self {
        BloomCliError::Io(e)
    }
}

impl From<CycleError> for BloomCliError {
    fn from(e: CycleError) -> Self {
        BloomCliError::Cycle(e)
    }
}

impl From<serde_json::Error> for BloomCliError {
    fn from(e: serde_json::Error) -> Self {
        BloomCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<BloomCliError> for CliError {
    fn from(e: BloomCliError) -> Self {
        match e {
            BloomCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            BloomCliError::Cycle(e) => cycle_cli_error(e),
            BloomCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            BloomCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

fn cycle_cli_error(e: CycleError) -> CliError {
    let message = e.to_string();
    let (code, hint) = match e {
        CycleError::NoHistory => (
            "NO_HISTORY",
            "Log a first period before asking for predictions".to_string(),
        ),
        CycleError::InvalidCycleEntry { .. } => (
            "INVALID_ENTRY",
            format!(
                "Entries need a period_length between 1 and {} days and distinct start dates",
                MAX_PERIOD_LENGTH_DAYS
            ),
        ),
        CycleError::TodayBeforeLastPeriod { .. } => (
            "DATE_BEFORE_LAST_PERIOD",
            "Pass a --today on or after the most recent period start".to_string(),
        ),
        CycleError::DateOutOfRange { .. } => (
            "DATE_OUT_OF_RANGE",
            "Check the start dates in the history for typos".to_string(),
        ),
        CycleError::InvalidRange { .. } => (
            "INVALID_RANGE",
            "Use a --from date on or before --to".to_string(),
        ),
        CycleError::DateParse(_) => (
            "DATE_PARSE_ERROR",
            "Dates use the YYYY-MM-DD format".to_string(),
        ),
        CycleError::Json(_) => ("JSON_ERROR", "Check JSON syntax".to_string()),
    };

    CliError {
        code: code.to_string(),
        message,
        hint: Some(hint),
    }
}

// Report types

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

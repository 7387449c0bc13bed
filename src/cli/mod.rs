//! CLI command implementations for portwatch.
//!
//! Provides subcommand handlers for:
//! - `portwatch chat [MESSAGE]`: one-shot or interactive assistant chat
//! - `portwatch ports`: monitored ports with risk scores
//! - `portwatch route ORIGIN DEST`: shipping route analysis
//! - `portwatch report`: standard, custom, and PDF reports
//! - `portwatch health`: agent service, config, activity log
//! - `portwatch activity`: per-endpoint call statistics
//! - `portwatch config show|init|set|reset`: configuration management

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;

use crate::agent::{AgentClient, ChatOutcome, PortRiskRecord, RiskLevel};
use crate::analytics::logger;
use crate::analytics::reporter::{self, ActivityStats};
use crate::config::{self, PortwatchConfig};
use crate::session::{ConversationSession, QuickAction};
use crate::views::assistant::{self, ChatStatus};
use crate::views::dashboard::{Badge, DashboardSummary};
use crate::views::reports::{self, PDF_UNAVAILABLE, ReportType};
use crate::views::routes::{self, AnalysisView};

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// portwatch chat
// ---------------------------------------------------------------------------

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ChatInput {
    Message(String),
    Quick(QuickAction),
    Clear,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

fn parse_chat_input(line: &str) -> ChatInput {
    let line = line.trim();
    if line.is_empty() {
        return ChatInput::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return ChatInput::Message(line.to_string());
    };

    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(n, a)| (n, a.trim()));
    match name {
        "quit" | "exit" | "q" => ChatInput::Quit,
        "clear" => ChatInput::Clear,
        "help" => ChatInput::Help,
        "quick" => match arg.parse::<QuickAction>() {
            Ok(action) => ChatInput::Quick(action),
            Err(e) => ChatInput::Invalid(e.to_string()),
        },
        other => ChatInput::Invalid(format!("unknown command '/{other}' (try /help)")),
    }
}

/// Send one message, or start an interactive session when none is given.
pub fn run_chat(cfg: &PortwatchConfig, message: Option<&str>) -> Result<()> {
    let client = AgentClient::from_config(cfg);
    let mut session = ConversationSession::new(cfg.session.dedup_window);

    if let Some(message) = message {
        match assistant::submit_message(&client, &mut session, message) {
            Some(outcome) => print_chat_outcome(&outcome),
            None => println!("{}", "Nothing to send.".yellow()),
        }
        return Ok(());
    }

    println!("{}", "portwatch AI Supply Chain Assistant".bold().cyan());
    println!("{}", "=".repeat(50));
    println!(
        "  {} {}",
        "Conversation:".dimmed(),
        client.conversation_id().dimmed()
    );
    print_chat_help();

    let stdin = io::stdin();
    loop {
        print!("{} ", "you>".bold().blue());
        io::stdout().flush().context("failed to flush stdout")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_chat_input(&line) {
            ChatInput::Empty => {}
            ChatInput::Quit => break,
            ChatInput::Help => print_chat_help(),
            ChatInput::Invalid(msg) => println!("{}", msg.yellow()),
            ChatInput::Message(text) => {
                if let Some(outcome) = assistant::submit_message(&client, &mut session, &text) {
                    print_chat_outcome(&outcome);
                }
            }
            ChatInput::Quick(action) => {
                println!("{} {}", "→".dimmed(), action.query().dimmed());
                match assistant::trigger_quick_action(&client, &mut session, action) {
                    Some(outcome) => print_chat_outcome(&outcome),
                    None => println!(
                        "{}",
                        "Already asked recently; skipping duplicate quick action.".yellow()
                    ),
                }
            }
            ChatInput::Clear => {
                if assistant::clear_conversation(&client, &mut session) {
                    println!("{} Conversation cleared!", "✓".green().bold());
                } else {
                    println!(
                        "{} Could not clear history on the agent service; transcript kept.",
                        "✗".red().bold()
                    );
                }
            }
        }
    }

    Ok(())
}

fn print_chat_help() {
    println!();
    println!("  {}", "Commands:".bold());
    for action in QuickAction::ALL {
        println!(
            "    /quick {:<10} {}",
            action.as_str(),
            action.label().dimmed()
        );
    }
    println!("    /clear            {}", "clear the conversation".dimmed());
    println!("    /quit             {}", "leave".dimmed());
    println!();
}

fn print_chat_outcome(outcome: &ChatOutcome) {
    let status = ChatStatus::of(outcome);
    if status == ChatStatus::Failed {
        println!("{} {}", "✗".red().bold(), outcome.response.red());
        println!("  {}", status.message().dimmed());
        return;
    }

    let tag = if assistant::uses_tools(&outcome.response) {
        "assistant (tools)>".bold().purple()
    } else {
        "assistant>".bold().green()
    };
    println!("{tag} {}", outcome.response);
    let note = status.message();
    match status {
        ChatStatus::AgentUsed => println!("  {}", note.green().dimmed()),
        _ => println!("  {}", note.dimmed()),
    }
    println!();
}

// ---------------------------------------------------------------------------
// portwatch ports
// ---------------------------------------------------------------------------

/// List monitored ports, riskiest first, with dashboard KPIs.
pub fn run_ports(cfg: &PortwatchConfig, format: OutputFormat) -> Result<()> {
    let client = AgentClient::from_config(cfg);
    let records = client.fetch_port_risks();

    match format {
        OutputFormat::Json => {
            let summary = DashboardSummary::from_records(&records);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Csv => print_ports_csv(&records),
        OutputFormat::Table => print_ports_table(&records),
    }

    Ok(())
}

fn print_ports_table(records: &[PortRiskRecord]) {
    let summary = DashboardSummary::from_records(records);

    println!("{}", "Supply Chain Risk Dashboard".bold().cyan());
    println!("{}", "=".repeat(60));
    println!();
    println!("  {} {}", "Ports monitored:".bold(), summary.ports_monitored);
    println!(
        "  {} {}",
        "Average risk:   ".bold(),
        format_risk(summary.avg_risk)
    );
    println!("  {} {}", "High risk ports:".bold(), summary.high_risk_count);
    println!(
        "  {} {}",
        "News mentions:  ".bold(),
        summary.total_news_mentions
    );

    let dist: Vec<String> = summary
        .distribution
        .iter()
        .map(|c| format!("{}: {}", colorize_level(c.level), c.count))
        .collect();
    println!("  {} {}", "Distribution:   ".bold(), dist.join("  "));
    println!();

    let mut sorted: Vec<&PortRiskRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.overall_risk.total_cmp(&a.overall_risk));

    println!(
        "  {:<18} {:<14} {:>8} {:<8} {:>9} {:>6}",
        "Port", "Country", "Risk", "Level", "Disasters", "News"
    );
    println!("  {}", "-".repeat(68));
    for r in sorted {
        let risk = format!("{:>8}", format_risk(r.overall_risk));
        let risk = match Badge::for_risk(r.overall_risk) {
            Badge::High => risk.red(),
            Badge::Medium => risk.yellow(),
            Badge::Low => risk.green(),
        };
        println!(
            "  {:<18} {:<14} {} {:<8} {:>9} {:>6}",
            truncate(&r.port_name, 18),
            truncate(&r.country, 14),
            risk,
            r.risk_level.as_str(),
            r.nearby_disasters_count,
            r.news_mentions,
        );
    }
}

fn print_ports_csv(records: &[PortRiskRecord]) {
    println!("port_name,country,overall_risk,risk_level,nearby_disasters_count,news_mentions");
    for r in records {
        println!(
            "{},{},{:.3},{},{},{}",
            r.port_name,
            r.country,
            r.overall_risk,
            r.risk_level,
            r.nearby_disasters_count,
            r.news_mentions,
        );
    }
}

// ---------------------------------------------------------------------------
// portwatch route
// ---------------------------------------------------------------------------

/// Analyze a shipping route, optionally asking a follow-up question.
pub fn run_route(
    cfg: &PortwatchConfig,
    origin: &str,
    destination: &str,
    follow_up: Option<&str>,
) -> Result<()> {
    let client = AgentClient::from_config(cfg);

    println!(
        "{}",
        format!("Route Analysis: {origin} → {destination}")
            .bold()
            .cyan()
    );
    println!("{}", "=".repeat(50));

    let Some(view) = routes::analyze(&client, origin, destination) else {
        println!(
            "{} Route analysis unavailable (agent service unreachable or failed).",
            "✗".red().bold()
        );
        return Ok(());
    };

    println!("  {} {}", "Route risk:  ".bold(), format_risk(view.route_risk));
    println!("  {} {}", "Risk level:  ".bold(), view.risk_level);
    println!(
        "  {} {}",
        "Agent used:  ".bold(),
        if view.agent_used { "yes" } else { "no" }
    );
    println!("  {} {}", "Analysis:    ".bold(), view.analysis_type);
    println!();

    match &view.analysis {
        AnalysisView::Text { text, .. } => println!("{text}"),
        AnalysisView::Structured { fields } => {
            println!("{}", serde_json::to_string_pretty(fields)?);
        }
    }

    if let Some(question) = follow_up.map(str::trim).filter(|q| !q.is_empty()) {
        println!();
        println!("{} {}", "Follow-up:".bold().cyan(), question);
        let outcome = routes::follow_up(&client, origin, destination, question);
        print_chat_outcome(&outcome);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// portwatch report
// ---------------------------------------------------------------------------

/// Options for `portwatch report`.
#[derive(Debug, Default)]
pub struct ReportOptions<'a> {
    pub report_type: Option<&'a str>,
    pub focus: Option<&'a str>,
    pub out_dir: Option<&'a Path>,
    pub pdf: bool,
}

/// Generate a standard or custom report, optionally saving it to disk.
pub fn run_report(cfg: &PortwatchConfig, opts: &ReportOptions<'_>) -> Result<()> {
    let client = AgentClient::from_config(cfg);

    if let Some(focus) = opts.focus {
        println!("{}", "Custom Risk Intelligence Report".bold().cyan());
        println!("{}", "=".repeat(50));
        let outcome = reports::custom_report(&client, focus);
        print_chat_outcome(&outcome);
        return Ok(());
    }

    let report_type: ReportType = match opts.report_type {
        Some(name) => name.parse()?,
        None => ReportType::ExecutiveSummary,
    };

    println!("{}", format!("{report_type} Report").bold().cyan());
    println!("  {}", report_type.description().dimmed());
    println!("{}", "=".repeat(50));

    let Some(stored) = reports::generate(&client, report_type) else {
        println!("{} Report generation failed.", "✗".red().bold());
        return Ok(());
    };
    println!("{}", stored.text);
    println!();

    if let Some(dir) = opts.out_dir {
        let path = dir.join(reports::report_filename(stored.generated_at, "txt"));
        std::fs::write(&path, &stored.text)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("{} Saved {}", "✓".green().bold(), path.display());
    }

    if opts.pdf {
        match client.fetch_pdf_report() {
            Some(bytes) => {
                let dir = opts.out_dir.unwrap_or_else(|| Path::new("."));
                let path = dir.join(reports::report_filename(Local::now(), "pdf"));
                std::fs::write(&path, bytes)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("{} Saved {}", "✓".green().bold(), path.display());
            }
            None => println!("{}", PDF_UNAVAILABLE.yellow()),
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// portwatch health
// ---------------------------------------------------------------------------

/// Check the agent service, config files, and activity log.
pub fn run_health(cfg: &PortwatchConfig) -> Result<()> {
    println!("{}", "portwatch Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    // 1. Agent service
    let client = AgentClient::from_config(cfg);
    let status = client.check_health();
    print_health_item(
        "Agent service",
        status.connected,
        &if status.connected {
            format!("reachable at {}", client.base_url())
        } else {
            format!("not reachable at {}", client.base_url())
        },
    );
    if status.connected {
        print_health_item(
            "Agent initialized",
            status.agent_initialized,
            if status.agent_initialized {
                "enhanced agent ready"
            } else {
                "basic responses only"
            },
        );
    }

    // 2. Config files
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.portwatch/config.toml found"
        } else {
            "not found (run `portwatch config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".portwatch.toml found"
        } else {
            "none (optional)"
        },
    );

    // 3. Activity log
    let log_exists = logger::activity_log_path()
        .map(|p| p.exists())
        .unwrap_or(false);
    let detail = if !cfg.logging.enabled {
        "disabled".to_string()
    } else if log_exists {
        format!("{} entries", logger::read_all_entries().len())
    } else {
        "no log file yet".to_string()
    };
    print_health_item("Activity log", cfg.logging.enabled && log_exists, &detail);

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// portwatch activity
// ---------------------------------------------------------------------------

/// Show per-endpoint call statistics from the activity log.
pub fn run_activity(format: OutputFormat, days: Option<u32>) -> Result<()> {
    let stats = reporter::compute_stats(days);

    if stats.total_calls == 0 {
        println!(
            "{}",
            "No activity yet. Use the dashboard or CLI to call the agent service.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_activity_json(&stats)?,
        OutputFormat::Csv => print_activity_csv(&stats),
        OutputFormat::Table => print_activity_table(&stats),
    }

    Ok(())
}

fn print_activity_table(stats: &ActivityStats) {
    println!("{}", "Agent Service Activity".bold().cyan());
    println!("{}", "=".repeat(60));
    println!();
    println!("  {} {}", "Total calls:".bold(), stats.total_calls);
    println!(
        "  {} {} ({:.1}%)",
        "Failures:   ".bold(),
        stats.total_failures,
        stats.failure_pct()
    );
    println!();

    println!(
        "  {:<26} {:>6} {:>8} {:>8} {:>9} Error",
        "Endpoint", "Calls", "Failed", "Fail %", "Avg ms"
    );
    println!("  {}", "-".repeat(70));
    for (i, ep) in stats.endpoint_stats.iter().enumerate() {
        let line = format!(
            "  {:<26} {:>6} {:>8} {:>7.1}% {:>9} {}",
            truncate(&ep.endpoint, 26),
            ep.calls,
            ep.failures,
            ep.failure_pct,
            ep.avg_latency_ms,
            ep.primary_error.as_deref().unwrap_or("-"),
        );
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_activity_json(stats: &ActivityStats) -> Result<()> {
    let value = serde_json::json!({
        "total_calls": stats.total_calls,
        "total_failures": stats.total_failures,
        "failure_pct": stats.failure_pct(),
        "endpoints": stats.endpoint_stats.iter().map(|e| serde_json::json!({
            "endpoint": e.endpoint,
            "calls": e.calls,
            "failures": e.failures,
            "failure_pct": e.failure_pct,
            "avg_latency_ms": e.avg_latency_ms,
            "primary_error": e.primary_error,
        })).collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_activity_csv(stats: &ActivityStats) {
    println!("endpoint,calls,failures,failure_pct,avg_latency_ms,primary_error");
    for e in &stats.endpoint_stats {
        println!(
            "{},{},{},{:.1},{},{}",
            e.endpoint,
            e.calls,
            e.failures,
            e.failure_pct,
            e.avg_latency_ms,
            e.primary_error.as_deref().unwrap_or(""),
        );
    }
}

// ---------------------------------------------------------------------------
// portwatch config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective portwatch Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    // Show source info
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.portwatch/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.portwatch/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".portwatch.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            ".portwatch.toml (not found)".dimmed()
        );
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "PORTWATCH_* environment variables".dimmed()
    );

    Ok(())
}

/// Initialize a default config file at `~/.portwatch/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Edit the file to point portwatch at your agent service.".dimmed()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Risk score as a percentage, e.g. `0.266` → `26.6%`.
fn format_risk(risk: f64) -> String {
    format!("{:.1}%", risk * 100.0)
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

fn colorize_level(level: RiskLevel) -> colored::ColoredString {
    match level {
        RiskLevel::High => level.as_str().red(),
        RiskLevel::Medium => level.as_str().yellow(),
        RiskLevel::Low => level.as_str().green(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

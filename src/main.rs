use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use portwatch::cli::{self, OutputFormat, ReportOptions};
use portwatch::{config, web};

#[derive(Debug, Parser)]
#[command(name = "portwatch")]
#[command(about = "AI supply chain intelligence: port risks, routes, and reports")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the web dashboard
    Web {
        /// Address to bind (default from config: 127.0.0.1:8501)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser window
        #[arg(long)]
        no_browser: bool,
    },
    /// Chat with the AI assistant; interactive when no message is given
    Chat {
        /// Message to send
        message: Option<String>,
    },
    /// Show monitored ports and their risk scores
    Ports {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Analyze a shipping route between two ports
    Route {
        origin: String,
        destination: String,
        /// Ask a follow-up question about the route
        #[arg(long)]
        follow_up: Option<String>,
    },
    /// Generate a risk intelligence report
    Report {
        /// Report type, e.g. "Executive Summary" (default)
        #[arg(long = "type")]
        report_type: Option<String>,
        /// Generate a custom report focusing on these areas instead
        #[arg(long, conflicts_with = "report_type")]
        focus: Option<String>,
        /// Directory to save the report into
        #[arg(long)]
        out: Option<PathBuf>,
        /// Also download the PDF report
        #[arg(long)]
        pdf: bool,
    },
    /// Check the agent service, config, and activity log
    Health,
    /// Show agent service call statistics
    Activity {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        /// Only include the last N days of data
        #[arg(long)]
        days: Option<u32>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config to ~/.portwatch/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `agent.base_url`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let cfg = config::load();

    match app.command {
        Commands::Web { addr, no_browser } => {
            let addr = addr.unwrap_or_else(|| cfg.web.bind.clone());
            let open = cfg.web.open_browser && !no_browser;
            web::serve(cfg, &addr, open)
        }
        Commands::Chat { message } => cli::run_chat(&cfg, message.as_deref()),
        Commands::Ports { format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_ports(&cfg, fmt)
        }
        Commands::Route {
            origin,
            destination,
            follow_up,
        } => cli::run_route(&cfg, &origin, &destination, follow_up.as_deref()),
        Commands::Report {
            report_type,
            focus,
            out,
            pdf,
        } => {
            let opts = ReportOptions {
                report_type: report_type.as_deref(),
                focus: focus.as_deref(),
                out_dir: out.as_deref(),
                pdf,
            };
            cli::run_report(&cfg, &opts)
        }
        Commands::Health => cli::run_health(&cfg),
        Commands::Activity { format, days } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_activity(fmt, days)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use riskaudit::cli::commands::audit::AuditOptions;
use riskaudit::cli::{ConfigOverrides, OutputFormat};

/// Parse output format from string
fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    s.parse()
}

#[derive(Parser)]
#[command(name = "riskaudit")]
#[command(
    version,
    about = "Multi-agent safety risk audit for social platform users"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit one user and print the safety report
    Audit {
        #[arg(help = "User ID to audit")]
        user_id: String,
        #[arg(long, help = "Directory with users.csv, posts.csv, interactions.csv")]
        data_dir: Option<PathBuf>,
        #[arg(long, help = "Policy text file")]
        policies: Option<PathBuf>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = parse_output_format,
            help = "Output format: text, json"
        )]
        format: OutputFormat,
        #[arg(long, help = "Write safety_report_<user>.txt into this directory")]
        export: Option<PathBuf>,
        #[arg(long, help = "Model to use")]
        model: Option<String>,
        #[arg(long, help = "Run detection agents one at a time")]
        sequential: bool,
    },

    /// List users in the dataset
    Users {
        #[arg(long, help = "Directory with users.csv, posts.csv, interactions.csv")]
        data_dir: Option<PathBuf>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = parse_output_format,
            help = "Output format: text, json"
        )]
        format: OutputFormat,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = parse_output_format,
            help = "Output format: text (TOML), json"
        )]
        format: OutputFormat,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mriskaudit encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            if let Some(category) = e
                .downcast_ref::<riskaudit::AuditError>()
                .and_then(|e| e.category())
            {
                eprintln!("  {}", category.hint());
            }
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Audit {
            user_id,
            data_dir,
            policies,
            format,
            export,
            model,
            sequential,
        } => {
            riskaudit::cli::commands::audit::run(AuditOptions {
                user_id,
                format,
                export,
                overrides: ConfigOverrides {
                    data_dir,
                    policies,
                    model,
                    sequential,
                },
            })?;
        }
        Commands::Users { data_dir, format } => {
            let overrides = ConfigOverrides {
                data_dir,
                ..Default::default()
            };
            riskaudit::cli::commands::users::run(&overrides, format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => {
                riskaudit::cli::commands::config::show(global, format)?;
            }
            ConfigAction::Path => {
                riskaudit::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                riskaudit::cli::commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}

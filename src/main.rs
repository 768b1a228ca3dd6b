use anyhow::Context;
use clap::Parser;
use small_storefront::config::{Command, RunCommand};
use small_storefront::core::run::{
    build_full_run, calculate_check_digit, format_keystrokes, is_check_digit_valid, Run,
};
use small_storefront::utils::error::ErrorSeverity;
use small_storefront::utils::{logger, validation::Validate};
use small_storefront::{CliConfig, StorefrontConfig, StorefrontError};

fn main() {
    let cli = CliConfig::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let exit_code = match e.downcast_ref::<StorefrontError>() {
                Some(err) => {
                    tracing::error!(
                        "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                        err,
                        err.category(),
                        err.severity()
                    );
                    eprintln!("❌ {}", err.user_friendly_message());
                    eprintln!("💡 Suggestion: {}", err.recovery_suggestion());
                    match err.severity() {
                        ErrorSeverity::Medium => 2,
                        ErrorSeverity::High => 1,
                        ErrorSeverity::Critical => 3,
                    }
                }
                None => {
                    eprintln!("❌ {:#}", e);
                    1
                }
            };
            std::process::exit(exit_code);
        }
    }
}

fn run(cli: CliConfig) -> anyhow::Result<i32> {
    if let Command::Run(command) = &cli.command {
        init_logging(&cli, None);
        return run_tools(command);
    }

    let config = StorefrontConfig::from_file(&cli.config)
        .with_context(|| format!("Failed to load config file '{}'", cli.config))?;
    init_logging(&cli, Some(&config));

    tracing::info!("🚀 Starting {} ({})", config.store.name, config.currency());
    tracing::debug!("Loaded configuration from {}", cli.config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e.into());
    }

    let session = config.build_session();
    let output = if matches!(cli.command, Command::Payments) {
        serde_json::to_string_pretty(&session.wallet().list())
    } else {
        serde_json::to_string_pretty(&session.addresses().list())
    }
    .map_err(StorefrontError::from)?;
    println!("{}", output);

    Ok(0)
}

fn init_logging(cli: &CliConfig, config: Option<&StorefrontConfig>) {
    let level = config.map(StorefrontConfig::log_level).unwrap_or("info");
    let json = cli.json_logs || config.is_some_and(StorefrontConfig::json_logs);
    logger::init_with_filter(&logger::filter_directive(level, cli.verbose), json);
}

fn run_tools(command: &RunCommand) -> anyhow::Result<i32> {
    match command {
        RunCommand::Format { raw } => {
            println!("{}", format_keystrokes(raw));
            Ok(0)
        }
        RunCommand::CheckDigit { body } => match calculate_check_digit(body) {
            Some(dv) => {
                println!("{}", dv);
                Ok(0)
            }
            None => {
                eprintln!("❌ Body must contain only digits: {}", body);
                Ok(1)
            }
        },
        RunCommand::Validate { body, check_digit } => {
            let Some(full) = build_full_run(body, check_digit) else {
                if !is_check_digit_valid(check_digit) {
                    eprintln!("❌ Check digit must be a single digit or K");
                } else {
                    eprintln!("❌ Body must have 7 or 8 digits");
                }
                return Ok(1);
            };

            let run = full.parse::<Run>().map_err(StorefrontError::from)?;
            println!("✅ {}", run);
            Ok(0)
        }
    }
}

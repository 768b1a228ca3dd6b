use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "small-storefront")]
#[command(about = "RUN tools and customer address/payment stores for a small storefront")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, default_value = "storefront.toml")]
    pub config: String,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// RUN formatting and validation
    #[command(subcommand)]
    Run(RunCommand),

    /// Print the bootstrapped addresses as JSON
    Addresses,

    /// Print the bootstrapped payment methods as JSON
    Payments,
}

#[derive(Debug, Clone, Subcommand)]
pub enum RunCommand {
    /// Reformat raw input the way the input field shows it
    Format { raw: String },

    /// Compute the check digit for a body
    CheckDigit { body: String },

    /// Check a body and check digit pair
    Validate { body: String, check_digit: String },
}

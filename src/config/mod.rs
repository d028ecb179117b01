pub mod relay;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "contact-relay")]
#[command(about = "Contact form relay: submit a message or run the handler locally")]
pub struct CliConfig {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Submit the contact form to a deployed endpoint
    Send {
        #[arg(long, default_value = "http://localhost:3000/api/submit-form")]
        endpoint: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        message: String,

        /// Verification widget token (g-recaptcha-response)
        #[arg(long)]
        token: Option<String>,

        /// Refuse to send without a verification token
        #[arg(long)]
        require_token: bool,
    },

    /// Run the submission handler once against a request event
    Invoke {
        /// TOML configuration file; environment variables are used when omitted
        #[arg(short, long)]
        config: Option<String>,

        /// Request event JSON file, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        request: String,
    },
}

use anyhow::Context;
use clap::Parser;
use contact_relay::config::Command;
use contact_relay::core::transport::{BUSY_LABEL, SUBMIT_LABEL};
use contact_relay::core::ContactForm;
use contact_relay::utils::{logger, validation::Validate};
use contact_relay::{
    build_handler, Banner, CliConfig, FormTransport, HttpRequest, RelayConfig, RelayError,
    TomlConfig,
};
use std::io::Read;

/// Contact form filled from command-line arguments; UI state goes to stderr.
struct TerminalForm {
    name: String,
    email: String,
    message: String,
    token: Option<String>,
    label: &'static str,
}

impl ContactForm for TerminalForm {
    fn fields(&self) -> Vec<(String, String)> {
        vec![
            ("name".to_string(), self.name.clone()),
            ("email".to_string(), self.email.clone()),
            ("message".to_string(), self.message.clone()),
        ]
    }

    fn verification_token(&self) -> Option<String> {
        self.token.clone()
    }

    fn set_busy(&mut self, busy: bool) {
        self.label = if busy { BUSY_LABEL } else { SUBMIT_LABEL };
        eprintln!("[{}]", self.label);
    }

    fn reset(&mut self) {
        self.name.clear();
        self.email.clear();
        self.message.clear();
        self.token = None;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);
    tracing::info!("Starting contact-relay CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    match config.command {
        Command::Send {
            endpoint,
            name,
            email,
            message,
            token,
            require_token,
        } => {
            let transport = FormTransport::new(endpoint).require_token(require_token);
            let banner = Banner::new();
            let mut form = TerminalForm {
                name,
                email,
                message,
                token,
                label: SUBMIT_LABEL,
            };

            let outcome = transport.submit(&mut form, &banner).await;
            if let Some(shown) = banner.current() {
                println!("{}", shown.text);
            }

            if !outcome.is_sent() {
                std::process::exit(1);
            }
        }
        Command::Invoke { config, request } => {
            let relay_config = match load_relay_config(config.as_deref()) {
                Ok(relay_config) => relay_config,
                Err(e) => {
                    tracing::error!("❌ Configuration failed: {}", e);
                    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                    eprintln!("❌ {}", e.user_friendly_message());
                    std::process::exit(1);
                }
            };

            let event = read_request(&request)
                .with_context(|| format!("failed to read request event from '{}'", request))?;

            let handler = build_handler(relay_config).context("failed to build handler")?;
            let response = handler.handle(&event).await;

            println!("{}", serde_json::to_string_pretty(&response)?);
            if response.status_code >= 400 {
                std::process::exit(2);
            }
        }
    }

    Ok(())
}

fn load_relay_config(path: Option<&str>) -> Result<RelayConfig, RelayError> {
    let relay_config = match path {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            TomlConfig::from_file(path)?.into_relay_config()
        }
        None => RelayConfig::from_env()?,
    };
    relay_config.validate()?;
    Ok(relay_config)
}

fn read_request(source: &str) -> Result<HttpRequest, RelayError> {
    let content = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(source)?
    };
    Ok(serde_json::from_str(&content)?)
}

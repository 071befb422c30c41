use std::io::{self, BufRead, Write};

use clap::{Args, Subcommand};

use crate::config::{StoredConfig, config_file_path};
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    writeln!(stdout, "Configuring zdraft.")?;
    writeln!(stdout, "Press Enter to keep the current value, '-' to clear it.")?;
    writeln!(
        stdout,
        "Secrets are stored in the local config file; protect your filesystem accordingly.\n"
    )?;

    run_wizard(&mut cfg, &mut stdin.lock(), &mut stdout)?;
    cfg.save()?;

    let path = config_file_path()?;
    writeln!(stdout, "\nConfiguration saved to {}", path.display())?;
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    for line in show_lines(&cfg) {
        println!("{line}");
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Setting {
    HelpdeskSubdomain,
    HelpdeskEmail,
    HelpdeskToken,
    HelpdeskBaseUrl,
    OpenAiApiKey,
    OpenAiModel,
    CompletionEndpoint,
    RequestTimeout,
}

impl Setting {
    const ALL: [Setting; 8] = [
        Setting::HelpdeskSubdomain,
        Setting::HelpdeskEmail,
        Setting::HelpdeskToken,
        Setting::HelpdeskBaseUrl,
        Setting::OpenAiApiKey,
        Setting::OpenAiModel,
        Setting::CompletionEndpoint,
        Setting::RequestTimeout,
    ];

    fn label(self) -> &'static str {
        match self {
            Setting::HelpdeskSubdomain => "Helpdesk subdomain",
            Setting::HelpdeskEmail => "Helpdesk agent email",
            Setting::HelpdeskToken => "Helpdesk API token",
            Setting::HelpdeskBaseUrl => "Helpdesk base URL",
            Setting::OpenAiApiKey => "OpenAI API key",
            Setting::OpenAiModel => "OpenAI model",
            Setting::CompletionEndpoint => "Completion endpoint",
            Setting::RequestTimeout => "Request timeout (seconds)",
        }
    }

    fn hint(self) -> Option<&'static str> {
        match self {
            Setting::HelpdeskSubdomain => Some("acme for acme.zendesk.com"),
            Setting::HelpdeskBaseUrl => Some("empty uses the subdomain host"),
            Setting::OpenAiModel => Some("empty uses gpt-4o-mini"),
            Setting::RequestTimeout => Some("empty uses 30"),
            _ => None,
        }
    }

    fn is_secret(self) -> bool {
        matches!(self, Setting::HelpdeskToken | Setting::OpenAiApiKey)
    }

    fn current(self, cfg: &StoredConfig) -> Option<String> {
        let value = match self {
            Setting::HelpdeskSubdomain => cfg.helpdesk_subdomain.clone(),
            Setting::HelpdeskEmail => cfg.helpdesk_email.clone(),
            Setting::HelpdeskToken => cfg.helpdesk_token.clone(),
            Setting::HelpdeskBaseUrl => cfg.helpdesk_base_url.clone(),
            Setting::OpenAiApiKey => cfg.openai_api_key.clone(),
            Setting::OpenAiModel => cfg.openai_model.clone(),
            Setting::CompletionEndpoint => cfg.completion_endpoint.clone(),
            Setting::RequestTimeout => cfg.request_timeout_secs.map(|secs| secs.to_string()),
        };
        value.filter(|v| !v.is_empty())
    }

    /// Leaves `cfg` untouched when the edit is rejected.
    fn apply(self, cfg: &mut StoredConfig, edit: Edit) -> AppResult<()> {
        let value = match edit {
            Edit::Keep => return Ok(()),
            Edit::Clear => None,
            Edit::Set(raw) => Some(raw),
        };
        let slot = match self {
            Setting::HelpdeskSubdomain => &mut cfg.helpdesk_subdomain,
            Setting::HelpdeskEmail => &mut cfg.helpdesk_email,
            Setting::HelpdeskToken => &mut cfg.helpdesk_token,
            Setting::HelpdeskBaseUrl => &mut cfg.helpdesk_base_url,
            Setting::OpenAiApiKey => &mut cfg.openai_api_key,
            Setting::OpenAiModel => &mut cfg.openai_model,
            Setting::CompletionEndpoint => &mut cfg.completion_endpoint,
            Setting::RequestTimeout => {
                cfg.request_timeout_secs = value.as_deref().map(parse_timeout).transpose()?;
                return Ok(());
            }
        };
        *slot = value;
        Ok(())
    }

    fn shown(self, cfg: &StoredConfig) -> String {
        match self.current(cfg) {
            None => "<not set>".to_string(),
            Some(value) if self.is_secret() => mask(&value),
            Some(value) if self == Setting::RequestTimeout => format!("{value}s"),
            Some(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Edit {
    Keep,
    Clear,
    Set(String),
}

impl Edit {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Edit::Keep,
            "-" => Edit::Clear,
            value => Edit::Set(value.to_string()),
        }
    }
}

fn parse_timeout(raw: &str) -> AppResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(AppError::Validation(
            "request timeout must be at least 1 second".to_string(),
        )),
        Ok(secs) => Ok(secs),
        Err(_) => Err(AppError::Validation(format!(
            "request timeout must be a whole number of seconds, got '{}'",
            raw.trim()
        ))),
    }
}

/// Walks every setting, asking again when a value is rejected.
fn run_wizard(
    cfg: &mut StoredConfig,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> AppResult<()> {
    for setting in Setting::ALL {
        loop {
            write!(output, "{}", prompt_text(setting, cfg))?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }

            match setting.apply(cfg, Edit::parse(&line)) {
                Ok(()) => break,
                Err(error) => writeln!(output, "  {error}")?,
            }
        }
    }
    Ok(())
}

fn prompt_text(setting: Setting, cfg: &StoredConfig) -> String {
    let label = match setting.hint() {
        Some(hint) => format!("{} ({hint})", setting.label()),
        None => setting.label().to_string(),
    };
    match setting.current(cfg) {
        Some(_) if setting.is_secret() => format!("{label} [****]: "),
        Some(value) => format!("{label} [{value}]: "),
        None => format!("{label}: "),
    }
}

fn show_lines(cfg: &StoredConfig) -> Vec<String> {
    Setting::ALL
        .iter()
        .map(|setting| format!("{}: {}", setting.label(), setting.shown(cfg)))
        .collect()
}

/// Keeps the last four characters of long secrets visible.
fn mask(secret: &str) -> String {
    let chars = secret.chars().collect::<Vec<_>>();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail = chars[chars.len() - 4..].iter().collect::<String>();
    format!("****{tail}")
}

mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::comment::{self, CommentCommandArgs};
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::rewrite::{self, RewriteCommandArgs};
use crate::config::{AppConfig, Needs};
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::openai::OpenAiClient;
use crate::infra::zendesk::ZendeskClient;
use crate::services::PageUrlProvider;
use crate::services::page_url::{ChainedPageUrl, StaticPageUrl};

#[derive(Parser)]
#[command(
    name = "zdraft",
    author,
    version,
    about = "Draft helpdesk ticket replies with a language model"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the most recent comment on a ticket.
    Comment(CommentArgs),
    /// Rewrite a draft reply against the ticket's latest comment.
    Rewrite(RewriteArgs),
    /// List the available rewrite actions.
    Actions,
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct CommentArgs {
    /// Ticket URL or numeric id.
    ticket: Option<String>,
    /// URL of the page currently open, used when no ticket is given.
    #[arg(long)]
    page_url: Option<String>,
}

#[derive(Args)]
struct RewriteArgs {
    /// rephrase, extend, concise or empathize; anything else polishes.
    #[arg(short, long)]
    action: String,
    /// Ticket URL or numeric id to take the last comment from.
    #[arg(short, long, conflicts_with = "comment")]
    ticket: Option<String>,
    /// Use this text as the last customer comment instead of fetching it.
    #[arg(short, long)]
    comment: Option<String>,
    /// Draft reply text. Read from stdin when neither this nor --draft-file is set.
    #[arg(short, long, conflicts_with = "draft_file")]
    draft: Option<String>,
    #[arg(long)]
    draft_file: Option<PathBuf>,
    /// URL of the page currently open, used when no ticket is given.
    #[arg(long)]
    page_url: Option<String>,
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Actions => {
            println!("{}", cmd::actions::render());
            Ok(())
        }
        Commands::Comment(args) => {
            let needs = Needs {
                helpdesk: true,
                completion: false,
            };
            let ctx = build_context(args.page_url, needs)?;
            let text = comment::run(&ctx, CommentCommandArgs {
                ticket: args.ticket,
            })
            .await?;
            println!("{text}");
            Ok(())
        }
        Commands::Rewrite(args) => {
            let needs = Needs {
                helpdesk: args.comment.is_none(),
                completion: true,
            };
            let ctx = build_context(args.page_url, needs)?;
            let text = rewrite::run(&ctx, RewriteCommandArgs {
                action: args.action,
                ticket: args.ticket,
                comment: args.comment,
                draft: args.draft,
                draft_file: args.draft_file,
            })
            .await?;
            println!("{text}");
            Ok(())
        }
    }
}

fn build_context(page_url: Option<String>, needs: Needs) -> AppResult<AppContext> {
    let config = AppConfig::load()?;
    for setting in config.missing_settings(needs) {
        tracing::warn!("{setting} not configured; this command will fail");
    }

    let helpdesk = Arc::new(ZendeskClient::new(
        config.credentials.clone(),
        config.helpdesk_base_url.clone(),
        config.request_timeout,
    )?);
    let completion = Arc::new(OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        config.completion_endpoint.clone(),
        config.request_timeout,
    )?);
    let page_url: Arc<dyn PageUrlProvider> = Arc::new(ChainedPageUrl(vec![
        Box::new(StaticPageUrl(page_url)),
        Box::new(StaticPageUrl(config.page_url.clone())),
    ]));

    Ok(AppContext::new(config, helpdesk, completion, page_url))
}

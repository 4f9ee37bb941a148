//! Sales Agent CLI Entry Point
//!
//! Reads customer utterances from stdin, one per line, and prints the agent's
//! replies. Once the call ends the planned follow-up messages are printed.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use sales_agent_agent::{Conversation, ConversationEvent, FollowUpPlanner, SalesAgent};
use sales_agent_config::{domain_config, init_domain_config, load_settings, DomainConfig, Settings};

#[derive(Debug, Parser)]
#[command(name = "sales-agent", version, about = "Scripted loan sales conversation")]
struct Args {
    /// Domain config file (YAML, JSON or TOML); overrides settings
    #[arg(short, long, env = "SALES_AGENT_DOMAIN_CONFIG")]
    config: Option<PathBuf>,

    /// Settings environment, loads config/{env} on top of config/default
    #[arg(short, long, env = "SALES_AGENT_ENV")]
    env: Option<String>,

    /// Customer name for the greeting and follow-up messages
    #[arg(long)]
    customer_name: Option<String>,

    /// Link inserted into follow-up messages
    #[arg(long)]
    link: Option<String>,

    /// Print follow-up messages as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = load_settings(args.env.as_deref()).context("loading settings")?;
    init_tracing(&settings);

    tracing::info!("Starting sales agent v{}", env!("CARGO_PKG_VERSION"));

    let domain = load_domain_config(args.config.as_deref(), &settings)?;
    let agent = SalesAgent::from_config(&domain, &settings.agent.persona)
        .context("building agent from domain config")?;
    let agent = Arc::new(agent);

    let mut conversation = match &args.customer_name {
        Some(name) => Conversation::for_customer(agent, name.clone()),
        None => Conversation::new(agent),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(greeting) = conversation.transcript().first() {
        writeln!(out, "[{}] {}", conversation.stage(), greeting.content)?;
    }

    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let (response, events) = conversation.respond(&line);

        writeln!(out, "[{}] {}", response.stage(), response.reply)?;
        for event in &events {
            if let ConversationEvent::FactLearned { key, value } = event {
                tracing::debug!(%key, %value, "Fact learned");
            }
        }

        if conversation.is_finished() && settings.agent.end_on_terminal_stage {
            break;
        }
    }

    let Some(reason) = conversation.follow_up_reason() else {
        tracing::info!(stage = %conversation.stage(), "No follow-up needed");
        return Ok(());
    };

    let mut vars = HashMap::new();
    if let Some(link) = args.link {
        vars.insert("link".to_string(), link);
    }

    let messages = FollowUpPlanner::from_config(&domain)
        .plan(conversation.context(), reason, &vars)
        .context("planning follow-up messages")?;

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&messages)?)?;
    } else {
        for message in &messages {
            writeln!(out, "--- {} ({}) ---", message.template_id, message.channel)?;
            writeln!(out, "{}", message.body)?;
            if !message.is_complete() {
                writeln!(out, "(missing: {})", message.missing.join(", "))?;
            }
        }
    }

    Ok(())
}

/// Initialize tracing on stderr so replies on stdout stay clean
fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &settings.observability.log_level;
        format!("sales_agent={level},sales_agent_agent={level},sales_agent_config={level},sales_agent_core={level}").into()
    });

    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Load the domain config into the process-wide instance and return it.
///
/// An explicit `--config` must load and validate. A path from settings that
/// does not exist leaves the built-in script in place.
fn load_domain_config(explicit: Option<&Path>, settings: &Settings) -> anyhow::Result<DomainConfig> {
    let path = match explicit {
        Some(path) => path,
        None => {
            let Some(path) = settings.domain_config_path.as_deref().map(Path::new) else {
                tracing::info!("No domain config configured. Using built-in script.");
                return Ok(domain_config().get());
            };
            if !path.exists() {
                tracing::info!("Domain config not found at {}. Using built-in script.", path.display());
                return Ok(domain_config().get());
            }
            path
        }
    };

    init_domain_config(path).with_context(|| format!("loading domain config {}", path.display()))?;
    tracing::info!("Domain config loaded from: {}", path.display());
    Ok(domain_config().get())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from(["sales-agent", "--config", "domain.yaml", "--json"]);
        assert_eq!(args.config, Some(PathBuf::from("domain.yaml")));
        assert!(args.json);
        assert!(args.link.is_none());
    }

    #[test]
    fn test_missing_settings_path_falls_back() {
        let settings = Settings {
            domain_config_path: Some("/nonexistent/domain.yaml".to_string()),
            ..Settings::default()
        };
        let domain = load_domain_config(None, &settings).unwrap();
        assert_eq!(domain, DomainConfig::default());
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let result = load_domain_config(Some(Path::new("/nonexistent/domain.yaml")), &Settings::default());
        assert!(result.is_err());
    }
}

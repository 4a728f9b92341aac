//! LLM configuration check.

use console::style;

use crate::config::Settings;
use crate::llm::{LlmClient, LlmProvider};

/// Print the LLM configuration and whether the service answers.
pub async fn cmd_check(settings: &Settings) -> anyhow::Result<()> {
    let config = &settings.llm;

    println!("{}", style("LLM configuration").bold());
    println!("  {:<10} {}", "enabled", config.enabled);
    println!("  {:<10} {}", "provider", config.provider.as_str());
    println!("  {:<10} {}", "endpoint", config.base_url());
    println!("  {:<10} {}", "model", config.model);
    if config.provider == LlmProvider::OpenAI {
        let key = if config.api_key.is_some() {
            style("set").green()
        } else {
            style("missing").red()
        };
        println!("  {:<10} {}", "api key", key);
    }

    if !config.enabled {
        println!("\n{} LLM is disabled", style("!").yellow());
        return Ok(());
    }

    let client = LlmClient::new(config.clone())?;
    match client.list_models().await {
        Ok(models) => {
            println!("\n{} Service reachable", style("✓").green());
            if models.iter().any(|m| m == &config.model) {
                println!("  {} Model {} is available", style("→").dim(), config.model);
            } else if !models.is_empty() {
                println!(
                    "  {} Model {} not listed ({} models available)",
                    style("!").yellow(),
                    config.model,
                    models.len()
                );
            }
            Ok(())
        }
        Err(e) => {
            println!("\n{} Service unavailable: {}", style("✗").red(), e);
            anyhow::bail!("LLM check failed")
        }
    }
}

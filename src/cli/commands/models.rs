//! Model configuration and listing.

use console::style;

use super::AppContext;
use crate::cli::icons;
use crate::llm::{build_client, LlmProvider};

pub async fn cmd_models(ctx: &AppContext) -> anyhow::Result<()> {
    let llm = &ctx.config.llm;

    println!("\n{}", style("Model Configuration").bold());
    println!("{}", "-".repeat(40));
    println!("{:<20} {}", "Active Provider:", ctx.client.provider().display_name());
    println!("{:<20} {}", "Max Tokens:", llm.max_tokens);
    println!("{:<20} {:.2}", "Temperature:", llm.temperature);
    println!("{:<20} {}s", "Timeout:", llm.timeout_secs);
    if let Some(path) = &ctx.config.source_path {
        println!("{:<20} {}", "Config File:", path.display());
    }

    for provider in [LlmProvider::Gemini, LlmProvider::Groq] {
        let key_set = match provider {
            LlmProvider::Gemini => ctx.keys.gemini().is_some(),
            LlmProvider::Groq => ctx.keys.groq().is_some(),
        };
        let configured = llm.model_for(provider);

        println!("\n{}", style(provider.display_name()).bold());
        println!("{}", "-".repeat(40));
        println!("{:<20} {}", "Endpoint:", llm.endpoint_for(provider));
        println!("{:<20} {}", "Model:", configured);
        println!("{:<20} {}", "API Key:", if key_set { "Set" } else { "Not set" });

        let client = match build_client(provider, llm, &ctx.keys) {
            Ok(client) => client,
            Err(e) => {
                println!("{} {}", icons::warn(), e);
                continue;
            }
        };

        match client.list_models().await {
            Ok(models) if models.is_empty() => println!("  No models reported"),
            Ok(models) => {
                for model in models {
                    let marker = if model == configured {
                        style("*").green().to_string()
                    } else {
                        " ".to_string()
                    };
                    println!("{} {}", marker, model);
                }
            }
            Err(e) => println!("{} Failed to list models: {}", icons::error(), e),
        }
    }

    Ok(())
}

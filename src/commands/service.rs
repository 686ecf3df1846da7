//! Service-level commands that need no session

use colored::Colorize;

use crate::api::types::ModelTestRequest;
use crate::commands::AppContext;
use crate::error::Result;

/// Print the backend's service metadata.
pub async fn health(ctx: &AppContext) -> Result<()> {
    let info = ctx.api.health().await?;
    println!("{} {}", "✓".green(), info.message.bold());
    println!("  Version: {}", info.version);
    println!("  Model:   {}", info.model);
    println!("  Docs:    {}{}", ctx.api.base_url(), info.docs.trim_start_matches('/'));
    Ok(())
}

/// Ask one of the backend's models a test question.
pub async fn model_test(ctx: &AppContext, choice: i64, query: &str) -> Result<()> {
    let request = ModelTestRequest {
        user_choice: choice,
        query: query.to_string(),
    };
    let response = ctx.api.test_model(&request).await?;

    println!("{} {}", response.status.cyan(), response.message);
    if let Some(info) = response.model_info {
        if let Some(llm) = info.llm_model {
            println!("  LLM:      {}", llm);
        }
        if let Some(whisper) = info.whisper_model {
            println!("  Whisper:  {}", whisper);
        }
        if let Some(models) = info.available_models {
            println!("  Models:   {}", models.join(", "));
        }
        if let Some(rag) = info.rag_enabled {
            println!("  RAG:      {}", if rag { "enabled" } else { "disabled" });
        }
    }
    Ok(())
}

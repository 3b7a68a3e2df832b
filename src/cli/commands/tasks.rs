//! One-shot task commands.

use console::style;

use super::AppContext;
use crate::cli::helpers::read_input;
use crate::prompt::Task;

async fn run_and_print(ctx: &AppContext, task: Task) -> anyhow::Result<()> {
    let session = ctx.sessions.get(&ctx.session_id)?;
    let response = session.run_task(ctx.client.as_ref(), &task).await?;
    println!("{}", response.trim_end());
    Ok(())
}

pub async fn cmd_summarize(ctx: &AppContext, text: Option<String>) -> anyhow::Result<()> {
    let text = read_input(text)?;
    run_and_print(ctx, Task::Summarization { text }).await
}

pub async fn cmd_sentiment(ctx: &AppContext, text: Option<String>) -> anyhow::Result<()> {
    let text = read_input(text)?;
    run_and_print(ctx, Task::SentimentAnalysis { text }).await
}

pub async fn cmd_ner(ctx: &AppContext, text: Option<String>) -> anyhow::Result<()> {
    let text = read_input(text)?;
    run_and_print(ctx, Task::NamedEntityRecognition { text }).await
}

pub async fn cmd_qa(ctx: &AppContext, context: String, question: String) -> anyhow::Result<()> {
    run_and_print(ctx, Task::QuestionAnswering { context, question }).await
}

pub async fn cmd_code(
    ctx: &AppContext,
    language: String,
    description: Option<String>,
) -> anyhow::Result<()> {
    let description = read_input(description)?;
    println!(
        "{}",
        style(format!("Generating {} code with {}", language, ctx.client.model())).dim()
    );
    run_and_print(
        ctx,
        Task::CodeGeneration {
            description,
            language,
        },
    )
    .await
}

pub async fn cmd_doc_qa(ctx: &AppContext, question: &str) -> anyhow::Result<()> {
    let session = ctx.sessions.get(&ctx.session_id)?;
    let answer = session.ask_documents(ctx.client.as_ref(), question).await?;
    println!("{}", answer.trim_end());
    Ok(())
}

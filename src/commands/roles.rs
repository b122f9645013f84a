use std::path::PathBuf;

use clap::Args;
use owo_colors::{OwoColorize, Stream};
use serde_json::json;
use tracing::debug;

use crate::config::{self, ConfigError, Credentials, TOKENS_FILE};
use crate::rchain::copilot::{ChatCompletionRequest, CopilotClient, chat_completions_url};
use crate::rchain::provider::{
    ChatMessage, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, GenerateOptions, RequestError,
};

const RULE_WIDTH: usize = 60;
const PREVIEW_CHARS: usize = 60;

const ROLE_INSIGHTS: &str = "   • \"system\" - Sets instructions/personality (highest priority)\n   • \"user\" - Your messages to the AI\n   • \"assistant\" - AI's previous responses (for context)\n   • \"tool\" - Results from function/tool execution (advanced)\n   ⚠️  You cannot use custom roles - only these 4 are supported!";

#[derive(Debug, Args, Clone)]
pub struct RolesArgs {
    /// Credential file with `copilot_token` and optional `api_url`.
    #[arg(long, value_name = "PATH", default_value = TOKENS_FILE)]
    pub tokens: PathBuf,
    #[arg(long, default_value_t = DEFAULT_MODEL.to_string())]
    pub model: String,
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_tokens: u32,
    /// Print the request as JSON instead of sending it.
    #[arg(long)]
    pub dry_run: bool,
}

/// The fixed four-message conversation sent to the model.
pub fn pirate_conversation() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(
            "You are a pirate. Always respond in pirate speak with \"Arrr!\" and nautical terms.",
        ),
        ChatMessage::user("What is the capital of France?"),
        ChatMessage::assistant(
            "Arrr! The capital of France be Paris, matey! A fine port city on the River Seine!",
        ),
        ChatMessage::user("Tell me about its famous landmark."),
    ]
}

/// Loads credentials, sends the conversation once and prints the outcome.
///
/// Only credential problems are returned; request failures are reported on
/// stderr and count as a normal exit.
pub async fn run(args: RolesArgs) -> Result<(), ConfigError> {
    let credentials = config::load_credentials(&args.tokens)?;
    let messages = pirate_conversation();
    let options = GenerateOptions {
        model: args.model,
        max_tokens: args.max_tokens,
    };

    if args.dry_run {
        println!("{}", render_dry_run(&credentials, &messages, &options));
        return Ok(());
    }

    println!(
        "\n{}\n",
        "👥 Testing Message Roles".if_supports_color(Stream::Stdout, |text| text.bold())
    );
    println!("{}", rule());
    print!("{}", render_summary(&messages));
    println!(
        "\n{}\n",
        "🤖 Calling Copilot with different roles...".if_supports_color(Stream::Stdout, |text| text.cyan())
    );

    match dispatch(&credentials, &messages, &options).await {
        Ok(text) => print!("{}", render_response(&text)),
        Err(err) => {
            debug!(error = ?err, "chat completion failed");
            eprintln!(
                "{} {err}",
                "❌ Error:".if_supports_color(Stream::Stderr, |text| text.red())
            );
        }
    }

    Ok(())
}

async fn dispatch(
    credentials: &Credentials,
    messages: &[ChatMessage],
    options: &GenerateOptions,
) -> Result<String, RequestError> {
    let client = CopilotClient::new(credentials)?;
    let completion = client.generate_text(messages, options).await?;
    Ok(completion.text)
}

fn rule() -> String {
    "━".repeat(RULE_WIDTH)
}

fn preview(content: &str) -> String {
    let head: String = content.chars().take(PREVIEW_CHARS).collect();
    format!("{head}...")
}

/// Numbered one-line preview of each message, in conversation order.
pub fn render_summary(messages: &[ChatMessage]) -> String {
    let mut out = String::from("📝 Message roles in conversation:\n");
    for (index, message) in messages.iter().enumerate() {
        out.push_str(&format!(
            "{}. [{}]: {}\n",
            index + 1,
            message.role.label(),
            preview(&message.content)
        ));
    }
    out
}

pub fn render_response(text: &str) -> String {
    format!(
        "{rule}\n{heading}\n\n{text}\n{rule}\n\n{insights}\n{ROLE_INSIGHTS}\n",
        rule = rule(),
        heading = "✅ Response with role-based behavior:"
            .if_supports_color(Stream::Stdout, |heading| heading.green()),
        insights = "💡 Key insights about roles:"
            .if_supports_color(Stream::Stdout, |heading| heading.yellow()),
    )
}

/// Request preview printed by `--dry-run`. The token is never included.
pub fn render_dry_run(
    credentials: &Credentials,
    messages: &[ChatMessage],
    options: &GenerateOptions,
) -> String {
    let request = ChatCompletionRequest {
        model: &options.model,
        messages,
        max_tokens: options.max_tokens,
    };
    let body = json!({
        "dry_run": true,
        "url": chat_completions_url(&credentials.api_url),
        "request": request,
    });
    format!("{body:#}")
}

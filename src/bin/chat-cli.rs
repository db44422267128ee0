use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use mindful_chat_proxy::config::UpstreamConfig;
use mindful_chat_proxy::prompt::{self, GREETING, QUICK_RESPONSES};
use mindful_chat_proxy::upstream::{GeminiClient, ReplyGenerator};

const DIRECT_FAILURE: &str = "Failed to generate response. Please check your API key and try again.";

#[derive(Parser)]
#[command(name = "chat-cli")]
#[command(about = "Terminal client for the mindful chat proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a message through the proxy
    Send {
        message: String,
        /// Personalize the reply with this user's goals
        #[arg(long)]
        user_id: Option<String>,
    },
    /// Check proxy health
    Health,
    /// Print the greeting and suggested openers
    Quick,
    /// Ask the generation API directly, without goals or the proxy
    Direct {
        message: String,
        #[arg(long, env = "GEMINI_API_KEY")]
        api_key: String,
        #[arg(long, default_value = "gemini-2.0-flash")]
        model: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Send { message, user_id } => {
            let mut body = json!({ "message": message });
            if let Some(id) = user_id {
                body["userId"] = Value::String(id);
            }
            let res = client
                .post(format!("{}/chat", cli.url))
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Quick => {
            println!("{}", GREETING);
            println!();
            for (i, opener) in QUICK_RESPONSES.iter().enumerate() {
                println!("  {}. {}", i + 1, opener);
            }
        }
        Commands::Direct { message, api_key, model } => {
            let upstream = UpstreamConfig {
                api_key: Some(api_key),
                model,
                ..UpstreamConfig::default()
            };
            let target = upstream.target()?;
            let generator = GeminiClient::from_config(&upstream)?;

            match generator.generate(&target, &prompt::compose(&[], &message)).await {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("Error: {}", DIRECT_FAILURE);
                    eprintln!("Cause: {}", e);
                }
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await.unwrap_or(Value::Null);

    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        if let Some(message) = json.get("error").and_then(Value::as_str) {
            eprintln!("Response: {}", message);
        }
        return Ok(());
    }

    match json.get("response").and_then(Value::as_str) {
        Some(text) => println!("{}", text),
        None => println!("{}", serde_json::to_string_pretty(&json)?),
    }
    Ok(())
}

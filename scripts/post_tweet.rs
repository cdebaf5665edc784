//! Twitter Tweet Posting Script
//!
//! Posts a single tweet with the credentials from the environment (or a
//! `.env` file). The message is taken from the command line, or prompted for
//! when no arguments are given.
//!
//! ```bash
//! RUST_LOG=info cargo run --bin post_tweet -- "Hello from Rust!"
//! ```

use std::io::{self, Write};
use std::process::ExitCode;

use xconnector::{TwitterConfig, TwitterConnector};

fn read_message() -> io::Result<String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        return Ok(args.join(" "));
    }

    print!("📝 Enter your tweet message: ");
    io::stdout().flush()?;
    let mut message = String::new();
    io::stdin().read_line(&mut message)?;
    Ok(message.trim().to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    println!("🐦 Twitter Tweet Posting Tool");
    println!("==============================");

    let config = match TwitterConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let connector = match TwitterConnector::connect(config).await {
        Ok(connector) => connector,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("🔑 Authenticated as @{}", connector.username());

    let message = match read_message() {
        Ok(message) => message,
        Err(e) => {
            eprintln!("❌ Failed to read message: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("📏 Tweet length: {} characters", message.chars().count());

    println!("\n🚀 Posting your tweet...");
    match connector.post(&message).await {
        Ok(tweet) => {
            println!("\n🎉 {}", tweet);
            if let Some(id) = &tweet.id {
                println!("🔗 https://x.com/{}/status/{}", connector.username(), id);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("\n💥 {} ({:?})", e, e.kind());
            ExitCode::FAILURE
        }
    }
}

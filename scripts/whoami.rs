//! Twitter Credential Check Script
//!
//! Authenticates with the credentials from the environment (or a `.env`
//! file) and prints the account they belong to. Any usernames passed as
//! arguments are looked up as well.

use std::process::ExitCode;

use xconnector::{TwitterConfig, TwitterConnector};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let connector = match TwitterConfig::from_env() {
        Ok(config) => match TwitterConnector::connect(config).await {
            Ok(connector) => connector,
            Err(e) => {
                eprintln!("❌ {}", e);
                return ExitCode::FAILURE;
            }
        },
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let identity = connector.identity();
    println!("✅ @{} ({}) id {}", identity.username, identity.name, identity.id);

    let mut status = ExitCode::SUCCESS;
    for username in std::env::args().skip(1) {
        match connector.lookup_user(&username).await {
            Ok(Some(user)) => println!("👤 @{} ({}) id {}", user.username, user.name, user.id),
            Ok(None) => println!("❓ @{} not found", username.trim_start_matches('@')),
            Err(e) => {
                eprintln!("❌ Lookup of {} failed: {}", username, e);
                status = ExitCode::FAILURE;
            }
        }
    }
    status
}

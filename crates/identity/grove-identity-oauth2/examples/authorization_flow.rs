//! Example walking through the authorization code flow with PKCE.
//!
//! This example demonstrates:
//! 1. Configuring a client application
//! 2. Starting an authorization attempt
//! 3. Handling the callback and exchanging the code

use grove_identity_oauth2::{
    CallbackOutcome, CallbackParams, FlowClient, FlowConfig, InMemoryAttemptStore,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; .env can override the endpoints below.
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let server_base = std::env::var("OAUTH_SERVER")
        .unwrap_or_else(|_| "http://localhost:8000".to_string());
    let client_id =
        std::env::var("OAUTH_CLIENT_ID").unwrap_or_else(|_| "your-client-id".to_string());
    let redirect_uri = std::env::var("OAUTH_REDIRECT_URI")
        .unwrap_or_else(|_| "http://localhost:5173/callback".to_string());

    let config = FlowConfig::new(client_id, &server_base, redirect_uri)
        .with_scopes(vec![
            "openid".to_string(),
            "email".to_string(),
            "profile".to_string(),
        ])
        .with_attempt_ttl(600)
        .with_http_timeout(30);

    let store = Arc::new(InMemoryAttemptStore::new());
    let client = FlowClient::new(config, store);

    println!("Authorization Code Flow Example");
    println!("===============================");

    println!("\n1. Starting authorization attempt...");
    let (url, state) = client.begin_authorization().await?;
    println!("Authorization URL: {url}");
    println!("State: {state}");
    println!("\nIn a real application, you would:");
    println!("1. Navigate the user to the authorization URL");
    println!("2. Receive code and state on your redirect URI");
    println!("3. Pass them to handle_callback to finish the flow");

    println!("\n2. Simulating the callback...");
    let params = CallbackParams {
        code: Some("simulated_authorization_code".to_string()),
        state: Some(state),
        error: None,
        error_description: None,
    };

    match client.handle_callback(params).await {
        Ok(CallbackOutcome::Authenticated { tokens, identity }) => {
            println!("Authentication successful!");
            println!("Access token: {}", tokens.access_token);
            println!("Subject: {}", identity.sub);
            println!("Email: {:?}", identity.email);
            println!("Display label: {}", identity.display_label());
        }
        Ok(CallbackOutcome::AlreadyHandled) => {
            println!("Callback was already handled");
        }
        Err(e) => {
            println!("Callback failed: {e}");
            println!("Note: this is expected in the simulation; the endpoints are not real");
        }
    }

    Ok(())
}

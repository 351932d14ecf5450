//! # Xsolla Store Demo
//!
//! Signs in a test user and walks through the store flow against the
//! configured project.
//!
//! ## Usage
//!
//! ```bash
//! # Project settings live in config/xsolla.toml, or:
//! export XSOLLA_STORE_PROJECT_ID=44056
//! export XSOLLA_LOGIN_ID=e6dfaac6-78a8-11e9-9244-42010aa80004
//!
//! # Merchant token request (optional)
//! export XSOLLA_MERCHANT_ID=...
//! export XSOLLA_API_KEY=...
//!
//! # Test account
//! export XSOLLA_USERNAME=player
//! export XSOLLA_PASSWORD=...
//!
//! xsolla-store-demo
//! ```

use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use xsolla_demo::{
    issue_paystation_token, run_store_flow, spawn_catalogue_listing, Credentials, DemoState,
};
use xsolla_http::WebRequestHelper;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = DemoState::new()?;
    let settings = state.settings();

    info!("Store project: {}", settings.store_project_id);
    info!(
        "PayStation: {}",
        if settings.is_sandbox { "sandbox" } else { "live" }
    );

    // Catalogue through the callback channel
    let (outcome, mut listed) = tokio::sync::mpsc::unbounded_channel();
    spawn_catalogue_listing(WebRequestHelper::instance(), &state.config, outcome)?.await?;
    match listed.recv().await {
        Some(Ok(count)) => info!("Catalogue listing returned {} items", count),
        Some(Err(error)) => warn!("Catalogue listing failed: {}", error),
        None => warn!("Catalogue listing ended without a result"),
    }

    // Merchant token only when the api key is available
    if settings.api_key.is_some() {
        let request = state.paystation.test_token_request()?;
        let url = issue_paystation_token(&state.paystation, &request).await?;
        println!("\nPayStation test purchase: {}", url);
    } else {
        info!("XSOLLA_API_KEY not set, skipping the PayStation token request");
    }

    let Some(credentials) = Credentials::from_env() else {
        warn!("XSOLLA_USERNAME / XSOLLA_PASSWORD not set, stopping after the catalogue");
        return Ok(());
    };

    let token = state
        .login
        .sign_in(&credentials.username, &credentials.password, false)
        .await?;

    let report = run_store_flow(state.store.as_ref(), settings, &token).await?;

    if let Some(url) = &report.purchase_url {
        println!("\nPay for cart {}: {}", report.cart_id.as_deref().unwrap_or("?"), url);
    }

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Xsolla Store Demo
  ━━━━━━━━━━━━━━━━━
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}

//! Send one express checkout request to PayPal
//!
//! Usage: `checkout <request.json>`
//!
//! Credentials and endpoint come from the `PAYPAL_*` environment variables.
//! The parsed response is printed as JSON on stdout.

use paypal_nvp::{PayPalConfig, PayPalPaymentService, PaymentError, PaymentRequest};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("checkout failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> paypal_nvp::Result<()> {
    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| PaymentError::config("usage: checkout <request.json>"))?;

    let request: PaymentRequest = serde_json::from_str(&std::fs::read_to_string(&path)?)?;

    let config = PayPalConfig::from_env()?;
    info!("Sending {} request to {}", request.method_type, config.server_url);

    let service = PayPalPaymentService::new(config)?;
    let response = service.process(&request).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    info!("Service status: {}", service.service_status());
    Ok(())
}

//! Notification server binary entrypoint.

use notification_server::{NotificationServer, ServerConfig};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "notification_server=debug,fawry_core=info,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let server = NotificationServer::new(config);

    // Without a downstream consumer, log what would be forwarded.
    let mut events = server.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::info!(
                    fawry_ref = %event.fawry_ref_number,
                    merchant_ref = %event.merchant_ref_number,
                    status = %event.order_status,
                    amount = %event.amount,
                    "Payment event"
                ),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Payment event logger lagged")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    server.run().await
}

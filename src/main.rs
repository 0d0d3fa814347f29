use anyhow::Result;
use sleeplog::commands::Cli;
use sleeplog::libs::error::SleepError;
use sleeplog::libs::messages::macros::is_debug_mode;
use sleeplog::libs::messages::Message;
use sleeplog::msg_error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    if is_debug_mode() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sleeplog=debug")))
            .with_target(false)
            .init();
    }

    if let Err(e) = Cli::menu().await {
        match e.downcast_ref::<SleepError>() {
            Some(SleepError::Cancelled) => msg_error!(Message::ControllerCancelled),
            Some(err) if err.is_storage() => msg_error!(Message::StorageFault(err.to_string())),
            _ => return Err(e),
        }
        std::process::exit(1);
    }
    Ok(())
}

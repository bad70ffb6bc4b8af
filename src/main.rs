use notihub::config::{Settings, load_config};
use notihub::hub;
use notihub::transport::websocket::start_websocket_server;
use notihub::utils::{load_env_file, logging};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    load_env_file();

    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            logging::init("error");
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    logging::init(&settings.log.level);

    if let Err(e) = run(settings).await {
        error!("Server failed: {e}");
        std::process::exit(1);
    }
}

async fn run(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let hub = hub::build(&settings.hub)?;
    let addr = settings.server.address();

    let served = tokio::select! {
        res = start_websocket_server(&addr, hub.clone(), settings.hub.clone()) => res,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
            Ok(())
        }
    };

    // release the journal even when the server failed
    hub.close().await?;
    served?;
    Ok(())
}

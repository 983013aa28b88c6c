use std::env;
use std::error::Error;
use std::sync::Arc;

use blogqa::api::{self, handlers};
use blogqa::{App, Config, InMemoryModelStore, LogFormat};
use dotenv::dotenv;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("blogqa=info,tower_http=info"));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    // Read ahead of the full config so config warnings are captured.
    let log_format = env::var("BLOGQA_LOG_FORMAT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default();
    init_tracing(log_format);

    let config = Config::from_env()?;
    let addr = config.bind_addr();
    let data_file = config.data_file.clone();

    let store = match &data_file {
        Some(path) => {
            let store = InMemoryModelStore::load_file(path)?;
            info!(path = %path.display(), "loaded snapshot");
            store
        }
        None => InMemoryModelStore::new(),
    };

    let app = App::new(store, config);
    app.bootstrap()?;

    let service = Arc::new(handlers::service(app));
    info!(commands = service.commands().len(), "service ready");

    api::serve(service.clone(), &addr, shutdown_signal()).await?;

    if let Some(path) = data_file {
        service.app().store().save_file(&path)?;
        info!(path = %path.display(), "saved snapshot");
    }
    Ok(())
}

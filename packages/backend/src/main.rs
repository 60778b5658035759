use std::sync::Arc;

use glossa_algo::RecallScorer;

use glossa_backend::config::Config;
use glossa_backend::state::AppState;
use glossa_backend::store::LearningStore;
use glossa_backend::{create_app, logging, seed};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log_level);

    // The scorer is a hard startup dependency: composition cannot run
    // without the frozen model.
    let scorer = match RecallScorer::from_path(&config.scorer_path) {
        Ok(scorer) => {
            tracing::info!(
                version = scorer.version(),
                vocabulary = scorer.vocabulary_size(),
                path = %config.scorer_path.display(),
                "recall scorer loaded"
            );
            Arc::new(scorer)
        }
        Err(err) => {
            tracing::error!(
                error = %err,
                path = %config.scorer_path.display(),
                "failed to load recall scorer"
            );
            std::process::exit(1);
        }
    };

    let store = Arc::new(LearningStore::new());
    if let Some(path) = &config.catalog_path {
        match seed::load_catalog(&store, path).await {
            Ok((languages, units)) => {
                tracing::info!(languages, units, path = %path.display(), "catalog seeded");
            }
            Err(err) => {
                tracing::error!(error = %err, path = %path.display(), "failed to seed catalog");
                std::process::exit(1);
            }
        }
    }

    let state = AppState::new(store, scorer);
    let app = create_app(state);

    let addr = config.bind_addr();
    tracing::info!(%addr, "glossa-backend listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    if let Err(e) = server.await {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

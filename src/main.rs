use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use emission_risk::{
    config::Config,
    domain::Domain,
    handlers::{self, AppState},
    predictor::{PipelinePredictor, Predictor},
    Engine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emission_risk=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    // every domain must load before serving
    let mut predictors: Vec<Arc<dyn Predictor>> = Vec::with_capacity(Domain::ALL.len());
    for domain in Domain::ALL {
        let dir = config.artifact_dir(domain);
        let p = PipelinePredictor::load(domain, &dir)
            .with_context(|| format!("failed to load {} predictor from {}", domain, dir.display()))?
            .with_prediction_logging(config.log_pred);
        predictors.push(Arc::new(p));
    }
    let engine = Engine::with_standard_thresholds(predictors)?;
    tracing::info!(
        "loaded predictors for {:?} with {} threshold sets",
        engine.domains(),
        engine.thresholds().len()
    );

    let state = AppState::new(engine);
    let app = if config.cors_allow_any {
        handlers::router_with_cors(state)
    } else {
        handlers::router(state)
    };

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

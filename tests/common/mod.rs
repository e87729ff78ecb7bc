#![allow(dead_code)]

use anyhow::{bail, Result};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use emission_risk::{
    domain::Domain,
    encoding::{LabelEncoder, StandardScaler},
    model::Regressor,
    predictor::{PipelinePredictor, Predictor},
    router, AppState, Engine,
};

/// In-memory stand-in for an exported model.
pub struct FnModel {
    pub out_dim: usize,
    pub f: fn(&[f32]) -> Vec<f64>,
}

impl Regressor for FnModel {
    fn output_dim(&self) -> usize {
        self.out_dim
    }
    fn forward(&self, x: &[f32]) -> Result<Vec<f64>> {
        Ok((self.f)(x))
    }
}

pub struct FailingModel(pub usize);

impl Regressor for FailingModel {
    fn output_dim(&self) -> usize {
        self.0
    }
    fn forward(&self, _x: &[f32]) -> Result<Vec<f64>> {
        bail!("tensor shape mismatch: [1, 2] vs [1, 3]")
    }
}

fn encoder(classes: &[&str]) -> LabelEncoder {
    LabelEncoder::new(classes.iter().map(|c| c.to_string()).collect())
}

fn identity_scaler(width: usize) -> Option<StandardScaler> {
    StandardScaler::new(vec![0.0; width], vec![1.0; width]).ok()
}

/// emission = weight * distance / 10, doubled for air freight
pub fn transport() -> PipelinePredictor {
    PipelinePredictor::new(
        Domain::Transport,
        encoder(&["air", "rail", "truck"]),
        None,
        Box::new(FnModel {
            out_dim: 1,
            f: |x| {
                let base = (x[0] as f64) * (x[1] as f64) / 10.0;
                vec![if x[2] == 0.0 { base * 2.0 } else { base }]
            },
        }),
    )
    .unwrap()
}

/// every gas = amount + encoded type
pub fn explosives() -> PipelinePredictor {
    PipelinePredictor::new(
        Domain::Explosives,
        encoder(&["ANFO", "Dynamite", "TNT"]),
        identity_scaler(2),
        Box::new(FnModel {
            out_dim: 7,
            f: |x| vec![(x[1] + x[0]) as f64; 7],
        }),
    )
    .unwrap()
}

/// every figure = 10 * volume
pub fn fuel() -> PipelinePredictor {
    PipelinePredictor::new(
        Domain::Fuel,
        encoder(&["Diesel", "Petrol"]),
        identity_scaler(2),
        Box::new(FnModel {
            out_dim: 6,
            f: |x| vec![(x[1] as f64) * 10.0; 6],
        }),
    )
    .unwrap()
}

/// co2 = 10 * energyPerTime
pub fn electricity() -> PipelinePredictor {
    PipelinePredictor::new(
        Domain::Electricity,
        encoder(&["Goa", "Karnataka"]),
        identity_scaler(4),
        Box::new(FnModel {
            out_dim: 1,
            f: |x| vec![(x[1] as f64) * 10.0],
        }),
    )
    .unwrap()
}

pub fn app_with(predictors: Vec<Arc<dyn Predictor>>) -> Router {
    let engine = Engine::with_standard_thresholds(predictors).unwrap();
    router(AppState::new(engine))
}

pub fn app() -> Router {
    app_with(vec![
        Arc::new(transport()),
        Arc::new(explosives()),
        Arc::new(fuel()),
        Arc::new(electricity()),
    ])
}

/// App whose fuel model always fails.
pub fn app_with_broken_fuel() -> Router {
    let broken = PipelinePredictor::new(
        Domain::Fuel,
        encoder(&["Diesel"]),
        None,
        Box::new(FailingModel(6)),
    )
    .unwrap();
    app_with(vec![
        Arc::new(transport()),
        Arc::new(explosives()),
        Arc::new(broken),
        Arc::new(electricity()),
    ])
}

pub async fn post_raw(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, &body.to_string()).await
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

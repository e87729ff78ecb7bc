use anyhow::{bail, Result};
use std::path::Path;

use crate::domain::{Domain, Feature, FeatureRow};
use crate::encoding::{LabelEncoder, StandardScaler};
use crate::model::{MetaJson, Regressor, TorchRegressor};

/// Encodes a feature row and runs it through a fitted model.
///
/// Implementations are read-only after construction and shared across
/// request handlers.
pub trait Predictor: Send + Sync {
    fn domain(&self) -> Domain;

    /// One value per entry of `self.domain().outputs()`.
    fn predict(&self, row: &FeatureRow) -> Result<Vec<f64>>;
}

/// Label encoding, optional standard scaling, then regression.
pub struct PipelinePredictor {
    domain: Domain,
    encoder: LabelEncoder,
    scaler: Option<StandardScaler>,
    regressor: Box<dyn Regressor>,
    log_pred: bool,
}

impl PipelinePredictor {
    pub fn new(
        domain: Domain,
        encoder: LabelEncoder,
        scaler: Option<StandardScaler>,
        regressor: Box<dyn Regressor>,
    ) -> Result<Self> {
        if let Some(sc) = &scaler {
            if sc.width() != domain.feature_count() {
                bail!(
                    "{} scaler covers {} columns, model takes {}",
                    domain,
                    sc.width(),
                    domain.feature_count()
                );
            }
        }
        if regressor.output_dim() != domain.outputs().len() {
            bail!(
                "{} model emits {} values, expected {}",
                domain,
                regressor.output_dim(),
                domain.outputs().len()
            );
        }
        Ok(Self {
            domain,
            encoder,
            scaler,
            regressor,
            log_pred: false,
        })
    }

    /// Loads `<dir>/model.pt` and `<dir>/meta.json`.
    pub fn load(domain: Domain, dir: &Path) -> Result<Self> {
        let meta = MetaJson::load(&dir.join("meta.json"))?;
        let regressor = TorchRegressor::load(&dir.join("model.pt"), domain.feature_count())?;
        tracing::info!(
            "loaded {} model from {}; {} classes, scaler={}",
            domain,
            dir.display(),
            meta.classes.classes().len(),
            meta.scaler.is_some()
        );
        Self::new(domain, meta.classes, meta.scaler, Box::new(regressor))
    }

    pub fn with_prediction_logging(mut self, on: bool) -> Self {
        self.log_pred = on;
        self
    }

    fn encode(&self, row: &FeatureRow) -> Result<Vec<f32>> {
        let mut x: Vec<f32> = row
            .0
            .iter()
            .map(|f| match f {
                Feature::Categorical(category) => self.encoder.encode(category),
                Feature::Numeric(v) => *v as f32,
            })
            .collect();
        if let Some(sc) = &self.scaler {
            sc.transform(&mut x)?;
        }
        Ok(x)
    }
}

impl Predictor for PipelinePredictor {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn predict(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        let x = self.encode(row)?;
        let y = self.regressor.forward(&x)?;
        if y.len() != self.domain.outputs().len() {
            bail!(
                "{} model returned {} values, expected {}",
                self.domain,
                y.len(),
                self.domain.outputs().len()
            );
        }
        if self.log_pred {
            tracing::debug!("{} in={:?} out={:?}", self.domain, x, y);
        }
        Ok(y)
    }
}

use anyhow::{bail, Result};
use serde::Deserialize;

use crate::domain::Category;

/// Code fed to the model for a category the encoder was not fitted on.
pub const UNSEEN_CODE: f32 = -1.0;

/// Maps category labels to their index in the fitted class list.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn code(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }

    /// Unknown labels fall back to [`UNSEEN_CODE`] with a warning.
    pub fn transform(&self, label: &str) -> f32 {
        match self.code(label) {
            Some(i) => i as f32,
            None => {
                tracing::warn!("'{}' is an unseen category, encoding as {}", label, UNSEEN_CODE);
                UNSEEN_CODE
            }
        }
    }

    /// Like [`transform`](Self::transform); non-string values also fall
    /// back to [`UNSEEN_CODE`].
    pub fn encode(&self, category: &Category) -> f32 {
        match category.as_label() {
            Some(label) => self.transform(label),
            None => {
                tracing::warn!("'{}' is not a string, encoding as {}", category, UNSEEN_CODE);
                UNSEEN_CODE
            }
        }
    }
}

/// Per-column standardization `(x - mean) / scale`.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let s = Self { mean, scale };
        s.validate()?;
        Ok(s)
    }

    pub fn validate(&self) -> Result<()> {
        if self.mean.len() != self.scale.len() {
            bail!(
                "scaler mean has {} columns but scale has {}",
                self.mean.len(),
                self.scale.len()
            );
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, row: &mut [f32]) -> Result<()> {
        if row.len() != self.width() {
            bail!(
                "feature length mismatch: got {}, scaler expects {}",
                row.len(),
                self.width()
            );
        }
        for ((x, mean), scale) in row.iter_mut().zip(&self.mean).zip(&self.scale) {
            // zero-variance columns were fitted with unit scale
            let s = if *scale == 0.0 { 1.0 } else { *scale };
            *x = ((*x as f64 - mean) / s) as f32;
        }
        Ok(())
    }
}

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};
use tch::{kind::Kind, CModule, Device, Tensor};

use crate::encoding::{LabelEncoder, StandardScaler};

/// A fitted regression model evaluated on one encoded feature row.
pub trait Regressor: Send + Sync {
    /// Number of values `forward` returns per row.
    fn output_dim(&self) -> usize;

    fn forward(&self, x: &[f32]) -> Result<Vec<f64>>;
}

/// Sidecar `meta.json` shipped next to each exported model.
#[derive(Debug, Deserialize)]
pub struct MetaJson {
    pub classes: LabelEncoder,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
}

impl MetaJson {
    pub fn load(meta_path: &Path) -> Result<Self> {
        let meta_txt = fs::read_to_string(meta_path)
            .with_context(|| format!("failed to read meta at {}", meta_path.display()))?;
        let meta: MetaJson = serde_json::from_str(&meta_txt)
            .with_context(|| format!("failed to parse {}", meta_path.display()))?;
        if let Some(scaler) = &meta.scaler {
            scaler.validate()?;
        }
        Ok(meta)
    }
}

/// TorchScript regressor run on CPU.
pub struct TorchRegressor {
    model: CModule,
    device: Device,
    in_dim: usize,
    out_dim: usize,
}

impl TorchRegressor {
    /// Loads the module and probes it with a zero row of width `in_dim`.
    pub fn load(model_path: &Path, in_dim: usize) -> Result<Self> {
        let device = Device::Cpu;

        let model = CModule::load_on_device(model_path, device)
            .with_context(|| format!("failed to load TorchScript {}", model_path.display()))?;

        // expect [1] or [1, outputs]
        let dummy = Tensor::zeros([1, in_dim as i64], (Kind::Float, device));
        let t = model.forward_ts(&[dummy])?;
        let sz = t.size();
        if sz.is_empty() || sz.len() > 2 || sz[0] != 1 {
            bail!("unexpected model output size: {:?}", sz);
        }
        let out_dim = t.numel();

        Ok(Self {
            model,
            device,
            in_dim,
            out_dim,
        })
    }
}

impl Regressor for TorchRegressor {
    fn output_dim(&self) -> usize {
        self.out_dim
    }

    fn forward(&self, x: &[f32]) -> Result<Vec<f64>> {
        if x.len() != self.in_dim {
            bail!(
                "feature length mismatch: got {}, expected {}",
                x.len(),
                self.in_dim
            );
        }

        let input = Tensor::from_slice(x)
            .reshape([1, self.in_dim as i64])
            .to_device(self.device);

        let t = self.model.forward_ts(&[input])?;
        let flat = t.to_kind(Kind::Double).flatten(0, -1);
        let values = Vec::<f64>::try_from(&flat).context("failed to read model output")?;
        Ok(values)
    }
}

use anyhow::{anyhow, bail, Result};
use std::{collections::HashMap, sync::Arc};

use crate::domain::{Day, Domain, EntityInput};
use crate::error::{ApiError, ApiResult};
use crate::predictor::Predictor;
use crate::risk::{RiskTier, ThresholdTable};
use crate::thresholds;
use crate::types::{DayResult, EntityResult, QuantityResult};

/// Immutable inference context built once at startup: one predictor per
/// domain plus the threshold table used to grade their outputs.
pub struct Engine {
    predictors: HashMap<Domain, Arc<dyn Predictor>>,
    thresholds: ThresholdTable,
}

impl Engine {
    /// Fails unless every domain has exactly one predictor and the table
    /// holds at least one threshold set.
    pub fn new(predictors: Vec<Arc<dyn Predictor>>, thresholds: ThresholdTable) -> Result<Self> {
        if thresholds.is_empty() {
            bail!("threshold table is empty");
        }
        let mut by_domain: HashMap<Domain, Arc<dyn Predictor>> = HashMap::new();
        for p in predictors {
            let domain = p.domain();
            if by_domain.insert(domain, p).is_some() {
                bail!("more than one predictor registered for {}", domain);
            }
        }
        if let Some(missing) = Domain::ALL.iter().find(|d| !by_domain.contains_key(*d)) {
            bail!("no predictor registered for {}", missing);
        }
        Ok(Self {
            predictors: by_domain,
            thresholds,
        })
    }

    /// Engine using the standard threshold table.
    pub fn with_standard_thresholds(predictors: Vec<Arc<dyn Predictor>>) -> Result<Self> {
        Self::new(predictors, thresholds::standard_table()?)
    }

    pub fn domains(&self) -> Vec<Domain> {
        Domain::ALL
            .into_iter()
            .filter(|d| self.predictors.contains_key(d))
            .collect()
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    fn predictor(&self, domain: Domain) -> ApiResult<&dyn Predictor> {
        self.predictors
            .get(&domain)
            .map(|p| p.as_ref())
            .ok_or_else(|| ApiError::Inference(anyhow!("no predictor for {domain}")))
    }

    /// Predicts and grades every entity, keeping day order and entity
    /// order within each day. Any inference failure fails the whole batch.
    pub fn aggregate(&self, domain: Domain, days: &[Day]) -> ApiResult<Vec<DayResult>> {
        let predictor = self.predictor(domain)?;
        let mut out = Vec::with_capacity(days.len());
        for (i, day) in days.iter().enumerate() {
            let mut results = Vec::with_capacity(day.len());
            for entity in day {
                results.push(self.evaluate(predictor, domain, entity)?);
            }
            out.push(DayResult {
                day: i + 1,
                results,
            });
        }
        tracing::debug!(
            "{}: graded {} entities over {} days",
            domain,
            out.iter().map(|d| d.results.len()).sum::<usize>(),
            out.len()
        );
        Ok(out)
    }

    fn evaluate(
        &self,
        predictor: &dyn Predictor,
        domain: Domain,
        entity: &EntityInput,
    ) -> ApiResult<EntityResult> {
        if entity.domain() != domain {
            return Err(ApiError::Inference(anyhow!(
                "{} record sent to the {} predictor",
                entity.domain(),
                domain
            )));
        }
        let values = predictor
            .predict(&entity.features())
            .map_err(ApiError::Inference)?;
        let names = domain.outputs();
        if values.len() != names.len() {
            return Err(ApiError::Inference(anyhow!(
                "{} predictor returned {} values for {} outputs",
                domain,
                values.len(),
                names.len()
            )));
        }

        let quantities: Vec<QuantityResult> = names
            .iter()
            .zip(values)
            .map(|(name, value)| QuantityResult {
                name: name.to_string(),
                risk_level: self.thresholds.classify(value, name),
                value: match domain.round_to() {
                    Some(places) => round_to(value, places),
                    None => value,
                },
            })
            .collect();
        let overall_risk = RiskTier::worst(quantities.iter().map(|q| q.risk_level));

        Ok(EntityResult {
            input: entity.clone(),
            quantities,
            overall_risk,
        })
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (value * f).round() / f
}

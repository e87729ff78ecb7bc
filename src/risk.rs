use serde::Serialize;
use std::{cmp::Ordering, collections::HashMap};

/// Severity tier assigned to a predicted quantity.
///
/// Graded tiers order as `Low < Moderate < High < Severe`. `Unknown` is
/// returned for NaN values and unregistered quantities and is not
/// comparable with any graded tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RiskTier {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Moderate Risk")]
    Moderate,
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Severe Risk")]
    Severe,
    #[serde(rename = "Unknown")]
    Unknown,
}

const GRADED: [RiskTier; 4] = [
    RiskTier::Low,
    RiskTier::Moderate,
    RiskTier::High,
    RiskTier::Severe,
];

impl RiskTier {
    /// Position among the graded tiers, `None` for `Unknown`.
    pub fn severity(self) -> Option<u8> {
        match self {
            RiskTier::Low => Some(0),
            RiskTier::Moderate => Some(1),
            RiskTier::High => Some(2),
            RiskTier::Severe => Some(3),
            RiskTier::Unknown => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Moderate => "Moderate Risk",
            RiskTier::High => "High Risk",
            RiskTier::Severe => "Severe Risk",
            RiskTier::Unknown => "Unknown",
        }
    }

    /// Most severe graded tier of `tiers`, or `Unknown` if none is graded.
    pub fn worst<I: IntoIterator<Item = RiskTier>>(tiers: I) -> RiskTier {
        tiers
            .into_iter()
            .filter(|t| t.severity().is_some())
            .max_by_key(|t| t.severity())
            .unwrap_or(RiskTier::Unknown)
    }
}

impl PartialOrd for RiskTier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.severity(), other.severity()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ if self == other => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdError {
    #[error("a threshold set needs 2 or 3 breakpoints, got {0}")]
    Cardinality(usize),
    #[error("breakpoint {0} is not finite")]
    NotFinite(f64),
    #[error("breakpoints must be non-decreasing: {prev} is followed by {next}")]
    Decreasing { prev: f64, next: f64 },
}

/// Two or three ascending breakpoints splitting the real line into
/// `len + 1` tiers.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSet {
    breakpoints: Vec<f64>,
}

impl ThresholdSet {
    pub fn new(breakpoints: Vec<f64>) -> Result<Self, ThresholdError> {
        if !(2..GRADED.len()).contains(&breakpoints.len()) {
            return Err(ThresholdError::Cardinality(breakpoints.len()));
        }
        if let Some(bad) = breakpoints.iter().find(|b| !b.is_finite()) {
            return Err(ThresholdError::NotFinite(*bad));
        }
        for pair in breakpoints.windows(2) {
            if pair[1] < pair[0] {
                return Err(ThresholdError::Decreasing {
                    prev: pair[0],
                    next: pair[1],
                });
            }
        }
        Ok(Self { breakpoints })
    }

    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    pub fn tier_count(&self) -> usize {
        self.breakpoints.len() + 1
    }

    /// A value equal to a breakpoint lands in the upper tier.
    pub fn classify(&self, value: f64) -> RiskTier {
        if value.is_nan() {
            return RiskTier::Unknown;
        }
        let idx = self
            .breakpoints
            .iter()
            .position(|b| value < *b)
            .unwrap_or(self.breakpoints.len());
        GRADED[idx]
    }
}

/// Quantity name -> threshold set.
#[derive(Debug, Clone, Default)]
pub struct ThresholdTable {
    sets: HashMap<String, ThresholdSet>,
}

impl ThresholdTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, quantity: impl Into<String>, set: ThresholdSet) -> &mut Self {
        self.sets.insert(quantity.into(), set);
        self
    }

    pub fn get(&self, quantity: &str) -> Option<&ThresholdSet> {
        self.sets.get(quantity)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn classify(&self, value: f64, quantity: &str) -> RiskTier {
        classify(self, value, quantity)
    }
}

/// Tier for `value` under the set registered for `quantity`; `Unknown` when
/// there is no such set.
pub fn classify(table: &ThresholdTable, value: f64, quantity: &str) -> RiskTier {
    match table.get(quantity) {
        Some(set) => set.classify(value),
        None => RiskTier::Unknown,
    }
}

//! Fixed risk breakpoints for every quantity the served models emit.

use crate::domain::Domain;
use crate::risk::{ThresholdError, ThresholdSet, ThresholdTable};

const TRANSPORT: &[(&str, &[f64])] = &[("Predicted Emission", &[500.0, 2000.0, 5000.0])];

const EXPLOSIVES: &[(&str, &[f64])] = &[
    ("CO", &[400.0, 700.0]),
    ("NOx", &[20.0, 40.0]),
    ("NH3", &[50.0, 80.0]),
    ("HCN", &[20.0, 50.0]),
    ("H2S", &[20.0, 50.0]),
    ("SO2", &[1.0, 5.0]),
    ("CO2", &[1000.0, 5000.0]),
];

const FUEL: &[(&str, &[f64])] = &[
    ("CO2 (kg)", &[2000.0, 9000.0, 15000.0]),
    ("Nitrous Oxide CO2e (kg)", &[200.0, 500.0, 1000.0]),
    ("Methane CO2e (kg)", &[30.0, 100.0, 200.0]),
    ("Total Direct CO2e (kg)", &[2000.0, 9000.0, 15000.0]),
    ("Indirect CO2e (kg)", &[500.0, 1000.0, 1500.0]),
    ("Life Cycle CO2e (kg)", &[10000.0, 15000.0, 20000.0]),
];

const ELECTRICITY: &[(&str, &[f64])] = &[("predicted_co2", &[300.0, 700.0, 1200.0])];

fn rows(domain: Domain) -> &'static [(&'static str, &'static [f64])] {
    match domain {
        Domain::Transport => TRANSPORT,
        Domain::Explosives => EXPLOSIVES,
        Domain::Fuel => FUEL,
        Domain::Electricity => ELECTRICITY,
    }
}

/// Table for a single domain.
pub fn domain_table(domain: Domain) -> Result<ThresholdTable, ThresholdError> {
    let mut table = ThresholdTable::new();
    for (name, breakpoints) in rows(domain) {
        table.insert(*name, ThresholdSet::new(breakpoints.to_vec())?);
    }
    Ok(table)
}

/// Table covering every domain. Quantity names do not collide across domains.
pub fn standard_table() -> Result<ThresholdTable, ThresholdError> {
    let mut table = ThresholdTable::new();
    for domain in Domain::ALL {
        for (name, breakpoints) in rows(domain) {
            table.insert(*name, ThresholdSet::new(breakpoints.to_vec())?);
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskTier;

    #[test]
    fn test_every_output_has_a_threshold_set() {
        let table = standard_table().unwrap();
        let expected: usize = Domain::ALL.iter().map(|d| d.outputs().len()).sum();
        assert_eq!(table.len(), expected);
        for domain in Domain::ALL {
            let own = domain_table(domain).unwrap();
            for name in domain.outputs() {
                assert!(own.get(name).is_some(), "{domain}: no thresholds for {name}");
            }
        }
    }

    #[test]
    fn test_tier_counts_per_domain() {
        let table = standard_table().unwrap();
        assert_eq!(table.get("Predicted Emission").unwrap().tier_count(), 4);
        assert_eq!(table.get("predicted_co2").unwrap().tier_count(), 4);
        assert_eq!(table.get("CO2 (kg)").unwrap().tier_count(), 4);
        for gas in crate::domain::EXPLOSIVE_OUTPUTS {
            assert_eq!(table.get(gas).unwrap().tier_count(), 3, "{gas}");
        }
    }

    #[test]
    fn test_electricity_boundaries() {
        let table = domain_table(Domain::Electricity).unwrap();
        let cases = [
            (299.0, RiskTier::Low),
            (300.0, RiskTier::Moderate),
            (699.0, RiskTier::Moderate),
            (700.0, RiskTier::High),
            (1199.0, RiskTier::High),
            (1200.0, RiskTier::Severe),
        ];
        for (value, tier) in cases {
            assert_eq!(table.classify(value, "predicted_co2"), tier, "value {value}");
        }
    }

    #[test]
    fn test_fuel_first_breakpoint() {
        let table = domain_table(Domain::Fuel).unwrap();
        assert_eq!(table.classify(2000.0, "CO2 (kg)"), RiskTier::Moderate);
        assert_eq!(table.classify(1999.999, "CO2 (kg)"), RiskTier::Low);
        assert_eq!(table.classify(20000.0, "Life Cycle CO2e (kg)"), RiskTier::Severe);
    }

    #[test]
    fn test_explosive_gases_cap_at_high() {
        let table = domain_table(Domain::Explosives).unwrap();
        assert_eq!(table.classify(0.5, "SO2"), RiskTier::Low);
        assert_eq!(table.classify(1.0, "SO2"), RiskTier::Moderate);
        assert_eq!(table.classify(900.0, "SO2"), RiskTier::High);
        assert_eq!(table.classify(10.0, "CO2 (kg)"), RiskTier::Unknown);
    }
}

use serde::Serialize;

/// One of the four emission sources a model is served for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Transport,
    Explosives,
    Fuel,
    Electricity,
}

pub const TRANSPORT_OUTPUTS: [&str; 1] = ["Predicted Emission"];

pub const EXPLOSIVE_OUTPUTS: [&str; 7] = ["CO", "NOx", "NH3", "HCN", "H2S", "SO2", "CO2"];

pub const FUEL_OUTPUTS: [&str; 6] = [
    "CO2 (kg)",
    "Nitrous Oxide CO2e (kg)",
    "Methane CO2e (kg)",
    "Total Direct CO2e (kg)",
    "Indirect CO2e (kg)",
    "Life Cycle CO2e (kg)",
];

pub const ELECTRICITY_OUTPUTS: [&str; 1] = ["predicted_co2"];

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Transport,
        Domain::Explosives,
        Domain::Fuel,
        Domain::Electricity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Domain::Transport => "transport",
            Domain::Explosives => "explosives",
            Domain::Fuel => "fuel",
            Domain::Electricity => "electricity",
        }
    }

    /// Names of the model outputs, in the order the model emits them.
    pub fn outputs(self) -> &'static [&'static str] {
        match self {
            Domain::Transport => &TRANSPORT_OUTPUTS,
            Domain::Explosives => &EXPLOSIVE_OUTPUTS,
            Domain::Fuel => &FUEL_OUTPUTS,
            Domain::Electricity => &ELECTRICITY_OUTPUTS,
        }
    }

    /// Width of the feature row fed to the model.
    pub fn feature_count(self) -> usize {
        match self {
            Domain::Transport => 3,
            Domain::Explosives => 2,
            Domain::Fuel => 2,
            Domain::Electricity => 4,
        }
    }

    /// Decimal places kept on reported values; risk is judged before rounding.
    pub fn round_to(self) -> Option<i32> {
        match self {
            Domain::Fuel => Some(3),
            _ => None,
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw categorical input as received. Anything that is not a string is
/// kept as-is and encodes to the unseen-category code.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Category {
    Label(String),
    Raw(serde_json::Value),
}

impl Category {
    pub fn from_json(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::String(s) => Category::Label(s.clone()),
            other => Category::Raw(other.clone()),
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            Category::Label(s) => Some(s),
            Category::Raw(_) => None,
        }
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Category::Label(s.to_string())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Label(s) => f.write_str(s),
            Category::Raw(v) => write!(f, "{v}"),
        }
    }
}

/// A single model input column before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Categorical(Category),
    Numeric(f64),
}

/// Model input columns in training order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow(pub Vec<Feature>);

/// One entity record of a day, echoed back in the response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntityInput {
    Transport {
        weight_unit: String,
        weight_value: f64,
        distance_unit: String,
        distance_value: f64,
        transport_method: Category,
    },
    Explosive {
        explosive_type: Category,
        amount: f64,
    },
    Fuel {
        fuel_type: Category,
        quantity: f64,
    },
    Electricity {
        state_name: String,
        energy_per_time: f64,
        responsible_area: f64,
        total_area: f64,
    },
}

impl EntityInput {
    pub fn domain(&self) -> Domain {
        match self {
            EntityInput::Transport { .. } => Domain::Transport,
            EntityInput::Explosive { .. } => Domain::Explosives,
            EntityInput::Fuel { .. } => Domain::Fuel,
            EntityInput::Electricity { .. } => Domain::Electricity,
        }
    }

    pub fn features(&self) -> FeatureRow {
        use Feature::{Categorical, Numeric};
        let cols = match self {
            // units are not model inputs
            EntityInput::Transport {
                weight_value,
                distance_value,
                transport_method,
                ..
            } => vec![
                Numeric(*weight_value),
                Numeric(*distance_value),
                Categorical(transport_method.clone()),
            ],
            EntityInput::Explosive {
                explosive_type,
                amount,
            } => vec![Categorical(explosive_type.clone()), Numeric(*amount)],
            EntityInput::Fuel {
                fuel_type,
                quantity,
            } => vec![Categorical(fuel_type.clone()), Numeric(*quantity)],
            EntityInput::Electricity {
                state_name,
                energy_per_time,
                responsible_area,
                total_area,
            } => vec![
                Categorical(Category::Label(state_name.clone())),
                Numeric(*energy_per_time),
                Numeric(*responsible_area),
                Numeric(*total_area),
            ],
        };
        FeatureRow(cols)
    }
}

/// Ordered entity records for one day.
pub type Day = Vec<EntityInput>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_rows_match_domain_width() {
        let inputs = [
            EntityInput::Transport {
                weight_unit: "kg".into(),
                weight_value: 10.0,
                distance_unit: "km".into(),
                distance_value: 100.0,
                transport_method: "truck".into(),
            },
            EntityInput::Explosive {
                explosive_type: "TNT".into(),
                amount: 3000.0,
            },
            EntityInput::Fuel {
                fuel_type: "Diesel".into(),
                quantity: 120.0,
            },
            EntityInput::Electricity {
                state_name: "Karnataka".into(),
                energy_per_time: 1.0,
                responsible_area: 2.0,
                total_area: 3.0,
            },
        ];
        for input in &inputs {
            let FeatureRow(cols) = input.features();
            assert_eq!(cols.len(), input.domain().feature_count());
            let cats = cols
                .iter()
                .filter(|c| matches!(c, Feature::Categorical(_)))
                .count();
            assert_eq!(cats, 1, "{} must carry one categorical column", input.domain());
        }
    }

    #[test]
    fn test_transport_method_is_last_column() {
        let row = EntityInput::Transport {
            weight_unit: "t".into(),
            weight_value: 2.0,
            distance_unit: "mi".into(),
            distance_value: 50.0,
            transport_method: "rail".into(),
        }
        .features();
        assert_eq!(
            row.0,
            vec![
                Feature::Numeric(2.0),
                Feature::Numeric(50.0),
                Feature::Categorical("rail".into()),
            ]
        );
    }

    #[test]
    fn test_entity_serializes_flat() {
        let v = serde_json::to_value(EntityInput::Fuel {
            fuel_type: "Petrol".into(),
            quantity: 4.5,
        })
        .unwrap();
        assert_eq!(v, serde_json::json!({"fuel_type": "Petrol", "quantity": 4.5}));
    }

    #[test]
    fn test_non_string_category_echoes_raw_value() {
        let cat = Category::from_json(&serde_json::json!(42));
        assert_eq!(cat.as_label(), None);
        let v = serde_json::to_value(EntityInput::Explosive {
            explosive_type: cat,
            amount: 10.0,
        })
        .unwrap();
        assert_eq!(v, serde_json::json!({"explosive_type": 42, "amount": 10.0}));
        assert_eq!(Category::from_json(&serde_json::json!("TNT")), Category::from("TNT"));
    }
}

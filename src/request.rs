//! Request body validation.
//!
//! Every body is checked in full before any model is invoked, so a bad
//! entity anywhere in the batch rejects the whole request.

use serde_json::{Map, Value};

use crate::domain::{Category, Day, EntityInput};
use crate::error::{ApiError, ApiResult};

pub const DAYS_DATA: &str = "days_data";
pub const STATE_NAME: &str = "state_name";

const ENERGY_PER_TIME: &str = "energyPerTime";
const RESPONSIBLE_AREA: &str = "responsibleArea";
const TOTAL_AREA: &str = "totalArea";

fn object(body: &Value) -> ApiResult<&Map<String, Value>> {
    body.as_object()
        .ok_or_else(|| ApiError::MalformedBody("expected a JSON object".into()))
}

/// Returns the named fields in order, or every missing name at once.
fn require<'a>(obj: &'a Map<String, Value>, fields: &[&str]) -> ApiResult<Vec<&'a Value>> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|f| obj.get(**f).map_or(true, Value::is_null))
        .map(|f| f.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::MissingFields(missing));
    }
    Ok(fields.iter().filter_map(|f| obj.get(*f)).collect())
}

fn array<'a>(v: &'a Value, path: &str) -> ApiResult<&'a Vec<Value>> {
    v.as_array()
        .ok_or_else(|| ApiError::invalid(path, "expected an array"))
}

fn text(v: &Value, path: &str) -> ApiResult<String> {
    match v {
        Value::String(s) => Ok(s.clone()),
        _ => Err(ApiError::invalid(path, "expected a string")),
    }
}

/// Accepts a JSON number or a string holding one. Models run in `f32`, so
/// anything outside its range is rejected.
fn number(v: &Value, path: &str) -> ApiResult<f64> {
    let parsed = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(x) if x.is_finite() && x.abs() <= f32::MAX as f64 => Ok(x),
        Some(x) if x.is_finite() => Err(ApiError::invalid(path, "number out of range")),
        _ => Err(ApiError::invalid(path, "expected a finite number")),
    }
}

/// Days whose entities are fixed-length positional arrays.
fn tuple_days<F>(days: &Value, arity: usize, build: F) -> ApiResult<Vec<Day>>
where
    F: Fn(&[Value], &str) -> ApiResult<EntityInput>,
{
    let days = array(days, DAYS_DATA)?;
    let mut out = Vec::with_capacity(days.len());
    for (d, day) in days.iter().enumerate() {
        let day_path = format!("{DAYS_DATA}[{d}]");
        let entries = array(day, &day_path)?;
        let mut parsed = Vec::with_capacity(entries.len());
        for (e, entry) in entries.iter().enumerate() {
            let path = format!("{day_path}[{e}]");
            let cols = array(entry, &path)?;
            if cols.len() != arity {
                return Err(ApiError::invalid(
                    path,
                    format!("expected {arity} values, got {}", cols.len()),
                ));
            }
            parsed.push(build(cols, &path)?);
        }
        out.push(parsed);
    }
    Ok(out)
}

/// `days_data: [[[weight_unit, weight_value, distance_unit, distance_value, transport_method], ..], ..]`
pub fn parse_transport(body: &Value) -> ApiResult<Vec<Day>> {
    let fields = require(object(body)?, &[DAYS_DATA])?;
    tuple_days(fields[0], 5, |c, p| {
        Ok(EntityInput::Transport {
            weight_unit: text(&c[0], &format!("{p}[0]"))?,
            weight_value: number(&c[1], &format!("{p}[1]"))?,
            distance_unit: text(&c[2], &format!("{p}[2]"))?,
            distance_value: number(&c[3], &format!("{p}[3]"))?,
            transport_method: Category::from_json(&c[4]),
        })
    })
}

/// `days_data: [[[explosive_type, amount], ..], ..]`
pub fn parse_explosive(body: &Value) -> ApiResult<Vec<Day>> {
    let fields = require(object(body)?, &[DAYS_DATA])?;
    tuple_days(fields[0], 2, |c, p| {
        Ok(EntityInput::Explosive {
            explosive_type: Category::from_json(&c[0]),
            amount: number(&c[1], &format!("{p}[1]"))?,
        })
    })
}

/// `days_data: [[[fuel_type, volume], ..], ..]`
pub fn parse_fuel(body: &Value) -> ApiResult<Vec<Day>> {
    let fields = require(object(body)?, &[DAYS_DATA])?;
    tuple_days(fields[0], 2, |c, p| {
        Ok(EntityInput::Fuel {
            fuel_type: Category::from_json(&c[0]),
            quantity: number(&c[1], &format!("{p}[1]"))?,
        })
    })
}

/// One day of electricity usage before the state is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectricityReading {
    pub energy_per_time: f64,
    pub responsible_area: f64,
    pub total_area: f64,
}

impl ElectricityReading {
    pub fn with_state(self, state_name: &str) -> EntityInput {
        EntityInput::Electricity {
            state_name: state_name.to_string(),
            energy_per_time: self.energy_per_time,
            responsible_area: self.responsible_area,
            total_area: self.total_area,
        }
    }
}

/// Gives every reading the request-level state; each reading is its own day.
pub fn inject_state(readings: Vec<ElectricityReading>, state_name: &str) -> Vec<Day> {
    readings
        .into_iter()
        .map(|r| vec![r.with_state(state_name)])
        .collect()
}

/// `{state_name, days_data: [{energyPerTime, responsibleArea, totalArea}, ..]}`
pub fn parse_electricity(body: &Value) -> ApiResult<(String, Vec<ElectricityReading>)> {
    let fields = require(object(body)?, &[DAYS_DATA, STATE_NAME])?;
    let state = text(fields[1], STATE_NAME)?;
    if state.trim().is_empty() {
        return Err(ApiError::invalid(STATE_NAME, "must not be empty"));
    }

    let days = array(fields[0], DAYS_DATA)?;
    let mut readings = Vec::with_capacity(days.len());
    for (d, day) in days.iter().enumerate() {
        let path = format!("{DAYS_DATA}[{d}]");
        let obj = day
            .as_object()
            .ok_or_else(|| ApiError::invalid(&path, "expected an object"))?;
        let vals = require(obj, &[ENERGY_PER_TIME, RESPONSIBLE_AREA, TOTAL_AREA]).map_err(
            |e| match e {
                ApiError::MissingFields(names) => ApiError::MissingFields(
                    names.into_iter().map(|n| format!("{path}.{n}")).collect(),
                ),
                other => other,
            },
        )?;
        readings.push(ElectricityReading {
            energy_per_time: number(vals[0], &format!("{path}.{ENERGY_PER_TIME}"))?,
            responsible_area: number(vals[1], &format!("{path}.{RESPONSIBLE_AREA}"))?,
            total_area: number(vals[2], &format!("{path}.{TOTAL_AREA}"))?,
        });
    }
    Ok((state, readings))
}

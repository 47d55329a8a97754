use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::core::sample::Sample;

/// Tags attached to every point.
pub type Tags = BTreeMap<String, String>;

/// A single time series point ready to be written.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub measurement: String,
    pub timestamp: DateTime<Utc>,
    pub tags: Tags,
    pub fields: Vec<Field>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

impl Field {
    const fn new(name: &'static str, value: f64, unit: &'static str) -> Self {
        Self { name, value, unit }
    }
}

impl Point {
    pub fn from_sample(measurement: &str, tags: &Tags, sample: &Sample) -> Self {
        Self {
            measurement: measurement.to_owned(),
            timestamp: sample.timestamp,
            tags: tags.clone(),
            fields: vec![
                Field::new("Battery_SOC", sample.battery_soc.0, "%"),
                Field::new("Solar_Produced_Current", sample.solar_produced_current.0, "kW"),
                Field::new("Consumption_Current", sample.consumption_current.0, "kW"),
                Field::new("Grid_Consumption_Current", sample.grid_consumption_current.0, "kW"),
                Field::new("Grid_FeedIn_Current", sample.grid_feedin_current.0, "kW"),
                Field::new("Battery_Charging", sample.battery_charging_current.0, "kW"),
                Field::new("Battery_Discharging", sample.battery_discharging_current.0, "kW"),
                Field::new("Grid_FeedIn_Total", sample.grid_feedin_total.0, "kWh"),
                Field::new("Grid_Consumption_Total", sample.grid_consumption_total.0, "kWh"),
                Field::new("Consumption_Total", sample.consumption_total.0, "kWh"),
                Field::new("Solar_Produced_Total", sample.solar_produced_total.0, "kWh"),
                Field::new("Autonomy_Percentage", sample.autonomy_percentage.0, "%"),
            ],
        }
    }
}

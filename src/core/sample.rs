use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    api::fronius::{
        RealtimeData,
        models::{Meter, PowerFlow, Response},
    },
    quantity::{
        energy::KilowattHours,
        percentage::Percentage,
        power::{Kilowatts, Watts},
    },
};

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to decode the {document} document: {source}")]
    Decode { document: &'static str, source: serde_json::Error },

    #[error("inverter #{inverter_id} reports no state of charge")]
    MissingStateOfCharge { inverter_id: u32 },

    #[error("`{field}` is not a finite number: {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("state of charge {0} is out of range")]
    StateOfChargeOutOfRange(Percentage),
}

/// One tick worth of metrics.
///
/// All flows are non-negative: signed device readings are split into a pair of fields.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub battery_soc: Percentage,

    pub solar_produced_current: Kilowatts,
    pub consumption_current: Kilowatts,
    pub grid_consumption_current: Kilowatts,
    pub grid_feedin_current: Kilowatts,
    pub battery_charging_current: Kilowatts,
    pub battery_discharging_current: Kilowatts,

    pub grid_feedin_total: KilowattHours,
    pub grid_consumption_total: KilowattHours,
    pub consumption_total: KilowattHours,
    pub solar_produced_total: KilowattHours,

    pub autonomy_percentage: Percentage,
}

impl Sample {
    pub fn transform(data: &RealtimeData, inverter_id: u32) -> Result<Self, TransformError> {
        let power_flow = Response::<PowerFlow>::deserialize(&data.power_flow)
            .map_err(|source| TransformError::Decode { document: "power flow", source })?
            .body
            .data;
        let meter = Response::<Meter>::deserialize(&data.meter)
            .map_err(|source| TransformError::Decode { document: "meter", source })?
            .body
            .data;

        let battery_soc = power_flow
            .inverters
            .get(&inverter_id.to_string())
            .and_then(|inverter| inverter.state_of_charge)
            .ok_or(TransformError::MissingStateOfCharge { inverter_id })?;

        let site = power_flow.site;
        let readings = [
            ("P_PV", site.photovoltaic_power.0),
            ("P_Load", site.load_power.0),
            ("P_Grid", site.grid_power.0),
            ("P_Akku", site.battery_power.0),
            ("SOC", battery_soc.0),
            ("EnergyReal_WAC_Sum_Produced", meter.sum_produced.0),
            ("EnergyReal_WAC_Sum_Consumed", meter.sum_consumed.0),
            ("EnergyReal_WAC_Minus_Absolute", meter.minus_absolute.0),
            ("EnergyReal_WAC_Plus_Absolute", meter.plus_absolute.0),
        ];
        // Numeric strings may spell out `NaN` and `inf`:
        if let Some((field, value)) = readings.into_iter().find(|(_, value)| !value.is_finite()) {
            return Err(TransformError::NonFinite { field, value });
        }
        if !(Percentage::ZERO..=Percentage::HUNDRED).contains(&battery_soc) {
            return Err(TransformError::StateOfChargeOutOfRange(battery_soc));
        }

        let consumption_current = Kilowatts::from(site.load_power).abs();
        let (grid_consumption_current, grid_feedin_current) = split(site.grid_power);
        let (battery_discharging_current, battery_charging_current) = split(site.battery_power);

        Ok(Self {
            timestamp: data.fetched_at,
            battery_soc,
            solar_produced_current: Kilowatts::from(site.photovoltaic_power).max(Kilowatts::ZERO),
            consumption_current,
            grid_consumption_current,
            grid_feedin_current,
            battery_charging_current,
            battery_discharging_current,
            grid_feedin_total: meter.sum_produced.into(),
            grid_consumption_total: meter.sum_consumed.into(),
            consumption_total: meter.minus_absolute.into(),
            solar_produced_total: meter.plus_absolute.into(),
            autonomy_percentage: autonomy(grid_consumption_current, consumption_current),
        })
    }
}

/// Split a signed flow into its positive and negative parts.
fn split(power: Watts) -> (Kilowatts, Kilowatts) {
    let power = Kilowatts::from(power);
    if power >= Kilowatts::ZERO { (power, Kilowatts::ZERO) } else { (Kilowatts::ZERO, -power) }
}

/// Share of the consumption not covered by the grid.
fn autonomy(grid_consumption: Kilowatts, consumption: Kilowatts) -> Percentage {
    if consumption > Kilowatts::ZERO {
        Percentage(100.0 * (1.0 - grid_consumption.0 / consumption.0))
            .clamp(Percentage::ZERO, Percentage::HUNDRED)
    } else {
        Percentage::HUNDRED
    }
}

//! Typed view of the Solar API v1 documents the collector reads.
//!
//! Only the fields the collector needs are declared. Numbers are accepted both as JSON numbers
//! and as numeric strings.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_with::{DefaultOnNull, DisplayFromStr, PickFirst, serde_as};

use crate::quantity::{energy::WattHours, percentage::Percentage, power::Watts};

#[derive(Deserialize)]
pub struct Response<T> {
    #[serde(rename = "Body")]
    pub body: Body<T>,
}

#[derive(Deserialize)]
pub struct Body<T> {
    #[serde(rename = "Data")]
    pub data: T,
}

/// `GetPowerFlowRealtimeData.fcgi`.
#[derive(Deserialize)]
pub struct PowerFlow {
    #[serde(rename = "Site")]
    pub site: Site,

    /// Inverters keyed by their device ID.
    #[serde(rename = "Inverters")]
    pub inverters: BTreeMap<String, Inverter>,
}

/// Site-wide power flows.
///
/// Sign conventions, as reported by the device:
///
/// - `P_Load` is negative while the household consumes.
/// - `P_Grid` is positive on import and negative on feed-in.
/// - `P_Akku` is positive while discharging and negative while charging.
#[serde_as]
#[derive(Deserialize)]
pub struct Site {
    /// The device reports `null` when there is no production.
    #[serde_as(as = "DefaultOnNull<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(rename = "P_PV")]
    pub photovoltaic_power: Watts,

    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "P_Load")]
    pub load_power: Watts,

    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "P_Grid")]
    pub grid_power: Watts,

    /// The device reports `null` when there is no battery attached.
    #[serde_as(as = "DefaultOnNull<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(rename = "P_Akku")]
    pub battery_power: Watts,
}

#[serde_as]
#[derive(Deserialize)]
pub struct Inverter {
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(rename = "SOC")]
    pub state_of_charge: Option<Percentage>,
}

/// `GetMeterRealtimeData.cgi?Scope=Device`.
#[serde_as]
#[derive(Deserialize)]
pub struct Meter {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "EnergyReal_WAC_Sum_Produced")]
    pub sum_produced: WattHours,

    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "EnergyReal_WAC_Sum_Consumed")]
    pub sum_consumed: WattHours,

    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "EnergyReal_WAC_Minus_Absolute")]
    pub minus_absolute: WattHours,

    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "EnergyReal_WAC_Plus_Absolute")]
    pub plus_absolute: WattHours,
}

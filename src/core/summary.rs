use std::fmt::{Display, Formatter};

use crate::{core::sample::Sample, quantity::power::Kilowatts};

/// Single-line human-readable rendering of a sample.
pub struct Summary<'a>(pub &'a Sample);

impl Display for Summary<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sample = self.0;
        write!(f, "Solar={} | Load={} | ", sample.solar_produced_current, sample.consumption_current)?;
        write!(f, "Grid={} | ", SignedPair(sample.grid_feedin_current, sample.grid_consumption_current))?;
        write!(f, "SOC={} | ", sample.battery_soc)?;
        write!(
            f,
            "Battery={} | ",
            SignedPair(sample.battery_charging_current, sample.battery_discharging_current),
        )?;
        write!(f, "Autonomy={} | ", sample.autonomy_percentage)?;
        write!(
            f,
            "ConsumptionTotal={} | GridConsumptionTotal={} | GridFeedInTotal={}",
            sample.consumption_total, sample.grid_consumption_total, sample.grid_feedin_total,
        )
    }
}

/// Inflow and outflow as `+in/-out kW`.
struct SignedPair(Kilowatts, Kilowatts);

impl Display for SignedPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "+{:.2}/-{:.2} kW", self.0.0, self.1.0)
    }
}

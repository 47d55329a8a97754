quantity!(WattHours, suffix: "Wh", precision: 0);
quantity!(KilowattHours, suffix: "kWh", precision: 2);

impl From<WattHours> for KilowattHours {
    fn from(watt_hours: WattHours) -> Self {
        Self(watt_hours.0 / 1000.0)
    }
}

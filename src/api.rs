pub mod fronius;
pub mod influx;

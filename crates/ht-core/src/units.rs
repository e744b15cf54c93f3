// ht-core/src/units.rs

use uom::fmt::DisplayStyle::Abbreviation;
use uom::si::f64::{
    Length as UomLength, ThermodynamicTemperature as UomThermodynamicTemperature,
    Time as UomTime, Volume as UomVolume, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Length = UomLength;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;
pub type Volume = UomVolume;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn degc(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

#[inline]
pub fn m3ps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_second;
    VolumeRate::new::<cubic_meter_per_second>(v)
}

/// Human-readable temperature, e.g. `40.00 °C`.
pub fn display_degc(t: Temperature) -> String {
    use uom::si::thermodynamic_temperature::degree_celsius;
    format!("{:.2}", t.into_format_args(degree_celsius, Abbreviation))
}

/// Human-readable duration, e.g. `12.50 s`.
pub fn display_s(t: Time) -> String {
    use uom::si::time::second;
    format!("{:.2}", t.into_format_args(second, Abbreviation))
}

/// Human-readable length, e.g. `1.25 m`.
pub fn display_m(l: Length) -> String {
    use uom::si::length::meter;
    format!("{:.2}", l.into_format_args(meter, Abbreviation))
}

/// Time for a tank of `volume` to be flushed once by `flow`.
pub fn residence_time(volume: Volume, flow: VolumeRate) -> Time {
    volume / flow
}

pub mod constants {
    /// Latent heat of condensation of saturated steam near atmospheric pressure.
    pub const STEAM_LATENT_HEAT_J_PER_KG: f64 = 2.3e6;
    pub const WATER_DENSITY_KG_M3: f64 = 1000.0;
    pub const WATER_CP_J_PER_KG_K: f64 = 4200.0;
}

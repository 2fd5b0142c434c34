//! Standard atmosphere to 86 km
//!
//! Seven layers of linear temperature in geopotential altitude, with the
//! hydrostatic pressure integrated through each layer. Base pressures are
//! chained from the sea-level value when the model is built, so the profile
//! is continuous by construction.
//!
//! Freestream conditions for the shock and cone relations: the ratios
//! those return multiply the static state found here.

use crate::error::FlowError;

/// Standard gravity (m/s²)
const G0: f64 = 9.80665;
/// Specific gas constant of dry air (J/(kg·K))
const R_AIR: f64 = 287.0531;
/// Specific-heat ratio of air
const GAMMA: f64 = 1.4;
/// Earth radius used for the geopotential conversion (m)
const EARTH_RADIUS: f64 = 6_356_766.0;

/// Sutherland's law constants for air
const SUTHERLAND_BETA: f64 = 1.458e-6;
const SUTHERLAND_S: f64 = 110.4;

const SEA_LEVEL_TEMPERATURE: f64 = 288.15;
const SEA_LEVEL_PRESSURE: f64 = 101_325.0;

/// Geometric ceiling of the model (m)
pub const MAX_ALTITUDE: f64 = 86_000.0;

/// (base geopotential altitude m, lapse rate K/m)
const LAYER_TABLE: [(f64, f64); 7] = [
    (0.0, -0.0065),
    (11_000.0, 0.0),
    (20_000.0, 0.001),
    (32_000.0, 0.0028),
    (47_000.0, 0.0),
    (51_000.0, -0.0028),
    (71_000.0, -0.002),
];

#[derive(Debug, Clone, Copy)]
struct Layer {
    base_altitude: f64,
    base_temperature: f64,
    base_pressure: f64,
    lapse_rate: f64,
}

impl Layer {
    fn temperature_pressure(&self, h: f64) -> (f64, f64) {
        let dh = h - self.base_altitude;
        let t = self.base_temperature + self.lapse_rate * dh;
        let p = if self.lapse_rate == 0.0 {
            self.base_pressure * (-G0 * dh / (R_AIR * self.base_temperature)).exp()
        } else {
            self.base_pressure * (t / self.base_temperature).powf(-G0 / (self.lapse_rate * R_AIR))
        };
        (t, p)
    }
}

/// Static state of the atmosphere at one altitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereState {
    /// Geometric altitude (m)
    pub altitude: f64,
    /// Geopotential altitude (m)
    pub geopotential_altitude: f64,
    /// Temperature (K)
    pub temperature: f64,
    /// Pressure (Pa)
    pub pressure: f64,
    /// Density (kg/m³)
    pub density: f64,
    /// Speed of sound (m/s)
    pub speed_of_sound: f64,
    /// Dynamic viscosity (Pa·s)
    pub viscosity: f64,
}

impl AtmosphereState {
    /// Flight speed (m/s) at Mach `mach`
    pub fn velocity(&self, mach: f64) -> f64 {
        mach * self.speed_of_sound
    }

    /// Unit Reynolds number (1/m) at Mach `mach`
    pub fn unit_reynolds(&self, mach: f64) -> f64 {
        self.density * self.velocity(mach) / self.viscosity
    }
}

/// Layered standard atmosphere
#[derive(Debug, Clone)]
pub struct StandardAtmosphere {
    layers: [Layer; 7],
}

impl Default for StandardAtmosphere {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardAtmosphere {
    /// Build the layers, chaining base temperature and pressure upward
    pub fn new() -> Self {
        let mut layers = [Layer {
            base_altitude: 0.0,
            base_temperature: SEA_LEVEL_TEMPERATURE,
            base_pressure: SEA_LEVEL_PRESSURE,
            lapse_rate: LAYER_TABLE[0].1,
        }; 7];
        for i in 1..layers.len() {
            let (base, lapse) = LAYER_TABLE[i];
            let (t, p) = layers[i - 1].temperature_pressure(base);
            layers[i] = Layer {
                base_altitude: base,
                base_temperature: t,
                base_pressure: p,
                lapse_rate: lapse,
            };
        }
        Self { layers }
    }

    /// State at geometric altitude `altitude` (m), 0 to 86 km
    pub fn at(&self, altitude: f64) -> Result<AtmosphereState, FlowError> {
        if !altitude.is_finite() || !(0.0..=MAX_ALTITUDE).contains(&altitude) {
            return Err(FlowError::domain(format!(
                "altitude {} m outside the standard atmosphere [0, {}] m",
                altitude, MAX_ALTITUDE
            )));
        }
        let h = EARTH_RADIUS * altitude / (EARTH_RADIUS + altitude);
        Ok(self.state(altitude, h))
    }

    /// State at geopotential altitude `h` (m)
    pub fn at_geopotential(&self, h: f64) -> Result<AtmosphereState, FlowError> {
        let top = EARTH_RADIUS * MAX_ALTITUDE / (EARTH_RADIUS + MAX_ALTITUDE);
        if !h.is_finite() || !(0.0..=top).contains(&h) {
            return Err(FlowError::domain(format!(
                "geopotential altitude {} m outside the standard atmosphere [0, {:.1}] m",
                h, top
            )));
        }
        let z = EARTH_RADIUS * h / (EARTH_RADIUS - h);
        Ok(self.state(z, h))
    }

    fn state(&self, altitude: f64, h: f64) -> AtmosphereState {
        let layer = self
            .layers
            .iter()
            .rev()
            .find(|l| h >= l.base_altitude)
            .unwrap_or(&self.layers[0]);
        let (temperature, pressure) = layer.temperature_pressure(h);
        AtmosphereState {
            altitude,
            geopotential_altitude: h,
            temperature,
            pressure,
            density: pressure / (R_AIR * temperature),
            speed_of_sound: (GAMMA * R_AIR * temperature).sqrt(),
            viscosity: SUTHERLAND_BETA * temperature.powf(1.5) / (temperature + SUTHERLAND_S),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sea_level() {
        let s = StandardAtmosphere::new().at(0.0).unwrap();
        assert_eq!(s.temperature, 288.15);
        assert_eq!(s.pressure, 101_325.0);
        assert!((s.density - 1.2250).abs() < 1e-4, "ρ = {}", s.density);
        assert!((s.speed_of_sound - 340.294).abs() < 1e-2);
        assert!((s.viscosity - 1.7894e-5).abs() < 1e-8);
    }

    #[test]
    fn test_chained_base_pressures() {
        // Published layer base pressures (Pa) at geopotential altitudes
        let atm = StandardAtmosphere::new();
        for &(h, p) in &[
            (11_000.0, 22_632.06),
            (20_000.0, 5_474.889),
            (32_000.0, 868.0187),
            (47_000.0, 110.9063),
            (51_000.0, 66.93887),
            (71_000.0, 3.956420),
        ] {
            let s = atm.at_geopotential(h).unwrap();
            assert!((s.pressure / p - 1.0).abs() < 1e-4, "p({}) = {} vs {}", h, s.pressure, p);
        }
    }

    #[test]
    fn test_isothermal_layers() {
        let atm = StandardAtmosphere::new();
        let a = atm.at_geopotential(12_000.0).unwrap();
        let b = atm.at_geopotential(19_000.0).unwrap();
        assert!((a.temperature - 216.65).abs() < 1e-9);
        assert!((b.temperature - 216.65).abs() < 1e-9);
        assert!(b.pressure < a.pressure);
    }

    #[test]
    fn test_geometric_altitude_is_higher() {
        let atm = StandardAtmosphere::new();
        let s = atm.at(11_000.0).unwrap();
        assert!(s.geopotential_altitude < 11_000.0);
        assert!(s.temperature > 216.65);
        let top = atm.at(MAX_ALTITUDE).unwrap();
        assert!((top.temperature - 186.946).abs() < 1e-2, "T(86 km) = {}", top.temperature);
    }

    #[test]
    fn test_out_of_range() {
        let atm = StandardAtmosphere::new();
        assert!(atm.at(-1.0).is_err());
        assert!(atm.at(90_000.0).is_err());
        assert!(atm.at(f64::NAN).is_err());
    }

    #[test]
    fn test_unit_reynolds() {
        let s = StandardAtmosphere::new().at(0.0).unwrap();
        let re = s.unit_reynolds(1.0);
        assert!((re / 2.3296e7 - 1.0).abs() < 1e-3, "Re/m = {}", re);
    }
}

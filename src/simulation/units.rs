//! Unit system for simulation quantities
//!
//! Positions, velocities, masses and `G` are stored in the units chosen here.
//! Body radii are always metres. The default system is km / s / kg.

use serde::Deserialize;

/// Gravitational constant in m^3 kg^-1 s^-2
pub const G_SI: f64 = 6.67428e-11;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceUnit {
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "km")]
    #[default]
    Kilometer,
    #[serde(rename = "AU")]
    AstronomicalUnit,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeUnit {
    #[serde(rename = "s")]
    #[default]
    Second,
    #[serde(rename = "hr")]
    Hour,
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "yr")]
    Year, // julian year
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MassUnit {
    #[serde(rename = "kg")]
    #[default]
    Kilogram,
    #[serde(rename = "Msun")]
    SolarMass,
}

impl DistanceUnit {
    pub fn in_meters(self) -> f64 {
        match self {
            DistanceUnit::Meter => 1.0,
            DistanceUnit::Kilometer => 1.0e3,
            DistanceUnit::AstronomicalUnit => 1.495_978_707e11,
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            DistanceUnit::Meter => 0,
            DistanceUnit::Kilometer => 1,
            DistanceUnit::AstronomicalUnit => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(DistanceUnit::Meter),
            1 => Some(DistanceUnit::Kilometer),
            2 => Some(DistanceUnit::AstronomicalUnit),
            _ => None,
        }
    }
}

impl TimeUnit {
    pub fn in_seconds(self) -> f64 {
        match self {
            TimeUnit::Second => 1.0,
            TimeUnit::Hour => 3600.0,
            TimeUnit::Day => 86_400.0,
            TimeUnit::Year => 31_557_600.0,
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            TimeUnit::Second => 0,
            TimeUnit::Hour => 1,
            TimeUnit::Day => 2,
            TimeUnit::Year => 3,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(TimeUnit::Second),
            1 => Some(TimeUnit::Hour),
            2 => Some(TimeUnit::Day),
            3 => Some(TimeUnit::Year),
            _ => None,
        }
    }
}

impl MassUnit {
    pub fn in_kilograms(self) -> f64 {
        match self {
            MassUnit::Kilogram => 1.0,
            MassUnit::SolarMass => 1.988_47e30,
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            MassUnit::Kilogram => 0,
            MassUnit::SolarMass => 1,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(MassUnit::Kilogram),
            1 => Some(MassUnit::SolarMass),
            _ => None,
        }
    }
}

/// Distance / time / mass basis of a simulation
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Units {
    #[serde(default)]
    pub distance: DistanceUnit,
    #[serde(default)]
    pub time: TimeUnit,
    #[serde(default)]
    pub mass: MassUnit,
}

impl Units {
    pub fn new(distance: DistanceUnit, time: TimeUnit, mass: MassUnit) -> Self {
        Self { distance, time, mass }
    }

    /// `G` rescaled from SI into this unit system
    /// km / s / kg gives 6.67428e-20 km^3 kg^-1 s^-2
    pub fn gravitational_constant(&self) -> f64 {
        let l = self.distance.in_meters();
        let t = self.time.in_seconds();
        let m = self.mass.in_kilograms();
        G_SI * m * t * t / (l * l * l)
    }

    /// Factor taking a speed in m/s to sim velocity units
    pub fn velocity_from_si(&self) -> f64 {
        self.time.in_seconds() / self.distance.in_meters()
    }

    /// Factor taking a mass in kg to sim mass units
    pub fn mass_from_si(&self) -> f64 {
        1.0 / self.mass.in_kilograms()
    }

    /// Unit tags in (distance, time, mass) order, as persisted in checkpoints
    pub fn tags(&self) -> [u8; 3] {
        [self.distance.tag(), self.time.tag(), self.mass.tag()]
    }

    pub fn from_tags(tags: [u8; 3]) -> Option<Self> {
        Some(Self {
            distance: DistanceUnit::from_tag(tags[0])?,
            time: TimeUnit::from_tag(tags[1])?,
            mass: MassUnit::from_tag(tags[2])?,
        })
    }
}

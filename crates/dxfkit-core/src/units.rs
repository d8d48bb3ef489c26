//! # Physical Units
//!
//! Mapping between DXF `$INSUNITS` header codes, human-readable unit names,
//! and the scale factors that bring drawing coordinates into millimeters.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Physical drawing unit, numbered like the DXF `$INSUNITS` header variable.
///
/// Codes 0 (unitless), 8 (microinches), and 9 (mils) exist in the DXF
/// format but are rejected because no exact scale is defined for them here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Inches = 1,
    Feet = 2,
    Miles = 3,
    Millimeters = 4,
    Centimeters = 5,
    Meters = 6,
    Kilometers = 7,
    Yards = 10,
    Angstroms = 11,
    Nanometers = 12,
    Microns = 13,
    Decimeters = 14,
    Decameters = 15,
    Hectometers = 16,
    Gigameters = 17,
    AstronomicalUnits = 18,
    LightYears = 19,
    Parsecs = 20,
}

impl Unit {
    /// Resolves an `$INSUNITS` code, rejecting codes without a defined scale.
    pub fn from_insunits(code: i32) -> Result<Unit, ConfigError> {
        let unit = match code {
            1 => Unit::Inches,
            2 => Unit::Feet,
            3 => Unit::Miles,
            4 => Unit::Millimeters,
            5 => Unit::Centimeters,
            6 => Unit::Meters,
            7 => Unit::Kilometers,
            10 => Unit::Yards,
            11 => Unit::Angstroms,
            12 => Unit::Nanometers,
            13 => Unit::Microns,
            14 => Unit::Decimeters,
            15 => Unit::Decameters,
            16 => Unit::Hectometers,
            17 => Unit::Gigameters,
            18 => Unit::AstronomicalUnits,
            19 => Unit::LightYears,
            20 => Unit::Parsecs,
            _ => return Err(ConfigError::UnsupportedUnit { code }),
        };
        Ok(unit)
    }

    /// The `$INSUNITS` code of this unit.
    pub fn insunits(self) -> i32 {
        self as i32
    }

    /// How many of this unit make up one meter.
    pub fn units_per_meter(self) -> f64 {
        match self {
            Unit::Inches => 39.37007874,
            Unit::Feet => 3.280839895,
            Unit::Miles => 0.00062137119,
            Unit::Millimeters => 1000.0,
            Unit::Centimeters => 100.0,
            Unit::Meters => 1.0,
            Unit::Kilometers => 0.001,
            Unit::Yards => 1.093613298,
            Unit::Angstroms => 10000000000.0,
            Unit::Nanometers => 1000000000.0,
            Unit::Microns => 1000000.0,
            Unit::Decimeters => 10.0,
            Unit::Decameters => 0.1,
            Unit::Hectometers => 0.01,
            Unit::Gigameters => 0.000000001,
            Unit::AstronomicalUnits => 1.0 / 149597870700.0,
            Unit::LightYears => 1.0 / 9.46e15,
            Unit::Parsecs => 1.0 / 3.09e16,
        }
    }

    /// Factor that converts a coordinate in this unit to millimeters.
    pub fn to_millimeters(self) -> f64 {
        1000.0 / self.units_per_meter()
    }
}

/// All accepted unit names in listing order. Several aliases may map to the
/// same unit; consecutive entries with equal units belong together.
pub fn known_units() -> &'static [(&'static str, Unit)] {
    ALIASES
}

static ALIASES: &[(&str, Unit)] = &[
    ("inches", Unit::Inches),
    ("in", Unit::Inches),
    ("feet", Unit::Feet),
    ("ft", Unit::Feet),
    ("miles", Unit::Miles),
    ("mi", Unit::Miles),
    ("millimeters", Unit::Millimeters),
    ("mm", Unit::Millimeters),
    ("centimeters", Unit::Centimeters),
    ("cm", Unit::Centimeters),
    ("meters", Unit::Meters),
    ("m", Unit::Meters),
    ("kilometers", Unit::Kilometers),
    ("km", Unit::Kilometers),
    ("yards", Unit::Yards),
    ("yd", Unit::Yards),
    ("angstroms", Unit::Angstroms),
    ("nanometers", Unit::Nanometers),
    ("nm", Unit::Nanometers),
    ("micrometers", Unit::Microns),
    ("microns", Unit::Microns),
    ("ym", Unit::Microns),
    ("decimeters", Unit::Decimeters),
    ("dm", Unit::Decimeters),
    ("decameters", Unit::Decameters),
    ("dam", Unit::Decameters),
    ("hectometers", Unit::Hectometers),
    ("hm", Unit::Hectometers),
    ("gigameters", Unit::Gigameters),
    ("gm", Unit::Gigameters),
    ("astronomicalunits", Unit::AstronomicalUnits),
    ("au", Unit::AstronomicalUnits),
    ("lightyears", Unit::LightYears),
    ("ly", Unit::LightYears),
    ("parsecs", Unit::Parsecs),
    ("pc", Unit::Parsecs),
];

impl FromStr for Unit {
    type Err = ConfigError;

    /// Exact, case-sensitive match against the alias table.
    fn from_str(s: &str) -> Result<Unit, ConfigError> {
        for (name, unit) in ALIASES {
            if *name == s {
                return Ok(*unit);
            }
        }
        Err(ConfigError::UnknownUnit {
            name: s.to_string(),
        })
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = ALIASES
            .iter()
            .find(|(_, unit)| unit == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown");
        write!(f, "{}", name)
    }
}

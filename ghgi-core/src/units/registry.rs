//! Unit registry for activity data and emission-factor denominators.
//!
//! All conversion factors are defined as the multiplier to convert FROM the
//! registered unit TO the base unit of its dimension. For example:
//! - `t` has factor 1000 (1 t = 1000 kg)
//! - `L` has factor 0.001 (1 L = 0.001 m3)
//! - `Wh` has factor 3600 (1 Wh = 3600 J)
//!
//! Factors are exact decimals, so `kL -> L` is exactly 1000 rather than
//! `999.9999999999999`.

use super::dimension::Dimension;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Information about a known unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitInfo {
    /// The canonical name of this unit.
    pub name: String,
    /// The physical dimension of this unit.
    pub dimension: Dimension,
    /// Conversion factor to the base unit of `dimension`.
    pub to_base_factor: Decimal,
}

impl UnitInfo {
    fn new(name: &str, dimension: Dimension, to_base_factor: Decimal) -> Self {
        Self {
            name: name.to_string(),
            dimension,
            to_base_factor,
        }
    }
}

/// Metric prefix multipliers.
#[derive(Debug, Clone, Copy)]
pub struct MetricPrefix {
    pub symbol: &'static str,
    pub factor: Decimal,
}

/// The metric prefixes that show up in inventory data (kt, MWh, TJ, kL, mL).
pub static METRIC_PREFIXES: &[MetricPrefix] = &[
    MetricPrefix {
        symbol: "P",
        factor: dec!(1000000000000000),
    },
    MetricPrefix {
        symbol: "T",
        factor: dec!(1000000000000),
    },
    MetricPrefix {
        symbol: "G",
        factor: dec!(1000000000),
    },
    MetricPrefix {
        symbol: "M",
        factor: dec!(1000000),
    },
    MetricPrefix {
        symbol: "k",
        factor: dec!(1000),
    },
    MetricPrefix {
        symbol: "m",
        factor: dec!(0.001),
    },
];

/// Joules per watt-hour.
pub const JOULES_PER_WATT_HOUR: Decimal = dec!(3600);
/// Cubic metres per US gallon.
pub const CUBIC_METRES_PER_US_GALLON: Decimal = dec!(0.003785411784);
/// Cubic metres per oil barrel (42 US gallons).
pub const CUBIC_METRES_PER_BARREL: Decimal = dec!(0.158987294928);
/// Kilograms per avoirdupois pound.
pub const KILOGRAMS_PER_POUND: Decimal = dec!(0.45359237);
/// Joules per international British thermal unit.
pub const JOULES_PER_BTU: Decimal = dec!(1055.05585262);
/// Metres per statute mile.
pub const METRES_PER_MILE: Decimal = dec!(1609.344);

/// The global unit registry.
pub static UNIT_REGISTRY: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// Registry of known units with their dimensions and conversion factors.
#[derive(Debug)]
pub struct UnitRegistry {
    /// Map from unit symbol to unit info.
    units: HashMap<&'static str, UnitInfo>,
    /// Map from alias to canonical name.
    aliases: HashMap<&'static str, &'static str>,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitRegistry {
    /// Creates a new unit registry populated with standard units.
    pub fn new() -> Self {
        let mut registry = Self {
            units: HashMap::new(),
            aliases: HashMap::new(),
        };
        registry.register_mass_units();
        registry.register_volume_units();
        registry.register_energy_units();
        registry.register_distance_units();
        registry.register_count_units();
        registry
    }

    /// Looks up a unit by symbol, handling prefixes and aliases.
    pub fn lookup(&self, symbol: &str) -> Option<UnitInfo> {
        if let Some(info) = self.units.get(symbol) {
            return Some(info.clone());
        }

        if let Some(&canonical) = self.aliases.get(symbol) {
            if let Some(info) = self.units.get(canonical) {
                return Some(info.clone());
            }
        }

        self.lookup_prefixed(symbol)
    }

    /// Attempts to parse a symbol as a prefixed version of a base unit.
    fn lookup_prefixed(&self, symbol: &str) -> Option<UnitInfo> {
        for prefix in METRIC_PREFIXES {
            let Some(base_symbol) = symbol.strip_prefix(prefix.symbol) else {
                continue;
            };
            if base_symbol.is_empty() {
                continue;
            }
            let base = self.units.get(base_symbol).or_else(|| {
                self.aliases
                    .get(base_symbol)
                    .and_then(|canonical| self.units.get(canonical))
            });
            if let Some(base_info) = base {
                if !Self::accepts_prefix(base_info) {
                    continue;
                }
                return Some(UnitInfo {
                    name: symbol.to_string(),
                    dimension: base_info.dimension,
                    to_base_factor: base_info.to_base_factor * prefix.factor,
                });
            }
        }
        None
    }

    /// Imperial units and counts never take metric prefixes.
    fn accepts_prefix(info: &UnitInfo) -> bool {
        matches!(info.name.as_str(), "g" | "t" | "L" | "m" | "J" | "Wh")
    }

    fn register_mass_units(&mut self) {
        self.units
            .insert("kg", UnitInfo::new("kg", Dimension::Mass, Decimal::ONE));
        self.units
            .insert("g", UnitInfo::new("g", Dimension::Mass, dec!(0.001)));
        // metric tonne; kt, Mt and Gt come from the prefix table
        self.units
            .insert("t", UnitInfo::new("t", Dimension::Mass, dec!(1000)));
        self.units
            .insert("lb", UnitInfo::new("lb", Dimension::Mass, KILOGRAMS_PER_POUND));

        self.aliases.insert("kilogram", "kg");
        self.aliases.insert("kilograms", "kg");
        self.aliases.insert("gram", "g");
        self.aliases.insert("grams", "g");
        self.aliases.insert("tonne", "t");
        self.aliases.insert("tonnes", "t");
        self.aliases.insert("lbs", "lb");
    }

    fn register_volume_units(&mut self) {
        self.units
            .insert("m3", UnitInfo::new("m3", Dimension::Volume, Decimal::ONE));
        self.units
            .insert("L", UnitInfo::new("L", Dimension::Volume, dec!(0.001)));
        self.units.insert(
            "gal",
            UnitInfo::new("gal", Dimension::Volume, CUBIC_METRES_PER_US_GALLON),
        );
        self.units.insert(
            "bbl",
            UnitInfo::new("bbl", Dimension::Volume, CUBIC_METRES_PER_BARREL),
        );

        self.aliases.insert("m³", "m3");
        self.aliases.insert("m^3", "m3");
        self.aliases.insert("l", "L");
        self.aliases.insert("litre", "L");
        self.aliases.insert("litres", "L");
        self.aliases.insert("liter", "L");
        self.aliases.insert("liters", "L");
        self.aliases.insert("gallon", "gal");
        self.aliases.insert("gallons", "gal");
        self.aliases.insert("barrel", "bbl");
        self.aliases.insert("barrels", "bbl");
    }

    fn register_energy_units(&mut self) {
        self.units
            .insert("J", UnitInfo::new("J", Dimension::Energy, Decimal::ONE));
        self.units.insert(
            "Wh",
            UnitInfo::new("Wh", Dimension::Energy, JOULES_PER_WATT_HOUR),
        );
        self.units
            .insert("Btu", UnitInfo::new("Btu", Dimension::Energy, JOULES_PER_BTU));

        self.aliases.insert("BTU", "Btu");
        self.aliases.insert("joule", "J");
        self.aliases.insert("joules", "J");
    }

    fn register_distance_units(&mut self) {
        self.units
            .insert("m", UnitInfo::new("m", Dimension::Length, Decimal::ONE));
        self.units
            .insert("mi", UnitInfo::new("mi", Dimension::Length, METRES_PER_MILE));
        // Vehicle- and passenger-kilometres are distances as far as the
        // formulas are concerned.
        self.units
            .insert("vkm", UnitInfo::new("vkm", Dimension::Length, dec!(1000)));
        self.units
            .insert("pkm", UnitInfo::new("pkm", Dimension::Length, dec!(1000)));

        self.aliases.insert("metre", "m");
        self.aliases.insert("metres", "m");
        self.aliases.insert("mile", "mi");
        self.aliases.insert("miles", "mi");
        self.aliases.insert("vehicle-km", "vkm");
        self.aliases.insert("passenger-km", "pkm");
    }

    fn register_count_units(&mut self) {
        self.units
            .insert("unit", UnitInfo::new("unit", Dimension::Count, Decimal::ONE));

        self.aliases.insert("units", "unit");
        self.aliases.insert("item", "unit");
        self.aliases.insert("items", "unit");
        self.aliases.insert("1", "unit");
    }
}

//! Named, unit-tagged scalar wrapper.

use std::fmt;

/// A named scalar with an optional physical unit annotation.
///
/// Used as a leaf annotation when a bare number is not descriptive
/// enough, e.g. `Parameter::with_units("tau_m", 15.0, "ms")`. Carries
/// no behavior beyond display; ranges and distributions are separate
/// types.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    /// Parameter name, used for display and export.
    pub name: String,
    /// The scalar value.
    pub value: f64,
    /// Optional unit annotation (e.g. `"mV"`, `"ms"`).
    pub units: Option<String>,
}

impl Parameter {
    /// Create an unnamed, unit-less parameter.
    pub fn new(value: f64) -> Self {
        Self {
            name: String::new(),
            value,
            units: None,
        }
    }

    /// Create a named parameter with a unit annotation.
    pub fn with_units(name: impl Into<String>, value: f64, units: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            units: Some(units.into()),
        }
    }

    /// Create a named, unit-less parameter.
    pub fn named(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            units: None,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)?;
        if let Some(units) = &self.units {
            write!(f, " {units}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_units_when_present() {
        let p = Parameter::with_units("tau_m", 15.0, "ms");
        assert_eq!(p.to_string(), "tau_m = 15 ms");

        let q = Parameter::named("cm", 0.5);
        assert_eq!(q.to_string(), "cm = 0.5");
    }
}

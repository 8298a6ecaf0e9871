use serde::{Deserialize, Serialize};

/// Initial population used when no earlier run provides a starting value.
pub const DEFAULT_INITIAL_POPULATION: f64 = 10.0;

/// Parameters of the logistic adoption model sent to the simulation endpoint.
///
/// Field names on the wire follow the endpoint's query arguments
/// (`M`, `k`, `B`, `duration`, `step`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Market saturation ceiling M
    #[serde(rename = "M")]
    pub saturation: f64,
    /// Growth-rate coefficient k
    #[serde(rename = "k")]
    pub growth_rate: f64,
    /// Initial users P(0), sent as B
    #[serde(rename = "B")]
    pub initial_population: f64,
    /// Number of time steps (weeks)
    pub duration: u32,
    /// Time increment between steps
    pub step: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            saturation: 1000.0,
            growth_rate: 0.1,
            initial_population: DEFAULT_INITIAL_POPULATION,
            duration: 52,
            step: 1.0,
        }
    }
}

/// A parameter the user may edit. `step` is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    Saturation,
    GrowthRate,
    InitialPopulation,
    Duration,
}

impl EditableField {
    pub const ALL: [EditableField; 4] = [
        EditableField::Saturation,
        EditableField::GrowthRate,
        EditableField::InitialPopulation,
        EditableField::Duration,
    ];

    /// Name used for the form input and query argument.
    pub fn name(&self) -> &'static str {
        match self {
            EditableField::Saturation => "M",
            EditableField::GrowthRate => "k",
            EditableField::InitialPopulation => "B",
            EditableField::Duration => "duration",
        }
    }

    /// Human-readable label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            EditableField::Saturation => "Market Saturation M",
            EditableField::GrowthRate => "Growth Rate k",
            EditableField::InitialPopulation => "Initial Users P(0)",
            EditableField::Duration => "Duration (Weeks)",
        }
    }
}

impl std::fmt::Display for EditableField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for EditableField {
    type Err = crate::error::SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(EditableField::Saturation),
            "k" => Ok(EditableField::GrowthRate),
            "B" => Ok(EditableField::InitialPopulation),
            "duration" => Ok(EditableField::Duration),
            _ => Err(crate::error::SimError::NotFound(format!(
                "No editable parameter named '{s}'"
            ))),
        }
    }
}

/// Coerce raw user input to a number.
///
/// The longest leading numeric prefix wins (`"12abc"` is 12). Empty,
/// unparsable or non-finite input becomes 0 instead of an error.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let mut best = 0.0;
    for (idx, ch) in trimmed.char_indices() {
        let end = idx + ch.len_utf8();
        if let Ok(v) = trimmed[..end].parse::<f64>() {
            best = v;
        }
    }
    if best.is_finite() {
        best
    } else {
        0.0
    }
}

impl SimulationParams {
    /// Return a copy with one editable field replaced by the coerced input.
    ///
    /// `duration` and `step` are carried over exactly unless `duration` is
    /// the edited field.
    pub fn with_edit(&self, field: EditableField, raw: &str) -> SimulationParams {
        let value = coerce_number(raw);
        let mut next = *self;
        match field {
            EditableField::Saturation => next.saturation = value,
            EditableField::GrowthRate => next.growth_rate = value,
            EditableField::InitialPopulation => next.initial_population = value,
            // Saturating cast: negatives become 0, fractions truncate.
            EditableField::Duration => next.duration = value as u32,
        }
        next
    }

    /// Current value of an editable field as displayed in its input.
    pub fn field_value(&self, field: EditableField) -> f64 {
        match field {
            EditableField::Saturation => self.saturation,
            EditableField::GrowthRate => self.growth_rate,
            EditableField::InitialPopulation => self.initial_population,
            EditableField::Duration => self.duration as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let p = SimulationParams::default();
        assert_eq!(p.saturation, 1000.0);
        assert_eq!(p.growth_rate, 0.1);
        assert_eq!(p.initial_population, 10.0);
        assert_eq!(p.duration, 52);
        assert_eq!(p.step, 1.0);
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(SimulationParams::default()).unwrap();
        assert_eq!(json["M"], 1000.0);
        assert_eq!(json["k"], 0.1);
        assert_eq!(json["B"], 10.0);
        assert_eq!(json["duration"], 52);
        assert_eq!(json["step"], 1.0);
    }

    #[test]
    fn test_coerce_plain_numbers() {
        assert_eq!(coerce_number("500"), 500.0);
        assert_eq!(coerce_number("0.25"), 0.25);
        assert_eq!(coerce_number("  -3.5"), -3.5);
        assert_eq!(coerce_number("1e3"), 1000.0);
    }

    #[test]
    fn test_coerce_cleared_field_is_zero() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("   "), 0.0);
        assert_eq!(coerce_number("abc"), 0.0);
    }

    #[test]
    fn test_coerce_numeric_prefix() {
        assert_eq!(coerce_number("12abc"), 12.0);
        assert_eq!(coerce_number("1e"), 1.0);
        assert_eq!(coerce_number("3.5.6"), 3.5);
    }

    #[test]
    fn test_coerce_non_finite_is_zero() {
        assert_eq!(coerce_number("inf"), 0.0);
        assert_eq!(coerce_number("NaN"), 0.0);
        assert_eq!(coerce_number("1e999"), 0.0);
    }

    #[test]
    fn test_with_edit_keeps_duration_and_step() {
        let p = SimulationParams {
            step: 0.5,
            duration: 30,
            ..SimulationParams::default()
        };
        let edited = p.with_edit(EditableField::Saturation, "500");
        assert_eq!(edited.saturation, 500.0);
        assert_eq!(edited.duration, 30);
        assert_eq!(edited.step, 0.5);
        assert_eq!(edited.growth_rate, p.growth_rate);
    }

    #[test]
    fn test_with_edit_duration() {
        let p = SimulationParams::default();
        assert_eq!(p.with_edit(EditableField::Duration, "26").duration, 26);
        assert_eq!(p.with_edit(EditableField::Duration, "26.9").duration, 26);
        assert_eq!(p.with_edit(EditableField::Duration, "-4").duration, 0);
        assert_eq!(p.with_edit(EditableField::Duration, "").duration, 0);
    }

    #[test]
    fn test_editable_field_round_trip_names() {
        for field in EditableField::ALL {
            let parsed: EditableField = field.name().parse().unwrap();
            assert_eq!(parsed, field);
        }
        assert!("step".parse::<EditableField>().is_err());
    }

    #[test]
    fn test_field_value() {
        let p = SimulationParams::default();
        assert_eq!(p.field_value(EditableField::Duration), 52.0);
        assert_eq!(p.field_value(EditableField::GrowthRate), 0.1);
    }
}

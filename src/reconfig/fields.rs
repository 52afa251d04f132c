//! The flat parameter record delivered by reconfiguration channels.

use crate::core::WeightSet;
use crate::error::{ConfigError, Result};
use config::{Value, ValueKind};
use std::collections::HashMap;

/// A set of named parameter values pushed by a reconfiguration channel.
///
/// Channels hand the bridge whatever their transport produced, keyed by
/// parameter name. The record may carry parameters this crate does not care
/// about; only the weights named in [`WeightSet::FIELD_NAMES`] are read.
///
/// # Examples
///
/// ```rust
/// use costmap_weights::core::WeightSet;
/// use costmap_weights::reconfig::ReconfigFields;
///
/// let fields = ReconfigFields::new()
///     .with("obstacle_weight", 2.0)
///     .with("inflation_weight", 1.0);
///
/// let weights = WeightSet::try_from(&fields).unwrap();
/// assert_eq!(weights, WeightSet::new(2.0, 1.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReconfigFields {
    values: HashMap<String, Value>,
}

impl ReconfigFields {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any previous value with the same name.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a field, replacing any previous value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Overlay `other` on top of this record; fields in `other` win.
    pub fn merge(&mut self, other: ReconfigFields) {
        self.values.extend(other.values);
    }

    /// Raw value of a field, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Read a field as a floating-point number.
    ///
    /// Integers are widened to `f64`. Strings, booleans, tables and arrays are
    /// rejected rather than coerced.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingField`] if the field is absent
    /// - [`ConfigError::InvalidField`] if it holds a non-numeric value
    pub fn get_f64(&self, name: &str) -> Result<f64> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| ConfigError::MissingField(name.to_string()))?;

        match &value.kind {
            ValueKind::Float(v) => Ok(*v),
            ValueKind::I64(v) => Ok(*v as f64),
            ValueKind::U64(v) => Ok(*v as f64),
            ValueKind::I128(v) => Ok(*v as f64),
            ValueKind::U128(v) => Ok(*v as f64),
            other => Err(ConfigError::invalid_field(
                name,
                format!("expected a number, found {}", other),
            )),
        }
    }

    /// Names of fields that are not weights.
    pub fn unknown_fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .values
            .keys()
            .map(String::as_str)
            .filter(|name| !WeightSet::FIELD_NAMES.contains(name))
            .collect();
        names.sort_unstable();
        names
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, Value>> for ReconfigFields {
    fn from(values: HashMap<String, Value>) -> Self {
        Self { values }
    }
}

impl From<&WeightSet> for ReconfigFields {
    fn from(weights: &WeightSet) -> Self {
        WeightSet::FIELD_NAMES
            .iter()
            .zip(weights.as_array())
            .fold(Self::new(), |fields, (name, value)| fields.with(*name, value))
    }
}

impl TryFrom<&ReconfigFields> for WeightSet {
    type Error = ConfigError;

    fn try_from(fields: &ReconfigFields) -> Result<Self> {
        Ok(WeightSet::new(
            fields.get_f64("obstacle_weight")?,
            fields.get_f64("inflation_weight")?,
        ))
    }
}

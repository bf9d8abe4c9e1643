// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named, typed configuration arguments for adapted outputs.

use crate::error::{Error, Result};

/// A typed argument value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArgValue {
    Int(i64),
    Double(f64),
    Bool(bool),
    String(String),
}

impl ArgValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ArgValue::Int(_) => "integer",
            ArgValue::Double(_) => "double",
            ArgValue::Bool(_) => "boolean",
            ArgValue::String(_) => "string",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Double(v) => Some(*v),
            ArgValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArgValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgValue::Int(v) => write!(f, "{}", v),
            ArgValue::Double(v) => write!(f, "{}", v),
            ArgValue::Bool(v) => write!(f, "{}", v),
            ArgValue::String(v) => f.write_str(v),
        }
    }
}

/// A single argument.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Argument {
    pub id: String,
    pub caption: String,
    pub description: String,
    pub read_only: bool,
    value: ArgValue,
    default_value: ArgValue,
}

impl Argument {
    /// Creates an editable argument whose default is its initial value.
    pub fn new(id: impl Into<String>, value: ArgValue) -> Self {
        let id = id.into();
        Self {
            caption: id.clone(),
            id,
            description: String::new(),
            read_only: false,
            default_value: value.clone(),
            value,
        }
    }

    pub fn double(id: impl Into<String>, value: f64) -> Self {
        Self::new(id, ArgValue::Double(value))
    }

    /// A read-only string argument.
    pub fn fixed_string(id: impl Into<String>, value: impl Into<String>) -> Self {
        let mut arg = Self::new(id, ArgValue::String(value.into()));
        arg.read_only = true;
        arg
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn value(&self) -> &ArgValue {
        &self.value
    }

    pub fn default_value(&self) -> &ArgValue {
        &self.default_value
    }

    /// Assigns a new value of the same type. Integers are accepted for doubles.
    pub fn set_value(&mut self, value: ArgValue) -> Result<()> {
        if self.read_only {
            return Err(Error::ArgumentReadOnly(self.id.clone()));
        }
        let value = match (&self.default_value, value) {
            (ArgValue::Double(_), ArgValue::Int(i)) => ArgValue::Double(i as f64),
            (d, v) if std::mem::discriminant(d) == std::mem::discriminant(&v) => v,
            (d, v) => {
                return Err(Error::ArgumentType {
                    id: self.id.clone(),
                    expected: d.type_name(),
                    found: v.type_name(),
                })
            }
        };
        self.value = value;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.value = self.default_value.clone();
    }
}

/// An ordered argument list with lookup by id.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arguments(Vec<Argument>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, argument: Argument) {
        self.0.push(argument);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.0.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Argument> {
        self.0.iter().find(|a| a.id == id)
    }

    pub fn set(&mut self, id: &str, value: ArgValue) -> Result<()> {
        self.0
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::ArgumentNotFound(id.to_string()))?
            .set_value(value)
    }

    /// Numeric value of an argument.
    pub fn double_value(&self, id: &str) -> Result<f64> {
        let arg = self
            .get(id)
            .ok_or_else(|| Error::ArgumentNotFound(id.to_string()))?;
        arg.value().as_f64().ok_or(Error::ArgumentType {
            id: id.to_string(),
            expected: "double",
            found: arg.value().type_name(),
        })
    }
}

impl FromIterator<Argument> for Arguments {
    fn from_iter<I: IntoIterator<Item = Argument>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_read_double() {
        let mut args: Arguments = [Argument::double("A", 1.0), Argument::double("B", 0.0)]
            .into_iter()
            .collect();
        args.set("B", ArgValue::Double(2.5)).unwrap();
        args.set("A", ArgValue::Int(3)).unwrap();
        assert_eq!(args.double_value("A").unwrap(), 3.0);
        assert_eq!(args.double_value("B").unwrap(), 2.5);
    }

    #[test]
    fn read_only_and_type_checks() {
        let mut args = Arguments::new();
        args.push(Argument::fixed_string("Type", "SpatialMapping"));
        args.push(Argument::double("AreaExponent", 1.0));

        assert_eq!(
            args.set("Type", ArgValue::String("x".into())),
            Err(Error::ArgumentReadOnly("Type".into()))
        );
        assert!(matches!(
            args.set("AreaExponent", ArgValue::Bool(true)),
            Err(Error::ArgumentType { expected: "double", .. })
        ));
        assert!(matches!(args.double_value("missing"), Err(Error::ArgumentNotFound(_))));
    }

    #[test]
    fn reset_restores_default() {
        let mut arg = Argument::double("AreaExponent", 1.0);
        arg.set_value(ArgValue::Double(-1.0)).unwrap();
        arg.reset();
        assert_eq!(arg.value(), &ArgValue::Double(1.0));
    }
}

//! Parameter binding
//!
//! Converts the loosely typed `name -> text` map of a request into typed
//! arguments for an operation's declared parameters.
//!
//! Absent and blank parameters are treated differently: an absent parameter
//! is bound to `Null` (or rejected when mandatory), a blank one is left out
//! of the arguments altogether.

use std::collections::HashMap;

use tracing::debug;

use crate::catalog::ParameterDescriptor;
use crate::coerce::{CoercionError, decode_cell, parse_parameter};
use crate::error::ReportError;
use crate::value::{Enumeration, FromValue, Value};

/// A declared parameter with its bound value
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParameter {
    pub descriptor: ParameterDescriptor,
    pub value: Value,
}

/// Bound arguments of an operation call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    parameters: Vec<BoundParameter>,
}

impl Arguments {
    pub fn new(parameters: Vec<BoundParameter>) -> Self {
        Self { parameters }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundParameter> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Bound parameter by name, ignoring case
    pub fn parameter(&self, name: &str) -> Option<&BoundParameter> {
        self.parameters
            .iter()
            .find(|p| p.descriptor.name.eq_ignore_ascii_case(name))
    }

    /// Bound value by name; `None` when the parameter was left out
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.parameter(name).map(|p| &p.value)
    }

    /// Typed value; `None` when left out, null or of another type
    pub fn value<T: FromValue>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(T::from_value)
    }

    /// Typed value, falling back to the declared default value
    pub fn value_or_default<T: FromValue>(&self, name: &str) -> Option<T> {
        self.value(name).or_else(|| {
            let parameter = self.parameter(name)?;
            let default_value = parameter.descriptor.default_value.as_deref()?;
            let value_type = parameter.descriptor.type_descriptor()?.value_type;
            decode_cell(default_value, Some(&value_type), None)
                .ok()
                .and_then(|value| T::from_value(&value))
        })
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn enumeration<E: Enumeration>(&self, name: &str) -> Option<E> {
        match self.get(name)? {
            Value::Enum(value) if value.descriptor().name == E::descriptor().name => {
                E::from_ordinal(value.ordinal())
            }
            _ => None,
        }
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a BoundParameter;
    type IntoIter = std::slice::Iter<'a, BoundParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}

/// Binds request parameters to declared parameters
pub struct ParameterBinder;

impl ParameterBinder {
    /// Bind `values` to the declared `parameters` of an operation.
    ///
    /// With `strict`, any supplied name the operation does not declare is
    /// rejected before conversion. Names are matched ignoring case.
    pub fn bind(
        operation: &str,
        parameters: &[ParameterDescriptor],
        values: &HashMap<String, String>,
        strict: bool,
    ) -> Result<Arguments, ReportError> {
        if strict
            && let Some(unknown) = values
                .keys()
                .find(|name| !parameters.iter().any(|p| p.name.eq_ignore_ascii_case(name)))
        {
            return Err(ReportError::UnknownParameter {
                operation: operation.to_string(),
                parameter: unknown.clone(),
            });
        }

        let mut bound = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            let supplied = lookup(values, &parameter.name);

            let Some(text) = supplied else {
                if parameter.required && !parameter.nullable {
                    return Err(ReportError::MissingParameter {
                        operation: operation.to_string(),
                        parameter: parameter.name.clone(),
                    });
                }
                bound.push(BoundParameter {
                    descriptor: parameter.clone(),
                    value: Value::Null,
                });
                continue;
            };

            if text.trim().is_empty() {
                debug!(operation, parameter = %parameter.name, "Omitting blank parameter");
                continue;
            }

            let value = convert(parameter, text)?;
            bound.push(BoundParameter {
                descriptor: parameter.clone(),
                value,
            });
        }

        Ok(Arguments::new(bound))
    }
}

fn lookup<'a>(values: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    values
        .get(name)
        .or_else(|| {
            values
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
        .map(String::as_str)
}

fn convert(parameter: &ParameterDescriptor, text: &str) -> Result<Value, ReportError> {
    let coercion_error = |error| ReportError::ParameterCoercion {
        parameter: parameter.name.clone(),
        error,
    };

    let descriptor = parameter
        .type_descriptor()
        .ok_or_else(|| coercion_error(CoercionError::UnknownType(parameter.value_type.clone())))?;
    parse_parameter(text, &descriptor.value_type).map_err(coercion_error)
}

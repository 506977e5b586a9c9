// Copyright 2025 benchtrack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Record normalization.
//!
//! Turns a loosely-typed [`RawBench`] into a canonical [`BenchRecord`], or a
//! [`ValidationError`] naming the first offending field. Normalization has no
//! side effects and is idempotent: feeding a normalized record back in yields
//! the same record.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{Field, ValidationError};
use crate::types::{BenchRecord, RawBench, Unit};

/// Margin strings as written by harnesses: `"± 311830"`, `"+/- 12.5"`, `"7"`.
static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:±|\+/-|\+-)?\s*([0-9eE+\-.]+)\s*$").expect("range pattern is valid")
});

/// Validate and canonicalize a raw bench record.
pub fn normalize(raw: &RawBench) -> Result<BenchRecord, ValidationError> {
    let name = normalize_name(&raw.name)?;
    let value = non_negative(Field::Value, number(Field::Value, &raw.value)?)?;
    let error_margin = match &raw.range {
        None | Some(Value::Null) => 0.0,
        Some(range) => non_negative(Field::ErrorMargin, margin(range)?)?,
    };
    let unit: Unit = raw.unit.parse()?;

    Ok(BenchRecord {
        name,
        value,
        error_margin,
        unit,
    })
}

fn normalize_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(Field::Name, "must not be empty"));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ValidationError::new(
            Field::Name,
            "must not contain control characters",
        ));
    }
    Ok(trimmed.to_string())
}

fn number(field: Field, value: &Value) -> Result<f64, ValidationError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ValidationError::new(field, format!("{n} is not representable"))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::new(field, format!("{s:?} is not a number"))),
        Value::Null => Err(ValidationError::new(field, "is missing")),
        other => Err(ValidationError::new(
            field,
            format!("expected a number, got {other}"),
        )),
    }
}

fn margin(range: &Value) -> Result<f64, ValidationError> {
    match range {
        Value::String(s) => {
            let digits = RANGE_RE
                .captures(s)
                .and_then(|caps| caps.get(1))
                .ok_or_else(|| {
                    ValidationError::new(Field::ErrorMargin, format!("cannot parse {s:?}"))
                })?;
            digits.as_str().parse::<f64>().map_err(|_| {
                ValidationError::new(Field::ErrorMargin, format!("cannot parse {s:?}"))
            })
        }
        other => number(Field::ErrorMargin, other),
    }
}

fn non_negative(field: Field, v: f64) -> Result<f64, ValidationError> {
    if !v.is_finite() {
        return Err(ValidationError::new(field, format!("{v} is not finite")));
    }
    if v < 0.0 {
        return Err(ValidationError::new(field, format!("{v} is negative")));
    }
    // Folds -0.0 into 0.0 so the canonical form is unique.
    Ok(v + 0.0)
}

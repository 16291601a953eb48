//! Request validation.
//!
//! Several requests expose two strongly-typed fields for one wire field, for
//! example `stop: Option<String>` and `stop_as_list: Option<Vec<String>>`
//! both encode `"stop"`. At most one side of such a pair may be set. Every
//! request implements [`Validate`], which the client runs before anything is
//! sent.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What kind of rule a [`Violation`] broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Two alternative encodings of the same value were both populated
    MutuallyExclusive,
    /// A field the operation needs is unset or empty
    MissingRequired,
    /// A field is set to a value the API rejects
    InvalidValue,
}

/// A single broken rule, naming the offending field(s)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub fields: Vec<String>,
    pub kind: ViolationKind,
    pub reason: String,
}

impl Violation {
    pub fn mutually_exclusive(first: &str, second: &str) -> Self {
        Self {
            fields: vec![first.to_string(), second.to_string()],
            kind: ViolationKind::MutuallyExclusive,
            reason: format!(
                "mutually exclusive fields both set: `{first}` and `{second}` cannot be assigned at the same time"
            ),
        }
    }

    pub fn missing_required(field: &str) -> Self {
        Self {
            fields: vec![field.to_string()],
            kind: ViolationKind::MissingRequired,
            reason: format!("required field missing: `{field}`"),
        }
    }

    pub fn missing_one_of(first: &str, second: &str) -> Self {
        Self {
            fields: vec![first.to_string(), second.to_string()],
            kind: ViolationKind::MissingRequired,
            reason: format!("required field missing: one of `{first}` or `{second}` must be set"),
        }
    }

    pub fn invalid_value(field: &str, reason: impl fmt::Display) -> Self {
        Self {
            fields: vec![field.to_string()],
            kind: ViolationKind::InvalidValue,
            reason: format!("invalid value for `{field}`: {reason}"),
        }
    }

    /// Whether this violation names `field`
    pub fn names(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    fn prefixed(mut self, prefix: &str) -> Self {
        for field in &mut self.fields {
            *field = format!("{prefix}.{field}");
        }
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.fields.join(", "), self.reason)
    }
}

/// Non-empty, ordered list of violations found on one request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Whether any violation of `kind` names `field`
    pub fn contains(&self, kind: ViolationKind, field: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.kind == kind && v.names(field))
    }
}

impl From<Violation> for ValidationErrors {
    fn from(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("request validation failed: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Checks the invariants of a request before it is serialized
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// The populated side of an exclusive pair.
///
/// Serializes untagged, so the wire carries exactly the value of whichever
/// side was set. On the way in, the first variant that parses wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOf<A, B> {
    First(A),
    Second(B),
}

/// Resolve an exclusive pair to its effective value.
///
/// `Ok(None)` when neither side is set, the populated side when exactly one is,
/// and a [`ViolationKind::MutuallyExclusive`] violation naming both fields
/// otherwise. No merging ever happens.
pub fn exclusive<'a, A, B>(
    first: (&str, &'a Option<A>),
    second: (&str, &'a Option<B>),
) -> Result<Option<OneOf<&'a A, &'a B>>, Violation> {
    match (first.1, second.1) {
        (Some(_), Some(_)) => Err(Violation::mutually_exclusive(first.0, second.0)),
        (Some(a), None) => Ok(Some(OneOf::First(a))),
        (None, Some(b)) => Ok(Some(OneOf::Second(b))),
        (None, None) => Ok(None),
    }
}

const MIN_PAGE_LIMIT: u32 = 1;
const MAX_PAGE_LIMIT: u32 = 100;

/// Standalone page size check for list calls that take bare arguments
pub(crate) fn check_page_limit(limit: Option<u32>) -> Result<(), ValidationErrors> {
    let mut validator = Validator::new();
    validator.page_limit(limit);
    validator.finish()
}

/// Accumulates violations in the order the checks run
#[derive(Debug, Default)]
pub(crate) struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Exclusive pair, neither side required
    pub(crate) fn exclusive<A, B>(
        &mut self,
        first: (&str, &Option<A>),
        second: (&str, &Option<B>),
    ) {
        if let Err(violation) = exclusive(first, second) {
            self.push(violation);
        }
    }

    /// Exclusive pair where exactly one side must be set
    pub(crate) fn exactly_one<A, B>(
        &mut self,
        first: (&str, &Option<A>),
        second: (&str, &Option<B>),
    ) {
        match exclusive(first, second) {
            Ok(Some(_)) => {}
            Ok(None) => self.push(Violation::missing_one_of(first.0, second.0)),
            Err(violation) => self.push(violation),
        }
    }

    pub(crate) fn require<T>(&mut self, field: &str, value: &Option<T>) {
        if value.is_none() {
            self.push(Violation::missing_required(field));
        }
    }

    pub(crate) fn require_str(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(Violation::missing_required(field));
        }
    }

    pub(crate) fn require_bytes(&mut self, field: &str, value: &[u8]) {
        if value.is_empty() {
            self.push(Violation::missing_required(field));
        }
    }

    pub(crate) fn range<T>(&mut self, field: &str, value: Option<T>, min: T, max: T)
    where
        T: PartialOrd + fmt::Display + Copy,
    {
        if let Some(value) = value {
            if !(min..=max).contains(&value) {
                self.push(Violation::invalid_value(
                    field,
                    format!("{value} is outside {min}..={max}"),
                ));
            }
        }
    }

    /// Cursor page size, 1..=100 on every list endpoint
    pub(crate) fn page_limit(&mut self, limit: Option<u32>) {
        self.range("limit", limit, MIN_PAGE_LIMIT, MAX_PAGE_LIMIT);
    }

    pub(crate) fn max_len<T>(&mut self, field: &str, value: Option<&[T]>, max: usize) {
        if let Some(items) = value {
            if items.len() > max {
                self.push(Violation::invalid_value(
                    field,
                    format!("at most {max} entries allowed, got {}", items.len()),
                ));
            }
        }
    }

    /// Fold the violations of a nested value in under `prefix`
    pub(crate) fn nested(&mut self, prefix: &str, result: Result<(), ValidationErrors>) {
        if let Err(errors) = result {
            self.violations
                .extend(errors.violations.into_iter().map(|v| v.prefixed(prefix)));
        }
    }

    pub(crate) fn finish(self) -> Result<(), ValidationErrors> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                violations: self.violations,
            })
        }
    }
}

/// Metadata limits shared by assistants and threads
pub(crate) fn check_metadata(
    validator: &mut Validator,
    metadata: Option<&std::collections::HashMap<String, String>>,
) {
    let Some(metadata) = metadata else {
        return;
    };

    if metadata.len() > 16 {
        validator.push(Violation::invalid_value(
            "metadata",
            format!("at most 16 pairs allowed, got {}", metadata.len()),
        ));
    }

    let mut keys: Vec<&String> = metadata.keys().collect();
    keys.sort();
    for key in keys {
        if key.chars().count() > 64 {
            validator.push(Violation::invalid_value(
                "metadata",
                format!("key `{key}` is longer than 64 characters"),
            ));
        }
        if metadata[key].chars().count() > 512 {
            validator.push(Violation::invalid_value(
                "metadata",
                format!("value for `{key}` is longer than 512 characters"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusive_returns_the_populated_side() {
        let single = Some("x".to_string());
        let list: Option<Vec<String>> = None;
        assert_eq!(
            exclusive(("stop", &single), ("stop_as_list", &list)),
            Ok(Some(OneOf::First(&"x".to_string())))
        );
    }

    #[test]
    fn exclusive_rejects_both() {
        let single = Some("x".to_string());
        let list = Some(vec!["y".to_string()]);
        let violation = exclusive(("stop", &single), ("stop_as_list", &list)).unwrap_err();
        assert_eq!(violation.kind, ViolationKind::MutuallyExclusive);
        assert!(violation.names("stop"));
        assert!(violation.names("stop_as_list"));
    }

    #[test]
    fn nested_violations_are_prefixed() {
        let mut validator = Validator::new();
        validator.nested(
            "messages[3]",
            Err(Violation::missing_required("tool_call_id").into()),
        );
        let errors = validator.finish().unwrap_err();
        assert!(errors.contains(ViolationKind::MissingRequired, "messages[3].tool_call_id"));
    }

    #[test]
    fn page_limit_bounds() {
        assert!(check_page_limit(None).is_ok());
        assert!(check_page_limit(Some(1)).is_ok());
        assert!(check_page_limit(Some(100)).is_ok());

        let errors = check_page_limit(Some(0)).unwrap_err();
        assert!(errors.contains(ViolationKind::InvalidValue, "limit"));
        assert!(check_page_limit(Some(101)).is_err());
    }

    #[test]
    fn range_accepts_bounds() {
        let mut validator = Validator::new();
        validator.range("temperature", Some(0.0), 0.0, 2.0);
        validator.range("temperature", Some(2.0), 0.0, 2.0);
        assert!(validator.finish().is_ok());
    }

    #[test]
    fn errors_display_every_violation_in_order() {
        let mut validator = Validator::new();
        validator.require::<String>("model", &None);
        validator.range("n", Some(0), 1, 128);
        let text = validator.finish().unwrap_err().to_string();
        let model_at = text.find("`model`").unwrap();
        let n_at = text.find("`n`").unwrap();
        assert!(model_at < n_at);
    }
}

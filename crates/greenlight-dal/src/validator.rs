use std::{
    collections::{BTreeMap, HashSet},
    fmt::Display,
    hash::Hash,
};

use serde::Serialize;

/// Field name to message mapping produced by a failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Accumulates field errors without stopping at the first failed check.
///
/// Only the first message recorded for a field is kept, so checks should be
/// ordered from the most basic to the most specific.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .0
            .entry(field.into())
            .or_insert_with(|| message.into());
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_error(field, message);
        }
    }

    pub fn merge(&mut self, other: Validator) {
        for (field, message) in other.errors.0 {
            self.add_error(field, message);
        }
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

pub fn unique<T: Eq + Hash>(values: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().all(|v| seen.insert(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_error_wins() {
        let mut v = Validator::new();
        assert!(v.is_valid());
        v.check(false, "title", "must be provided");
        v.check(false, "title", "must not be more than 500 bytes long");
        v.check(true, "year", "must be provided");
        assert!(!v.is_valid());
        assert_eq!(v.errors().len(), 1);
        assert_eq!(v.errors().get("title"), Some("must be provided"));
        assert!(!v.errors().contains("year"));
    }

    #[test]
    fn test_merge_keeps_existing() {
        let mut a = Validator::new();
        a.add_error("title", "must be provided");
        let mut b = Validator::new();
        b.add_error("title", "other");
        b.add_error("year", "must be provided");
        a.merge(b);
        let errors = a.into_result().unwrap_err();
        assert_eq!(errors.get("title"), Some("must be provided"));
        assert_eq!(errors.get("year"), Some("must be provided"));
        assert_eq!(
            errors.to_string(),
            "title: must be provided; year: must be provided"
        );
    }

    #[test]
    fn test_unique() {
        assert!(unique::<String>(&[]));
        assert!(unique(&["Drama", "Comedy"]));
        assert!(!unique(&["Drama", "Drama"]));
    }
}

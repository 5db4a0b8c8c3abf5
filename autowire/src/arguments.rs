//! Argument bags supplied by callers, and the injections computed from them.

use crate::error::{Error, Result};
use crate::value::Value;
use std::any::{type_name, Any};
use std::sync::Arc;

/// The key of an entry in an [`Arguments`] bag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgKey {
  Position(usize),
  Name(String),
}

impl From<usize> for ArgKey {
  fn from(index: usize) -> Self {
    ArgKey::Position(index)
  }
}

/// Keys made only of ASCII digits, such as `"0"`, are positional. Signs,
/// whitespace and anything else make the key a name.
impl From<&str> for ArgKey {
  fn from(key: &str) -> Self {
    let digits = !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit());
    match key.parse::<usize>() {
      Ok(index) if digits => ArgKey::Position(index),
      _ => ArgKey::Name(key.to_owned()),
    }
  }
}

impl From<String> for ArgKey {
  fn from(key: String) -> Self {
    ArgKey::from(key.as_str())
  }
}

/// An ordered bag of caller-supplied arguments.
///
/// A bag is either *named* or *positional* as a whole: if any key is a
/// [`ArgKey::Name`], the whole bag is treated as named for the call and
/// named entries are matched against parameter names. Positional entries are
/// only ever used for type-matched injection, never by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
  entries: Vec<(ArgKey, Value)>,
}

impl Arguments {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a positional value after the highest position in use.
  pub fn push(&mut self, value: impl Into<Value>) {
    let index = self.next_position();
    self.entries.push((ArgKey::Position(index), value.into()));
  }

  /// Inserts or replaces the entry for `key`.
  pub fn insert(&mut self, key: impl Into<ArgKey>, value: impl Into<Value>) {
    let key = key.into();
    let value = value.into();
    match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
      Some(entry) => entry.1 = value,
      None => self.entries.push((key, value)),
    }
  }

  pub fn with(mut self, key: impl Into<ArgKey>, value: impl Into<Value>) -> Self {
    self.insert(key, value);
    self
  }

  pub fn with_positional(mut self, value: impl Into<Value>) -> Self {
    self.push(value);
    self
  }

  /// Whether any key is non-numeric. Decided once per bag, not per parameter.
  pub fn is_named(&self) -> bool {
    self.entries.iter().any(|(key, _)| matches!(key, ArgKey::Name(_)))
  }

  pub fn named(&self, name: &str) -> Option<&Value> {
    self.entries.iter().find_map(|(key, value)| match key {
      ArgKey::Name(n) if n == name => Some(value),
      _ => None,
    })
  }

  pub fn positional(&self) -> impl Iterator<Item = &Value> {
    self.entries.iter().filter_map(|(key, value)| match key {
      ArgKey::Position(_) => Some(value),
      ArgKey::Name(_) => None,
    })
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  fn next_position(&self) -> usize {
    self
      .entries
      .iter()
      .filter_map(|(key, _)| match key {
        ArgKey::Position(index) => Some(index + 1),
        ArgKey::Name(_) => None,
      })
      .max()
      .unwrap_or(0)
  }
}

impl<V: Into<Value>> FromIterator<V> for Arguments {
  fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
    let mut arguments = Arguments::new();
    for value in iter {
      arguments.push(value);
    }
    arguments
  }
}

/// The ordered values selected for a constructor, method or closure call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Injections {
  values: Vec<Value>,
}

impl Injections {
  pub(crate) fn new(values: Vec<Value>) -> Self {
    Self { values }
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&Value> {
    self.values.get(index)
  }

  pub fn value(&self, index: usize) -> Result<&Value> {
    self.values.get(index).ok_or(Error::MissingArgument { index })
  }

  /// Downcasts the object at `index` to its concrete type.
  pub fn object<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>> {
    self.value(index)?.downcast::<T>().ok_or_else(|| Error::ArgumentType {
      index,
      expected: type_name::<T>().to_owned(),
    })
  }

  pub fn str(&self, index: usize) -> Result<&str> {
    self.value(index)?.as_str().ok_or_else(|| mismatch(index, "a string"))
  }

  pub fn int(&self, index: usize) -> Result<i64> {
    self.value(index)?.as_int().ok_or_else(|| mismatch(index, "an integer"))
  }

  pub fn float(&self, index: usize) -> Result<f64> {
    self.value(index)?.as_float().ok_or_else(|| mismatch(index, "a float"))
  }

  pub fn bool(&self, index: usize) -> Result<bool> {
    self.value(index)?.as_bool().ok_or_else(|| mismatch(index, "a boolean"))
  }

  pub fn iter(&self) -> impl Iterator<Item = &Value> {
    self.values.iter()
  }

  pub fn into_vec(self) -> Vec<Value> {
    self.values
  }
}

fn mismatch(index: usize, expected: &str) -> Error {
  Error::ArgumentType {
    index,
    expected: expected.to_owned(),
  }
}

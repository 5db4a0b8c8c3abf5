//! Callable specifications accepted by `call` and `inject_on`.

use crate::value::{Closure, Object, Value};
use std::fmt;

/// The receiver half of a method callable.
#[derive(Clone, Debug)]
pub enum Target {
  /// Resolved through `make` before the call.
  Id(String),
  /// Used as-is.
  Instance(Value),
}

/// A normalized callable.
///
/// String forms are parsed once when converted: `"Class::method"` becomes
/// [`Callable::Path`], anything else without `::` becomes
/// [`Callable::Invokable`].
#[derive(Clone)]
pub enum Callable {
  Closure(Closure),
  Method(Target, String),
  Path(String, String),
  /// A class id whose `__invoke` method is called.
  Invokable(String),
}

impl Callable {
  pub fn method(target: impl Into<Target>, method: impl Into<String>) -> Self {
    Callable::Method(target.into(), method.into())
  }
}

impl fmt::Debug for Callable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Callable::Closure(_) => write!(f, "closure"),
      Callable::Method(Target::Id(id), method) => write!(f, "[{}, {}]", id, method),
      Callable::Method(Target::Instance(value), method) => write!(f, "[{:?}, {}]", value, method),
      Callable::Path(class, method) => write!(f, "{}::{}", class, method),
      Callable::Invokable(class) => write!(f, "{}", class),
    }
  }
}

impl From<&str> for Callable {
  fn from(spec: &str) -> Self {
    match spec.split_once("::") {
      Some((class, method)) => Callable::Path(class.to_owned(), method.to_owned()),
      None => Callable::Invokable(spec.to_owned()),
    }
  }
}

impl From<String> for Callable {
  fn from(spec: String) -> Self {
    Callable::from(spec.as_str())
  }
}

impl From<Closure> for Callable {
  fn from(closure: Closure) -> Self {
    Callable::Closure(closure)
  }
}

impl<T: Into<Target>> From<(T, &str)> for Callable {
  fn from((target, method): (T, &str)) -> Self {
    Callable::method(target, method)
  }
}

impl From<&str> for Target {
  fn from(id: &str) -> Self {
    Target::Id(id.to_owned())
  }
}

impl From<String> for Target {
  fn from(id: String) -> Self {
    Target::Id(id)
  }
}

impl From<Object> for Target {
  fn from(object: Object) -> Self {
    Target::Instance(Value::Object(object))
  }
}

impl From<Closure> for Target {
  fn from(closure: Closure) -> Self {
    Target::Instance(Value::Closure(closure))
  }
}

/// String-like values name an id to resolve; anything else is an instance.
impl From<Value> for Target {
  fn from(value: Value) -> Self {
    match value {
      Value::Str(id) | Value::Class(id) => Target::Id(id.to_string()),
      other => Target::Instance(other),
    }
  }
}

//! The argument matcher: turns declared parameters plus a caller's argument
//! bag into the ordered values passed to a constructor, method or closure.

use crate::arguments::{Arguments, Injections};
use crate::descriptor::ParameterDescriptor;
use crate::error::{Error, Result};
use crate::value::Value;
use std::iter;
use tracing::trace;

/// What the matcher needs from the container performing the injection.
pub(crate) trait Autowire {
  fn is_instance_of(&self, value: &Value, declared_type: &str) -> bool;

  /// Resolves a declared type that nothing else could satisfy.
  fn autowire(&self, declared_type: &str) -> Result<Value>;
}

/// Computes one injected value per parameter, in declaration order.
///
/// For each parameter, the first applicable source wins:
///
/// 1. a named argument with the parameter's name, when the bag is named;
/// 2. the parameter's default value;
/// 3. the first positional argument, or the container self-reference,
///    that is an instance of the declared type;
/// 4. recursive resolution of the declared type.
///
/// A parameter with none of these is unresolvable.
pub(crate) fn inject<A: Autowire + ?Sized>(
  params: &[ParameterDescriptor],
  arguments: &Arguments,
  container: &A,
) -> Result<Injections> {
  if params.is_empty() {
    return Ok(Injections::default());
  }

  let named = arguments.is_named();
  let mut values = Vec::with_capacity(params.len());

  for param in params {
    let name = param.name();
    let value = if let Some(value) = arguments.named(name).filter(|_| named) {
      trace!(parameter = name, "injecting named argument");
      value.clone()
    } else if let Some(default) = param.default_value() {
      trace!(parameter = name, "injecting default value");
      default
    } else if let Some(declared_type) = param.declared_type() {
      match typed_argument(arguments, declared_type, container) {
        Some(value) => {
          trace!(parameter = name, declared_type, "injecting typed argument");
          value
        }
        None => {
          trace!(parameter = name, declared_type, "autowiring");
          container.autowire(declared_type)?
        }
      }
    } else {
      return Err(Error::UnresolvableParameter {
        parameter: name.to_owned(),
      });
    };
    values.push(value);
  }

  Ok(Injections::new(values))
}

/// Named entries are never candidates for type matching.
fn typed_argument<A: Autowire + ?Sized>(arguments: &Arguments, declared_type: &str, container: &A) -> Option<Value> {
  arguments
    .positional()
    .chain(iter::once(&Value::Container))
    .find(|candidate| container.is_instance_of(candidate, declared_type))
    .cloned()
}

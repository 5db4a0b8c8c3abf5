//! Container configuration and the builder used to assemble a container.

use crate::container::Container;
use crate::descriptor::ClassDescriptor;
use crate::value::Value;

/// Behavior switches of a [`Container`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContainerConfig {
  /// `get` builds class-bound ids through `make` instead of returning the
  /// class id itself.
  pub autowiring: bool,
  /// `get` invokes closure definitions when autowiring is off.
  pub resolve_closures: bool,
  /// Fail with a circular dependency error instead of recursing without bound.
  pub detect_cycles: bool,
}

impl Default for ContainerConfig {
  fn default() -> Self {
    Self {
      autowiring: true,
      resolve_closures: true,
      detect_cycles: true,
    }
  }
}

/// A builder for creating a [`Container`] with its classes and definitions.
///
/// # Examples
///
/// ```
/// use fibre_autowire::{ClassBuilder, ContainerBuilder, Value};
///
/// struct Clock;
///
/// let container = ContainerBuilder::new()
///   .class(ClassBuilder::<Clock>::new("Clock").constructor(vec![], |_, _| Ok(Clock)).build())
///   .define("clock", Value::class("Clock"))
///   .define("timezone", "UTC")
///   .build();
///
/// assert!(container.get("clock").unwrap().downcast::<Clock>().is_some());
/// assert_eq!(container.get("timezone").unwrap().as_str(), Some("UTC"));
/// ```
#[derive(Default)]
pub struct ContainerBuilder {
  config: ContainerConfig,
  classes: Vec<ClassDescriptor>,
  definitions: Vec<(String, Value)>,
}

impl ContainerBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replaces all switches at once.
  pub fn config(mut self, config: ContainerConfig) -> Self {
    self.config = config;
    self
  }

  pub fn autowiring(mut self, enabled: bool) -> Self {
    self.config.autowiring = enabled;
    self
  }

  pub fn resolve_closures(mut self, enabled: bool) -> Self {
    self.config.resolve_closures = enabled;
    self
  }

  pub fn detect_cycles(mut self, enabled: bool) -> Self {
    self.config.detect_cycles = enabled;
    self
  }

  pub fn class(mut self, descriptor: ClassDescriptor) -> Self {
    self.classes.push(descriptor);
    self
  }

  pub fn define(mut self, id: impl Into<String>, recipe: impl Into<Value>) -> Self {
    self.definitions.push((id.into(), recipe.into()));
    self
  }

  pub fn definitions<I, K, V>(mut self, definitions: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
  {
    self
      .definitions
      .extend(definitions.into_iter().map(|(id, recipe)| (id.into(), recipe.into())));
    self
  }

  pub fn build(self) -> Container {
    let container = Container::with_config(self.config);
    for descriptor in self.classes {
      container.register(descriptor);
    }
    for (id, recipe) in self.definitions {
      container.set(id, recipe);
    }
    container
  }
}

//! The main `Container` struct and its associated methods.

use crate::arguments::Arguments;
use crate::callable::{Callable, Target};
use crate::config::{ContainerBuilder, ContainerConfig};
use crate::core::{next_scope, ResolutionGuard, Stage};
use crate::descriptor::{ClassDescriptor, TypeRegistry, CONSTRUCTOR, CONTAINER_TYPE, INVOKE};
use crate::error::{Error, Result};
use crate::injection::{inject, Autowire};
use crate::reflection::{Owner, ReflectionCache};
use crate::value::{Closure, Object, Value};
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, trace};

/// The Inversion of Control (IoC) container.
///
/// Maps ids to recipes (class ids, factory closures or plain values),
/// resolves them on demand and injects dependencies into constructors,
/// methods and closures. Every container owns its own definitions, class
/// registry and caches; nothing is shared between instances.
///
/// Resolved values are memoized in two caches: values produced by [`get`]
/// and services produced by [`make`]/[`instantiate`]. Replacing or removing
/// a definition invalidates both, along with any cached parameter lists
/// keyed by that id.
///
/// [`get`]: Container::get
/// [`make`]: Container::make
/// [`instantiate`]: Container::instantiate
pub struct Container {
  scope: usize,
  config: RwLock<ContainerConfig>,
  classes: TypeRegistry,
  definitions: DashMap<String, Value>,
  resolved: DashMap<String, Value>,
  services: DashMap<String, Value>,
  reflection: ReflectionCache,
}

impl Default for Container {
  fn default() -> Self {
    Self::with_config(ContainerConfig::default())
  }
}

impl Container {
  /// Creates a new, empty `Container` with the default configuration.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_config(config: ContainerConfig) -> Self {
    Self {
      scope: next_scope(),
      config: RwLock::new(config),
      classes: TypeRegistry::default(),
      definitions: DashMap::new(),
      resolved: DashMap::new(),
      services: DashMap::new(),
      reflection: ReflectionCache::default(),
    }
  }

  pub fn builder() -> ContainerBuilder {
    ContainerBuilder::new()
  }

  // --- Configuration ---

  pub fn config(&self) -> ContainerConfig {
    *self.config.read()
  }

  pub fn use_autowiring(&self, enabled: bool) {
    self.config.write().autowiring = enabled;
  }

  pub fn resolve_closures(&self, enabled: bool) {
    self.config.write().resolve_closures = enabled;
  }

  // --- Class Registration ---

  /// Registers or replaces a class descriptor.
  pub fn register(&self, descriptor: ClassDescriptor) {
    let class = descriptor.name().to_owned();
    debug!(class = %class, "registering class");
    self.classes.register(descriptor);
    self.reflection.invalidate_class(&class);
  }

  pub fn has_class(&self, class: &str) -> bool {
    self.classes.contains(class)
  }

  /// Whether `value` satisfies a parameter declared with `declared_type`.
  pub fn is_instance_of(&self, value: &Value, declared_type: &str) -> bool {
    match value {
      Value::Object(object) => self.classes.is_subtype(object.class(), declared_type),
      Value::Container => declared_type == CONTAINER_TYPE,
      _ => false,
    }
  }

  // --- Definitions ---

  pub fn has(&self, id: &str) -> bool {
    self.definitions.contains_key(id)
  }

  /// Returns the unresolved recipe registered under `id`.
  pub fn get_raw(&self, id: &str) -> Result<Value> {
    self
      .definitions
      .get(id)
      .map(|entry| entry.value().clone())
      .ok_or_else(|| Error::NotFound { id: id.to_owned() })
  }

  /// Sets or replaces a definition, dropping everything derived from the
  /// previous one.
  pub fn set(&self, id: impl Into<String>, recipe: impl Into<Value>) {
    let id = id.into();
    debug!(id = %id, "setting definition");
    self.definitions.insert(id.clone(), recipe.into());
    self.invalidate(&id);
  }

  /// Removes a definition together with its cached values.
  pub fn remove(&self, id: &str) -> Option<Value> {
    let removed = self.definitions.remove(id).map(|(_, recipe)| recipe);
    self.invalidate(id);
    removed
  }

  // --- Resolution ---

  /// Resolves a definition, memoizing the result.
  ///
  /// Closure recipes are invoked with injected arguments. With autowiring
  /// enabled, an id bound to a constructible class is built through
  /// [`make`](Container::make). Any other recipe is returned as-is.
  pub fn get(&self, id: &str) -> Result<Value> {
    if !self.has(id) {
      return Err(Error::NotFound { id: id.to_owned() });
    }
    if let Some(value) = self.resolved.get(id).map(|entry| entry.value().clone()) {
      trace!(id, "resolved cache hit");
      return Ok(value);
    }

    let _guard = self.guard(Stage::Resolve, id)?;
    let config = self.config();
    let value = match self.get_raw(id)? {
      Value::Class(class) if config.autowiring && self.classes.is_constructible(&class) => {
        self.make(id, Arguments::new(), false)?
      }
      Value::Closure(factory) if config.autowiring || config.resolve_closures => {
        debug!(id, "invoking factory");
        self.invoke_closure(&factory, &Arguments::new(), Some(id))?
      }
      recipe => recipe,
    };

    self.resolved.insert(id.to_owned(), value.clone());
    Ok(value)
  }

  /// Builds a fresh object for `id` and caches it as the service for `id`.
  ///
  /// Unknown ids are treated as class ids. A closure recipe is invoked
  /// first; if it yields a class id, that class is constructed with
  /// `arguments`. Fails unless the result is an object and, when
  /// `expected` is given, an instance of that type.
  pub fn instantiate(&self, id: &str, arguments: Arguments, expected: Option<&str>) -> Result<Value> {
    let _guard = self.guard(Stage::Construct, id)?;

    let recipe = self
      .definitions
      .get(id)
      .map(|entry| entry.value().clone())
      .unwrap_or_else(|| Value::class(id));

    let value = match recipe {
      Value::Closure(factory) => {
        debug!(id, "invoking factory");
        self.invoke_closure(&factory, &arguments, Some(id))?
      }
      other => other,
    };

    let value = match value {
      Value::Class(class) if self.classes.is_constructible(&class) => self.construct(&class, &arguments)?,
      other => other,
    };

    if !value.is_object() {
      return Err(Error::Unresolvable { id: id.to_owned() });
    }
    if let Some(expected) = expected {
      if !self.is_instance_of(&value, expected) {
        return Err(Error::TypeMismatch {
          id: id.to_owned(),
          expected: expected.to_owned(),
        });
      }
    }

    self.services.insert(id.to_owned(), value.clone());
    Ok(value)
  }

  /// Returns the cached service for `id`, instantiating it on a miss or
  /// when `recreate` is set.
  pub fn make(&self, id: &str, arguments: Arguments, recreate: bool) -> Result<Value> {
    if !recreate {
      if let Some(service) = self.services.get(id).map(|entry| entry.value().clone()) {
        trace!(id, "service cache hit");
        return Ok(service);
      }
    }
    self.instantiate(id, arguments, None)
  }

  // --- Invocation ---

  /// Calls a callable, resolving its receiver through `make` when it is
  /// given by id.
  ///
  /// Accepts `"Class::method"`, `(id_or_instance, "method")`, a closure, or
  /// the id of a class with an `__invoke` method.
  pub fn call(&self, callable: impl Into<Callable>, arguments: Arguments) -> Result<Value> {
    let callable = callable.into();
    trace!(?callable, "call");

    match callable {
      Callable::Closure(closure) => self.invoke_closure(&closure, &arguments, None),
      Callable::Path(class, method) if class.is_empty() || method.is_empty() => {
        Err(Error::UnresolvableCallable {
          spec: format!("{}::{}", class, method),
        })
      }
      Callable::Path(id, method) | Callable::Method(Target::Id(id), method) => {
        let receiver = self.make(&id, Arguments::new(), false)?;
        self.inject_on(Callable::Method(Target::Instance(receiver), method), arguments)
      }
      Callable::Method(target, method) => self.inject_on(Callable::Method(target, method), arguments),
      Callable::Invokable(class) => {
        let invokable = self
          .classes
          .get(&class)
          .map_or(false, |descriptor| descriptor.has_method(INVOKE));
        if !invokable {
          return Err(Error::UnresolvableCallable { spec: class });
        }
        self.call(Callable::Method(Target::Id(class), INVOKE.to_owned()), arguments)
      }
    }
  }

  /// Injects arguments into a concrete callable: a closure, or an instance
  /// paired with one of its methods. No receiver resolution happens here.
  pub fn inject_on(&self, callable: impl Into<Callable>, arguments: Arguments) -> Result<Value> {
    match callable.into() {
      Callable::Closure(closure) => self.invoke_closure(&closure, &arguments, None),
      Callable::Method(Target::Instance(Value::Closure(closure)), method) if method == INVOKE => {
        self.invoke_closure(&closure, &arguments, None)
      }
      Callable::Method(Target::Instance(Value::Object(object)), method) => {
        self.call_method(&object, &method, &arguments)
      }
      other => Err(Error::InvalidCallable {
        spec: format!("{:?}", other),
      }),
    }
  }

  // --- PRIVATE HELPERS ---

  fn guard(&self, stage: Stage, id: &str) -> Result<Option<ResolutionGuard>> {
    if self.config.read().detect_cycles {
      ResolutionGuard::enter(self.scope, stage, id).map(Some)
    } else {
      Ok(None)
    }
  }

  fn invalidate(&self, id: &str) {
    self.resolved.remove(id);
    self.services.remove(id);
    self.reflection.invalidate_definition(id);
  }

  fn invoke_closure(&self, closure: &Closure, arguments: &Arguments, cache_key: Option<&str>) -> Result<Value> {
    let params = self
      .reflection
      .parameters(&self.classes, Owner::Closure(closure), INVOKE, cache_key)?;
    let injections = inject(&params, arguments, self)?;
    closure.invoke(self, injections)
  }

  fn construct(&self, class: &str, arguments: &Arguments) -> Result<Value> {
    let undefined = || Error::UndefinedMethod {
      class: class.to_owned(),
      method: CONSTRUCTOR.to_owned(),
    };
    let descriptor = self.classes.get(class).ok_or_else(undefined)?;
    let constructor = descriptor.constructor().ok_or_else(undefined)?;

    let params = self
      .reflection
      .parameters(&self.classes, Owner::Class(class), CONSTRUCTOR, None)?;
    let injections = inject(&params, arguments, self)?;

    debug!(class, "constructing instance");
    constructor.call(self, injections).map(Value::Object)
  }

  fn call_method(&self, object: &Object, method: &str, arguments: &Arguments) -> Result<Value> {
    let undefined = || Error::UndefinedMethod {
      class: object.class().to_owned(),
      method: method.to_owned(),
    };
    let descriptor = self.classes.get(object.class()).ok_or_else(undefined)?;
    let handler = descriptor.method(method).ok_or_else(undefined)?;

    let params = self
      .reflection
      .parameters(&self.classes, Owner::Instance(object), method, None)?;
    let injections = inject(&params, arguments, self)?;

    debug!(class = object.class(), method, "invoking method");
    handler.call(object, self, injections)
  }
}

impl Autowire for Container {
  fn is_instance_of(&self, value: &Value, declared_type: &str) -> bool {
    Container::is_instance_of(self, value, declared_type)
  }

  fn autowire(&self, declared_type: &str) -> Result<Value> {
    self.make(declared_type, Arguments::new(), false)
  }
}

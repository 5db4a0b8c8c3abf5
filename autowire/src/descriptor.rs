//! The type descriptor registry: declared parameters, constructors and methods.
//!
//! Rust cannot enumerate constructor parameters at runtime, so every class the
//! container is expected to build or call into is registered up front with
//! an ordered parameter list. The argument matcher is driven entirely off
//! these descriptors.

use crate::arguments::Injections;
use crate::container::Container;
use crate::error::{Error, Result};
use crate::value::{Object, Value};
use dashmap::DashMap;
use std::any::Any;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Method name under which constructors are introspected.
pub const CONSTRUCTOR: &str = "__construct";

/// Method name used for closures and invokable classes.
pub const INVOKE: &str = "__invoke";

/// Declared type of a parameter that wants the container itself.
pub const CONTAINER_TYPE: &str = "fibre_autowire::Container";

type DefaultFn = dyn Fn() -> Value + Send + Sync;
type ConstructorBody = dyn Fn(&Container, Injections) -> Result<Object> + Send + Sync;
type MethodBody = dyn Fn(&Object, &Container, Injections) -> Result<Value> + Send + Sync;

/// One declared parameter of a constructor, method or closure.
#[derive(Clone)]
pub struct ParameterDescriptor {
  name: Arc<str>,
  declared_type: Option<Arc<str>>,
  default: Option<Arc<DefaultFn>>,
}

impl ParameterDescriptor {
  /// An untyped parameter.
  pub fn new(name: impl Into<Arc<str>>) -> Self {
    Self {
      name: name.into(),
      declared_type: None,
      default: None,
    }
  }

  /// A parameter declared with an object type, eligible for autowiring.
  pub fn typed(name: impl Into<Arc<str>>, declared_type: impl Into<Arc<str>>) -> Self {
    Self {
      declared_type: Some(declared_type.into()),
      ..Self::new(name)
    }
  }

  pub fn with_default(self, value: impl Into<Value>) -> Self {
    let value = value.into();
    self.with_default_fn(move || value.clone())
  }

  /// The default is produced only when it is actually selected.
  pub fn with_default_fn(mut self, default: impl Fn() -> Value + Send + Sync + 'static) -> Self {
    self.default = Some(Arc::new(default));
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn declared_type(&self) -> Option<&str> {
    self.declared_type.as_deref()
  }

  pub fn has_default(&self) -> bool {
    self.default.is_some()
  }

  pub fn default_value(&self) -> Option<Value> {
    self.default.as_ref().map(|default| default())
  }
}

impl fmt::Debug for ParameterDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ParameterDescriptor")
      .field("name", &self.name)
      .field("declared_type", &self.declared_type)
      .field("has_default", &self.has_default())
      .finish()
  }
}

#[derive(Clone)]
pub(crate) struct Constructor {
  params: Arc<[ParameterDescriptor]>,
  body: Arc<ConstructorBody>,
}

impl Constructor {
  pub(crate) fn call(&self, container: &Container, injections: Injections) -> Result<Object> {
    (self.body)(container, injections)
  }
}

#[derive(Clone)]
pub(crate) struct Method {
  params: Arc<[ParameterDescriptor]>,
  body: Arc<MethodBody>,
}

impl Method {
  pub(crate) fn call(&self, receiver: &Object, container: &Container, injections: Injections) -> Result<Value> {
    (self.body)(receiver, container, injections)
  }
}

/// A registered class: its supertypes, constructor and callable methods.
///
/// A descriptor without a constructor describes an interface or abstract
/// type. It still takes part in instance-of checks but cannot be built.
#[derive(Clone)]
pub struct ClassDescriptor {
  name: Arc<str>,
  parents: Vec<Arc<str>>,
  constructor: Option<Constructor>,
  methods: HashMap<String, Method>,
}

impl ClassDescriptor {
  pub fn interface(name: impl Into<Arc<str>>) -> Self {
    Self {
      name: name.into(),
      parents: Vec::new(),
      constructor: None,
      methods: HashMap::new(),
    }
  }

  /// Declares a supertype or implemented interface.
  pub fn extends(mut self, parent: impl Into<Arc<str>>) -> Self {
    self.parents.push(parent.into());
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn parents(&self) -> impl Iterator<Item = &str> {
    self.parents.iter().map(|p| &**p)
  }

  pub fn is_constructible(&self) -> bool {
    self.constructor.is_some()
  }

  pub fn has_method(&self, method: &str) -> bool {
    self.methods.contains_key(method)
  }

  pub(crate) fn constructor(&self) -> Option<&Constructor> {
    self.constructor.as_ref()
  }

  pub(crate) fn method(&self, method: &str) -> Option<&Method> {
    self.methods.get(method)
  }

  pub(crate) fn parameters(&self, method: &str) -> Option<Arc<[ParameterDescriptor]>> {
    if method == CONSTRUCTOR {
      self.constructor.as_ref().map(|c| c.params.clone())
    } else {
      self.methods.get(method).map(|m| m.params.clone())
    }
  }
}

impl fmt::Debug for ClassDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut methods: Vec<_> = self.methods.keys().collect();
    methods.sort();
    f.debug_struct("ClassDescriptor")
      .field("name", &self.name)
      .field("parents", &self.parents)
      .field("constructible", &self.is_constructible())
      .field("methods", &methods)
      .finish()
  }
}

/// Typed builder for a [`ClassDescriptor`] backed by the Rust type `T`.
///
/// # Examples
///
/// ```
/// use fibre_autowire::{ClassBuilder, Container, ParameterDescriptor as Param};
///
/// struct Greeter {
///   greeting: String,
/// }
///
/// let container = Container::new();
/// container.register(
///   ClassBuilder::<Greeter>::new("Greeter")
///     .constructor(vec![Param::new("greeting").with_default("Hello")], |_, args| {
///       Ok(Greeter { greeting: args.str(0)?.to_owned() })
///     })
///     .method("greet", vec![Param::new("name")], |this, _, args| {
///       Ok(format!("{}, {}!", this.greeting, args.str(0)?))
///     })
///     .build(),
/// );
///
/// let greeting = container
///   .call("Greeter::greet", fibre_autowire::args! { "name" => "World" })
///   .unwrap();
/// assert_eq!(greeting.as_str(), Some("Hello, World!"));
/// ```
pub struct ClassBuilder<T> {
  descriptor: ClassDescriptor,
  _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> ClassBuilder<T> {
  pub fn new(name: impl Into<Arc<str>>) -> Self {
    Self {
      descriptor: ClassDescriptor::interface(name),
      _marker: PhantomData,
    }
  }

  pub fn extends(mut self, parent: impl Into<Arc<str>>) -> Self {
    self.descriptor = self.descriptor.extends(parent);
    self
  }

  pub fn constructor<F>(mut self, params: Vec<ParameterDescriptor>, build: F) -> Self
  where
    F: Fn(&Container, Injections) -> Result<T> + Send + Sync + 'static,
  {
    let class = self.descriptor.name.clone();
    self.descriptor.constructor = Some(Constructor {
      params: params.into(),
      body: Arc::new(move |container: &Container, injections: Injections| {
        build(container, injections).map(|instance| Object::new(class.clone(), instance))
      }),
    });
    self
  }

  pub fn method<F, R>(mut self, name: impl Into<String>, params: Vec<ParameterDescriptor>, handler: F) -> Self
  where
    F: Fn(&T, &Container, Injections) -> Result<R> + Send + Sync + 'static,
    R: Into<Value>,
  {
    let name = name.into();
    let class = self.descriptor.name.clone();
    let method = name.clone();
    let body: Arc<MethodBody> = Arc::new(
      move |receiver: &Object, container: &Container, injections: Injections| -> Result<Value> {
        let this = receiver
          .downcast_ref::<T>()
          .ok_or_else(|| Error::InvalidReceiver {
            class: class.to_string(),
            method: method.clone(),
          })?;
        handler(this, container, injections).map(Into::into)
      },
    );
    self.descriptor.methods.insert(
      name,
      Method {
        params: params.into(),
        body,
      },
    );
    self
  }

  pub fn build(self) -> ClassDescriptor {
    self.descriptor
  }
}

/// Per-container registry of class descriptors.
#[derive(Default)]
pub(crate) struct TypeRegistry {
  classes: DashMap<Arc<str>, Arc<ClassDescriptor>>,
}

impl TypeRegistry {
  pub(crate) fn register(&self, descriptor: ClassDescriptor) -> Option<Arc<ClassDescriptor>> {
    self
      .classes
      .insert(descriptor.name.clone(), Arc::new(descriptor))
  }

  pub(crate) fn get(&self, name: &str) -> Option<Arc<ClassDescriptor>> {
    self.classes.get(name).map(|entry| entry.value().clone())
  }

  pub(crate) fn contains(&self, name: &str) -> bool {
    self.classes.contains_key(name)
  }

  pub(crate) fn is_constructible(&self, name: &str) -> bool {
    self
      .classes
      .get(name)
      .map_or(false, |entry| entry.is_constructible())
  }

  /// Walks declared parents breadth-first. Parents that were never
  /// registered still count by name but contribute no further ancestors.
  pub(crate) fn is_subtype(&self, class: &str, target: &str) -> bool {
    if class == target {
      return true;
    }

    let mut seen: HashSet<Arc<str>> = HashSet::new();
    let mut queue: VecDeque<Arc<str>> = match self.get(class) {
      Some(descriptor) => descriptor.parents.iter().cloned().collect(),
      None => return false,
    };

    while let Some(parent) = queue.pop_front() {
      if &*parent == target {
        return true;
      }
      if !seen.insert(parent.clone()) {
        continue;
      }
      if let Some(descriptor) = self.get(&parent) {
        queue.extend(descriptor.parents.iter().cloned());
      }
    }
    false
  }
}

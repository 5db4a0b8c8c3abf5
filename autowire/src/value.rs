//! Type-erased values stored in and produced by the container.

use crate::arguments::Injections;
use crate::container::Container;
use crate::descriptor::ParameterDescriptor;
use crate::error::Result;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

type ClosureBody = dyn Fn(&Container, Injections) -> Result<Value> + Send + Sync;

/// A constructed instance tagged with the class it was registered under.
///
/// Cloning an `Object` is cheap and shares the underlying instance, so two
/// clones are always [`Object::ptr_eq`].
#[derive(Clone)]
pub struct Object {
  class: Arc<str>,
  inner: Arc<dyn Any + Send + Sync>,
}

impl Object {
  pub fn new<T: Any + Send + Sync>(class: impl Into<Arc<str>>, instance: T) -> Self {
    Self::from_arc(class, Arc::new(instance))
  }

  pub fn from_arc<T: Any + Send + Sync>(class: impl Into<Arc<str>>, instance: Arc<T>) -> Self {
    Self {
      class: class.into(),
      inner: instance,
    }
  }

  /// The class identifier this instance is tagged with.
  pub fn class(&self) -> &str {
    &self.class
  }

  pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self.inner.clone().downcast::<T>().ok()
  }

  pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
    self.inner.downcast_ref::<T>()
  }

  /// Returns `true` if both handles point at the same instance.
  pub fn ptr_eq(a: &Object, b: &Object) -> bool {
    Arc::ptr_eq(&a.inner, &b.inner)
  }
}

impl fmt::Debug for Object {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Object({} @ {:p})", self.class, Arc::as_ptr(&self.inner))
  }
}

/// A factory closure together with its declared parameters.
///
/// The body receives the container and the injections computed from the
/// parameter list, in declaration order.
#[derive(Clone)]
pub struct Closure {
  params: Arc<[ParameterDescriptor]>,
  body: Arc<ClosureBody>,
}

impl Closure {
  pub fn new<F, R>(params: Vec<ParameterDescriptor>, body: F) -> Self
  where
    F: Fn(&Container, Injections) -> Result<R> + Send + Sync + 'static,
    R: Into<Value>,
  {
    Self {
      params: params.into(),
      body: Arc::new(move |container: &Container, injections: Injections| -> Result<Value> {
        body(container, injections).map(Into::into)
      }),
    }
  }

  pub fn parameters(&self) -> &[ParameterDescriptor] {
    &self.params
  }

  pub(crate) fn shared_parameters(&self) -> Arc<[ParameterDescriptor]> {
    self.params.clone()
  }

  pub(crate) fn invoke(&self, container: &Container, injections: Injections) -> Result<Value> {
    (self.body)(container, injections)
  }

  pub fn ptr_eq(a: &Closure, b: &Closure) -> bool {
    Arc::ptr_eq(&a.body, &b.body)
  }
}

impl fmt::Debug for Closure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Closure").field("params", &self.params).finish()
  }
}

/// Anything a definition can hold or a resolution can produce.
#[derive(Clone, Debug)]
pub enum Value {
  Null,
  Bool(bool),
  Int(i64),
  Float(f64),
  Str(Arc<str>),
  /// A class identifier, constructed through the type registry on `make`.
  Class(Arc<str>),
  Closure(Closure),
  Object(Object),
  /// The self-reference of the container performing the injection.
  Container,
}

impl Value {
  pub fn class(id: impl Into<Arc<str>>) -> Self {
    Value::Class(id.into())
  }

  pub fn object<T: Any + Send + Sync>(class: impl Into<Arc<str>>, instance: T) -> Self {
    Value::Object(Object::new(class, instance))
  }

  pub fn factory<F, R>(params: Vec<ParameterDescriptor>, body: F) -> Self
  where
    F: Fn(&Container, Injections) -> Result<R> + Send + Sync + 'static,
    R: Into<Value>,
  {
    Value::Closure(Closure::new(params, body))
  }

  /// Objects, closures and the container self-reference count as objects.
  pub fn is_object(&self) -> bool {
    matches!(self, Value::Object(_) | Value::Closure(_) | Value::Container)
  }

  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  pub fn as_object(&self) -> Option<&Object> {
    match self {
      Value::Object(object) => Some(object),
      _ => None,
    }
  }

  pub fn as_closure(&self) -> Option<&Closure> {
    match self {
      Value::Closure(closure) => Some(closure),
      _ => None,
    }
  }

  pub fn as_class(&self) -> Option<&str> {
    match self {
      Value::Class(id) => Some(id),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::Str(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_int(&self) -> Option<i64> {
    match self {
      Value::Int(i) => Some(*i),
      _ => None,
    }
  }

  pub fn as_float(&self) -> Option<f64> {
    match self {
      Value::Float(f) => Some(*f),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Value::Bool(b) => Some(*b),
      _ => None,
    }
  }

  pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self.as_object().and_then(Object::downcast::<T>)
  }
}

/// Scalars compare by value, objects and closures by identity.
impl PartialEq for Value {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Value::Null, Value::Null) | (Value::Container, Value::Container) => true,
      (Value::Bool(a), Value::Bool(b)) => a == b,
      (Value::Int(a), Value::Int(b)) => a == b,
      (Value::Float(a), Value::Float(b)) => a == b,
      (Value::Str(a), Value::Str(b)) | (Value::Class(a), Value::Class(b)) => a == b,
      (Value::Closure(a), Value::Closure(b)) => Closure::ptr_eq(a, b),
      (Value::Object(a), Value::Object(b)) => Object::ptr_eq(a, b),
      _ => false,
    }
  }
}

impl From<()> for Value {
  fn from(_: ()) -> Self {
    Value::Null
  }
}

impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Value::Bool(value)
  }
}

impl From<i64> for Value {
  fn from(value: i64) -> Self {
    Value::Int(value)
  }
}

impl From<i32> for Value {
  fn from(value: i32) -> Self {
    Value::Int(value.into())
  }
}

impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Value::Float(value)
  }
}

impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Value::Str(value.into())
  }
}

impl From<String> for Value {
  fn from(value: String) -> Self {
    Value::Str(value.into())
  }
}

impl From<Object> for Value {
  fn from(value: Object) -> Self {
    Value::Object(value)
  }
}

impl From<Closure> for Value {
  fn from(value: Closure) -> Self {
    Value::Closure(value)
  }
}

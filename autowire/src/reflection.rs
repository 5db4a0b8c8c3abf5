//! Memoized parameter introspection.

use crate::core::{OwnerKey, ReflectionKey};
use crate::descriptor::{ParameterDescriptor, TypeRegistry};
use crate::error::{Error, Result};
use crate::value::{Closure, Object};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::trace;

/// What is being introspected.
pub(crate) enum Owner<'a> {
  Class(&'a str),
  Instance(&'a Object),
  Closure(&'a Closure),
}

/// Parameter descriptors keyed by `(owner, method)`.
///
/// Classes are keyed by their name. Closures have no stable identity and are
/// only cached when the caller supplies the id of the definition that holds
/// them. The two kinds of owner never share entries.
#[derive(Default)]
pub(crate) struct ReflectionCache {
  entries: DashMap<ReflectionKey, Arc<[ParameterDescriptor]>>,
}

impl ReflectionCache {
  pub(crate) fn parameters(
    &self,
    registry: &TypeRegistry,
    owner: Owner<'_>,
    method: &str,
    cache_key: Option<&str>,
  ) -> Result<Arc<[ParameterDescriptor]>> {
    let key = match (&owner, cache_key) {
      (Owner::Closure(_), Some(id)) => Some(ReflectionKey::definition(id, method)),
      (Owner::Closure(_), None) => None,
      (Owner::Class(class), _) => Some(ReflectionKey::class(class, method)),
      (Owner::Instance(object), _) => Some(ReflectionKey::class(object.class(), method)),
    };

    if let Some(key) = &key {
      if let Some(hit) = self.entries.get(key).map(|entry| entry.value().clone()) {
        trace!(?key, "reflection cache hit");
        return Ok(hit);
      }
    }

    let params = match owner {
      Owner::Closure(closure) => closure.shared_parameters(),
      Owner::Class(class) => introspect(registry, class, method)?,
      Owner::Instance(object) => introspect(registry, object.class(), method)?,
    };

    if let Some(key) = key {
      trace!(?key, count = params.len(), "reflection cached");
      self.entries.insert(key, params.clone());
    }
    Ok(params)
  }

  /// Drops every entry of the class `class`, across all methods.
  pub(crate) fn invalidate_class(&self, class: &str) {
    self
      .entries
      .retain(|key, _| !matches!(&key.owner, OwnerKey::Class(owner) if &**owner == class));
  }

  /// Drops the entries cached for the closure held by definition `id`.
  pub(crate) fn invalidate_definition(&self, id: &str) {
    self
      .entries
      .retain(|key, _| !matches!(&key.owner, OwnerKey::Definition(owner) if &**owner == id));
  }

  #[cfg(test)]
  pub(crate) fn len(&self) -> usize {
    self.entries.len()
  }
}

fn introspect(registry: &TypeRegistry, class: &str, method: &str) -> Result<Arc<[ParameterDescriptor]>> {
  registry
    .get(class)
    .and_then(|descriptor| descriptor.parameters(method))
    .ok_or_else(|| Error::UndefinedMethod {
      class: class.to_owned(),
      method: method.to_owned(),
    })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::descriptor::{ClassBuilder, CONSTRUCTOR, INVOKE};
  use crate::error::ErrorKind;
  use crate::value::Value;

  struct Mailer;

  fn registry() -> TypeRegistry {
    let registry = TypeRegistry::default();
    registry.register(
      ClassBuilder::<Mailer>::new("Mailer")
        .constructor(vec![ParameterDescriptor::new("dsn")], |_, _| Ok(Mailer))
        .method("send", vec![ParameterDescriptor::new("to")], |_, _, _| Ok(Value::Null))
        .build(),
    );
    registry
  }

  #[test]
  fn test_class_parameters_are_cached_by_class_and_method() {
    let registry = registry();
    let cache = ReflectionCache::default();

    let ctor = cache
      .parameters(&registry, Owner::Class("Mailer"), CONSTRUCTOR, None)
      .unwrap();
    let send = cache
      .parameters(&registry, Owner::Class("Mailer"), "send", None)
      .unwrap();

    assert_eq!(ctor[0].name(), "dsn");
    assert_eq!(send[0].name(), "to");
    assert_eq!(cache.len(), 2);

    let again = cache
      .parameters(&registry, Owner::Class("Mailer"), CONSTRUCTOR, None)
      .unwrap();
    assert!(Arc::ptr_eq(&ctor, &again));
  }

  #[test]
  fn test_closures_without_key_are_not_cached() {
    let registry = registry();
    let cache = ReflectionCache::default();
    let closure = Closure::new(vec![ParameterDescriptor::new("x")], |_, _| Ok(()));

    cache
      .parameters(&registry, Owner::Closure(&closure), INVOKE, None)
      .unwrap();
    assert_eq!(cache.len(), 0);

    cache
      .parameters(&registry, Owner::Closure(&closure), INVOKE, Some("factory"))
      .unwrap();
    assert_eq!(cache.len(), 1);
  }

  #[test]
  fn test_invalidate_drops_all_methods_of_owner() {
    let registry = registry();
    let cache = ReflectionCache::default();
    cache
      .parameters(&registry, Owner::Class("Mailer"), CONSTRUCTOR, None)
      .unwrap();
    cache
      .parameters(&registry, Owner::Class("Mailer"), "send", None)
      .unwrap();

    cache.invalidate_class("Mailer");

    assert_eq!(cache.len(), 0);
  }

  #[test]
  fn test_definition_named_like_class_keeps_its_own_entry() {
    let registry = registry();
    let cache = ReflectionCache::default();
    let factory = Closure::new(vec![], |_, _| Ok(()));

    let send = cache
      .parameters(&registry, Owner::Class("Mailer"), "send", None)
      .unwrap();
    let closure = cache
      .parameters(&registry, Owner::Closure(&factory), "send", Some("Mailer"))
      .unwrap();

    assert_eq!(send.len(), 1);
    assert!(closure.is_empty());
    assert_eq!(cache.len(), 2);

    cache.invalidate_definition("Mailer");
    assert_eq!(cache.len(), 1);
    let again = cache
      .parameters(&registry, Owner::Class("Mailer"), "send", None)
      .unwrap();
    assert!(Arc::ptr_eq(&send, &again));
  }

  #[test]
  fn test_missing_class_or_method_is_an_invoker_error() {
    let registry = registry();
    let cache = ReflectionCache::default();

    let missing_class = cache
      .parameters(&registry, Owner::Class("Nope"), CONSTRUCTOR, None)
      .unwrap_err();
    let missing_method = cache
      .parameters(&registry, Owner::Class("Mailer"), "receive", None)
      .unwrap_err();

    assert_eq!(missing_class.kind(), ErrorKind::Invoker);
    assert_eq!(
      missing_method.to_string(),
      "There is no class 'Mailer' or callable method 'receive'"
    );
  }
}

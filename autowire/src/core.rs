//! Core, non-public data structures for the container.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::warn;

static NEXT_SCOPE: AtomicUsize = AtomicUsize::new(0);

/// Hands out a unique scope per container so that resolution stacks of
/// independent containers never collide on the same thread.
pub(crate) fn next_scope() -> usize {
  NEXT_SCOPE.fetch_add(1, Ordering::Relaxed)
}

/// Which entry point is resolving an id. `get` on an id bound to a class
/// legitimately re-enters `make` for the same id, so the two are tracked apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Stage {
  Resolve,
  Construct,
}

type StackEntry = (usize, Stage, String);

thread_local! {
  // Ids currently being resolved on this thread, per container scope.
  static RESOLVING_STACK: RefCell<HashSet<StackEntry>> = RefCell::new(HashSet::new());
}

/// An RAII guard to detect circular dependencies.
///
/// Entering pushes the id onto the thread-local resolution stack; finding it
/// already there means the dependency graph loops back on itself. Dropping
/// the guard pops the id again.
pub(crate) struct ResolutionGuard {
  entry: StackEntry,
}

impl ResolutionGuard {
  pub(crate) fn enter(scope: usize, stage: Stage, id: &str) -> Result<Self> {
    let entry = (scope, stage, id.to_owned());
    let inserted = RESOLVING_STACK.with(|stack| stack.borrow_mut().insert(entry.clone()));
    if !inserted {
      warn!(id, ?stage, "circular dependency detected");
      return Err(Error::CircularDependency { id: id.to_owned() });
    }
    Ok(Self { entry })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      stack.borrow_mut().remove(&self.entry);
    });
  }
}

/// Who owns a reflection cache entry. Class entries and closure definitions
/// live in separate key spaces, so a definition id equal to a class name
/// never shares an entry with that class.
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) enum OwnerKey {
  Class(Arc<str>),
  Definition(Arc<str>),
}

/// Key of a reflection cache entry: the owner and the introspected method.
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) struct ReflectionKey {
  pub(crate) owner: OwnerKey,
  pub(crate) method: Arc<str>,
}

impl ReflectionKey {
  pub(crate) fn class(class: &str, method: &str) -> Self {
    Self {
      owner: OwnerKey::Class(class.into()),
      method: method.into(),
    }
  }

  pub(crate) fn definition(id: &str, method: &str) -> Self {
    Self {
      owner: OwnerKey::Definition(id.into()),
      method: method.into(),
    }
  }
}

impl fmt::Debug for ReflectionKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.owner {
      OwnerKey::Class(class) => write!(f, "Key(class {}::{})", class, self.method),
      OwnerKey::Definition(id) => write!(f, "Key(definition {}::{})", id, self.method),
    }
  }
}

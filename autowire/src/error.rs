use thiserror::Error;

/// The failure family an [`Error`] belongs to.
///
/// Every variant of [`Error`] maps onto exactly one kind, which lets callers
/// branch on "missing", "could not build" and "could not call" without
/// matching on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  /// The requested id has no registered definition.
  NotFound,
  /// A recipe could not be reduced to an object or a parameter could not be satisfied.
  Construction,
  /// A callable referenced a missing class or method, or had an invalid shape.
  Invoker,
}

/// The main error type for the `fibre_autowire` library.
#[derive(Debug, Error)]
pub enum Error {
  #[error("There is no definition for '{id}'")]
  NotFound { id: String },

  #[error("Unresolvable dependency '{id}'")]
  Unresolvable { id: String },

  #[error("Dependency '{id}' is not an instance of '{expected}'")]
  TypeMismatch { id: String, expected: String },

  #[error("Unresolvable dependency '{parameter}'")]
  UnresolvableParameter { parameter: String },

  #[error("Unresolvable callable '{spec}'")]
  UnresolvableCallable { spec: String },

  #[error("Circular dependency detected while resolving '{id}'")]
  CircularDependency { id: String },

  #[error("Missing injected argument at position {index}")]
  MissingArgument { index: usize },

  #[error("Injected argument at position {index} is not {expected}")]
  ArgumentType { index: usize, expected: String },

  /// Raised by user factories and constructors.
  #[error("{0}")]
  Construction(String),

  #[error("There is no class '{class}' or callable method '{method}'")]
  UndefinedMethod { class: String, method: String },

  #[error("Receiver of '{class}::{method}' does not hold the registered type")]
  InvalidReceiver { class: String, method: String },

  #[error("Invalid object or undefined method provided: {spec}")]
  InvalidCallable { spec: String },
}

impl Error {
  /// Builds a free-form construction error, for use inside factories.
  pub fn construction(message: impl Into<String>) -> Self {
    Error::Construction(message.into())
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::NotFound { .. } => ErrorKind::NotFound,
      Error::Unresolvable { .. }
      | Error::TypeMismatch { .. }
      | Error::UnresolvableParameter { .. }
      | Error::UnresolvableCallable { .. }
      | Error::CircularDependency { .. }
      | Error::MissingArgument { .. }
      | Error::ArgumentType { .. }
      | Error::Construction(_) => ErrorKind::Construction,
      Error::UndefinedMethod { .. } | Error::InvalidReceiver { .. } | Error::InvalidCallable { .. } => {
        ErrorKind::Invoker
      }
    }
  }
}

/// A specialized `Result` type for `fibre_autowire` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

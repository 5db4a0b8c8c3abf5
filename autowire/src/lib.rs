//! # Fibre Autowire
//!
//! A runtime Inversion of Control (IoC) container for Rust that resolves ids
//! into values and injects dependencies into constructors, methods and
//! closures by matching declared parameters against supplied arguments and
//! other registered definitions.
//!
//! ## Core Concepts
//!
//! - **Definitions**: ids mapped to recipes. A recipe is a class id, a
//!   factory closure or a plain value.
//! - **Classes**: Rust types registered with an ordered parameter list for
//!   their constructor and methods, plus the interfaces they satisfy.
//! - **Resolution**: `get` memoizes resolved definitions, `make` memoizes
//!   constructed services, `instantiate` always builds afresh.
//! - **Injection**: for each parameter, a named argument wins, then the
//!   default value, then a positional argument of the declared type, and
//!   finally recursive resolution of the declared type (autowiring).
//!
//! ## Quick Start
//!
//! ```
//! use fibre_autowire::{args, ClassBuilder, ClassDescriptor, Container, ParameterDescriptor as Param, Value};
//!
//! trait Greeter: Send + Sync {
//!   fn greet(&self, name: &str) -> String;
//! }
//!
//! struct EnglishGreeter;
//!
//! impl Greeter for EnglishGreeter {
//!   fn greet(&self, name: &str) -> String {
//!     format!("Hello, {}!", name)
//!   }
//! }
//!
//! struct Welcome {
//!   greeter: std::sync::Arc<EnglishGreeter>,
//! }
//!
//! let container = Container::new();
//! container.register(ClassDescriptor::interface("Greeter"));
//! container.register(
//!   ClassBuilder::<EnglishGreeter>::new("EnglishGreeter")
//!     .extends("Greeter")
//!     .constructor(vec![], |_, _| Ok(EnglishGreeter))
//!     .build(),
//! );
//! container.register(
//!   ClassBuilder::<Welcome>::new("Welcome")
//!     .constructor(vec![Param::typed("greeter", "Greeter")], |_, args| {
//!       Ok(Welcome { greeter: args.object(0)? })
//!     })
//!     .method("run", vec![Param::new("name")], |this, _, args| {
//!       Ok(this.greeter.greet(args.str(0)?))
//!     })
//!     .build(),
//! );
//!
//! // Bind the interface to its implementation.
//! container.set("Greeter", Value::class("EnglishGreeter"));
//!
//! let message = container.call("Welcome::run", args! { "name" => "World" }).unwrap();
//! assert_eq!(message.as_str(), Some("Hello, World!"));
//! ```

mod arguments;
mod callable;
mod config;
mod container;
mod core;
mod descriptor;
mod error;
mod injection;
mod macros;
mod reflection;
mod value;

pub use arguments::{ArgKey, Arguments, Injections};
pub use callable::{Callable, Target};
pub use config::{ContainerBuilder, ContainerConfig};
pub use container::Container;
pub use descriptor::{ClassBuilder, ClassDescriptor, ParameterDescriptor, CONSTRUCTOR, CONTAINER_TYPE, INVOKE};
pub use error::{Error, ErrorKind, Result};
pub use value::{Closure, Object, Value};

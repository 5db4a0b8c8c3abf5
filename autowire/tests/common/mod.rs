#![allow(dead_code)]

use fibre_autowire::{
  ClassBuilder, ClassDescriptor, Container, ParameterDescriptor as Param, Value, CONTAINER_TYPE, INVOKE,
};
use std::sync::Arc;

// --- Test Fixtures ---

pub struct ConsoleOutput;

pub struct Printer {
  pub output: Arc<ConsoleOutput>,
  pub prefix: String,
}

pub struct Shout;

pub struct Base;

pub struct Consumer {
  pub dependency: Value,
}

pub struct Chicken;
pub struct Egg;

pub struct SelfAware {
  pub saw_container: bool,
}

/// Registers the fixture classes used across the integration tests.
///
/// - `Output` is an interface implemented by `ConsoleOutput`.
/// - `Printer(output: Output, prefix = ">")` has `out(text, suffix = "")`.
/// - `Shout` is invokable.
/// - `A` is an interface, `B` a no-arg subtype of it.
/// - `Consumer(a: A)` keeps whatever was injected.
/// - `Chicken(egg: Egg)` and `Egg(chicken: Chicken)` form a cycle.
pub fn register_fixtures(container: &Container) {
  container.register(ClassDescriptor::interface("Output"));
  container.register(
    ClassBuilder::<ConsoleOutput>::new("ConsoleOutput")
      .extends("Output")
      .constructor(vec![], |_, _| Ok(ConsoleOutput))
      .build(),
  );
  container.register(
    ClassBuilder::<Printer>::new("Printer")
      .constructor(
        vec![Param::typed("output", "Output"), Param::new("prefix").with_default(">")],
        |_, args| {
          Ok(Printer {
            output: args.object(0)?,
            prefix: args.str(1)?.to_owned(),
          })
        },
      )
      .method(
        "out",
        vec![Param::new("text"), Param::new("suffix").with_default("")],
        |this, _, args| Ok(format!("{} {}{}", this.prefix, args.str(0)?, args.str(1)?)),
      )
      .build(),
  );
  container.register(
    ClassBuilder::<Shout>::new("Shout")
      .constructor(vec![], |_, _| Ok(Shout))
      .method(INVOKE, vec![Param::new("text")], |_, _, args| {
        Ok(args.str(0)?.to_uppercase())
      })
      .build(),
  );

  container.register(ClassDescriptor::interface("A"));
  container.register(
    ClassBuilder::<Base>::new("B")
      .extends("A")
      .constructor(vec![], |_, _| Ok(Base))
      .build(),
  );
  container.register(
    ClassBuilder::<Consumer>::new("Consumer")
      .constructor(vec![Param::typed("a", "A")], |_, args| {
        Ok(Consumer {
          dependency: args.value(0)?.clone(),
        })
      })
      .build(),
  );

  container.register(
    ClassBuilder::<Chicken>::new("Chicken")
      .constructor(vec![Param::typed("egg", "Egg")], |_, _| Ok(Chicken))
      .build(),
  );
  container.register(
    ClassBuilder::<Egg>::new("Egg")
      .constructor(vec![Param::typed("chicken", "Chicken")], |_, _| Ok(Egg))
      .build(),
  );

  container.register(
    ClassBuilder::<SelfAware>::new("SelfAware")
      .constructor(vec![Param::typed("container", CONTAINER_TYPE)], |_, args| {
        Ok(SelfAware {
          saw_container: args.value(0)? == &Value::Container,
        })
      })
      .build(),
  );
}

/// A container with the fixtures registered and `Output` bound to `ConsoleOutput`.
pub fn container() -> Container {
  let container = Container::new();
  register_fixtures(&container);
  container.set("Output", Value::class("ConsoleOutput"));
  container
}

use fibre_autowire::{
  args, ClassBuilder, ClassDescriptor, Container, Error, ParameterDescriptor as Param, Value, INVOKE,
};
use std::sync::Arc;

// A storage backend behind an interface, and a service that depends on it.
struct MemoryStore {
  name: String,
}

struct UserService {
  store: Arc<MemoryStore>,
}

// Invokable: called through its `__invoke` method when named on its own.
struct Greet;

// Each needs the other; the container reports the loop.
struct Chicken;
struct Egg;

impl UserService {
  fn describe(&self, user: &str) -> String {
    format!("user '{}' from store '{}'", user, self.store.name)
  }
}

fn main() {
  // Set RUST_LOG=fibre_autowire=trace to watch resolution decisions.
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .try_init();

  let container = Container::new();

  // --- Class Registration ---
  container.register(ClassDescriptor::interface("Store"));
  container.register(
    ClassBuilder::<MemoryStore>::new("MemoryStore")
      .extends("Store")
      .constructor(vec![Param::new("name").with_default("default")], |_, args| {
        Ok(MemoryStore {
          name: args.str(0)?.to_owned(),
        })
      })
      .build(),
  );
  container.register(
    ClassBuilder::<UserService>::new("UserService")
      .constructor(vec![Param::typed("store", "Store")], |_, args| {
        Ok(UserService {
          store: args.object(0)?,
        })
      })
      .method("describe", vec![Param::new("user")], |this, _, args| {
        Ok(this.describe(args.str(0)?))
      })
      .build(),
  );
  container.register(
    ClassBuilder::<Greet>::new("Greet")
      .constructor(vec![], |_, _| Ok(Greet))
      .method(INVOKE, vec![Param::new("name")], |_, _, args| {
        Ok(format!("hello, {}", args.str(0)?))
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

  // --- Bindings ---
  // The interface is bound to a concrete class; `UserService` asks for a
  // `Store` and receives the `MemoryStore` the binding produces.
  container.set("Store", Value::class("MemoryStore"));

  println!("--- Autowired service ---");
  let service = container.get("UserService");
  println!("get(\"UserService\") without a definition: {}", service.unwrap_err());

  let service = container.make("UserService", args!(), false).unwrap();
  let again = container.make("UserService", args!(), false).unwrap();
  assert_eq!(service, again, "make should return the cached service");
  println!("make(\"UserService\") twice returned the same instance.\n");

  println!("--- Invocation ---");
  let described = container
    .call("UserService::describe", args! { "user" => "ada" })
    .unwrap();
  println!("{}", described.as_str().unwrap_or_default());

  println!("\n--- Recreate ---");
  let fresh = container.make("UserService", args!(), true).unwrap();
  assert_ne!(service, fresh, "recreate should build a new instance");
  println!("make(\"UserService\", recreate = true) built a new instance.");

  println!("\n--- Invokable ---");
  let greeting = container.call("Greet", args! { "name" => "ada" }).unwrap();
  println!("{}", greeting.as_str().unwrap_or_default());

  println!("\n--- Circular dependency ---");
  match container.make("Chicken", args!(), false) {
    Err(err @ Error::CircularDependency { .. }) => println!("make(\"Chicken\") failed: {}", err),
    other => panic!("expected a circular dependency, got {:?}", other),
  }
}

use fibre_autowire::{Container, ErrorKind, Value};

fn main() {
  // Each container owns its definitions and caches; nothing is shared.
  let production = Container::builder()
    .define("db.url", "postgres://prod/app")
    .define("db.pool", 32)
    .build();

  let testing = Container::builder()
    .define("db.url", "sqlite::memory:")
    .build();

  println!("production db.url = {:?}", production.get("db.url").unwrap());
  println!("testing db.url    = {:?}", testing.get("db.url").unwrap());

  match testing.get("db.pool") {
    Err(err) if err.kind() == ErrorKind::NotFound => println!("testing has no db.pool: {}", err),
    other => panic!("unexpected result: {:?}", other),
  }

  // Overriding a definition invalidates what was resolved from it.
  testing.set("db.url", "sqlite:///tmp/test.db");
  assert_eq!(testing.get("db.url").unwrap(), Value::from("sqlite:///tmp/test.db"));
  println!("testing db.url after override = {:?}", testing.get("db.url").unwrap());
}

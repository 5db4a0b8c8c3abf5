mod common;

use common::{Base, Printer};
use fibre_autowire::{args, resolve, ArgKey, Arguments, Container, Value};
use pretty_assertions::assert_eq;

#[test]
fn test_args_builds_named_bag() {
  let args = args! { "host" => "localhost", "port" => 5432, };

  assert!(args.is_named());
  assert_eq!(args.named("host"), Some(&Value::from("localhost")));
  assert_eq!(args.named("port"), Some(&Value::Int(5432)));
}

#[test]
fn test_args_builds_positional_bag() {
  let args = args![1, "two", true];

  assert!(!args.is_named());
  assert_eq!(
    args.positional().cloned().collect::<Vec<_>>(),
    vec![Value::Int(1), Value::from("two"), Value::Bool(true)]
  );
}

#[test]
fn test_args_numeric_keys_stay_positional() {
  let args = args! { "0" => "zero", "1" => "one" };

  assert!(!args.is_named());
  assert_eq!(args, Arguments::new().with(ArgKey::Position(0), "zero").with(1usize, "one"));
}

#[test]
fn test_args_empty() {
  let args = args!();
  assert!(args.is_empty());
}

#[test]
fn test_resolve_typed_service() {
  let container = common::container();
  container.set("A", Value::class("B"));

  let resolved = resolve!(container, "A" => Base);
  let again = resolve!(container, "A" => Base);

  assert!(std::sync::Arc::ptr_eq(&resolved, &again));
}

#[test]
fn test_resolve_raw_value() {
  let container = Container::new();
  container.set("name", "fibre");

  assert_eq!(resolve!(container, "name"), Value::from("fibre"));
}

#[test]
#[should_panic(expected = "Failed to resolve required service 'missing'")]
fn test_resolve_panics_on_missing_service() {
  let container = Container::new();
  resolve!(container, "missing");
}

#[test]
#[should_panic(expected = "is not a")]
fn test_resolve_panics_on_type_mismatch() {
  let container = common::container();
  container.set("A", Value::class("B"));
  resolve!(container, "A" => Printer);
}

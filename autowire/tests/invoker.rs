mod common;

use fibre_autowire::{
  args, Arguments, Callable, ClassBuilder, Closure, Error, ErrorKind, Object, ParameterDescriptor as Param, Target,
  Value, CONTAINER_TYPE, INVOKE,
};
use pretty_assertions::assert_eq;

// --- Callable normalization ---

#[test]
fn test_callable_shapes_are_equivalent() {
  // Arrange
  let container = common::container();
  let printer = container.make("Printer", Arguments::new(), false).unwrap();

  // Act
  let by_path = container.call("Printer::out", args! { "text" => "hello" }).unwrap();
  let by_id = container.call(("Printer", "out"), args! { "text" => "hello" }).unwrap();
  let by_instance = container
    .call((printer.clone(), "out"), args! { "text" => "hello" })
    .unwrap();

  // Assert
  assert_eq!(by_path, Value::from("> hello"));
  assert_eq!(by_id, by_path);
  assert_eq!(by_instance, by_path);
}

#[test]
fn test_call_resolves_receiver_from_service_cache() {
  let container = common::container();
  let cached = container.make("Printer", args! { "prefix" => "*" }, false).unwrap();

  let result = container.call("Printer::out", args! { "text" => "x" }).unwrap();

  assert_eq!(result, Value::from("* x"));
  assert_eq!(container.make("Printer", Arguments::new(), false).unwrap(), cached);
}

#[test]
fn test_call_resolves_receiver_through_definitions() {
  let container = common::container();
  container.set("printer", Value::class("Printer"));

  let result = container.call("printer::out", args! { "text" => "bound" }).unwrap();

  assert_eq!(result, Value::from("> bound"));
}

#[test]
fn test_named_argument_overrides_default() {
  let container = common::container();

  let result = container
    .call("Printer::out", args! { "text" => "hi", "suffix" => "!" })
    .unwrap();

  assert_eq!(result, Value::from("> hi!"));
}

#[test]
fn test_invokable_class_is_called() {
  let container = common::container();

  let result = container.call("Shout", args! { "text" => "quiet" }).unwrap();

  assert_eq!(result, Value::from("QUIET"));
}

#[test]
fn test_invokable_class_and_factory_with_same_id_keep_their_parameters() {
  // Arrange
  let container = common::container();
  let shout = Object::new("Shout", common::Shout);
  let first = container
    .call((shout.clone(), INVOKE), args! { "text" => "hi" })
    .unwrap();

  // Act
  container.set("Shout", Value::factory(vec![], |_, _| Ok(Value::class("Shout"))));
  let built = container.get("Shout").unwrap();
  let again = container.call((shout, INVOKE), args! { "text" => "hi" }).unwrap();

  // Assert
  assert_eq!(first, Value::from("HI"));
  assert_eq!(built, Value::class("Shout"));
  assert_eq!(again, Value::from("HI"));
}

#[test]
fn test_factory_cached_first_does_not_shadow_invokable_method() {
  // Arrange
  let container = common::container();
  container.set("Shout", Value::factory(vec![], |_, _| Ok(Value::class("Shout"))));
  let shout = container.instantiate("Shout", Arguments::new(), None).unwrap();

  // Act
  let result = container.call((shout, INVOKE), args! { "text" => "hi" }).unwrap();

  // Assert
  assert_eq!(result, Value::from("HI"));
}

#[test]
fn test_non_invokable_string_is_unresolvable() {
  let container = common::container();

  let err = container.call("Printer", Arguments::new()).unwrap_err();

  assert!(matches!(err, Error::UnresolvableCallable { ref spec } if spec == "Printer"));
  assert_eq!(err.kind(), ErrorKind::Construction);
  assert!(matches!(
    container.call("::out", Arguments::new()),
    Err(Error::UnresolvableCallable { .. })
  ));
}

#[test]
fn test_closure_call_injects_arguments_and_container() {
  let container = common::container();
  container.set("suffix", "?");
  let closure = Closure::new(
    vec![Param::new("word"), Param::typed("container", CONTAINER_TYPE)],
    |container, args| {
      assert_eq!(args.value(1)?, &Value::Container);
      let suffix = container.get("suffix")?;
      Ok(format!("{}{}", args.str(0)?, suffix.as_str().unwrap_or_default()))
    },
  );

  let result = container.call(closure, args! { "word" => "why" }).unwrap();

  assert_eq!(result, Value::from("why?"));
}

#[test]
fn test_closure_typed_positional_argument_precedes_autowiring() {
  let container = common::container();
  let supplied = container.instantiate("ConsoleOutput", Arguments::new(), None).unwrap();
  let autowired = container.make("Output", Arguments::new(), false).unwrap();
  let closure = Closure::new(vec![Param::typed("output", "Output")], |_, args| {
    Ok(args.value(0)?.clone())
  });

  let injected = container.call(closure, args![supplied.clone()]).unwrap();

  assert_eq!(injected, supplied);
  assert_ne!(injected, autowired);
}

#[test]
fn test_undefined_method_is_an_invoker_error() {
  let container = common::container();

  let err = container.call("Printer::shred", Arguments::new()).unwrap_err();

  assert_eq!(err.kind(), ErrorKind::Invoker);
  assert_eq!(
    err.to_string(),
    "There is no class 'Printer' or callable method 'shred'"
  );
}

#[test]
fn test_missing_receiver_class_fails_construction() {
  let container = common::container();

  let err = container.call("Ghost::walk", Arguments::new()).unwrap_err();

  assert!(matches!(err, Error::Unresolvable { ref id } if id == "Ghost"));
}

// --- inject_on ---

#[test]
fn test_inject_on_requires_a_concrete_receiver() {
  let container = common::container();

  let by_id = container
    .inject_on(("Printer", "out"), args! { "text" => "x" })
    .unwrap_err();
  let by_path = container
    .inject_on("Printer::out", args! { "text" => "x" })
    .unwrap_err();
  let scalar = container
    .inject_on((Value::Int(3), "out"), Arguments::new())
    .unwrap_err();

  assert_eq!(by_id.kind(), ErrorKind::Invoker);
  assert_eq!(by_path.kind(), ErrorKind::Invoker);
  assert!(matches!(scalar, Error::InvalidCallable { .. }));
}

#[test]
fn test_inject_on_calls_instance_method_verbatim() {
  let container = common::container();
  let printer = container.make("Printer", Arguments::new(), false).unwrap();

  let result = container
    .inject_on(Callable::method(printer, "out"), args! { "text" => "direct" })
    .unwrap();

  assert_eq!(result, Value::from("> direct"));
}

#[test]
fn test_inject_on_closure_receiver_with_invoke() {
  let container = common::container();
  let closure = Closure::new(vec![Param::new("n").with_default(7)], |_, args| args.int(0));

  let result = container
    .inject_on(Callable::Method(Target::from(closure), INVOKE.to_owned()), Arguments::new())
    .unwrap();

  assert_eq!(result, Value::Int(7));
}

#[test]
fn test_method_on_foreign_object_is_rejected() {
  struct Impostor;

  let container = common::container();
  let impostor = Value::object("Printer", Impostor);

  let err = container
    .inject_on((impostor, "out"), args! { "text" => "x" })
    .unwrap_err();

  assert!(matches!(err, Error::InvalidReceiver { .. }));
  assert_eq!(err.kind(), ErrorKind::Invoker);
}

#[test]
fn test_method_parameters_can_be_autowired() {
  struct Report;

  let container = common::container();
  container.register(
    ClassBuilder::<Report>::new("Report")
      .constructor(vec![], |_, _| Ok(Report))
      .method(
        "render",
        vec![Param::typed("printer", "Printer"), Param::new("title")],
        |_, _, args| {
          let printer = args.object::<common::Printer>(0)?;
          Ok(format!("{} {}", printer.prefix, args.str(1)?))
        },
      )
      .build(),
  );

  let result = container
    .call("Report::render", args! { "title" => "Q3" })
    .unwrap();

  assert_eq!(result, Value::from("> Q3"));
}

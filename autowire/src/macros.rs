//! Public macros for building argument bags and resolving services.

/// Builds an [`Arguments`](crate::Arguments) bag.
///
/// `args!{ "name" => value, ... }` builds a named bag, `args![a, b]` a
/// positional one and `args!()` an empty one.
///
/// # Examples
///
/// ```
/// use fibre_autowire::{args, Value};
///
/// let named = args! { "host" => "localhost", "port" => 5432 };
/// assert!(named.is_named());
/// assert_eq!(named.named("port"), Some(&Value::Int(5432)));
///
/// let positional = args![1, 2, 3];
/// assert!(!positional.is_named());
/// assert_eq!(positional.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Arguments::new()
    };

    // Arm for a named bag: args!{ "name" => value }
    ($($name:literal => $value:expr),+ $(,)?) => {{
        let mut arguments = $crate::Arguments::new();
        $(arguments.insert($name, $value);)+
        arguments
    }};

    // Arm for a positional bag: args![value, value]
    ($($value:expr),+ $(,)?) => {{
        let mut arguments = $crate::Arguments::new();
        $(arguments.push($value);)+
        arguments
    }};
}

/// Resolves an id from a container, panicking if it cannot be resolved.
///
/// # Panics
///
/// This macro will panic if the id cannot be resolved, or if the typed form
/// is used and the resolved value is not an object of that type. For a
/// non-panicking version, use `container.get(...)` directly.
///
/// # Examples
///
/// ```
/// use fibre_autowire::{resolve, Container, Value};
///
/// struct Settings {
///   verbose: bool,
/// }
///
/// let container = Container::new();
/// container.set("settings", Value::object("Settings", Settings { verbose: true }));
/// container.set("name", "fibre");
///
/// let settings = resolve!(container, "settings" => Settings);
/// assert!(settings.verbose);
///
/// let name = resolve!(container, "name");
/// assert_eq!(name.as_str(), Some("fibre"));
/// ```
#[macro_export]
macro_rules! resolve {
    // Arm for a typed resolution: resolve!(container, "id" => MyService)
    ($container:expr, $id:expr => $type:ty) => {{
        let id = $id;
        $container
            .get(id)
            .unwrap_or_else(|err| panic!("Failed to resolve required service '{}': {}", id, err))
            .downcast::<$type>()
            .unwrap_or_else(|| {
                panic!(
                    "Resolved service '{}' is not a {}",
                    id,
                    std::any::type_name::<$type>()
                )
            })
    }};

    // Arm for resolving the raw value: resolve!(container, "id")
    ($container:expr, $id:expr) => {{
        let id = $id;
        $container
            .get(id)
            .unwrap_or_else(|err| panic!("Failed to resolve required service '{}': {}", id, err))
    }};
}

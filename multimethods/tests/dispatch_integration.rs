//! End-to-end dispatch scenarios.
//!
//! Exercises the engine the way client code uses it: a type with a
//! multi-way `set` method whose overloads delegate to each other, plus a
//! free `double` function dispatched on its single argument.

use multimethods::{
    tags, DispatchError, Dispatcher, DuplicatePolicy, Registry, TypeTag, Value,
};
use pretty_assertions::assert_eq;

/// A two-field record, the receiver type for the bound-dispatch scenario.
#[derive(Debug, Clone, PartialEq)]
struct Pair {
    i: i64,
    j: i64,
}

/// Wires up `Pair`'s overload set:
/// - `set(i64)` assigns the first field
/// - `set(f64)` truncates, then delegates to `set(i64)`
/// - `set(String)` parses, then delegates to `set(i64)`
/// - `set(i64, i64)` assigns both fields
/// - `add(Pair)` returns a new `Pair` with field-wise sums
fn register_pair_methods(registry: &Registry) {
    registry
        .register_method::<Pair, _>("set", tags![i64], |_, receiver, args| {
            receiver.get_mut::<Pair>()?.i = *args[0].get::<i64>()?;
            Ok(Value::unit())
        })
        .unwrap();
    registry
        .register_method::<Pair, _>("set", tags![f64], |registry, receiver, args| {
            let truncated = *args[0].get::<f64>()? as i64;
            Dispatcher::new(registry).call_method(receiver, "set", &[Value::new(truncated)])
        })
        .unwrap();
    registry
        .register_method::<Pair, _>("set", tags![String], |registry, receiver, args| {
            let parsed: i64 = args[0]
                .get::<String>()?
                .parse()
                .map_err(DispatchError::implementation)?;
            Dispatcher::new(registry).call_method(receiver, "set", &[Value::new(parsed)])
        })
        .unwrap();
    registry
        .register_method::<Pair, _>("set", tags![i64, i64], |_, receiver, args| {
            let pair = receiver.get_mut::<Pair>()?;
            pair.i = *args[0].get::<i64>()?;
            pair.j = *args[1].get::<i64>()?;
            Ok(Value::unit())
        })
        .unwrap();
    registry
        .register_method::<Pair, _>("add", tags![Pair], |_, receiver, args| {
            let left = receiver.get::<Pair>()?;
            let right = args[0].get::<Pair>()?;
            Ok(Value::new(Pair {
                i: left.i + right.i,
                j: left.j + right.j,
            }))
        })
        .unwrap();
}

fn register_double(registry: &Registry) {
    registry
        .register_function("double", tags![i64], |_, args| {
            Ok(Value::new(2 * args[0].get::<i64>()?))
        })
        .unwrap();
    registry
        .register_function("double", tags![f64], |_, args| {
            Ok(Value::new(2.0 * args[0].get::<f64>()?))
        })
        .unwrap();
    registry
        .register_function("double", tags![String], |_, args| {
            let s = args[0].get::<String>()?;
            Ok(Value::new(format!("{s}{s}")))
        })
        .unwrap();
}

#[test]
fn bound_set_scenario() {
    let registry = Registry::new();
    register_pair_methods(&registry);
    let dispatcher = registry.dispatcher();

    let mut pair = Value::new(Pair { i: 2, j: 0 });

    // set(1.0) truncates through the float overload.
    dispatcher
        .call_method(&mut pair, "set", &[Value::new(1.0f64)])
        .unwrap();
    assert_eq!(pair.get::<Pair>().unwrap().i, 1);

    // set("10") parses through the string overload.
    dispatcher
        .call_method(&mut pair, "set", &[Value::from("10")])
        .unwrap();
    assert_eq!(pair.get::<Pair>().unwrap().i, 10);

    // set(4) hits the int overload directly.
    dispatcher
        .call_method(&mut pair, "set", &[Value::new(4i64)])
        .unwrap();
    assert_eq!(pair.get::<Pair>().unwrap().i, 4);

    // set(6, 7) selects the two-argument overload by arity.
    dispatcher
        .call_method(&mut pair, "set", &[Value::new(6i64), Value::new(7i64)])
        .unwrap();
    assert_eq!(*pair.get::<Pair>().unwrap(), Pair { i: 6, j: 7 });

    // set(6.6, 6.9): no (f64, f64) overload exists.
    let err = dispatcher
        .call_method(&mut pair, "set", &[Value::new(6.6f64), Value::new(6.9f64)])
        .unwrap_err();
    match err {
        DispatchError::MissingOverload {
            selector,
            arg_types,
            ..
        } => {
            assert_eq!(selector.as_str(), "set");
            assert_eq!(arg_types, tags![f64, f64]);
        }
        other => panic!("expected MissingOverload, got {other:?}"),
    }

    // The failed call left the receiver untouched.
    assert_eq!(*pair.get::<Pair>().unwrap(), Pair { i: 6, j: 7 });
}

#[test]
fn bound_add_returns_a_new_instance() {
    let registry = Registry::new();
    register_pair_methods(&registry);

    let mut a = Value::new(Pair { i: 1, j: 2 });
    let b = Value::new(Pair { i: 5, j: 6 });
    let sum = registry
        .dispatcher()
        .call_method(&mut a, "add", &[b])
        .unwrap();

    assert_eq!(*sum.get::<Pair>().unwrap(), Pair { i: 6, j: 8 });
    assert_eq!(*a.get::<Pair>().unwrap(), Pair { i: 1, j: 2 });
}

#[test]
fn free_double_scenario() {
    let registry = Registry::new();
    register_double(&registry);
    let dispatcher = registry.dispatcher();

    let result = dispatcher.call_function("double", &[Value::new(3i64)]).unwrap();
    assert_eq!(*result.get::<i64>().unwrap(), 6);

    let result = dispatcher
        .call_function("double", &[Value::new(1.4f64)])
        .unwrap();
    assert_eq!(*result.get::<f64>().unwrap(), 2.8);

    let result = dispatcher
        .call_function("double", &[Value::from("ab")])
        .unwrap();
    assert_eq!(result.get::<String>().unwrap(), "abab");

    // No (i64, i64) overload of double exists.
    let err = dispatcher
        .call_function("double", &[Value::new(1i64), Value::new(2i64)])
        .unwrap_err();
    assert!(matches!(err, DispatchError::MissingOverload { .. }));

    // A boolean is not an integer.
    let err = dispatcher
        .call_function("double", &[Value::new(true)])
        .unwrap_err();
    assert!(matches!(err, DispatchError::MissingOverload { .. }));
}

#[test]
fn parse_failure_propagates_from_the_string_overload() {
    let registry = Registry::new();
    register_pair_methods(&registry);

    let mut pair = Value::new(Pair { i: 0, j: 0 });
    let err = registry
        .dispatcher()
        .call_method(&mut pair, "set", &[Value::from("not a number")])
        .unwrap_err();
    assert!(matches!(err, DispatchError::Implementation(_)));
}

#[test]
fn method_and_function_scopes_are_independent() {
    let registry = Registry::new();
    register_pair_methods(&registry);

    // `set` exists for Pair, but nothing was registered in the global scope.
    let err = registry
        .dispatcher()
        .call_function("set", &[Value::new(1i64)])
        .unwrap_err();
    assert!(matches!(err, DispatchError::MissingTable { .. }));
}

#[test]
fn reject_policy_surfaces_duplicates_in_client_wiring() {
    let registry = Registry::with_policy(DuplicatePolicy::Reject);
    register_double(&registry);

    let err = registry
        .register_function("double", tags![i64], |_, args| {
            Ok(Value::new(3 * args[0].get::<i64>()?))
        })
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "overload `double(i64)` already registered for `<global>`"
    );

    // The original overload still answers.
    let result = registry
        .dispatcher()
        .call_function("double", &[Value::new(3i64)])
        .unwrap();
    assert_eq!(*result.get::<i64>().unwrap(), 6);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any registered (selector, tags) pair dispatches to exactly the
        /// implementation registered under it.
        #[test]
        fn registered_keys_always_resolve(
            selector in "[a-z][a-z0-9_]{0,11}",
            arity in 0usize..4,
            marker in any::<i64>(),
        ) {
            let registry = Registry::new();
            registry
                .register_function(
                    selector.as_str(),
                    vec![TypeTag::of::<i64>(); arity],
                    move |_, _| Ok(Value::new(marker)),
                )
                .unwrap();

            let args: Vec<Value> = (0..arity as i64).map(Value::new).collect();
            let result = registry
                .dispatcher()
                .call_function(selector.as_str(), &args)
                .unwrap();
            prop_assert_eq!(*result.get::<i64>().unwrap(), marker);
        }

        /// A call whose arity differs from every registered key fails with
        /// `MissingOverload`, never a wrong-overload match.
        #[test]
        fn wrong_arity_never_matches(
            selector in "[a-z][a-z0-9_]{0,11}",
            registered_arity in 0usize..4,
            extra in 1usize..3,
        ) {
            let registry = Registry::new();
            registry
                .register_function(
                    selector.as_str(),
                    vec![TypeTag::of::<i64>(); registered_arity],
                    |_, _| Ok(Value::unit()),
                )
                .unwrap();

            let args: Vec<Value> =
                (0..(registered_arity + extra) as i64).map(Value::new).collect();
            let err = registry
                .dispatcher()
                .call_function(selector.as_str(), &args)
                .unwrap_err();
            prop_assert!(
                matches!(err, DispatchError::MissingOverload { .. }),
                "expected DispatchError::MissingOverload"
            );
        }
    }
}

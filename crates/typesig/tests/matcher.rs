// crates/typesig/tests/matcher.rs
// ============================================================================
// Module: Structural Matcher Tests
// Description: Per-variant matching semantics, subtyping, and tie-break rules.
// ============================================================================
//! ## Overview
//! Integration tests for [`typesig::matches`] across every descriptor variant.

// ============================================================================
// SECTION: Test Support
// ============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

use support::TestResult;
use support::bag_class;
use support::circle_class;
use support::ensure;
use support::shape_class;
use typesig::ClassDef;
use typesig::Instance;
use typesig::PrimitiveType;
use typesig::TypeDescriptor;
use typesig::Value;
use typesig::matches;
use typesig::sig;

// ============================================================================
// SECTION: Primitives
// ============================================================================

#[test]
fn test_primitive_matches_exact_type() -> TestResult {
    ensure(matches(&Value::from(1), &sig!(int)), "int matches int")?;
    ensure(matches(&Value::from("x"), &sig!(str)), "str matches str")?;
    ensure(matches(&Value::from(3.5), &sig!(float)), "float matches float")?;
    ensure(matches(&Value::bytes(*b"ab"), &sig!(bytes)), "bytes matches bytes")?;
    ensure(!matches(&Value::from("x"), &sig!(int)), "str must not match int")?;
    ensure(!matches(&Value::from(2.5), &sig!(int)), "float must not match int")?;
    ensure(!matches(&Value::from(1), &sig!(float)), "int must not widen to float")?;
    Ok(())
}

#[test]
fn test_any_matches_everything() -> TestResult {
    let samples = [
        Value::Null,
        Value::from(true),
        Value::from(7),
        Value::from("s"),
        Value::list([1, 2]),
        Value::map([("k", 1)]),
        Value::object(&shape_class()),
        Value::Class(shape_class()),
        Value::function("math", "add"),
    ];
    for sample in &samples {
        ensure(matches(sample, &sig!(any)), format!("any should match {sample}"))?;
    }
    Ok(())
}

#[test]
fn test_bool_is_an_int() -> TestResult {
    ensure(matches(&Value::from(true), &sig!(int)), "bool is a subtype of int")?;
    ensure(!matches(&Value::from(1), &sig!(bool)), "int is not a bool")?;
    Ok(())
}

#[test]
fn test_null_only_matches_null_type() -> TestResult {
    ensure(matches(&Value::Null, &sig!(null)), "null matches null")?;
    ensure(!matches(&Value::Null, &sig!(int)), "null does not match int")?;
    ensure(!matches(&Value::from(0), &sig!(null)), "0 does not match null")?;
    Ok(())
}

#[test]
fn test_container_primitives_match_any_contents() -> TestResult {
    ensure(matches(&Value::list([1, 2]), &sig!(list)), "list primitive")?;
    ensure(matches(&Value::tuple(["a"]), &sig!(tuple)), "tuple primitive")?;
    ensure(matches(&Value::map([(1, "x")]), &sig!(map)), "map primitive")?;
    ensure(matches(&Value::set([1]), &sig!(set)), "set primitive")?;
    ensure(!matches(&Value::tuple([1]), &sig!(list)), "tuple is not a list")?;
    Ok(())
}

// ============================================================================
// SECTION: Classes
// ============================================================================

#[test]
fn test_instances_match_their_class_and_bases() -> TestResult {
    let circle = Value::object(&circle_class());
    ensure(matches(&circle, &TypeDescriptor::class(&circle_class())), "own class")?;
    ensure(matches(&circle, &TypeDescriptor::class(&shape_class())), "base class")?;

    let shape = Value::object(&shape_class());
    ensure(!matches(&shape, &TypeDescriptor::class(&circle_class())), "base is not subclass")?;
    ensure(!matches(&Value::from(1), &TypeDescriptor::class(&shape_class())), "int not shape")?;
    Ok(())
}

#[test]
fn test_class_identity_is_structural() -> TestResult {
    let rebuilt = ClassDef::new("geometry", "Shape").build();
    let instance = Value::Object(Instance::new(&rebuilt).with_attribute("sides", 0));
    ensure(
        matches(&instance, &TypeDescriptor::class(&shape_class())),
        "separately built class with same identity should match",
    )?;
    let other_module = ClassDef::new("drawing", "Shape").build();
    ensure(
        !matches(&Value::object(&other_module), &TypeDescriptor::class(&shape_class())),
        "same name in another module is a different class",
    )?;
    Ok(())
}

#[test]
fn test_class_identity_ignores_bases() -> TestResult {
    fn hash_of(class: &ClassDef) -> u64 {
        let mut hasher = DefaultHasher::new();
        class.hash(&mut hasher);
        hasher.finish()
    }

    let plain = ClassDef::new("geometry", "Shape").build();
    let derived =
        ClassDef::new("geometry", "Shape").with_base(&bag_class()).with_iteration().build();
    ensure(plain == derived, "module and name decide identity")?;
    ensure(hash_of(&plain) == hash_of(&derived), "hash agrees with equality")?;
    ensure(plain != ClassDef::new("geometry", "Circle").build(), "different name")?;
    ensure(
        PrimitiveType::Class(plain) == PrimitiveType::Class(derived),
        "class primitives follow class identity",
    )?;
    Ok(())
}

#[test]
fn test_class_objects_match_type() -> TestResult {
    ensure(matches(&Value::Class(shape_class()), &sig!(type)), "class object is a type")?;
    ensure(!matches(&Value::object(&shape_class()), &sig!(type)), "instance is not a type")?;
    Ok(())
}

#[test]
fn test_function_references_match_callable() -> TestResult {
    let desc = sig!({str: callable});
    let value = Value::map([("add", Value::function("math", "add"))]);
    ensure(matches(&value, &desc), "map of callables")?;
    ensure(!matches(&Value::map([("add", 1)]), &desc), "int is not callable")?;
    Ok(())
}

// ============================================================================
// SECTION: Lists, Sets, Maps
// ============================================================================

#[test]
fn test_list_of_checks_every_element() -> TestResult {
    let desc = sig!([int]);
    ensure(matches(&Value::list(Vec::<i64>::new()), &desc), "empty list matches")?;
    ensure(matches(&Value::list([1, 2, 3]), &desc), "all ints")?;
    ensure(!matches(&Value::list(["a"]), &desc), "str element")?;
    ensure(
        !matches(&Value::list([Value::from(1), Value::from(2), Value::from("a")]), &desc),
        "one bad element fails the list",
    )?;
    ensure(!matches(&Value::from(1), &desc), "scalar is not a list")?;
    ensure(!matches(&Value::set([1]), &desc), "set is not a list")?;
    Ok(())
}

#[test]
fn test_set_of_checks_every_element() -> TestResult {
    let desc = sig!({int});
    ensure(matches(&Value::set(Vec::<i64>::new()), &desc), "empty set matches")?;
    ensure(matches(&Value::set([1, 2, 3]), &desc), "all ints")?;
    ensure(
        !matches(&Value::set([Value::from(1), Value::from(2), Value::from("a")]), &desc),
        "mixed set",
    )?;
    ensure(!matches(&Value::map(Vec::<(i64, i64)>::new()), &desc), "empty map is not a set")?;
    Ok(())
}

#[test]
fn test_map_of_checks_keys_and_values() -> TestResult {
    let desc = sig!({str: int});
    ensure(matches(&Value::map(Vec::<(String, i64)>::new()), &desc), "empty map matches")?;
    ensure(matches(&Value::map([("a", 1), ("b", 2)]), &desc), "str -> int")?;
    ensure(!matches(&Value::map([("a", "b")]), &desc), "bad value")?;
    ensure(!matches(&Value::map([(1, 1)]), &desc), "bad key")?;
    ensure(!matches(&Value::set(Vec::<i64>::new()), &desc), "set is not a map")?;
    Ok(())
}

#[test]
fn test_nested_descriptor() -> TestResult {
    let item = TypeDescriptor::class(&shape_class());
    let desc = sig!({str: (int, [item])});
    let good = Value::map([(
        "shapes",
        Value::tuple([Value::from(2), Value::list([Value::object(&circle_class())])]),
    )]);
    ensure(matches(&good, &desc), "nested structure conforms")?;
    let bad = Value::map([("shapes", Value::tuple([Value::from(2), Value::list([1])]))]);
    ensure(!matches(&bad, &desc), "int inside the inner list fails")?;
    Ok(())
}

// ============================================================================
// SECTION: Tuples
// ============================================================================

#[test]
fn test_tuple_matches_positionally() -> TestResult {
    let desc = sig!((int, bool));
    ensure(matches(&Value::tuple([Value::from(1), Value::from(true)]), &desc), "(1, true)")?;
    ensure(matches(&Value::tuple([Value::from(0), Value::from(false)]), &desc), "(0, false)")?;
    ensure(
        !matches(&Value::tuple([Value::from(true), Value::from(1)]), &desc),
        "swapped positions fail",
    )?;
    ensure(!matches(&Value::list([Value::from(1), Value::from(true)]), &desc), "list != tuple")?;
    Ok(())
}

#[test]
fn test_tuple_arity_must_agree() -> TestResult {
    let desc = sig!((int, bool));
    ensure(!matches(&Value::tuple(Vec::<i64>::new()), &desc), "empty tuple")?;
    ensure(!matches(&Value::tuple([1]), &desc), "too short")?;
    ensure(
        !matches(&Value::tuple([Value::from(1), Value::from(true), Value::Null]), &desc),
        "too long",
    )?;
    Ok(())
}

// ============================================================================
// SECTION: Iterables
// ============================================================================

#[test]
fn test_iterable_matches_by_capability() -> TestResult {
    let desc = sig!(iter);
    ensure(matches(&Value::iterator((0 .. 3).map(Value::from)), &desc), "lazy iterator")?;
    ensure(matches(&Value::list(Vec::<i64>::new()), &desc), "empty list")?;
    ensure(matches(&Value::tuple([1]), &desc), "tuple")?;
    ensure(matches(&Value::map([(1, 2)]), &desc), "map")?;
    ensure(matches(&Value::set([1]), &desc), "set")?;
    ensure(matches(&Value::from("abc"), &desc), "string")?;
    ensure(matches(&Value::object(&bag_class()), &desc), "iterable class instance")?;
    ensure(!matches(&Value::from(1), &desc), "int is not iterable")?;
    ensure(!matches(&Value::Null, &desc), "null is not iterable")?;
    ensure(!matches(&Value::object(&shape_class()), &desc), "plain instance")?;
    Ok(())
}

#[test]
fn test_iterable_capability_is_inherited() -> TestResult {
    let sack = ClassDef::new("containers", "Sack").with_base(&bag_class()).build();
    ensure(matches(&Value::object(&sack), &sig!(iter)), "subclass of iterable class")?;
    Ok(())
}

#[test]
fn test_matching_never_advances_iterators() -> TestResult {
    let value = Value::iterator(vec![Value::from(1), Value::from(2)]);
    ensure(matches(&value, &sig!(iter)), "iterator matches")?;
    ensure(matches(&value, &sig!(iterator)), "iterator primitive matches")?;
    let Value::Iterator(handle) = value else {
        return Err("expected iterator".into());
    };
    ensure(handle.drain() == vec![Value::from(1), Value::from(2)], "items still available")?;
    Ok(())
}

#[test]
fn test_set_of_iterables() -> TestResult {
    let desc = sig!({iter});
    ensure(matches(&Value::set([Value::from("ab"), Value::tuple([1])]), &desc), "iterables")?;
    ensure(!matches(&Value::set([1]), &desc), "int element")?;
    Ok(())
}

// ============================================================================
// SECTION: Unions and Nullables
// ============================================================================

#[test]
fn test_union_matches_any_member() -> TestResult {
    let desc = sig!(int | str);
    ensure(matches(&Value::from(42), &desc), "int member")?;
    ensure(matches(&Value::from("hello"), &desc), "str member")?;
    ensure(!matches(&Value::from(2.5), &desc), "float is neither")?;
    ensure(!matches(&Value::Null, &desc), "null is neither")?;
    Ok(())
}

#[test]
fn test_nullable_accepts_null() -> TestResult {
    let desc = TypeDescriptor::nullable(sig!(int));
    ensure(matches(&Value::from(0), &desc), "int")?;
    ensure(matches(&Value::Null, &desc), "null")?;
    ensure(!matches(&Value::from("a"), &desc), "str")?;
    ensure(desc.accepts_null(), "accepts_null helper")?;
    ensure(!sig!(int).accepts_null(), "plain int rejects null")?;
    Ok(())
}

#[test]
fn test_union_of_containers() -> TestResult {
    let desc = sig!([int] | {str: int});
    ensure(matches(&Value::list([1]), &desc), "list branch")?;
    ensure(matches(&Value::map([("a", 1)]), &desc), "map branch")?;
    ensure(!matches(&Value::list(["a"]), &desc), "neither branch")?;
    Ok(())
}

// ============================================================================
// SECTION: Test Doubles
// ============================================================================

#[test]
fn test_doubles_match_everything() -> TestResult {
    let double = Value::double("db");
    let descriptors = [
        sig!(int),
        sig!(null),
        sig!([str]),
        sig!((int, int)),
        sig!({str: int}),
        TypeDescriptor::class(&shape_class()),
    ];
    for desc in &descriptors {
        ensure(matches(&double, desc), format!("double should match {desc}"))?;
    }
    ensure(matches(&Value::list([Value::from(1), Value::double("x")]), &sig!([int])), "nested")?;
    ensure(double.runtime_type() == PrimitiveType::Any, "double reports any")?;
    Ok(())
}

// ============================================================================
// SECTION: Values
// ============================================================================

#[test]
fn test_value_constructors_dedupe() -> TestResult {
    let map = Value::map([("a", 1), ("a", 2)]);
    ensure(map == Value::Map(vec![(Value::from("a"), Value::from(2))]), "last key wins")?;
    let set = Value::set([1, 1, 2]);
    ensure(set == Value::Set(vec![Value::from(1), Value::from(2)]), "duplicates dropped")?;
    Ok(())
}

#[test]
fn test_constructors_normalize_raw_entries() -> TestResult {
    let raw = Value::Set(vec![Value::from(1), Value::from(1)]);
    let Value::Set(elements) = &raw else {
        return Err("expected a set".into());
    };
    ensure(elements.len() == 2, "raw variant keeps elements as given")?;
    ensure(Value::set(elements.clone()) == Value::set([1]), "constructor drops duplicates")?;

    let pairs = vec![(Value::from("k"), Value::from(1)), (Value::from("k"), Value::from(2))];
    let Value::Map(entries) = Value::map(pairs) else {
        return Err("expected a map".into());
    };
    ensure(entries.len() == 1, "constructor keeps keys unique")?;
    Ok(())
}

#[test]
fn test_values_from_json() -> TestResult {
    let value = Value::from(serde_json::json!({"ids": [1, 2], "ratio": 0.5, "name": null}));
    ensure(matches(&value, &sig!({str: any})), "object becomes str-keyed map")?;
    let Value::Map(entries) = &value else {
        return Err("expected map".into());
    };
    ensure(entries.len() == 3, "three entries")?;
    ensure(
        entries.iter().any(|(_, item)| matches(item, &sig!([int])) && item.as_sequence().is_some()),
        "array becomes list of int",
    )?;
    ensure(entries.iter().any(|(_, item)| item.as_float() == Some(0.5)), "float kept")?;
    Ok(())
}

#[test]
fn test_value_display() -> TestResult {
    ensure(Value::from("a\"b").to_string() == "\"a\\\"b\"", "strings are quoted")?;
    ensure(Value::from(3.0).to_string() == "3.0", "integral floats keep a decimal")?;
    ensure(Value::tuple([1]).to_string() == "(1,)", "single tuple")?;
    ensure(Value::map([("a", 1)]).to_string() == "{\"a\": 1}", "map")?;
    ensure(Value::set(Vec::<i64>::new()).to_string() == "set()", "empty set")?;
    ensure(Value::Null.to_string() == "null", "null")?;
    Ok(())
}

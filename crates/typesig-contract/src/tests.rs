// crates/typesig-contract/src/tests.rs
// ============================================================================
// Module: Typesig Contract Unit Tests
// Description: Shared test-only lint relaxations and binder coverage.
// Purpose: Allow panic-based assertions and pin argument binding rules.
// Dependencies: typesig-contract, typesig
// ============================================================================

//! ## Overview
//! Unit coverage for lenient and strict argument binding and for policy
//! reporting against explicit snapshots (no process-wide state).

// ============================================================================
// SECTION: Lint Configuration
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

use typesig::Value;

use crate::binder::ArgumentSource;
use crate::binder::BindError;
use crate::binder::BoundArguments;
use crate::binder::bind;
use crate::error::ViolationCategory;
use crate::function::CallArgs;
use crate::function::FunctionSignature;
use crate::function::Parameter;
use crate::function::SiteInfo;
use crate::policy::ErrorKind;
use crate::policy::TypecheckPolicy;

/// `foo(a, b=None, *args, **kwargs)`
fn variadic_signature() -> FunctionSignature {
    FunctionSignature::new("tests", "foo")
        .param("a")
        .with_param(Parameter::new("b").with_default(Value::Null))
        .variadic("args")
        .variadic_keywords("kwargs")
}

// ============================================================================
// SECTION: Lenient Binding
// ============================================================================

#[test]
fn bind_pairs_positionals_in_order() {
    let signature = FunctionSignature::new("tests", "add").param("a").param("b");
    let args = CallArgs::new().arg(1).arg("x");
    let binding = bind(&signature, &args);
    assert_eq!(binding.named.len(), 2);
    assert_eq!(binding.named[0].name, "a");
    assert_eq!(binding.named[1].name, "b");
    assert_eq!(binding.named[1].value, &Value::from("x"));
    assert_eq!(binding.named[1].source, ArgumentSource::Positional);
    assert!(binding.extra_positional.is_empty());
}

#[test]
fn bind_routes_surplus_to_collectors() {
    let signature = variadic_signature();
    let args = CallArgs::new().args([0, 1, 2, 3]).kwarg("c", "a");
    let binding = bind(&signature, &args);
    assert_eq!(binding.named.len(), 2);
    assert_eq!(binding.extra_positional, vec![&Value::from(2), &Value::from(3)]);
    assert_eq!(binding.extra_keyword, vec![("c", &Value::from("a"))]);
    assert!(binding.unknown_keywords.is_empty());
}

#[test]
fn bind_flags_unknown_keywords_without_collector() {
    let signature = FunctionSignature::new("tests", "add").param("a").param("b");
    let args = CallArgs::new().kwarg("b", 2).kwarg("c", 3);
    let binding = bind(&signature, &args);
    assert_eq!(binding.named.len(), 1);
    assert_eq!(binding.named[0].source, ArgumentSource::Keyword);
    assert_eq!(binding.unknown_keywords, vec![("c", &Value::from(3))]);
}

// ============================================================================
// SECTION: Strict Binding
// ============================================================================

#[test]
fn resolve_fills_defaults() {
    let bound = BoundArguments::resolve(&variadic_signature(), CallArgs::new().arg(0)).unwrap();
    assert_eq!(bound.get("a"), Some(&Value::from(0)));
    assert_eq!(bound.get("b"), Some(&Value::Null));
    assert!(bound.variadic().is_empty());
}

#[test]
fn resolve_keeps_collector_contents() {
    let args = CallArgs::new().args([0, 1, 2]).kwarg("c", "a");
    let bound = BoundArguments::resolve(&variadic_signature(), args).unwrap();
    assert_eq!(bound.variadic(), &[Value::from(2)]);
    assert_eq!(bound.keywords(), &[("c".to_string(), Value::from("a"))]);
}

#[test]
fn resolve_rejects_missing_argument() {
    let signature = FunctionSignature::new("tests", "add").param("a").param("b");
    let err = BoundArguments::resolve(&signature, CallArgs::new().arg(1)).unwrap_err();
    assert_eq!(
        err,
        BindError::Missing {
            function: "add".to_string(),
            parameter: "b".to_string(),
        }
    );
    assert_eq!(err.to_string(), "add() missing required argument 'b'");
}

#[test]
fn resolve_rejects_surplus_and_duplicates() {
    let signature = FunctionSignature::new("tests", "add").param("a").param("b");
    let surplus = BoundArguments::resolve(&signature, CallArgs::positional([1, 2, 3]));
    assert!(matches!(surplus, Err(BindError::Surplus { expected: 2, found: 3, .. })));

    let duplicate = BoundArguments::resolve(&signature, CallArgs::new().arg(1).kwarg("a", 2));
    assert!(matches!(duplicate, Err(BindError::Duplicate { .. })));

    let unexpected = BoundArguments::resolve(&signature, CallArgs::new().kwarg("z", 1));
    assert!(matches!(unexpected, Err(BindError::UnexpectedKeyword { .. })));
}

// ============================================================================
// SECTION: Policy Snapshots
// ============================================================================

#[test]
fn report_respects_snapshot() {
    let site = SiteInfo::new("lib.rs", 7, Some("foo".to_string()));
    let raising = TypecheckPolicy::default();
    let err = raising
        .report(ViolationCategory::Argument, "foo", "bad".to_string(), &site)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);
    assert_eq!(err.to_string(), "bad");
    assert_eq!(err.site, site);

    let silent = TypecheckPolicy {
        exception: None,
        ..TypecheckPolicy::default()
    };
    assert!(silent.report(ViolationCategory::Return, "foo", "bad".to_string(), &site).is_ok());

    let disabled = TypecheckPolicy::disabled();
    assert!(disabled.report(ViolationCategory::Return, "foo", "bad".to_string(), &site).is_ok());
}

#[test]
fn site_display_includes_function_when_known() {
    let site = SiteInfo::new("src/math.rs", 12, None);
    assert_eq!(site.to_string(), "src/math.rs:12");
    assert_eq!(site.in_function("add").to_string(), "src/math.rs:12 in add");
}

#[test]
fn call_args_capture_call_site() {
    let args = CallArgs::new();
    let site = args.call_site.unwrap();
    assert!(site.file.ends_with("tests.rs"));
    assert_eq!(site.line, line!() - 3);
}

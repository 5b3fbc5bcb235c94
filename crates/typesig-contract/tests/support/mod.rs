// crates/typesig-contract/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared result helpers, sample functions, and log capture.
// ============================================================================
//! ## Overview
//! Shared test helpers for consistent Result-based assertions, a handful of
//! sample callables, a guard that restores the default policy, and a
//! `tracing` writer that records emitted events.

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
    dead_code,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::error::Error;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use tracing_subscriber::fmt::MakeWriter;
use typesig::Value;
use typesig_contract::Callable;
use typesig_contract::FunctionSignature;
use typesig_contract::NativeFunction;
use typesig_contract::Parameter;
use typesig_contract::reset_policy;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across contract integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
pub struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl TestError {
    /// Creates a new test error with the provided message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition { Ok(()) } else { Err(Box::new(TestError::new(message))) }
}

// ========================================================================
// Policy Guard
// ========================================================================

/// Restores the default policy when created and when dropped.
pub struct PolicyGuard;

impl PolicyGuard {
    /// Resets the policy and returns a guard that resets it again on drop.
    pub fn new() -> Self {
        reset_policy();
        Self
    }
}

impl Drop for PolicyGuard {
    fn drop(&mut self) {
        reset_policy();
    }
}

// ========================================================================
// Environment
// ========================================================================

/// Sets an environment variable for the current process.
#[allow(unsafe_code, reason = "Test harness mutates process env for configuration.")]
pub fn set_env(key: &str, value: &str) {
    // SAFETY: callers are serialized and no other thread reads the env meanwhile.
    unsafe {
        std::env::set_var(key, value);
    }
}

/// Removes an environment variable from the current process.
#[allow(unsafe_code, reason = "Test harness mutates process env for configuration.")]
pub fn remove_env(key: &str) {
    // SAFETY: callers are serialized and no other thread reads the env meanwhile.
    unsafe {
        std::env::remove_var(key);
    }
}

// ========================================================================
// Sample Functions
// ========================================================================

/// Reads an integer argument, treating booleans as 0/1.
fn int_arg(value: &Value) -> i64 {
    match value {
        Value::Bool(flag) => i64::from(*flag),
        other => other.as_int().unwrap_or_default(),
    }
}

/// `math::add(a, b)` returning `a + b`.
pub fn add() -> Arc<dyn Callable> {
    NativeFunction::new(FunctionSignature::new("math", "add").param("a").param("b"), |args| {
        Ok(Value::from(int_arg(args.value("a")?) + int_arg(args.value("b")?)))
    })
    .into_callable()
}

/// `samples::identity(x)` returning its argument.
pub fn identity() -> Arc<dyn Callable> {
    NativeFunction::new(FunctionSignature::new("samples", "identity").param("x"), |args| {
        Ok(args.value("x")?.clone())
    })
    .into_callable()
}

/// `samples::foo(a, b=None, *args, **kwargs)` returning null.
pub fn variadic() -> Arc<dyn Callable> {
    let signature = FunctionSignature::new("samples", "foo")
        .param("a")
        .with_param(Parameter::new("b").with_default(Value::Null))
        .variadic("args")
        .variadic_keywords("kwargs");
    NativeFunction::new(signature, |_| Ok(Value::Null)).into_callable()
}

/// `samples::explode(x)` that always fails with its own error.
pub fn explode() -> Arc<dyn Callable> {
    NativeFunction::new(FunctionSignature::new("samples", "explode").param("x"), |_| {
        Err(Box::new(TestError::new("boom")))
    })
    .into_callable()
}

// ========================================================================
// Log Capture
// ========================================================================

/// In-memory `tracing` writer.
#[derive(Clone, Default)]
pub struct LogCapture {
    /// Bytes written by the formatter.
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Creates an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with a subscriber writing into this capture.
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    /// Returns everything captured so far.
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

pub mod content;

// Fixture-backed source only available with e2e-testing feature or debug builds
#[cfg(any(feature = "e2e-testing", debug_assertions))]
pub mod content_mock;

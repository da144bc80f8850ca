pub mod catalog;
pub mod discovery;
pub mod link_validator;
pub mod reconcile;
pub mod scout;
pub mod stats;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod verifier;

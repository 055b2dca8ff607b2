//! Common test utilities for authn-chain
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::fixtures;
//!
//! let service = fixtures::service(fixtures::form_chain());
//! ```

pub mod fixtures;

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}

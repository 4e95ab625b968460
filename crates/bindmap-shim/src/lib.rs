//! Marshaling shim contract
//!
//! Generated wrapper types sit on top of native objects. This crate holds
//! the runtime pieces they share: status code checking, class and
//! interface identifiers, activation and the [`Shim`] trait.
//!
//! ```
//! use bindmap_shim::{check_result, HResult};
//!
//! assert!(check_result(HResult::S_OK, "Present").is_ok());
//! let err = check_result(HResult::E_FAIL, "Present").unwrap_err();
//! assert_eq!(err.code, HResult::E_FAIL);
//! ```

pub mod activation;
pub mod error;

pub use activation::{
    activation_failed, Activator, ClassId, InterfaceId, NativeHandle, ParseClassIdError, Shim,
};
pub use error::{check_result, HResult, NativeCallError, Result};

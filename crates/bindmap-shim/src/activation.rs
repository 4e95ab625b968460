//! Object activation and the contract every generated wrapper implements

use crate::error::{check_result, HResult, NativeCallError, Result};
use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;
use std::str::FromStr;
use thiserror::Error;

/// A class or interface identifier (GUID)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u128);

/// Interfaces are identified the same way classes are
pub type InterfaceId = ClassId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid class id '{0}'")]
pub struct ParseClassIdError(String);

impl ClassId {
    pub const fn from_u128(value: u128) -> Self {
        Self(value)
    }

    pub const fn as_u128(self) -> u128 {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        write!(
            f,
            "{{{:08X}-{:04X}-{:04X}-{:04X}-{:012X}}}",
            (v >> 96) as u32,
            (v >> 80) as u16,
            (v >> 64) as u16,
            (v >> 48) as u16,
            v & 0xFFFF_FFFF_FFFF
        )
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({self})")
    }
}

/// Parses `{xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx}`; braces are optional
impl FromStr for ClassId {
    type Err = ParseClassIdError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || ParseClassIdError(s.to_string());
        let inner = s.trim();
        let inner = inner
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .unwrap_or(inner);

        let groups: Vec<&str> = inner.split('-').collect();
        let expected = [8, 4, 4, 4, 12];
        if groups.len() != expected.len()
            || groups.iter().zip(expected).any(|(g, len)| g.len() != len)
            || !groups.iter().all(|g| g.bytes().all(|b| b.is_ascii_hexdigit()))
        {
            return Err(err());
        }

        let mut value: u128 = 0;
        for group in groups {
            let part = u64::from_str_radix(group, 16).map_err(|_| err())?;
            value = (value << (group.len() * 4)) | u128::from(part);
        }
        Ok(Self(value))
    }
}

/// Opaque, non-null pointer to a native object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(NonNull<c_void>);

impl NativeHandle {
    /// Wrap a raw pointer. Returns `None` for null.
    pub fn new(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// Creates native objects by class and interface id
pub trait Activator {
    fn activate(&self, class_id: &ClassId, interface_id: &InterfaceId) -> Result<NativeHandle>;
}

/// Contract implemented by every generated wrapper type
///
/// A wrapper owns a handle to a native object of `CLASS_ID` viewed through
/// `INTERFACE_ID`. Construction activates the object and fails with the
/// activation status code instead of producing a wrapper around null.
pub trait Shim: Sized {
    const CLASS_ID: ClassId;
    const INTERFACE_ID: InterfaceId;

    /// Wrap an already activated object
    fn from_handle(handle: NativeHandle) -> Self;

    fn handle(&self) -> NativeHandle;

    fn create<A: Activator + ?Sized>(activator: &A) -> Result<Self> {
        let handle = activator.activate(&Self::CLASS_ID, &Self::INTERFACE_ID)?;
        tracing::trace!(class_id = %Self::CLASS_ID, "activated native object");
        Ok(Self::from_handle(handle))
    }

    /// Invoke a native method on this object and check its status code
    fn call<F>(&self, context: &str, f: F) -> Result<()>
    where
        F: FnOnce(NativeHandle) -> HResult,
    {
        check_result(f(self.handle()), context)
    }
}

/// Activation failure with no object produced
pub fn activation_failed(code: HResult, class_id: &ClassId) -> NativeCallError {
    NativeCallError {
        code,
        context: format!("activate {class_id}"),
    }
}

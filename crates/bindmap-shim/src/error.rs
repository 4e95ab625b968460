//! Native status codes and the error raised when a native call fails.

use std::fmt;
use thiserror::Error;

/// Result type for native calls
pub type Result<T> = std::result::Result<T, NativeCallError>;

/// A native status code (`HRESULT`). Negative values are failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HResult(pub i32);

impl HResult {
    pub const S_OK: HResult = HResult(0);
    pub const S_FALSE: HResult = HResult(1);
    pub const E_NOTIMPL: HResult = HResult(0x8000_4001_u32 as i32);
    pub const E_NOINTERFACE: HResult = HResult(0x8000_4002_u32 as i32);
    pub const E_POINTER: HResult = HResult(0x8000_4003_u32 as i32);
    pub const E_FAIL: HResult = HResult(0x8000_4005_u32 as i32);
    pub const E_OUTOFMEMORY: HResult = HResult(0x8007_000E_u32 as i32);
    pub const E_INVALIDARG: HResult = HResult(0x8007_0057_u32 as i32);
    pub const REGDB_E_CLASSNOTREG: HResult = HResult(0x8004_0154_u32 as i32);

    pub fn is_success(self) -> bool {
        self.0 >= 0
    }

    pub fn is_failure(self) -> bool {
        self.0 < 0
    }

    /// Symbolic name for well-known codes
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::S_OK => "S_OK",
            Self::S_FALSE => "S_FALSE",
            Self::E_NOTIMPL => "E_NOTIMPL",
            Self::E_NOINTERFACE => "E_NOINTERFACE",
            Self::E_POINTER => "E_POINTER",
            Self::E_FAIL => "E_FAIL",
            Self::E_OUTOFMEMORY => "E_OUTOFMEMORY",
            Self::E_INVALIDARG => "E_INVALIDARG",
            Self::REGDB_E_CLASSNOTREG => "REGDB_E_CLASSNOTREG",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for HResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0 as u32)?;
        if let Some(name) = self.name() {
            write!(f, " ({name})")?;
        }
        Ok(())
    }
}

impl From<i32> for HResult {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

/// A native activation or API call returned a failure status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Native call {context} failed with {code}")]
pub struct NativeCallError {
    /// Status code returned by the native side
    pub code: HResult,
    /// What was being called
    pub context: String,
}

/// Convert a native status code into a typed outcome
///
/// Success codes (including `S_FALSE`) are `Ok`; failures carry the code.
pub fn check_result(code: HResult, context: &str) -> Result<()> {
    if code.is_success() {
        Ok(())
    } else {
        tracing::debug!(%code, context, "native call failed");
        Err(NativeCallError {
            code,
            context: context.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_codes() {
        assert!(check_result(HResult::S_OK, "Present").is_ok());
        assert!(check_result(HResult::S_FALSE, "Present").is_ok());
    }

    #[test]
    fn test_failure_carries_code() {
        let err = check_result(HResult::E_INVALIDARG, "CreateBuffer").unwrap_err();
        assert_eq!(err.code, HResult::E_INVALIDARG);
        assert_eq!(err.context, "CreateBuffer");
        assert_eq!(
            err.to_string(),
            "Native call CreateBuffer failed with 0x80070057 (E_INVALIDARG)"
        );
    }

    #[test]
    fn test_unknown_code_display() {
        assert_eq!(HResult(0x887A_0005_u32 as i32).to_string(), "0x887A0005");
        assert!(HResult(-1).is_failure());
    }
}

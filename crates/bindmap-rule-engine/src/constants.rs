//! Limits applied when compiling patterns and loading mapping files
//!
//! Mapping files come from project directories, so patterns and file sizes
//! are bounded the same way regardless of where a file was found.

/// Maximum size for TOML mapping files (1MB)
///
/// The largest real mapping scripts are a few hundred rules; anything past
/// this is almost certainly not a mapping file.
pub const MAX_TOML_FILE_SIZE: u64 = 1_048_576; // 1MB

/// Maximum regex pattern length (500 characters)
pub const MAX_REGEX_LENGTH: usize = 500;

/// Compiled regex size limit (10MB)
///
/// Applied during regex compilation via RegexBuilder.
pub const REGEX_SIZE_LIMIT: usize = 10_000_000; // 10MB

/// Regex DFA size limit (2MB)
pub const REGEX_DFA_SIZE_LIMIT: usize = 2_000_000; // 2MB

/// Maximum directory traversal depth when loading mapping directories
pub const MAX_DIRECTORY_DEPTH: usize = 10;

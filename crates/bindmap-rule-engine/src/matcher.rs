//! Compiled name patterns
//!
//! Patterns are compiled once when a rule is registered, so applying a rule
//! can never fail.

use crate::constants::{MAX_REGEX_LENGTH, REGEX_DFA_SIZE_LIMIT, REGEX_SIZE_LIMIT};
use crate::{Result, RuleError};
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use std::fmt;

/// Options shared by every pattern compiled in a mapping run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Compile patterns with the `i` flag
    pub case_insensitive: bool,
}

/// Compile a regex with size limits
///
/// Rejects patterns longer than [`MAX_REGEX_LENGTH`] and bounds the compiled
/// program and DFA sizes.
fn compile_regex_safe(pattern: &str, options: MatchOptions) -> Result<Regex> {
    if pattern.len() > MAX_REGEX_LENGTH {
        return Err(RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: format!(
                "Pattern exceeds maximum length of {} characters",
                MAX_REGEX_LENGTH
            ),
        });
    }

    RegexBuilder::new(pattern)
        .case_insensitive(options.case_insensitive)
        .size_limit(REGEX_SIZE_LIMIT)
        .dfa_size_limit(REGEX_DFA_SIZE_LIMIT)
        .build()
        .map_err(|e| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

/// A compiled regular expression over element names
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(pattern: &str, options: MatchOptions) -> Result<Self> {
        Ok(Self {
            regex: compile_regex_safe(pattern, options)?,
        })
    }

    /// Source text of the pattern
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Replace every match in `name` using a template from
    /// [`expand_template`]
    pub fn replace<'a>(&self, name: &'a str, template: &str) -> Cow<'a, str> {
        self.regex.replace_all(name, template)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rewrite numbered group references so they cannot swallow the text after
/// them.
///
/// `$1ControlPoints` would otherwise be read as a group named
/// `1ControlPoints`; it becomes `${1}ControlPoints`. `$$` and `${name}` are
/// left alone.
pub fn expand_template(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len() + 4);
    let mut chars = replacement.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        match chars.peek() {
            Some((_, '$')) => {
                out.push_str("$$");
                chars.next();
            }
            Some((_, d)) if d.is_ascii_digit() => {
                let start = i + 1;
                let mut end = start;
                while let Some((j, d)) = chars.peek().copied() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    end = j + d.len_utf8();
                    chars.next();
                }
                out.push_str("${");
                out.push_str(&replacement[start..end]);
                out.push('}');
            }
            _ => out.push('$'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_substitution() {
        let pattern = Pattern::new("^D3D(.*)", MatchOptions::default()).unwrap();
        let template = expand_template("$1");
        assert_eq!(pattern.replace("D3D_DRIVER_TYPE", &template), "_DRIVER_TYPE");
    }

    #[test]
    fn test_group_followed_by_text() {
        let pattern = Pattern::new(
            r"^D3D_PRIMITIVE_TOPOLOGY_(\d+)_CONTROL_POINT_PATCHLIST",
            MatchOptions::default(),
        )
        .unwrap();
        let template = expand_template("PatchListWith$1ControlPoints");
        assert_eq!(template, "PatchListWith${1}ControlPoints");
        assert_eq!(
            pattern.replace("D3D_PRIMITIVE_TOPOLOGY_32_CONTROL_POINT_PATCHLIST", &template),
            "PatchListWith32ControlPoints"
        );
    }

    #[test]
    fn test_template_escapes_untouched() {
        assert_eq!(expand_template("$$1"), "$$1");
        assert_eq!(expand_template("${name}x"), "${name}x");
        assert_eq!(expand_template("Level_$1"), "Level_${1}");
        assert_eq!(expand_template("$12"), "${12}");
        assert_eq!(expand_template("cost$"), "cost$");
    }

    #[test]
    fn test_case_insensitive_option() {
        let sensitive = Pattern::new("^d3d_name$", MatchOptions::default()).unwrap();
        assert!(!sensitive.is_match("D3D_NAME"));

        let insensitive = Pattern::new(
            "^d3d_name$",
            MatchOptions {
                case_insensitive: true,
            },
        )
        .unwrap();
        assert!(insensitive.is_match("D3D_NAME"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = Pattern::new("^D3D(", MatchOptions::default()).unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { ref pattern, .. } if pattern == "^D3D("));
    }

    #[test]
    fn test_overlong_pattern_rejected() {
        let long = "a".repeat(MAX_REGEX_LENGTH + 1);
        assert!(Pattern::new(&long, MatchOptions::default()).is_err());
    }
}

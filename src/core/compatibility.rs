// src/core/compatibility.rs

//! Which ink! versions each `cargo-contract` release can build, and the version
//! arithmetic used to compare declared dependencies against it.

use crate::errors::SwankyError;
use semver::{BuildMetadata, Version, VersionReq};

/// One row of the compatibility table: from `min_compiler_version` on, `cargo-contract`
/// builds ink! versions matching `valid_ink_range`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompatibilityEntry {
    pub min_compiler_version: &'static str,
    pub valid_ink_range: &'static str,
}

/// Ordered oldest to newest; `min_compiler_version`s are strictly increasing.
pub const CARGO_CONTRACT_INK_DEPS: &[CompatibilityEntry] = &[
    CompatibilityEntry {
        min_compiler_version: "2.0.0",
        valid_ink_range: "<4.0.1",
    },
    CompatibilityEntry {
        min_compiler_version: "2.0.2",
        valid_ink_range: "<4.2.0",
    },
    CompatibilityEntry {
        min_compiler_version: "2.2.0",
        valid_ink_range: "<5.0.0",
    },
    // No upper bound is known yet for 4.x; a very high major stands in for it.
    CompatibilityEntry {
        min_compiler_version: "4.0.0",
        valid_ink_range: "<99.0.0",
    },
];

/// Picks the newest entry whose minimum is satisfied by the installed compiler.
///
/// Pre-release and build metadata are stripped from `installed` first, so `4.0.0-rc.1`
/// selects the `4.0.0` row. Scanning newest-first means table order breaks any tie.
pub fn select_entry<'a>(
    table: &'a [CompatibilityEntry],
    installed: &str,
) -> Result<Option<&'a CompatibilityEntry>, SwankyError> {
    let installed = release_version(installed)?;

    for entry in table.iter().rev() {
        let minimum = parse_req(&format!(">={}", entry.min_compiler_version))?;
        if minimum.matches(&installed) {
            return Ok(Some(entry));
        }
    }
    Ok(None)
}

/// Checks a declared dependency version against an entry's valid range.
///
/// Returns `None` when the declared version cannot be read as a version at all.
pub fn satisfies_range(declared: &str, range: &str) -> Result<Option<bool>, SwankyError> {
    let req = parse_req(range)?;
    Ok(coerce_version(declared).map(|v| req.matches(&strip_pre(v))))
}

/// True when `declared` resolves to a version strictly higher than `supported_max`.
///
/// Build metadata carries no precedence and is ignored; pre-release is not.
/// Returns `None` if either side cannot be read as a version.
pub fn exceeds(declared: &str, supported_max: &str) -> Option<bool> {
    let declared = strip_build(coerce_version(declared)?);
    let supported = strip_build(coerce_version(supported_max)?);
    Some(declared > supported)
}

/// A dependency specifier is pinned when it names an exact version (`=4.2.0`) or an
/// exact tag (`v4.2.0`). Anything else (`^4.2`, `~4.2.0`, `>=4`, or a bare `4.2.0`,
/// which Cargo treats as a caret range) may later resolve to a higher version.
pub fn is_loose_specifier(declared: &str) -> bool {
    let trimmed = declared.trim_start();
    !(trimmed.starts_with('=') || trimmed.starts_with('v'))
}

/// Reads the version a specifier points at: leading operators and a tag `v` are
/// dropped, and missing components are filled with zero (`^4.3` becomes `4.3.0`).
pub fn coerce_version(spec: &str) -> Option<Version> {
    let trimmed = spec.trim().trim_start_matches(|c: char| {
        matches!(c, '=' | '^' | '~' | '>' | '<' | 'v' | 'V') || c.is_whitespace()
    });

    if let Ok(version) = Version::parse(trimmed) {
        return Some(version);
    }

    let numeric: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let mut parts = numeric.split('.').filter(|p| !p.is_empty());

    let major = parts.next()?.parse().ok()?;
    let minor = match parts.next() {
        Some(p) => p.parse().ok()?,
        None => 0,
    };
    let patch = match parts.next() {
        Some(p) => p.parse().ok()?,
        None => 0,
    };
    Some(Version::new(major, minor, patch))
}

fn release_version(raw: &str) -> Result<Version, SwankyError> {
    coerce_version(raw)
        .map(strip_pre)
        .ok_or_else(|| SwankyError::process(format!("'{}' is not a valid version.", raw)))
}

fn strip_build(version: Version) -> Version {
    Version {
        build: BuildMetadata::EMPTY,
        ..version
    }
}

fn strip_pre(version: Version) -> Version {
    Version::new(version.major, version.minor, version.patch)
}

fn parse_req(range: &str) -> Result<VersionReq, SwankyError> {
    VersionReq::parse(range).map_err(|e| {
        SwankyError::config(format!("'{}' is not a valid version range.", range)).with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_version_forms() {
        assert_eq!(coerce_version("=4.2.0"), Some(Version::new(4, 2, 0)));
        assert_eq!(coerce_version("^4.3"), Some(Version::new(4, 3, 0)));
        assert_eq!(coerce_version("~5"), Some(Version::new(5, 0, 0)));
        assert_eq!(coerce_version("v4.2.1"), Some(Version::new(4, 2, 1)));
        assert_eq!(coerce_version(">= 4.0.0, <5"), Some(Version::new(4, 0, 0)));
        assert_eq!(
            coerce_version("5.0.0-rc.2").unwrap().pre.as_str(),
            "rc.2"
        );
        assert_eq!(coerce_version("*"), None);
        assert_eq!(coerce_version(""), None);
    }

    #[test]
    fn test_exceeds_is_strict() {
        assert_eq!(exceeds("=4.2.0", "4.2.0"), Some(false));
        assert_eq!(exceeds("4.1.9", "4.2.0"), Some(false));
        assert_eq!(exceeds("^4.3.0", "4.2.0"), Some(true));
        assert_eq!(exceeds("4.2.1", "4.2.0"), Some(true));
        // A release candidate sorts below its release.
        assert_eq!(exceeds("4.2.0-rc.1", "4.2.0"), Some(false));
        assert_eq!(exceeds("4.2.0", "4.2.0-rc.1"), Some(true));
        // Build metadata does not order versions.
        assert_eq!(exceeds("4.2.0+abc", "4.2.0"), Some(false));
        assert_eq!(exceeds("=4.2.0", "4.2.0+node.7"), Some(false));
        assert_eq!(exceeds("4.2.1+abc", "4.2.0+zzz"), Some(true));
        assert_eq!(exceeds("*", "4.2.0"), None);
    }

    #[test]
    fn test_loose_specifiers() {
        for pinned in ["=4.2.0", "v4.2.0"] {
            assert!(!is_loose_specifier(pinned), "{}", pinned);
        }
        for loose in ["^4.2.0", "~4.2.0", ">=4.0.0", "<5.0.0", "4.2.0"] {
            assert!(is_loose_specifier(loose), "{}", loose);
        }
    }

    #[test]
    fn test_select_entry_prefers_newest_qualifying() {
        let pick = |v: &str| {
            select_entry(CARGO_CONTRACT_INK_DEPS, v)
                .unwrap()
                .map(|e| e.min_compiler_version)
        };
        assert_eq!(pick("1.0.0"), None);
        assert_eq!(pick("2.0.0"), Some("2.0.0"));
        assert_eq!(pick("2.0.1"), Some("2.0.0"));
        assert_eq!(pick("2.1.0"), Some("2.0.2"));
        assert_eq!(pick("3.2.0"), Some("2.2.0"));
        assert_eq!(pick("4.0.0-rc.1"), Some("4.0.0"));
        assert_eq!(pick("4.1.1"), Some("4.0.0"));
    }

    #[test]
    fn test_select_entry_is_monotonic() {
        let versions = [
            "2.0.0", "2.0.1", "2.0.2", "2.1.5", "2.2.0", "3.0.1", "3.2.0", "4.0.0-rc.3", "4.0.0",
            "4.1.1", "5.0.0",
        ];
        let mut last = Version::new(0, 0, 0);
        for v in versions {
            let entry = select_entry(CARGO_CONTRACT_INK_DEPS, v).unwrap().unwrap();
            let min = Version::parse(entry.min_compiler_version).unwrap();
            assert!(min >= last, "{} selected {} after {}", v, min, last);
            last = min;
        }
    }

    #[test]
    fn test_table_minimums_strictly_increase() {
        let mins: Vec<Version> = CARGO_CONTRACT_INK_DEPS
            .iter()
            .map(|e| Version::parse(e.min_compiler_version).unwrap())
            .collect();
        assert!(mins.windows(2).all(|w| w[0] < w[1]));
        for entry in CARGO_CONTRACT_INK_DEPS {
            assert!(VersionReq::parse(entry.valid_ink_range).is_ok());
        }
    }

    #[test]
    fn test_select_entry_rejects_garbage() {
        assert!(select_entry(CARGO_CONTRACT_INK_DEPS, "not-a-version").is_err());
    }

    #[test]
    fn test_satisfies_range() {
        assert_eq!(satisfies_range("=4.2.0", "<5.0.0").unwrap(), Some(true));
        assert_eq!(satisfies_range("^5.0.0", "<5.0.0").unwrap(), Some(false));
        assert_eq!(satisfies_range("5.0.0-rc.1", "<99.0.0").unwrap(), Some(true));
        assert_eq!(satisfies_range("*", "<5.0.0").unwrap(), None);
        assert!(satisfies_range("4.0.0", "not a range").is_err());
    }
}

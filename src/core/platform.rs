// ─── Platform Descriptor ───
// The OS family / architecture / feature set a resolution runs for.

use std::collections::BTreeMap;
use std::fmt;

/// Operating system families distinguished by launcher metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OsFamily {
    Windows,
    Mac,
    Unix,
}

impl OsFamily {
    pub const ALL: [OsFamily; 3] = [OsFamily::Windows, OsFamily::Mac, OsFamily::Unix];

    /// Canonicalize an OS name as found in rules (`"osx"`, `"linux"`, ...).
    /// Surrounding whitespace and case are ignored.
    pub fn from_os_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "windows" => Some(OsFamily::Windows),
            "osx" | "mac" | "macos" => Some(OsFamily::Mac),
            "linux" | "freebsd" | "dragonfly" | "openbsd" | "netbsd" | "android" => {
                Some(OsFamily::Unix)
            }
            _ => None,
        }
    }

    /// The name this family carries in argument rules.
    pub fn canonical_name(self) -> &'static str {
        match self {
            OsFamily::Windows => "windows",
            OsFamily::Mac => "osx",
            OsFamily::Unix => "linux",
        }
    }

    /// Keys tried, in order, against a library's `natives` map.
    pub fn native_aliases(self) -> &'static [&'static str] {
        match self {
            OsFamily::Windows => &["windows"],
            OsFamily::Mac => &["osx", "macos"],
            OsFamily::Unix => &["linux"],
        }
    }

    /// Family of the platform this process was compiled for.
    pub fn host() -> Self {
        if cfg!(target_os = "windows") {
            OsFamily::Windows
        } else if cfg!(target_os = "macos") {
            OsFamily::Mac
        } else {
            OsFamily::Unix
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Canonical architecture name, or `None` for unsupported values.
pub fn canonical_arch(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "x86_64" | "amd64" => Some("x86_64"),
        "x86" | "i386" | "i686" => Some("x86"),
        "arm" => Some("arm"),
        "aarch64" | "arm64" => Some("aarch64"),
        "mips" => Some("mips"),
        "mips64" => Some("mips64"),
        _ => None,
    }
}

/// Everything rule evaluation needs to know about the target platform.
///
/// Built once per resolution and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformContext {
    pub os: OsFamily,
    pub arch: Option<String>,
    pub features: BTreeMap<String, bool>,
}

impl PlatformContext {
    pub fn new(os: OsFamily) -> Self {
        Self {
            os,
            arch: None,
            features: BTreeMap::new(),
        }
    }

    /// Context for the host. Resolution never probes the host on its own.
    pub fn current() -> Self {
        Self::new(OsFamily::host()).with_arch(std::env::consts::ARCH)
    }

    /// Set the architecture; unknown names are kept verbatim.
    pub fn with_arch(mut self, arch: &str) -> Self {
        self.arch = Some(
            canonical_arch(arch)
                .map(str::to_string)
                .unwrap_or_else(|| arch.to_string()),
        );
        self
    }

    pub fn with_feature(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.features.insert(name.into(), enabled);
        self
    }

    /// Feature flag value; unknown features are `false`.
    pub fn feature(&self, name: &str) -> bool {
        self.features.get(name).copied().unwrap_or(false)
    }

    /// Whether a rule's arch constraint holds for this context.
    pub fn arch_matches(&self, required: &str) -> bool {
        let required = canonical_arch(required).unwrap_or(required);
        self.arch.as_deref() == Some(required)
    }

    /// `"64"` or `"32"`, used for `${arch}` in legacy native classifiers.
    /// `None` when no architecture is known.
    pub fn pointer_width(&self) -> Option<&'static str> {
        match self.arch.as_deref()? {
            "x86" | "arm" | "mips" => Some("32"),
            _ => Some("64"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_names_canonicalize_to_families() {
        assert_eq!(OsFamily::from_os_name("windows"), Some(OsFamily::Windows));
        assert_eq!(OsFamily::from_os_name("osx"), Some(OsFamily::Mac));
        assert_eq!(OsFamily::from_os_name("mac"), Some(OsFamily::Mac));
        assert_eq!(OsFamily::from_os_name("macos"), Some(OsFamily::Mac));
        assert_eq!(OsFamily::from_os_name(" Windows "), Some(OsFamily::Windows));
        for unix in ["linux", "freebsd", "dragonfly", "openbsd", "netbsd", "android"] {
            assert_eq!(OsFamily::from_os_name(unix), Some(OsFamily::Unix), "{unix}");
        }
        assert_eq!(OsFamily::from_os_name("solaris"), None);
    }

    #[test]
    fn arch_is_canonicalized() {
        let ctx = PlatformContext::new(OsFamily::Unix).with_arch("amd64");
        assert_eq!(ctx.arch.as_deref(), Some("x86_64"));
        assert!(ctx.arch_matches("x86_64"));
        assert!(!ctx.arch_matches("x86"));
        assert_eq!(ctx.pointer_width(), Some("64"));

        let ctx = PlatformContext::new(OsFamily::Windows).with_arch("i686");
        assert!(ctx.arch_matches("x86"));
        assert_eq!(ctx.pointer_width(), Some("32"));

        assert_eq!(PlatformContext::new(OsFamily::Windows).pointer_width(), None);
    }

    #[test]
    fn unknown_features_default_to_false() {
        let ctx = PlatformContext::new(OsFamily::Mac).with_feature("is_demo_user", true);
        assert!(ctx.feature("is_demo_user"));
        assert!(!ctx.feature("has_custom_resolution"));
    }

    #[test]
    fn current_context_uses_host_family() {
        let ctx = PlatformContext::current();
        assert_eq!(ctx.os, OsFamily::host());
        assert!(ctx.arch.is_some());
    }
}

// ─── Rule Evaluation ───
// Allow/disallow conditions gating libraries and arguments.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::core::platform::{OsFamily, PlatformContext};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Rule {
    pub action: RuleAction,
    #[serde(default)]
    pub os: Option<OsRule>,
    #[serde(default)]
    pub features: Option<BTreeMap<String, bool>>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct OsRule {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    /// Version regex from old manifests. Decoded but not evaluated.
    #[serde(default)]
    pub version: Option<String>,
}

impl Rule {
    pub fn allow() -> Self {
        Self {
            action: RuleAction::Allow,
            os: None,
            features: None,
        }
    }

    pub fn disallow() -> Self {
        Self {
            action: RuleAction::Disallow,
            ..Self::allow()
        }
    }

    pub fn for_os(mut self, name: &str) -> Self {
        self.os.get_or_insert_with(OsRule::default).name = Some(name.to_string());
        self
    }

    pub fn for_arch(mut self, arch: &str) -> Self {
        self.os.get_or_insert_with(OsRule::default).arch = Some(arch.to_string());
        self
    }

    pub fn with_feature(mut self, name: &str, required: bool) -> Self {
        self.features
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), required);
        self
    }

    fn os_name(&self) -> Option<&str> {
        self.os.as_ref().and_then(|os| os.name.as_deref())
    }

    /// Arch and feature conditions, all of which must hold.
    fn conditions_hold(&self, ctx: &PlatformContext) -> bool {
        let arch_ok = match self.os.as_ref().and_then(|os| os.arch.as_deref()) {
            None => true,
            Some(arch) => ctx.arch_matches(arch),
        };
        let features_ok = self.features.as_ref().map_or(true, |features| {
            features
                .iter()
                .all(|(name, required)| ctx.feature(name) == *required)
        });
        arch_ok && features_ok
    }

    /// Families this allow rule grants for `ctx`. Empty when a condition
    /// fails or the OS name is not recognised; every family when no OS is
    /// named.
    fn granted_families(&self, ctx: &PlatformContext) -> Vec<OsFamily> {
        if !self.conditions_hold(ctx) {
            return Vec::new();
        }
        match self.os_name() {
            None => OsFamily::ALL.to_vec(),
            Some(name) => OsFamily::from_os_name(name).into_iter().collect(),
        }
    }

    /// Family this disallow rule revokes for `ctx`. Only a named OS is ever
    /// revoked.
    fn revoked_family(&self, ctx: &PlatformContext) -> Option<OsFamily> {
        if !self.conditions_hold(ctx) {
            return None;
        }
        self.os_name().and_then(OsFamily::from_os_name)
    }
}

/// Library rule semantics.
///
/// - No rules: allowed everywhere.
/// - Every `allow` rule adds its families (all families when it names no OS).
/// - Every `disallow` rule then removes the family it names. A disallow rule
///   without an OS name removes nothing.
///
/// All allows are applied before any disallow regardless of list order.
pub fn matches(rules: &[Rule], ctx: &PlatformContext) -> bool {
    if rules.is_empty() {
        return true;
    }

    let mut allowed: BTreeSet<OsFamily> = rules
        .iter()
        .filter(|rule| rule.action == RuleAction::Allow)
        .flat_map(|rule| rule.granted_families(ctx))
        .collect();

    for rule in rules.iter().filter(|r| r.action == RuleAction::Disallow) {
        if let Some(family) = rule.revoked_family(ctx) {
            allowed.remove(&family);
        }
    }

    allowed.contains(&ctx.os)
}

/// Single argument rule: must be `allow`, and its OS constraint (if any)
/// must name the context's OS and arch. Feature constraints are not
/// evaluated.
pub fn argument_rule_matches(rule: &Rule, ctx: &PlatformContext) -> bool {
    if rule.action != RuleAction::Allow {
        return false;
    }
    match &rule.os {
        None => true,
        Some(os) => {
            os.name.as_deref() == Some(ctx.os.canonical_name())
                && os.arch.as_deref().map_or(true, |arch| ctx.arch_matches(arch))
        }
    }
}

/// Argument rule semantics: every rule must match on its own.
pub fn argument_rules_apply(rules: &[Rule], ctx: &PlatformContext) -> bool {
    rules.iter().all(|rule| argument_rule_matches(rule, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(os: OsFamily) -> PlatformContext {
        PlatformContext::new(os)
    }

    #[test]
    fn no_rules_means_allowed() {
        for os in OsFamily::ALL {
            assert!(matches(&[], &ctx(os)));
        }
    }

    #[test]
    fn allow_only_named_os() {
        let rules = [Rule::allow().for_os("osx")];
        assert!(matches(&rules, &ctx(OsFamily::Mac)));
        assert!(!matches(&rules, &ctx(OsFamily::Windows)));
        assert!(!matches(&rules, &ctx(OsFamily::Unix)));
    }

    #[test]
    fn disallow_after_allow_in_any_order() {
        let forward = [Rule::allow(), Rule::disallow().for_os("windows")];
        let reversed = [Rule::disallow().for_os("windows"), Rule::allow()];

        for rules in [&forward[..], &reversed[..]] {
            assert!(!matches(rules, &ctx(OsFamily::Windows)));
            assert!(matches(rules, &ctx(OsFamily::Mac)));
            assert!(matches(rules, &ctx(OsFamily::Unix)));
        }
    }

    #[test]
    fn unix_like_names_share_a_family() {
        let rules = [Rule::allow().for_os("freebsd")];
        assert!(matches(&rules, &ctx(OsFamily::Unix)));
        assert!(!matches(&rules, &ctx(OsFamily::Mac)));
    }

    #[test]
    fn nameless_disallow_removes_nothing() {
        let rules = [Rule::allow(), Rule::disallow()];
        for os in OsFamily::ALL {
            assert!(matches(&rules, &ctx(os)));
        }

        // An arch-only disallow is still nameless.
        let rules = [Rule::allow(), Rule::disallow().for_arch("x86")];
        assert!(matches(&rules, &ctx(OsFamily::Windows).with_arch("x86")));

        // Without an allow there is nothing to keep.
        assert!(!matches(&[Rule::disallow()], &ctx(OsFamily::Unix)));
    }

    #[test]
    fn named_disallow_honours_its_arch() {
        let rules = [Rule::allow(), Rule::disallow().for_os("windows").for_arch("x86")];
        assert!(!matches(&rules, &ctx(OsFamily::Windows).with_arch("x86")));
        assert!(matches(&rules, &ctx(OsFamily::Windows).with_arch("x86_64")));
    }

    #[test]
    fn unknown_os_name_contributes_nothing() {
        let rules = [Rule::allow().for_os("solaris")];
        for os in OsFamily::ALL {
            assert!(!matches(&rules, &ctx(os)));
        }
    }

    #[test]
    fn allow_rule_conditions_are_conjunctive() {
        let rules = [Rule::allow().for_os("windows").for_arch("x86")];
        let win32 = ctx(OsFamily::Windows).with_arch("x86");
        let win64 = ctx(OsFamily::Windows).with_arch("x86_64");
        assert!(matches(&rules, &win32));
        assert!(!matches(&rules, &win64));

        let demo = [Rule::allow().with_feature("is_demo_user", true)];
        assert!(!matches(&demo, &ctx(OsFamily::Unix)));
        assert!(matches(
            &demo,
            &ctx(OsFamily::Unix).with_feature("is_demo_user", true)
        ));
    }

    #[test]
    fn argument_rules_require_every_rule() {
        let rules = [
            Rule::allow().for_os("windows"),
            Rule::allow().for_arch("x86"),
        ];
        let win32 = ctx(OsFamily::Windows).with_arch("x86");
        // Second rule has an OS constraint without a name, so it never matches.
        assert!(!argument_rules_apply(&rules, &win32));

        let rules = [Rule::allow().for_os("windows")];
        assert!(argument_rules_apply(&rules, &win32));
        assert!(!argument_rules_apply(&rules, &ctx(OsFamily::Mac)));
    }

    #[test]
    fn argument_rule_with_name_and_arch_needs_both() {
        let rule: Rule = serde_json::from_value(serde_json::json!({
            "action": "allow",
            "os": { "name": "windows", "arch": "x86" }
        }))
        .unwrap();
        let rules = [rule];

        assert!(argument_rules_apply(&rules, &ctx(OsFamily::Windows).with_arch("x86")));
        assert!(argument_rules_apply(&rules, &ctx(OsFamily::Windows).with_arch("i686")));
        assert!(!argument_rules_apply(&rules, &ctx(OsFamily::Windows).with_arch("x86_64")));
        assert!(!argument_rules_apply(&rules, &ctx(OsFamily::Windows)));
        assert!(!argument_rules_apply(&rules, &ctx(OsFamily::Mac).with_arch("x86")));
    }

    #[test]
    fn argument_rules_compare_canonical_names() {
        let rules = [Rule::allow().for_os("osx")];
        assert!(argument_rules_apply(&rules, &ctx(OsFamily::Mac)));

        let rules = [Rule::allow().for_os("freebsd")];
        assert!(!argument_rules_apply(&rules, &ctx(OsFamily::Unix)));
    }

    #[test]
    fn argument_rules_ignore_features() {
        let rules = [Rule::allow().with_feature("has_custom_resolution", true)];
        assert!(argument_rules_apply(&rules, &ctx(OsFamily::Unix)));
    }

    #[test]
    fn argument_disallow_never_matches() {
        let rules = [Rule::disallow().for_os("windows")];
        assert!(!argument_rules_apply(&rules, &ctx(OsFamily::Unix)));
        assert!(argument_rules_apply(&[], &ctx(OsFamily::Unix)));
    }

    #[test]
    fn decodes_rule_json() {
        let rule: Rule = serde_json::from_value(serde_json::json!({
            "action": "allow",
            "os": { "name": "osx", "version": "^10\\.5\\.\\d$" },
            "features": { "is_demo_user": true }
        }))
        .unwrap();
        assert_eq!(rule.action, RuleAction::Allow);
        assert_eq!(rule.os_name(), Some("osx"));
        assert_eq!(rule.features.unwrap()["is_demo_user"], true);
    }
}

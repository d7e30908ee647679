use crate::models::chart::InsightKind;
use crate::models::settings::InsightPolicy;

/// Rounded channel shares the insight rules are evaluated on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shares {
    pub tv: f64,
    pub radio: f64,
    pub newspaper: f64,
    pub total: f64,
}

impl Shares {
    fn spread(&self) -> f64 {
        let max = self.tv.max(self.radio).max(self.newspaper);
        let min = self.tv.min(self.radio).min(self.newspaper);
        max - min
    }
}

type Predicate = fn(&Shares, &InsightPolicy) -> bool;

/// Priority order: first matching rule wins, `Mixed` catches everything else.
const DEFAULT_RULES: &[(InsightKind, Predicate)] = &[
    (InsightKind::NoBudget, no_budget),
    (InsightKind::TvDominant, tv_dominant),
    (InsightKind::RadioStrong, radio_strong),
    (InsightKind::Balanced, balanced),
    (InsightKind::Mixed, always),
];

fn no_budget(s: &Shares, _: &InsightPolicy) -> bool {
    s.total <= 0.0
}

fn tv_dominant(s: &Shares, p: &InsightPolicy) -> bool {
    s.tv >= p.tv_dominant_pct
}

fn radio_strong(s: &Shares, p: &InsightPolicy) -> bool {
    s.radio >= p.radio_strong_pct
}

fn balanced(s: &Shares, p: &InsightPolicy) -> bool {
    s.spread() < p.balanced_spread_pct
}

fn always(_: &Shares, _: &InsightPolicy) -> bool {
    true
}

/// Ordered `(kind, predicate)` table selecting exactly one insight.
#[derive(Clone)]
pub struct InsightRules {
    policy: InsightPolicy,
    rules: Vec<(InsightKind, Predicate)>,
}

impl InsightRules {
    pub fn new(policy: InsightPolicy) -> Self {
        Self {
            policy,
            rules: DEFAULT_RULES.to_vec(),
        }
    }

    pub fn policy(&self) -> &InsightPolicy {
        &self.policy
    }

    /// Kinds in evaluation order.
    pub fn order(&self) -> Vec<InsightKind> {
        self.rules.iter().map(|(kind, _)| *kind).collect()
    }

    /// Whether the rule for `kind` alone would fire for `shares`.
    pub fn matches(&self, kind: InsightKind, shares: &Shares) -> bool {
        self.rules
            .iter()
            .find(|(k, _)| *k == kind)
            .is_some_and(|(_, predicate)| predicate(shares, &self.policy))
    }

    pub fn select(&self, shares: &Shares) -> InsightKind {
        self.rules
            .iter()
            .find(|(_, predicate)| predicate(shares, &self.policy))
            .map(|(kind, _)| *kind)
            .unwrap_or(InsightKind::Mixed)
    }
}

impl std::fmt::Debug for InsightRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightRules")
            .field("policy", &self.policy)
            .field("order", &self.order())
            .finish()
    }
}

impl Default for InsightRules {
    fn default() -> Self {
        Self::new(InsightPolicy::default())
    }
}

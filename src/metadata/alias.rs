//! Parameter aliasing: verbose data-file parameter names → canonical table keys.
//!
//! The lookup tables key on a small set of wildcard-style names (`T_2M*`,
//! `TOT_PREC[36]`, `*`) while data files use many variants (`T_2M_KAL`,
//! `TOT_PREC6`, ...). Resolution tries an ordered list of strategies.

use serde::Serialize;

/// Universal parameter key.
pub const WILDCARD: &str = "*";

/// One step of the resolution chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AliasStrategy {
    /// The name is itself canonical.
    ExactMatch,
    /// A canonical name starts with the given name (`GLOB` → `GLOB*`).
    PrefixMatch,
    /// Retry the prefix match with the first two, then the first, `_` segments
    /// (`T_2M_KAL` → `T_2M*`, `FF_10M_KAL` → `FF*`).
    SplitRetry,
    /// Fall back to [`WILDCARD`].
    Wildcard,
}

/// Default resolution order.
pub const DEFAULT_STRATEGIES: [AliasStrategy; 4] = [
    AliasStrategy::ExactMatch,
    AliasStrategy::PrefixMatch,
    AliasStrategy::SplitRetry,
    AliasStrategy::Wildcard,
];

fn first_with_prefix(prefix: &str, canonical: &[String]) -> Option<String> {
    if prefix.is_empty() {
        return None;
    }
    canonical.iter().find(|c| c.starts_with(prefix)).cloned()
}

impl AliasStrategy {
    /// Apply this strategy alone. `None` means "try the next one".
    pub fn apply(&self, name: &str, canonical: &[String]) -> Option<String> {
        match self {
            AliasStrategy::ExactMatch => canonical.iter().find(|c| *c == name).cloned(),
            AliasStrategy::PrefixMatch => first_with_prefix(name, canonical),
            AliasStrategy::SplitRetry => {
                let segments: Vec<&str> = name.split('_').collect();
                if segments.len() < 2 {
                    return None;
                }
                let head = if segments.len() > 2 {
                    format!("{}_{}", segments[0], segments[1])
                } else {
                    segments[0].to_string()
                };
                first_with_prefix(&head, canonical)
                    .or_else(|| first_with_prefix(segments[0], canonical))
            }
            AliasStrategy::Wildcard => Some(WILDCARD.to_string()),
        }
    }
}

/// Result of resolving one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub canonical: String,
    pub strategy: AliasStrategy,
}

/// Ordered set of canonical parameter names plus the strategy chain.
#[derive(Debug, Clone)]
pub struct ParameterAliases {
    canonical: Vec<String>,
    strategies: Vec<AliasStrategy>,
}

impl ParameterAliases {
    pub fn new(canonical: Vec<String>) -> Self {
        Self::with_strategies(canonical, DEFAULT_STRATEGIES.to_vec())
    }

    pub fn with_strategies(canonical: Vec<String>, strategies: Vec<AliasStrategy>) -> Self {
        ParameterAliases {
            canonical,
            strategies,
        }
    }

    pub fn canonical(&self) -> &[String] {
        &self.canonical
    }

    /// First strategy that produces a name wins; a chain without
    /// [`AliasStrategy::Wildcard`] still ends on the wildcard.
    pub fn resolve(&self, name: &str) -> Resolution {
        for strategy in &self.strategies {
            if let Some(canonical) = strategy.apply(name, &self.canonical) {
                if *strategy != AliasStrategy::ExactMatch {
                    log::debug!("{name} needs mapping --> {canonical} ({strategy:?})");
                }
                return Resolution {
                    canonical,
                    strategy: *strategy,
                };
            }
        }
        Resolution {
            canonical: WILDCARD.to_string(),
            strategy: AliasStrategy::Wildcard,
        }
    }

    pub fn normalize(&self, name: &str) -> String {
        self.resolve(name).canonical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases() -> ParameterAliases {
        let names = [
            "*", "PMSL", "PS", "TD_2M*", "T_2M*", "CLCT", "DD*", "FF*", "TOT_PREC[36]",
            "TOT_PREC1", "TOT_PREC12", "VMAX*", "RELHUM_2M", "GLOB*", "DURSUN12", "DURSUN1",
        ];
        ParameterAliases::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn maps_data_file_parameters() {
        let a = aliases();
        let cases = [
            ("TOT_PREC12", "TOT_PREC12", AliasStrategy::ExactMatch),
            ("TOT_PREC6", "TOT_PREC[36]", AliasStrategy::SplitRetry),
            ("GLOB", "GLOB*", AliasStrategy::PrefixMatch),
            ("T_2M", "T_2M*", AliasStrategy::PrefixMatch),
            ("T_2M_KAL", "T_2M*", AliasStrategy::SplitRetry),
            ("TD_2M_KAL", "TD_2M*", AliasStrategy::SplitRetry),
            ("FF_10M_KAL", "FF*", AliasStrategy::SplitRetry),
            ("VMAX_10M6", "VMAX*", AliasStrategy::SplitRetry),
            ("DD_10M", "DD*", AliasStrategy::SplitRetry),
            ("asdfasdf", "*", AliasStrategy::Wildcard),
            ("XY_Z", "*", AliasStrategy::Wildcard),
        ];
        for (input, canonical, strategy) in cases {
            let r = a.resolve(input);
            assert_eq!(r.canonical, canonical, "{input}");
            assert_eq!(r.strategy, strategy, "{input}");
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        let a = aliases();
        for input in ["TOT_PREC6", "FF_10M_KAL", "GLOB", "nonsense", "", "*", "CLCT", "T"] {
            let once = a.normalize(input);
            assert_eq!(a.normalize(&once), once, "{input}");
        }
    }

    #[test]
    fn chain_without_wildcard_still_ends_on_wildcard() {
        let a = ParameterAliases::with_strategies(
            vec!["CLCT".to_string()],
            vec![AliasStrategy::ExactMatch],
        );
        assert_eq!(a.normalize("PS"), WILDCARD);
    }
}

//! Index name resolution.
//!
//! The destination index of a push is derived from the collector's qualified
//! name, its settings and the capture timestamp. Resolution is pure: the same
//! inputs always give the same names.

use chrono::{DateTime, Utc};

use crate::collector::CollectorSettings;

/// Base index name: the explicit override, or the qualified name lowercased.
pub fn raw_index_name(qualified_name: &str, settings: &CollectorSettings) -> String {
    settings
        .index_name
        .clone()
        .unwrap_or_else(|| qualified_name.to_lowercase())
}

/// Destination index name: the base name, suffixed with `-<bucket>` when
/// date bucketing is enabled.
pub fn index_name(
    qualified_name: &str,
    settings: &CollectorSettings,
    timestamp: &DateTime<Utc>,
) -> String {
    let raw = raw_index_name(qualified_name, settings);
    match settings.index_date_pattern {
        Some(ref pattern) => format!("{}-{}", raw, pattern.format(timestamp)),
        None => raw,
    }
}

/// Alias tracking the latest bucket. Only exists when date bucketing is
/// enabled and an alias suffix is configured.
pub fn alias_name(qualified_name: &str, settings: &CollectorSettings) -> Option<String> {
    settings.index_date_pattern.as_ref()?;
    match settings.alias_suffix.as_deref() {
        Some(suffix) if !suffix.is_empty() => {
            Some(format!("{}{}", raw_index_name(qualified_name, settings), suffix))
        }
        _ => None,
    }
}

/// Names resolved for one collector invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexNaming {
    index_name: String,
    alias: Option<String>,
}

impl IndexNaming {
    /// Resolve the names for a collector at the given capture time.
    pub fn resolve(
        qualified_name: &str,
        settings: &CollectorSettings,
        timestamp: &DateTime<Utc>,
    ) -> Self {
        Self {
            index_name: index_name(qualified_name, settings, timestamp),
            alias: alias_name(qualified_name, settings),
        }
    }

    /// Destination index.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Alias to repoint at the destination index, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::DatePattern;
    use chrono::TimeZone;

    const NAME: &str = "tests.ATestCollector";

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    fn monthly() -> CollectorSettings {
        CollectorSettings::default().with_date_pattern(DatePattern::new("%Y-%m").unwrap())
    }

    #[test]
    fn test_raw_name_lowercases_qualified_name() {
        let settings = CollectorSettings::default();
        assert_eq!(raw_index_name(NAME, &settings), "tests.atestcollector");
    }

    #[test]
    fn test_raw_name_uses_override() {
        let settings = CollectorSettings::default().with_index_name("Custom");
        assert_eq!(raw_index_name(NAME, &settings), "Custom");
    }

    #[test]
    fn test_index_name_without_bucketing_ignores_timestamp() {
        let settings = CollectorSettings::default();

        assert_eq!(index_name(NAME, &settings, &at(2019, 1, 15)), "tests.atestcollector");
        assert_eq!(
            index_name(NAME, &settings, &at(2019, 1, 15)),
            index_name(NAME, &settings, &at(2024, 7, 1))
        );
    }

    #[test]
    fn test_index_name_with_bucketing() {
        let settings = monthly();

        assert_eq!(
            index_name(NAME, &settings, &at(2019, 1, 15)),
            "tests.atestcollector-2019-01"
        );
        // same bucket
        assert_eq!(
            index_name(NAME, &settings, &at(2019, 1, 1)),
            index_name(NAME, &settings, &at(2019, 1, 31))
        );
        // different bucket
        assert_ne!(
            index_name(NAME, &settings, &at(2019, 1, 31)),
            index_name(NAME, &settings, &at(2019, 2, 1))
        );
    }

    #[test]
    fn test_alias_requires_bucketing() {
        assert_eq!(alias_name(NAME, &CollectorSettings::default()), None);
        assert_eq!(
            alias_name(NAME, &monthly()),
            Some("tests.atestcollector-latest".to_string())
        );
    }

    #[test]
    fn test_alias_requires_suffix() {
        let settings = monthly().with_alias_suffix(None);
        assert_eq!(alias_name(NAME, &settings), None);

        let settings = monthly().with_alias_suffix(Some(String::new()));
        assert_eq!(alias_name(NAME, &settings), None);
    }

    #[test]
    fn test_resolve() {
        let settings = monthly().with_index_name("metrics");
        let naming = IndexNaming::resolve(NAME, &settings, &at(2024, 3, 9));

        assert_eq!(naming.index_name(), "metrics-2024-03");
        assert_eq!(naming.alias(), Some("metrics-latest"));
    }
}

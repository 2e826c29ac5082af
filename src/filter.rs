//! Per-sink record filters.
//!
//! A filter is fixed at sink registration and evaluated by a worker for
//! every dequeued record. Evaluation is pure: no side effects, no interior
//! state, same answer for the same record every time.

use ahash::{AHashMap, AHashSet};

use crate::levels::Severity;
use crate::record::{ComponentId, Record};

/// Predicate over a [`Record`], owned by a registered sink.
///
/// Construction goes through `From` conversions so each accepted
/// registration-argument shape maps onto exactly one variant:
///
/// | argument                                | filter                 |
/// |-----------------------------------------|------------------------|
/// | `None`                                  | `AcceptAll`            |
/// | a `Severity`                            | `MinSeverity`          |
/// | a `ComponentId`                         | one-element `Components` |
/// | a slice/`Vec`/set of `ComponentId`      | `Components`           |
/// | a map `ComponentId -> Severity`         | `PerComponent`         |
///
/// An empty component set or map matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    /// Matches every record.
    #[default]
    AcceptAll,
    /// Matches records at or above the threshold severity.
    MinSeverity(Severity),
    /// Matches records whose component is in the set, at any severity.
    Components(AHashSet<ComponentId>),
    /// Matches records whose component is a key and whose severity is at
    /// or above that key's threshold.
    PerComponent(AHashMap<ComponentId, Severity>),
}

impl Filter {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::AcceptAll => true,
            Filter::MinSeverity(min) => record.severity >= *min,
            Filter::Components(set) => set.contains(&record.component),
            Filter::PerComponent(map) => map
                .get(&record.component)
                .is_some_and(|min| record.severity >= *min),
        }
    }
}

impl From<Severity> for Filter {
    fn from(min: Severity) -> Self {
        Filter::MinSeverity(min)
    }
}

impl From<ComponentId> for Filter {
    fn from(component: ComponentId) -> Self {
        Filter::Components(AHashSet::from_iter([component]))
    }
}

impl From<&[ComponentId]> for Filter {
    fn from(components: &[ComponentId]) -> Self {
        Filter::Components(components.iter().copied().collect())
    }
}

impl<const N: usize> From<[ComponentId; N]> for Filter {
    fn from(components: [ComponentId; N]) -> Self {
        Filter::Components(components.into_iter().collect())
    }
}

impl From<Vec<ComponentId>> for Filter {
    fn from(components: Vec<ComponentId>) -> Self {
        Filter::Components(components.into_iter().collect())
    }
}

impl From<AHashSet<ComponentId>> for Filter {
    fn from(components: AHashSet<ComponentId>) -> Self {
        Filter::Components(components)
    }
}

impl From<AHashMap<ComponentId, Severity>> for Filter {
    fn from(thresholds: AHashMap<ComponentId, Severity>) -> Self {
        Filter::PerComponent(thresholds)
    }
}

impl<T: Into<Filter>> From<Option<T>> for Filter {
    fn from(spec: Option<T>) -> Self {
        spec.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(severity: Severity, component: ComponentId) -> Record {
        Record {
            timestamp: Utc::now(),
            severity,
            component,
            message: "msg".to_string(),
            file: "f.rs".to_string(),
            line: 1,
        }
    }

    #[test]
    fn test_accept_all_matches_everything() {
        let filter = Filter::AcceptAll;
        assert!(filter.matches(&record(Severity::Debug, 0)));
        assert!(filter.matches(&record(Severity::Fatal, 99)));
    }

    #[test]
    fn test_min_severity_threshold_inclusive() {
        let filter = Filter::from(Severity::Warning);
        assert!(!filter.matches(&record(Severity::Info, 0)));
        assert!(filter.matches(&record(Severity::Warning, 0)));
        assert!(filter.matches(&record(Severity::Error, 0)));
    }

    #[test]
    fn test_component_set_ignores_severity() {
        let filter = Filter::from(vec![1, 2]);
        assert!(filter.matches(&record(Severity::Debug, 1)));
        assert!(filter.matches(&record(Severity::Fatal, 2)));
        assert!(!filter.matches(&record(Severity::Fatal, 3)));
    }

    #[test]
    fn test_single_component_builds_one_element_set() {
        let filter = Filter::from(7 as ComponentId);
        assert!(filter.matches(&record(Severity::Debug, 7)));
        assert!(!filter.matches(&record(Severity::Fatal, 8)));
    }

    #[test]
    fn test_empty_component_set_matches_nothing() {
        let filter = Filter::from(Vec::<ComponentId>::new());
        assert!(!filter.matches(&record(Severity::Fatal, 0)));
    }

    #[test]
    fn test_per_component_thresholds() {
        let mut map = AHashMap::new();
        map.insert(1 as ComponentId, Severity::Error);
        map.insert(2 as ComponentId, Severity::Debug);
        let filter = Filter::from(map);

        assert!(!filter.matches(&record(Severity::Warning, 1)));
        assert!(filter.matches(&record(Severity::Error, 1)));
        assert!(filter.matches(&record(Severity::Debug, 2)));
        // Component absent from the map never matches, at any severity.
        assert!(!filter.matches(&record(Severity::Fatal, 3)));
    }

    #[test]
    fn test_empty_per_component_map_matches_nothing() {
        let filter = Filter::from(AHashMap::<ComponentId, Severity>::new());
        assert!(!filter.matches(&record(Severity::Fatal, 0)));
    }

    #[test]
    fn test_none_spec_accepts_all() {
        let filter = Filter::from(None::<Severity>);
        assert_eq!(filter, Filter::AcceptAll);
    }

    #[test]
    fn test_matches_is_deterministic() {
        let filter = Filter::from(Severity::Info);
        let r = record(Severity::Info, 4);
        assert_eq!(filter.matches(&r), filter.matches(&r));
    }
}

//! Accumulated query parameters.

use std::collections::BTreeMap;

use crate::{endpoint::param, options::Extra};

/// Ordered, duplicate-free list of extras in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraSet {
    items: Vec<Extra>,
}

impl ExtraSet {
    /// Adds `extra` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, extra: Extra) -> bool {
        if self.items.contains(&extra) {
            return false;
        }
        self.items.push(extra);
        true
    }

    pub fn extend<I: IntoIterator<Item = Extra>>(&mut self, extras: I) {
        for extra in extras {
            self.insert(extra);
        }
    }

    pub fn contains(&self, extra: Extra) -> bool {
        self.items.contains(&extra)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Extra> + '_ {
        self.items.iter().copied()
    }

    /// Comma-joined wire value, e.g. `isDayTime,utcDateTime`.
    pub fn to_value(&self) -> String {
        self.items
            .iter()
            .map(Extra::code)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Query parameters of one request.
///
/// Plain entries are unique by key and iterate in key order, so two equal
/// sets always produce the same query string. The `extra` parameter is kept
/// as an [`ExtraSet`] and rendered on iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: BTreeMap<&'static str, String>,
    extras: ExtraSet,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: &'static str, value: impl Into<String>) {
        self.entries.insert(key, value.into());
    }

    pub fn set_flag(&mut self, key: &'static str, on: bool) {
        self.set(key, if on { "yes" } else { "no" });
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        (key == param::EXTRA && !self.extras.is_empty()) || self.entries.contains_key(key)
    }

    pub fn extras(&self) -> &ExtraSet {
        &self.extras
    }

    pub fn add_extras<I: IntoIterator<Item = Extra>>(&mut self, extras: I) {
        self.extras.extend(extras);
    }

    pub fn len(&self) -> usize {
        self.entries.len() + usize::from(!self.extras.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All parameters as `(name, value)` pairs in key order, `extra` included.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, String)> + '_ {
        let extra = (!self.extras.is_empty()).then(|| (param::EXTRA, self.extras.to_value()));
        let mut pairs: Vec<_> = self
            .entries
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .chain(extra)
            .collect();
        pairs.sort_by_key(|(k, _)| *k);
        pairs.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn set_overwrites() {
        let mut params = ParameterSet::new();
        params.set(param::FORMAT, "xml");
        params.set(param::FORMAT, "json");
        assert_eq!(params.get(param::FORMAT), Some("json"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn flags_are_yes_or_no() {
        let mut params = ParameterSet::new();
        params.set_flag(param::TIDE, true);
        params.set_flag(param::POPULAR, false);
        assert_eq!(params.get(param::TIDE), Some("yes"));
        assert_eq!(params.get(param::POPULAR), Some("no"));
    }

    #[test]
    fn extras_keep_first_seen_order_without_duplicates() {
        let mut params = ParameterSet::new();
        params.add_extras([Extra::UtcDateTime, Extra::IsDayTime, Extra::UtcDateTime]);
        params.add_extras([Extra::IsDayTime, Extra::LocalObsTime]);
        assert_eq!(
            params.extras().to_value(),
            "utcDateTime,isDayTime,localObsTime"
        );
    }

    #[test]
    fn extra_only_appears_once_it_has_tokens() {
        let mut params = ParameterSet::new();
        assert!(!params.contains_key(param::EXTRA));
        params.add_extras(Vec::<Extra>::new());
        assert!(params.is_empty());
        params.add_extras([Extra::IsDayTime]);
        assert!(params.contains_key(param::EXTRA));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn iteration_is_sorted_by_key() {
        let mut params = ParameterSet::new();
        params.set(param::Q, "London");
        params.set(param::KEY, "k");
        params.add_extras([Extra::IsDayTime]);
        params.set(param::FORMAT, "json");
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["extra", "format", "key", "q"]);
    }

    fn any_extra() -> impl Strategy<Value = Extra> {
        prop::sample::select(Extra::all().to_vec())
    }

    proptest! {
        #[test]
        fn accumulating_is_idempotent(
            first in prop::collection::vec(any_extra(), 0..8),
            second in prop::collection::vec(any_extra(), 0..8),
        ) {
            let mut once = ExtraSet::default();
            once.extend(first.iter().copied().chain(second.iter().copied()));

            let mut twice = once.clone();
            twice.extend(first.iter().copied());
            twice.extend(second.iter().copied());

            prop_assert_eq!(&once, &twice);

            let mut expected: Vec<Extra> = Vec::new();
            for e in first.iter().chain(second.iter()) {
                if !expected.contains(e) {
                    expected.push(*e);
                }
            }
            prop_assert_eq!(once.iter().collect::<Vec<_>>(), expected);
        }
    }
}

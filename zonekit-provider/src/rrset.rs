//! Record set reconciliation
//!
//! Grouped vendors mutate whole record sets, callers think in single records.
//! The functions here compute the record set a vendor must end up with; the
//! vendor module decides which endpoint carries out the change. Nothing in
//! this module performs I/O.
//!
//! Content is always compared in decoded form, so a stored `"\"v=spf1\""`
//! equals a requested `v=spf1`.

use crate::types::{Record, RecordFilter, RecordSet};
use crate::utils::content::ContentCodec;
use crate::utils::names::{full_name, names_match};

/// Change a vendor must apply to reach the desired record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSetChange {
    /// Nothing to send.
    Unchanged,
    /// Create a new set.
    Create(RecordSet),
    /// Add `value` to an existing set. `set` is the complete resulting set,
    /// for vendors without an additive endpoint.
    Append {
        /// Resulting set.
        set: RecordSet,
        /// Encoded value being added.
        value: String,
    },
    /// Replace the values (and ttl) of an existing set.
    Replace(RecordSet),
    /// Remove the whole set.
    Delete(RecordSet),
}

/// Record set planner for one zone and one vendor codec.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    domain: &'a str,
    codec: ContentCodec,
}

impl<'a> Reconciler<'a> {
    pub fn new(domain: &'a str, codec: ContentCodec) -> Self {
        Self { domain, codec }
    }

    /// Finds the set for `(rtype, name)`, names compared in FQDN form.
    pub fn find<'s>(&self, sets: &'s [RecordSet], rtype: &str, name: &str) -> Option<&'s RecordSet> {
        sets.iter()
            .find(|s| s.rtype.eq_ignore_ascii_case(rtype) && names_match(self.domain, &s.name, name))
    }

    /// Whether `raw` (transport form) decodes to the same content as `content`.
    pub fn value_matches(&self, rtype: &str, raw: &str, content: &str) -> bool {
        self.codec.decode(self.domain, rtype, raw) == self.codec.canonical(self.domain, rtype, content)
    }

    /// Plans adding `content` to the `(rtype, name)` set.
    ///
    /// Absent set: created with the single value at `ttl`. Present set: the
    /// value is appended unless an equal one already exists; the set's ttl is
    /// kept unless `ttl` overrides it. `vendor_name` is the name form the
    /// vendor stores for a new set.
    pub fn plan_create(
        &self,
        existing: Option<&RecordSet>,
        rtype: &str,
        vendor_name: &str,
        content: &str,
        ttl: Option<u32>,
    ) -> RecordSetChange {
        let value = self.codec.encode(self.domain, rtype, content);
        match existing {
            None => RecordSetChange::Create(RecordSet {
                id: None,
                name: vendor_name.to_string(),
                rtype: rtype.to_string(),
                ttl,
                values: vec![value],
            }),
            Some(set) if set.values.iter().any(|v| self.value_matches(rtype, v, content)) => {
                RecordSetChange::Unchanged
            }
            Some(set) => {
                let mut next = set.clone();
                next.ttl = ttl.or(set.ttl);
                next.values.push(value.clone());
                RecordSetChange::Append { set: next, value }
            }
        }
    }

    /// Plans removing `content` (or, when `None`, every value) from a set.
    ///
    /// A set left without values is deleted. No matching set or value means
    /// there is nothing to do.
    pub fn plan_delete(&self, existing: Option<&RecordSet>, content: Option<&str>) -> RecordSetChange {
        let Some(set) = existing else {
            return RecordSetChange::Unchanged;
        };
        let Some(content) = content else {
            return RecordSetChange::Delete(set.clone());
        };

        let remaining: Vec<String> = set
            .values
            .iter()
            .filter(|v| !self.value_matches(&set.rtype, v, content))
            .cloned()
            .collect();

        if remaining.len() == set.values.len() {
            RecordSetChange::Unchanged
        } else if remaining.is_empty() {
            RecordSetChange::Delete(set.clone())
        } else {
            RecordSetChange::Replace(RecordSet {
                values: remaining,
                ..set.clone()
            })
        }
    }

    /// Plans replacing every value of a set with `content`, optionally
    /// changing the ttl.
    pub fn plan_replace(&self, set: &RecordSet, content: Option<&str>, ttl: Option<u32>) -> RecordSetChange {
        let values = content.map_or_else(
            || set.values.clone(),
            |c| vec![self.codec.encode(self.domain, &set.rtype, c)],
        );
        let next = RecordSet {
            values,
            ttl: ttl.or(set.ttl),
            ..set.clone()
        };
        if next == *set {
            RecordSetChange::Unchanged
        } else {
            RecordSetChange::Replace(next)
        }
    }

    /// Projects every value of every set into a [`Record`].
    ///
    /// `identify` receives the set and the decoded content and returns the
    /// record identifier.
    pub fn flatten<F>(&self, sets: &[RecordSet], identify: F) -> Vec<Record>
    where
        F: Fn(&RecordSet, &str) -> String,
    {
        sets.iter()
            .flat_map(|set| {
                set.values.iter().map(|raw| {
                    let content = self.codec.decode(self.domain, &set.rtype, raw);
                    Record {
                        id: identify(set, &content),
                        rtype: set.rtype.clone(),
                        name: full_name(self.domain, &set.name),
                        content,
                        ttl: set.ttl,
                    }
                })
            })
            .collect()
    }

    /// Whether a decoded record satisfies every term of `filter`.
    pub fn matches(&self, record: &Record, filter: &RecordFilter) -> bool {
        filter
            .rtype
            .as_deref()
            .is_none_or(|t| record.rtype.eq_ignore_ascii_case(t))
            && filter
                .name
                .as_deref()
                .is_none_or(|n| names_match(self.domain, &record.name, n))
            && filter.content.as_deref().is_none_or(|c| {
                record.content == self.codec.canonical(self.domain, &record.rtype, c)
            })
    }

    /// Applies `filter` to `records`.
    pub fn filter(&self, records: Vec<Record>, filter: &RecordFilter) -> Vec<Record> {
        records.into_iter().filter(|r| self.matches(r, filter)).collect()
    }
}

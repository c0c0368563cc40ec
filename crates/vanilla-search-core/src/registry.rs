//! Registry of search record types.
//!
//! Keeps descriptors in registration order. Keys are unique, and no two
//! registered encodings share a GUID that decodes to a non-negative record
//! ID, so `resolve_guid` has at most one answer.

use crate::error::{ConfigurationError, RegistryError};
use crate::record_type::{comment_spec, discussion_spec, InfrastructureCapabilities, RecordType};

/// A GUID decoded against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedGuid<'a> {
    pub record_type: &'a RecordType,
    pub record_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct RecordTypeRegistry {
    types: Vec<RecordType>,
}

impl RecordTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with Vanilla's discussion and comment types.
    pub fn builtin(
        capabilities: &dyn InfrastructureCapabilities,
    ) -> Result<Self, ConfigurationError> {
        let mut registry = Self::new();
        for spec in [discussion_spec(), comment_spec()] {
            let record_type = RecordType::from_spec(spec, capabilities)?;
            // Built-in encodings are distinct.
            registry.types.push(record_type);
        }
        Ok(registry)
    }

    /// Add a descriptor.
    ///
    /// Fails if the key is taken or if some GUID would decode to a
    /// non-negative record ID under both the new type and an existing one.
    pub fn register(&mut self, record_type: RecordType) -> Result<(), RegistryError> {
        if self.get(record_type.key()).is_some() {
            return Err(RegistryError::DuplicateKey(record_type.key().to_string()));
        }
        for existing in &self.types {
            if let Some(guid) = shared_guid(existing, &record_type) {
                return Err(RegistryError::OverlappingEncoding {
                    existing: existing.key().to_string(),
                    incoming: record_type.key().to_string(),
                    guid,
                });
            }
        }
        self.types.push(record_type);
        Ok(())
    }

    /// Replace the descriptor with the same key, or add it.
    ///
    /// Returns the replaced descriptor. The encoding check still applies
    /// against every other type.
    pub fn upsert(&mut self, record_type: RecordType) -> Result<Option<RecordType>, RegistryError> {
        match self.types.iter().position(|t| t.key() == record_type.key()) {
            Some(pos) => {
                let previous = self.types.remove(pos);
                if let Err(e) = self.register(record_type) {
                    self.types.insert(pos, previous);
                    return Err(e);
                }
                // register appends; move it back into place.
                if let Some(added) = self.types.pop() {
                    self.types.insert(pos, added);
                }
                Ok(Some(previous))
            }
            None => self.register(record_type).map(|_| None),
        }
    }

    /// Look up a descriptor by its internal key.
    pub fn get(&self, key: &str) -> Option<&RecordType> {
        self.types.iter().find(|t| t.key() == key)
    }

    /// Look up a descriptor by the key the API exposes (`"comments"`).
    pub fn by_api_type_key(&self, api_type_key: &str) -> Option<&RecordType> {
        self.types.iter().find(|t| t.api_type_key() == api_type_key)
    }

    /// First descriptor with this Sphinx data type code.
    pub fn by_dtype(&self, dtype: i64) -> Option<&RecordType> {
        self.types.iter().find(|t| t.dtype() == dtype)
    }

    /// Types whose index is live on this deployment.
    pub fn active(&self) -> impl Iterator<Item = &RecordType> {
        self.types.iter().filter(|t| !t.index_name().is_empty())
    }

    /// All descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RecordType> {
        self.types.iter()
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Decode a GUID into its record type and non-negative record ID.
    pub fn resolve_guid(&self, guid: i64) -> Option<ResolvedGuid<'_>> {
        self.types.iter().find_map(|t| {
            t.record_id(guid)
                .filter(|id| *id >= 0)
                .map(|record_id| ResolvedGuid {
                    record_type: t,
                    record_id,
                })
        })
    }
}

/// A GUID that both types decode to a non-negative record ID, if any.
///
/// Type `t` accepts `x` when `x = offset + id * multiplier` with `id >= 0`:
/// `x` is congruent to the offset modulo `|multiplier|` and lies on the
/// multiplier's side of the offset. Both congruences are solved with CRT,
/// then the solution lattice is checked against the combined bounds.
fn shared_guid(a: &RecordType, b: &RecordType) -> Option<i128> {
    let (o1, m1) = (a.guid_offset() as i128, a.guid_multiplier() as i128);
    let (o2, m2) = (b.guid_offset() as i128, b.guid_multiplier() as i128);
    let (n1, n2) = (m1.abs(), m2.abs());

    let (g, inv, _) = extended_gcd(n1, n2);
    let diff = o2 - o1;
    if diff % g != 0 {
        return None;
    }
    // n1 * t = diff (mod n2), reduced by g; operands stay below n2 / g.
    let n2g = n2 / g;
    let t = ((diff / g).rem_euclid(n2g) * inv.rem_euclid(n2g)).rem_euclid(n2g);
    let x0 = o1 + n1 * t;
    let period = n1 / g * n2;

    let mut lower = None;
    let mut upper = None;
    for (o, m) in [(o1, m1), (o2, m2)] {
        if m > 0 {
            lower = Some(lower.map_or(o, |l: i128| l.max(o)));
        } else {
            upper = Some(upper.map_or(o, |u: i128| u.min(o)));
        }
    }

    match (lower, upper) {
        (Some(lo), hi) => {
            let x = lo + (x0 - lo).rem_euclid(period);
            match hi {
                Some(hi) if x > hi => None,
                _ => Some(x),
            }
        }
        (None, Some(hi)) => Some(hi - (hi - x0).rem_euclid(period)),
        (None, None) => Some(x0),
    }
}

/// `(g, x, y)` with `a * x + b * y = g = gcd(a, b)` for non-negative inputs.
fn extended_gcd(a: i128, b: i128) -> (i128, i128, i128) {
    if b == 0 {
        (a, 1, 0)
    } else {
        let (g, x, y) = extended_gcd(b, a % b);
        (g, y, x - (a / b) * y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_type::{RecordTypeSpec, SelfHosted};

    fn poll_spec() -> RecordTypeSpec {
        RecordTypeSpec {
            key: Some("poll".to_string()),
            api_type_key: Some("polls".to_string()),
            dtype: Some(7),
            index: Some("Poll".to_string()),
            guid_offset: Some(7),
            guid_multiplier: Some(10),
            sub_key: Some("p".to_string()),
            checkbox_label: Some("polls".to_string()),
            provider_group: Some("sphinx".to_string()),
            infrastructure_template: Some("polls".to_string()),
        }
    }

    fn poll() -> RecordType {
        RecordType::from_spec(poll_spec(), &SelfHosted).unwrap()
    }

    #[test]
    fn builtin_has_discussion_and_comment() {
        let registry = RecordTypeRegistry::builtin(&SelfHosted).unwrap();
        let keys: Vec<&str> = registry.iter().map(|t| t.key()).collect();
        assert_eq!(keys, vec!["discussion", "comment"]);
        assert_eq!(registry.by_api_type_key("comments").unwrap().key(), "comment");
        assert_eq!(registry.by_dtype(0).unwrap().key(), "discussion");
    }

    #[test]
    fn duplicate_key_rejected() {
        let mut registry = RecordTypeRegistry::new();
        registry.register(poll()).unwrap();
        let err = registry.register(poll()).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateKey("poll".to_string()));
    }

    #[test]
    fn duplicate_encoding_rejected() {
        let mut registry = RecordTypeRegistry::builtin(&SelfHosted).unwrap();
        let mut spec = poll_spec();
        spec.guid_offset = Some(2);
        let clash = RecordType::from_spec(spec, &SelfHosted).unwrap();
        let err = registry.register(clash).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::OverlappingEncoding { ref existing, guid: 2, .. } if existing == "comment"
        ));
    }

    fn poll_with(offset: i64, multiplier: i64) -> RecordType {
        let mut spec = poll_spec();
        spec.guid_offset = Some(offset);
        spec.guid_multiplier = Some(multiplier);
        RecordType::from_spec(spec, &SelfHosted).unwrap()
    }

    #[test]
    fn overlapping_encodings_rejected() {
        let mut registry = RecordTypeRegistry::builtin(&SelfHosted).unwrap();

        // GUID 11 is discussion 1 and would be poll 0.
        let err = registry.register(poll_with(11, 10)).unwrap_err();
        assert_eq!(
            err,
            RegistryError::OverlappingEncoding {
                existing: "discussion".to_string(),
                incoming: "poll".to_string(),
                guid: 11,
            }
        );

        // GUIDs 1, 11, 21, ... decode under both.
        assert!(matches!(
            registry.register(poll_with(1, 5)),
            Err(RegistryError::OverlappingEncoding { guid: 1, .. })
        ));

        // Descending encoding: GUID 1 is discussion 0 and poll 2.
        assert!(matches!(
            registry.register(poll_with(21, -10)),
            Err(RegistryError::OverlappingEncoding { guid: 1, .. })
        ));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve_guid(11).unwrap().record_type.key(), "discussion");
    }

    #[test]
    fn disjoint_encodings_accepted() {
        let mut registry = RecordTypeRegistry::builtin(&SelfHosted).unwrap();
        // Same residue as discussion, but only at negative discussion IDs.
        registry.register(poll_with(-9, -10)).unwrap();
        let hit = registry.resolve_guid(-29).unwrap();
        assert_eq!(hit.record_type.key(), "poll");
        assert_eq!(hit.record_id, 2);
        assert_eq!(registry.resolve_guid(1).unwrap().record_type.key(), "discussion");
    }

    #[test]
    fn resolve_guid_picks_matching_type() {
        let mut registry = RecordTypeRegistry::builtin(&SelfHosted).unwrap();
        registry.register(poll()).unwrap();

        let hit = registry.resolve_guid(421).unwrap();
        assert_eq!(hit.record_type.key(), "discussion");
        assert_eq!(hit.record_id, 42);

        let hit = registry.resolve_guid(422).unwrap();
        assert_eq!(hit.record_type.key(), "comment");
        assert_eq!(hit.record_id, 42);

        let hit = registry.resolve_guid(77).unwrap();
        assert_eq!(hit.record_type.key(), "poll");
        assert_eq!(hit.record_id, 7);

        assert!(registry.resolve_guid(423).is_none());
        assert!(registry.resolve_guid(-9).is_none());
    }

    #[test]
    fn active_skips_suppressed_indexes() {
        let caps = crate::record_type::StaticCapabilities {
            managed: true,
            templates: Some(vec!["groups".to_string()]),
        };
        let mut registry = RecordTypeRegistry::builtin(&caps).unwrap();
        registry
            .register(RecordType::from_spec(poll_spec(), &caps).unwrap())
            .unwrap();
        let active: Vec<&str> = registry.active().map(|t| t.key()).collect();
        assert_eq!(active, vec!["discussion", "comment"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut registry = RecordTypeRegistry::builtin(&SelfHosted).unwrap();
        let mut spec = discussion_spec();
        spec.checkbox_label = Some("threads".to_string());
        let replaced = registry
            .upsert(RecordType::from_spec(spec, &SelfHosted).unwrap())
            .unwrap();
        assert_eq!(replaced.unwrap().checkbox_label(), "discussions");
        let keys: Vec<&str> = registry.iter().map(|t| t.key()).collect();
        assert_eq!(keys, vec!["discussion", "comment"]);
        assert_eq!(registry.get("discussion").unwrap().checkbox_label(), "threads");
    }

    #[test]
    fn failed_upsert_keeps_previous() {
        let mut registry = RecordTypeRegistry::builtin(&SelfHosted).unwrap();
        let mut spec = discussion_spec();
        spec.guid_offset = Some(2);
        let err = registry
            .upsert(RecordType::from_spec(spec, &SelfHosted).unwrap())
            .unwrap_err();
        assert!(matches!(err, RegistryError::OverlappingEncoding { .. }));
        assert_eq!(registry.get("discussion").unwrap().guid_offset(), 1);
        assert_eq!(registry.iter().next().unwrap().key(), "discussion");
    }
}

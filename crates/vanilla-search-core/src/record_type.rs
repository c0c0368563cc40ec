//! Search record-type descriptors.
//!
//! A [`RecordType`] is the constant metadata bundle for one kind of
//! searchable forum record (discussion, comment, knowledge-base article,
//! ...). It carries ten attributes, all required:
//!
//! | Attribute | Meaning |
//! |-----------|---------|
//! | `key` | Internal identifier, e.g. `"discussion"` |
//! | `api_type_key` | Identifier used by the public API, e.g. `"discussions"` |
//! | `dtype` | Numeric document type stored in the Sphinx index |
//! | `index` | Logical name of the Sphinx index |
//! | `guid_offset` | Offset of the GUID encoding |
//! | `guid_multiplier` | Multiplier of the GUID encoding |
//! | `sub_key` | Secondary key used to build the checkbox id |
//! | `checkbox_label` | Label shown next to the search filter checkbox |
//! | `provider_group` | Search backend the index belongs to, e.g. `"sphinx"` |
//! | `infrastructure_template` | Deployment template that provisions the index |
//!
//! Descriptors are built once through [`RecordType::from_spec`], which
//! rejects incomplete definitions, and are immutable afterwards.
//!
//! # GUID encoding
//!
//! The search index stores every record under a single numeric GUID:
//!
//! ```text
//! guid = record_id * guid_multiplier + guid_offset
//! ```
//!
//! [`RecordType::record_id`] inverts it. Division is exact: a GUID that is
//! not on this record type's lattice has no record ID.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Provider group handled by the Sphinx plugin.
pub const SPHINX_PROVIDER_GROUP: &str = "sphinx";

/// Template that every deployment provisions; never gated.
pub const STANDARD_TEMPLATE: &str = "standard";

/// Canonical attribute order, used when reporting missing attributes.
pub const REQUIRED_ATTRIBUTES: [&str; 10] = [
    "key",
    "api_type_key",
    "dtype",
    "index",
    "guid_offset",
    "guid_multiplier",
    "sub_key",
    "checkbox_label",
    "provider_group",
    "infrastructure_template",
];

/// Deployment capabilities consulted when deciding whether an index is live.
///
/// Injected into [`RecordType::from_spec`] so descriptors never read global
/// state.
pub trait InfrastructureCapabilities {
    /// Whether the site runs under managed infrastructure.
    fn managed_infrastructure(&self) -> bool;

    /// Templates enabled for Sphinx on this deployment.
    ///
    /// `None` means no list is configured, in which case no template is
    /// suppressed.
    fn enabled_templates(&self) -> Option<&[String]>;
}

/// Self-hosted deployment: nothing is ever suppressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfHosted;

impl InfrastructureCapabilities for SelfHosted {
    fn managed_infrastructure(&self) -> bool {
        false
    }

    fn enabled_templates(&self) -> Option<&[String]> {
        None
    }
}

/// Fixed capability answers, for deployments configured up front and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCapabilities {
    pub managed: bool,
    pub templates: Option<Vec<String>>,
}

impl InfrastructureCapabilities for StaticCapabilities {
    fn managed_infrastructure(&self) -> bool {
        self.managed
    }

    fn enabled_templates(&self) -> Option<&[String]> {
        self.templates.as_deref()
    }
}

/// Whether an index provisioned by `template` is live for `provider_group`.
///
/// Only Sphinx indexes built from a non-standard template on managed
/// infrastructure are gated, and only when an enabled-template list exists.
pub fn index_enabled(
    provider_group: &str,
    template: &str,
    capabilities: &dyn InfrastructureCapabilities,
) -> bool {
    if provider_group == SPHINX_PROVIDER_GROUP
        && template != STANDARD_TEMPLATE
        && capabilities.managed_infrastructure()
    {
        if let Some(enabled) = capabilities.enabled_templates() {
            return enabled.iter().any(|t| t == template);
        }
    }
    true
}

/// Partially-specified record type, as read from configuration.
///
/// Every attribute is optional here; [`RecordType::from_spec`] enforces
/// presence.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RecordTypeSpec {
    pub key: Option<String>,
    pub api_type_key: Option<String>,
    pub dtype: Option<i64>,
    pub index: Option<String>,
    pub guid_offset: Option<i64>,
    pub guid_multiplier: Option<i64>,
    pub sub_key: Option<String>,
    pub checkbox_label: Option<String>,
    pub provider_group: Option<String>,
    pub infrastructure_template: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Attributes {
    key: String,
    api_type_key: String,
    dtype: i64,
    index: String,
    guid_offset: i64,
    guid_multiplier: i64,
    sub_key: String,
    checkbox_label: String,
    provider_group: String,
    infrastructure_template: String,
}

/// A validated, immutable search record-type descriptor.
///
/// Equality compares the ten attributes only; whether the index is enabled
/// on this deployment is derived state and does not take part.
#[derive(Debug, Clone)]
pub struct RecordType {
    attrs: Attributes,
    index_enabled: bool,
}

fn require<T>(value: Option<T>, name: &'static str) -> Result<T, ConfigurationError> {
    value.ok_or(ConfigurationError::MissingAttribute(name))
}

impl RecordType {
    /// Build a descriptor, failing on the first missing attribute.
    ///
    /// The index gate is evaluated once, against `capabilities`.
    pub fn from_spec(
        spec: RecordTypeSpec,
        capabilities: &dyn InfrastructureCapabilities,
    ) -> Result<Self, ConfigurationError> {
        let attrs = Attributes {
            key: require(spec.key, "key")?,
            api_type_key: require(spec.api_type_key, "api_type_key")?,
            dtype: require(spec.dtype, "dtype")?,
            index: require(spec.index, "index")?,
            guid_offset: require(spec.guid_offset, "guid_offset")?,
            guid_multiplier: require(spec.guid_multiplier, "guid_multiplier")?,
            sub_key: require(spec.sub_key, "sub_key")?,
            checkbox_label: require(spec.checkbox_label, "checkbox_label")?,
            provider_group: require(spec.provider_group, "provider_group")?,
            infrastructure_template: require(
                spec.infrastructure_template,
                "infrastructure_template",
            )?,
        };

        if attrs.guid_multiplier == 0 {
            return Err(ConfigurationError::ZeroMultiplier(attrs.key));
        }

        let index_enabled = index_enabled(
            &attrs.provider_group,
            &attrs.infrastructure_template,
            capabilities,
        );

        Ok(Self {
            attrs,
            index_enabled,
        })
    }

    /// Internal key, e.g. `"discussion"`.
    pub fn key(&self) -> &str {
        &self.attrs.key
    }

    /// Key used by the search API, e.g. `"discussions"`.
    pub fn api_type_key(&self) -> &str {
        &self.attrs.api_type_key
    }

    /// Numeric document type used by the search index.
    pub fn dtype(&self) -> i64 {
        self.attrs.dtype
    }

    /// The index name, or `""` when the index is suppressed on this deployment.
    pub fn index_name(&self) -> &str {
        if self.index_enabled {
            &self.attrs.index
        } else {
            ""
        }
    }

    /// The configured index name regardless of suppression.
    pub fn configured_index(&self) -> &str {
        &self.attrs.index
    }

    /// Whether the infrastructure gate let the index through.
    pub fn is_index_enabled(&self) -> bool {
        self.index_enabled
    }

    /// Added to `record_id * multiplier` to form a GUID.
    pub fn guid_offset(&self) -> i64 {
        self.attrs.guid_offset
    }

    /// Never zero.
    pub fn guid_multiplier(&self) -> i64 {
        self.attrs.guid_multiplier
    }

    /// Short suffix for form controls, e.g. `"d"`.
    pub fn sub_key(&self) -> &str {
        &self.attrs.sub_key
    }

    /// Label of the search-form checkbox.
    pub fn checkbox_label(&self) -> &str {
        &self.attrs.checkbox_label
    }

    /// `"{key}_{sub_key}"`.
    pub fn checkbox_id(&self) -> String {
        format!("{}_{}", self.attrs.key, self.attrs.sub_key)
    }

    /// Search provider this type belongs to, e.g. `"sphinx"`.
    pub fn provider_group(&self) -> &str {
        &self.attrs.provider_group
    }

    /// Template name checked against the managed deployment's list.
    pub fn infrastructure_template(&self) -> &str {
        &self.attrs.infrastructure_template
    }

    /// Decode a GUID into this record type's record ID.
    ///
    /// Returns `None` when `(guid - offset)` is not an exact multiple of the
    /// multiplier, or on overflow. Use [`record_id_ratio`](Self::record_id_ratio)
    /// to get the raw quotient instead.
    pub fn record_id(&self, guid: i64) -> Option<i64> {
        let shifted = guid.checked_sub(self.attrs.guid_offset)?;
        if shifted.checked_rem(self.attrs.guid_multiplier)? != 0 {
            return None;
        }
        shifted.checked_div(self.attrs.guid_multiplier)
    }

    /// `(guid - offset) / multiplier` as a float, not rounded to an ID.
    ///
    /// Computed in `f64`, so it is exact only while the GUID and offset
    /// stay within ±2^53.
    pub fn record_id_ratio(&self, guid: i64) -> f64 {
        (guid as f64 - self.attrs.guid_offset as f64) / self.attrs.guid_multiplier as f64
    }

    /// Encode a record ID as a GUID. `None` on overflow.
    pub fn guid(&self, record_id: i64) -> Option<i64> {
        record_id
            .checked_mul(self.attrs.guid_multiplier)?
            .checked_add(self.attrs.guid_offset)
    }

    /// Attribute-wise equality; same as `==`.
    pub fn equal(&self, other: &RecordType) -> bool {
        self == other
    }

    /// Back to the configuration form, with every attribute present.
    pub fn to_spec(&self) -> RecordTypeSpec {
        let a = &self.attrs;
        RecordTypeSpec {
            key: Some(a.key.clone()),
            api_type_key: Some(a.api_type_key.clone()),
            dtype: Some(a.dtype),
            index: Some(a.index.clone()),
            guid_offset: Some(a.guid_offset),
            guid_multiplier: Some(a.guid_multiplier),
            sub_key: Some(a.sub_key.clone()),
            checkbox_label: Some(a.checkbox_label.clone()),
            provider_group: Some(a.provider_group.clone()),
            infrastructure_template: Some(a.infrastructure_template.clone()),
        }
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.attrs == other.attrs
    }
}

impl Eq for RecordType {}

/// Vanilla's discussion record type.
pub fn discussion_spec() -> RecordTypeSpec {
    RecordTypeSpec {
        key: Some("discussion".to_string()),
        api_type_key: Some("discussions".to_string()),
        dtype: Some(0),
        index: Some("Discussion".to_string()),
        guid_offset: Some(1),
        guid_multiplier: Some(10),
        sub_key: Some("d".to_string()),
        checkbox_label: Some("discussions".to_string()),
        provider_group: Some(SPHINX_PROVIDER_GROUP.to_string()),
        infrastructure_template: Some(STANDARD_TEMPLATE.to_string()),
    }
}

/// Vanilla's comment record type.
pub fn comment_spec() -> RecordTypeSpec {
    RecordTypeSpec {
        key: Some("comment".to_string()),
        api_type_key: Some("comments".to_string()),
        dtype: Some(100),
        index: Some("Comment".to_string()),
        guid_offset: Some(2),
        guid_multiplier: Some(10),
        sub_key: Some("c".to_string()),
        checkbox_label: Some("comments".to_string()),
        provider_group: Some(SPHINX_PROVIDER_GROUP.to_string()),
        infrastructure_template: Some(STANDARD_TEMPLATE.to_string()),
    }
}

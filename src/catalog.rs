//! Record-type catalog built from configuration, plus the `types` and
//! `resolve` commands.

use anyhow::{Context, Result};
use serde::Serialize;

use vanilla_search_core::record_type::RecordType;
use vanilla_search_core::registry::RecordTypeRegistry;

use crate::config::Config;

/// Build the registry: built-ins first (unless disabled), then configured
/// types, which replace built-ins with the same key.
pub fn build_registry(config: &Config) -> Result<RecordTypeRegistry> {
    let capabilities = &config.infrastructure;
    let mut registry = if config.include_builtin {
        RecordTypeRegistry::builtin(capabilities)?
    } else {
        RecordTypeRegistry::new()
    };

    for (i, spec) in config.record_types.iter().enumerate() {
        let label = spec.key.clone().unwrap_or_else(|| "<unnamed>".to_string());
        let record_type = RecordType::from_spec(spec.clone(), capabilities)
            .with_context(|| format!("Invalid record_types[{}] ({})", i, label))?;

        if !record_type.is_index_enabled() {
            tracing::info!(
                key = record_type.key(),
                template = record_type.infrastructure_template(),
                "index suppressed: template not enabled on this deployment"
            );
        }

        let replaced = registry
            .upsert(record_type)
            .with_context(|| format!("Cannot register record_types[{}] ({})", i, label))?;
        if replaced.is_some() {
            tracing::debug!(key = %label, "configured record type replaces built-in");
        }
    }

    tracing::debug!(count = registry.len(), "record type catalog ready");
    Ok(registry)
}

/// JSON view of a descriptor.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecordTypeView {
    pub key: String,
    pub api_type_key: String,
    pub dtype: i64,
    pub index_name: String,
    pub configured_index: String,
    pub guid_offset: i64,
    pub guid_multiplier: i64,
    pub checkbox_id: String,
    pub checkbox_label: String,
    pub provider_group: String,
    pub infrastructure_template: String,
    pub active: bool,
}

impl From<&RecordType> for RecordTypeView {
    fn from(t: &RecordType) -> Self {
        Self {
            key: t.key().to_string(),
            api_type_key: t.api_type_key().to_string(),
            dtype: t.dtype(),
            index_name: t.index_name().to_string(),
            configured_index: t.configured_index().to_string(),
            guid_offset: t.guid_offset(),
            guid_multiplier: t.guid_multiplier(),
            checkbox_id: t.checkbox_id(),
            checkbox_label: t.checkbox_label().to_string(),
            provider_group: t.provider_group().to_string(),
            infrastructure_template: t.infrastructure_template().to_string(),
            active: t.is_index_enabled(),
        }
    }
}

/// A GUID decoded against the catalog.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GuidView {
    pub guid: i64,
    pub record_type: String,
    pub api_type_key: String,
    pub record_id: i64,
    pub index_name: String,
}

pub fn resolve(registry: &RecordTypeRegistry, guid: i64) -> Option<GuidView> {
    registry.resolve_guid(guid).map(|hit| GuidView {
        guid,
        record_type: hit.record_type.key().to_string(),
        api_type_key: hit.record_type.api_type_key().to_string(),
        record_id: hit.record_id,
        index_name: hit.record_type.index_name().to_string(),
    })
}

pub fn cmd_types(config: &Config, active_only: bool) -> Result<()> {
    let registry = build_registry(config)?;

    println!(
        "{:<14} {:<14} {:>6} {:<20} {:>6} {:>5} {:<16} {:<10}",
        "KEY", "API KEY", "DTYPE", "INDEX", "OFFSET", "MULT", "CHECKBOX", "TEMPLATE"
    );
    for t in registry.iter() {
        if active_only && !t.is_index_enabled() {
            continue;
        }
        let index = if t.is_index_enabled() {
            t.index_name().to_string()
        } else {
            format!("({} off)", t.configured_index())
        };
        println!(
            "{:<14} {:<14} {:>6} {:<20} {:>6} {:>5} {:<16} {:<10}",
            t.key(),
            t.api_type_key(),
            t.dtype(),
            index,
            t.guid_offset(),
            t.guid_multiplier(),
            t.checkbox_id(),
            t.infrastructure_template()
        );
    }
    Ok(())
}

pub fn cmd_resolve(config: &Config, guid: i64, json: bool) -> Result<()> {
    let registry = build_registry(config)?;
    let Some(view) = resolve(&registry, guid) else {
        anyhow::bail!("GUID {} does not match any record type", guid);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{} {} (index: {})", view.record_type, view.record_id, view.index_name);
    }
    Ok(())
}

//! # Vanilla Search
//!
//! Tooling around Vanilla Forums' search record types and site header.
//!
//! Search record types describe each kind of searchable forum record and
//! how its ID is encoded into a Sphinx GUID. This crate builds a catalog of
//! them from TOML configuration, decides which indexes are live on the
//! current deployment, and exposes the catalog through a CLI and a small
//! JSON HTTP API. It also renders the site header's layout and stylesheet
//! from design tokens.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────────┐   ┌──────────┐
//! │  vsearch.toml │──▶│ vanilla-search-core  │──▶│   CLI    │
//! │ record types  │   │ registry · header    │   │ (vsearch)│
//! │ infra · theme │   └──────────┬───────────┘   └──────────┘
//! └──────────────┘              ▼
//!                          ┌──────────┐
//!                          │   HTTP   │
//!                          └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`catalog`] | Record-type registry built from config |
//! | [`header_cmd`] | Header layout and stylesheet commands |
//! | [`server`] | JSON HTTP API |

pub mod catalog;
pub mod config;
pub mod header_cmd;
pub mod server;

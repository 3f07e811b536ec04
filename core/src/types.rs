//! Domain DTOs for the character and settings endpoints.
//!
//! # Design
//! `Character` is decoded with the wire's own field names. The menu
//! envelope is decoded after `KeyDecoding::ConvertFromSnakeCase` has
//! rewritten the keys, so its structs declare camelCase names through
//! `rename_all`. Extra fields on the wire are ignored.

use serde::{Deserialize, Serialize};

/// A character as returned by `GET /character/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub species: String,
    pub gender: String,
}

/// Envelope returned by `GET /parameter/biller/menus`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MenuEnvelope {
    pub timestamp: String,
    pub trace_id: String,
    pub source_system: String,
    pub response_key: String,
    pub message: LocalizedMessage,
    pub data: Vec<MenuEntry>,
}

/// Status message in Indonesian and English.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedMessage {
    pub title_idn: String,
    pub title_eng: String,
    pub desc_idn: String,
    pub desc_eng: String,
}

/// One biller menu entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub menu_biller_id: i64,
    pub category_biller_id: String,
    pub label_eng: String,
    pub label_idn: String,
    pub service_category: i64,
    pub others_category: String,
    pub no_order: i64,
    pub service_route: String,
    pub menu_biller_code: String,
    pub icon1: String,
    pub icon2: String,
    pub icon3: String,
}

//! Task data structure.
//!
//! This module defines the core `Task` struct that represents a single
//! to-do entry. The whole list is serialized as a JSON array of these
//! records, so the field set here is the on-disk schema.

use serde::{Deserialize, Serialize};

/// A single to-do entry.
///
/// `id` is unique for the life of the list and derives from the creation
/// time in milliseconds (see `TaskStore::add` for collision handling).
/// `text` holds whatever the user typed, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

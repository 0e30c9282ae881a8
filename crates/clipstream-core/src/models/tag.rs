use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A free-text tag. Names are unique case-insensitively; lookup and creation
/// go through `TagIndex::find_or_create`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

use serde::{Deserialize, Deserializer, Serialize};

/// The persisted todo entity. An empty id on create is replaced by a
/// store-assigned one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Form payload for the create and edit pages.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "checkbox")]
    pub completed: bool,
}

impl ItemForm {
    pub fn into_item(self) -> Item {
        let description = self.description.trim();
        Item {
            id: self.id,
            name: self.name.trim().to_string(),
            description: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
            completed: self.completed,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub id: String,
}

// HTML checkboxes post "on" when ticked and nothing at all otherwise.
fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(matches!(raw.as_str(), "on" | "true" | "1"))
}

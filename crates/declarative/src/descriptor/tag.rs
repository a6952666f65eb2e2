use super::set;
use crate::schema::Fields;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagDescriptor {
    pub name: String,
    pub color: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

// Tags have no variant groups.
impl Fields for TagDescriptor {
    fn populated(&self, _field: &str) -> bool {
        false
    }
}

impl TagDescriptor {
    pub(crate) fn compose(&self) -> TagPayload {
        TagPayload {
            name: self.name.clone(),
            color: set(&self.color),
            comments: set(&self.comments),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compose_skips_unset() {
        let d = TagDescriptor {
            name: "ghost".into(),
            color: Some(String::new()),
            comments: None,
        };
        assert_eq!(serde_json::to_value(d.compose()).unwrap(), json!({"name": "ghost"}));
    }

    #[test]
    fn test_compose_full() {
        let d = TagDescriptor {
            name: "prod".into(),
            color: Some("Red".into()),
            comments: Some("production".into()),
        };
        assert_eq!(
            serde_json::to_value(d.compose()).unwrap(),
            json!({"name": "prod", "color": "Red", "comments": "production"})
        );
    }
}

use super::{Reference, filled, set};
use crate::schema::Fields;
use sasekit::ResourceKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AddressGroupDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub tag: Vec<String>,
    #[serde(rename = "static")]
    pub static_members: Vec<String>,
    pub dynamic: Option<DynamicFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DynamicFilter {
    /// Tag expression, e.g. `'web' and 'prod'`
    pub filter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupMembers {
    Static(Vec<String>),
    Dynamic(DynamicFilter),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressGroupPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
    #[serde(flatten)]
    pub members: GroupMembers,
}

impl Fields for AddressGroupDescriptor {
    fn populated(&self, field: &str) -> bool {
        match field {
            "description" => filled(&self.description),
            "static" => !self.static_members.is_empty(),
            "dynamic.filter" => self.dynamic.as_ref().is_some_and(|d| !d.filter.is_empty()),
            _ => false,
        }
    }
}

impl AddressGroupDescriptor {
    pub(crate) fn compose(&self) -> AddressGroupPayload {
        let members = match &self.dynamic {
            Some(dynamic) if self.static_members.is_empty() => GroupMembers::Dynamic(dynamic.clone()),
            _ => GroupMembers::Static(self.static_members.clone()),
        };

        AddressGroupPayload {
            name: self.name.clone(),
            description: set(&self.description),
            tag: self.tag.clone(),
            members,
        }
    }

    pub(crate) fn references(&self) -> Vec<Reference> {
        self.static_members
            .iter()
            .map(|m| Reference::new(ResourceKind::Address, m))
            .chain(self.tag.iter().map(|t| Reference::new(ResourceKind::Tag, t)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_compose_static() {
        let d: AddressGroupDescriptor =
            serde_json::from_value(json!({"name": "g", "static": ["a", "b"]})).unwrap();
        assert_eq!(
            serde_json::to_value(d.compose()).unwrap(),
            json!({"name": "g", "static": ["a", "b"]})
        );
    }

    #[test]
    fn test_compose_dynamic() {
        let d: AddressGroupDescriptor = serde_json::from_value(json!({
            "name": "g",
            "description": "web servers",
            "dynamic": {"filter": "'web' and 'prod'"}
        }))
        .unwrap();
        assert_eq!(
            serde_json::to_value(d.compose()).unwrap(),
            json!({
                "name": "g",
                "description": "web servers",
                "dynamic": {"filter": "'web' and 'prod'"}
            })
        );
    }

    #[test]
    fn test_references_members_and_tags() {
        let d: AddressGroupDescriptor =
            serde_json::from_value(json!({"name": "g", "static": ["a"], "tag": ["t"]})).unwrap();
        assert_eq!(
            d.references(),
            vec![
                Reference::new(ResourceKind::Address, "a"),
                Reference::new(ResourceKind::Tag, "t"),
            ]
        );
    }
}

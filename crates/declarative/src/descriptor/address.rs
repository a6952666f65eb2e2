use super::{Reference, filled, set};
use crate::schema::Fields;
use sasekit::ResourceKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AddressDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub tag: Vec<String>,
    pub fqdn: Option<String>,
    pub ip_netmask: Option<String>,
    pub ip_range: Option<String>,
    pub ip_wildcard: Option<String>,
}

/// The one populated address value, under its wire key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressValue {
    Fqdn(String),
    IpNetmask(String),
    IpRange(String),
    IpWildcard(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
    #[serde(flatten)]
    pub value: AddressValue,
}

impl Fields for AddressDescriptor {
    fn populated(&self, field: &str) -> bool {
        match field {
            "description" => filled(&self.description),
            "fqdn" => filled(&self.fqdn),
            "ip_netmask" => filled(&self.ip_netmask),
            "ip_range" => filled(&self.ip_range),
            "ip_wildcard" => filled(&self.ip_wildcard),
            _ => false,
        }
    }
}

impl AddressDescriptor {
    pub(crate) fn compose(&self) -> AddressPayload {
        let value = if let Some(fqdn) = set(&self.fqdn) {
            AddressValue::Fqdn(fqdn)
        } else if let Some(netmask) = set(&self.ip_netmask) {
            AddressValue::IpNetmask(netmask)
        } else if let Some(range) = set(&self.ip_range) {
            AddressValue::IpRange(range)
        } else {
            AddressValue::IpWildcard(self.ip_wildcard.clone().unwrap_or_default())
        };

        AddressPayload {
            name: self.name.clone(),
            description: set(&self.description),
            tag: self.tag.clone(),
            value,
        }
    }

    pub(crate) fn references(&self) -> Vec<Reference> {
        self.tag
            .iter()
            .map(|t| Reference::new(ResourceKind::Tag, t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_compose_netmask() {
        let d = AddressDescriptor {
            name: "Ansible Test".into(),
            ip_netmask: Some("100.10.254.0/24".into()),
            description: Some("d".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(d.compose()).unwrap(),
            json!({
                "name": "Ansible Test",
                "description": "d",
                "ip_netmask": "100.10.254.0/24"
            })
        );
    }

    #[test]
    fn test_compose_ignores_empty_variants() {
        let d = AddressDescriptor {
            name: "web".into(),
            fqdn: Some(String::new()),
            ip_range: Some("10.0.0.1-10.0.0.9".into()),
            tag: vec!["prod".into()],
            ..Default::default()
        };
        let payload = d.compose();
        assert_eq!(payload.value, AddressValue::IpRange("10.0.0.1-10.0.0.9".into()));
        assert_eq!(
            serde_json::to_value(payload).unwrap(),
            json!({"name": "web", "tag": ["prod"], "ip_range": "10.0.0.1-10.0.0.9"})
        );
    }

    #[test]
    fn test_references_tags() {
        let d = AddressDescriptor {
            name: "web".into(),
            tag: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        assert_eq!(d.references().len(), 2);
        assert_eq!(d.references()[0].kind, ResourceKind::Tag);
    }
}

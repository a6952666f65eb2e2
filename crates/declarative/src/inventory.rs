//! Remote inventory index - what exists in a folder, looked up by name
//!
//! Always fetched fresh; never cached across reconciliations. Lookup is a
//! linear scan, which is fine for folder-sized listings.

use crate::error::Result;
use sasekit::{Folder, RemoteObject, ResourceKind, Session};

/// Objects of one kind in one folder, in listing order
#[derive(Debug, Clone)]
pub struct Inventory {
    kind: ResourceKind,
    folder: Folder,
    objects: Vec<RemoteObject>,
}

impl Inventory {
    /// List the folder through the session
    ///
    /// Transport and authentication failures propagate unchanged.
    pub fn fetch(session: &dyn Session, kind: ResourceKind, folder: Folder) -> Result<Self> {
        let objects = session.list(kind, folder)?;
        log::debug!("{} {} object(s) in {}", objects.len(), kind, folder);
        Ok(Self::from_objects(kind, folder, objects))
    }

    pub fn from_objects(kind: ResourceKind, folder: Folder, objects: Vec<RemoteObject>) -> Self {
        Self {
            kind,
            folder,
            objects,
        }
    }

    /// First object whose name matches exactly (case-sensitive)
    pub fn find(&self, name: &str) -> Option<&RemoteObject> {
        find_by_name(&self.objects, name)
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn folder(&self) -> Folder {
        self.folder
    }

    pub fn objects(&self) -> &[RemoteObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// First object named `name` in listing order
pub fn find_by_name<'a>(objects: &'a [RemoteObject], name: &str) -> Option<&'a RemoteObject> {
    objects.iter().find(|o| o.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sasekit::{MockSession, Verb};
    use serde_json::json;

    fn object(id: &str, name: &str) -> RemoteObject {
        RemoteObject::from_value(json!({"id": id, "name": name})).unwrap()
    }

    #[test]
    fn test_find_is_exact_and_case_sensitive() {
        let objects = vec![object("1", "Web"), object("2", "web-1")];
        assert!(find_by_name(&objects, "web").is_none());
        assert_eq!(find_by_name(&objects, "Web").unwrap().id, "1");
        assert_eq!(find_by_name(&objects, "web-1").unwrap().id, "2");
    }

    #[test]
    fn test_find_first_match_wins() {
        let objects = vec![object("1", "dup"), object("2", "dup")];
        assert_eq!(find_by_name(&objects, "dup").unwrap().id, "1");
    }

    #[test]
    fn test_fetch_lists_every_time() {
        let session = MockSession::new();
        session.seed(ResourceKind::Tag, Folder::Shared, json!({"name": "a"}));

        let first = Inventory::fetch(&session, ResourceKind::Tag, Folder::Shared).unwrap();
        assert_eq!(first.len(), 1);
        assert!(first.find("a").is_some());

        session.seed(ResourceKind::Tag, Folder::Shared, json!({"name": "b"}));
        let second = Inventory::fetch(&session, ResourceKind::Tag, Folder::Shared).unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(session.calls(Verb::List), 2);
        assert_eq!(second.kind(), ResourceKind::Tag);
        assert_eq!(second.folder(), Folder::Shared);
    }

    #[test]
    fn test_fetch_propagates_failure() {
        let session = MockSession::new();
        session.fail_list("connection refused");
        let err = Inventory::fetch(&session, ResourceKind::Tag, Folder::Shared).unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use super::Document;
use crate::core::PbxError;
use crate::store::{FsStore, ProjectStore};
use crate::utils::path::absolutize;

/// Hands out one shared [`Document`] per project location.
///
/// Locations are made absolute and normalized before lookup, so
/// `App/../App/App.xcodeproj/project.pbxproj` and the plain spelling resolve
/// to the same instance. A registry lives as long as the caller keeps it;
/// tests create a fresh one each.
pub struct DocumentRegistry {
    store: Rc<dyn ProjectStore>,
    documents: HashMap<PathBuf, Rc<RefCell<Document>>>,
}

impl DocumentRegistry {
    /// Creates a registry loading documents through `store`.
    pub fn new(store: Rc<dyn ProjectStore>) -> Self {
        Self {
            store,
            documents: HashMap::new(),
        }
    }

    /// Creates a registry backed by the file system.
    #[must_use]
    pub fn with_filesystem() -> Self {
        Self::new(Rc::new(FsStore::new()))
    }

    /// Returns the document at `location`, loading it on first use.
    ///
    /// A project file that does not exist still yields a document; check
    /// [`Document::is_loaded`].
    pub fn get(&mut self, location: impl AsRef<Path>) -> Result<Rc<RefCell<Document>>, PbxError> {
        let key = absolutize(location.as_ref());

        if let Some(document) = self.documents.get(&key) {
            return Ok(Rc::clone(document));
        }

        debug!("Loading project {}", key.display());
        let document = Rc::new(RefCell::new(Document::load(key.clone(), Rc::clone(&self.store))?));
        self.documents.insert(key, Rc::clone(&document));
        Ok(document)
    }

    /// Number of documents loaded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no document has been loaded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_utils::fixtures::{APP_LOCATION, app_project};

    #[test]
    fn test_same_location_shares_instance() -> Result<(), PbxError> {
        let store = Rc::new(MemoryStore::new());
        store.insert(APP_LOCATION, app_project());
        let mut registry = DocumentRegistry::new(store);

        let a = registry.get(APP_LOCATION)?;
        let b = registry.get("/work/App/../App/App.xcodeproj/./project.pbxproj")?;
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);

        a.borrow_mut().set_active_target("App");
        assert_eq!(b.borrow().active_target_name(), Some("App"));
        Ok(())
    }

    #[test]
    fn test_missing_location_is_cached_unloaded() -> Result<(), PbxError> {
        let mut registry = DocumentRegistry::new(Rc::new(MemoryStore::new()));
        let document = registry.get("/nowhere/X.xcodeproj/project.pbxproj")?;
        assert!(!document.borrow().is_loaded());
        assert!(!registry.is_empty());
        Ok(())
    }
}

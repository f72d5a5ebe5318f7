//! Project documents.
//!
//! A [`Document`] owns the raw text of one `project.pbxproj` file. The text is
//! the only source of truth: there is no structured model kept in sync with
//! it. Queries re-derive what they need by searching the text, and mutations
//! build a new text and hand it back through [`Document::set_text`], which
//! drops every derived value cached on the document's targets.
//!
//! Documents are obtained from a [`DocumentRegistry`], which hands out one
//! shared instance per normalized location so that two references to the
//! same project within a run see each other's edits.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pbxlink_cli::document::DocumentRegistry;
//!
//! # fn example() -> Result<(), pbxlink_cli::core::PbxError> {
//! let mut registry = DocumentRegistry::with_filesystem();
//! let project = registry.get("App/App.xcodeproj/project.pbxproj")?;
//!
//! let mut project = project.borrow_mut();
//! project.set_active_target("App");
//! if let Some(target) = project.active_target() {
//!     for path in target.dependency_paths()? {
//!         println!("{path}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod registry;
pub(crate) mod sections;

pub use registry::DocumentRegistry;

use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, error, info};

use crate::constants::{PBXPROJ_FILE_NAME, XCODEPROJ_EXTENSION};
use crate::core::PbxError;
use crate::store::ProjectStore;
use crate::target::{TargetState, TargetView, resolve_identifier};

use sections::{capture_one, compile, esc};

/// The text of one project file plus lazily derived state.
pub struct Document {
    location: PathBuf,
    store: Rc<dyn ProjectStore>,
    text: Option<String>,
    project_name: String,
    active_target: Option<String>,
    format_version: OnceCell<Result<u32, PbxError>>,
    targets: HashMap<String, TargetState>,
    target_names_by_id: HashMap<String, String>,
    target_order: Vec<String>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("location", &self.location)
            .field("project_name", &self.project_name)
            .field("loaded", &self.text.is_some())
            .field("active_target", &self.active_target)
            .field("targets", &self.target_order)
            .finish()
    }
}

impl Document {
    /// Loads the document stored at `location`.
    ///
    /// A missing file is not an error: the document is returned in a not
    /// loaded state and every text-dependent operation reports
    /// [`PbxError::BackingStoreUnavailable`]. Only store failures are
    /// returned as errors.
    pub fn load(location: impl Into<PathBuf>, store: Rc<dyn ProjectStore>) -> Result<Self, PbxError> {
        let location = location.into();
        let text = store.read(&location)?;

        let mut document = Self {
            project_name: project_name_for(&location),
            location,
            store,
            text,
            active_target: None,
            format_version: OnceCell::new(),
            targets: HashMap::new(),
            target_names_by_id: HashMap::new(),
            target_order: Vec::new(),
        };

        if document.text.is_none() {
            error!(
                "Can't recover: unable to load the project data, check the path: \"{}\"",
                document.location.display()
            );
        } else {
            document.gather_all_targets()?;
        }

        Ok(document)
    }

    /// Location the document was loaded from.
    #[must_use]
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Project name derived from the enclosing `.xcodeproj` directory.
    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// The `.xcodeproj` bundle containing the project file.
    #[must_use]
    pub fn xcodeproj_path(&self) -> &Path {
        self.location.parent().unwrap_or_else(|| Path::new(""))
    }

    /// The directory containing the `.xcodeproj` bundle.
    #[must_use]
    pub fn project_dir(&self) -> &Path {
        self.xcodeproj_path().parent().unwrap_or_else(|| Path::new(""))
    }

    /// Whether the project file existed when the document was loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.text.is_some()
    }

    /// The current in-memory text, or `None` when the file did not exist.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The current text, or [`PbxError::BackingStoreUnavailable`].
    pub fn require_text(&self) -> Result<&str, PbxError> {
        self.text.as_deref().ok_or_else(|| PbxError::BackingStoreUnavailable {
            path: self.location.display().to_string(),
        })
    }

    /// Replaces the in-memory text, persisting it when `flush` is true.
    ///
    /// Setting identical text without `flush` is a no-op. Any change drops
    /// the values cached by this document's targets.
    pub fn set_text(&mut self, new_text: String, flush: bool) -> Result<(), PbxError> {
        let changed = self.text.as_deref() != Some(new_text.as_str());

        if !changed && !flush {
            return Ok(());
        }

        if changed {
            self.text = Some(new_text);
            self.invalidate_derived();
        }

        if flush {
            let text = self.require_text()?;
            self.store.write(&self.location, text)?;
            info!("Saved {}", self.location.display());
        }

        Ok(())
    }

    /// Persists the current text to the store.
    pub fn flush(&mut self) -> Result<(), PbxError> {
        let text = self.require_text()?.to_string();
        self.set_text(text, true)
    }

    /// Name of the active target, if one was set.
    #[must_use]
    pub fn active_target_name(&self) -> Option<&str> {
        self.active_target.as_deref()
    }

    /// Selects the target subsequent target-relative operations act on.
    pub fn set_active_target(&mut self, name: impl Into<String>) {
        self.active_target = Some(name.into());
    }

    /// The active target's view, or `None` when no active target is set.
    pub fn active_target(&mut self) -> Option<TargetView<'_>> {
        let name = self.active_target.clone()?;
        Some(self.target_by_name(&name))
    }

    /// Returns the view for the target called `name`.
    ///
    /// If `name` is already known as a target identifier, the view of that
    /// target is returned instead: callers holding an identifier can use it
    /// wherever a name is expected.
    pub fn target_by_name(&mut self, name: &str) -> TargetView<'_> {
        let key = match self.target_names_by_id.get(name) {
            Some(target_name) => target_name.clone(),
            None => {
                if !self.targets.contains_key(name) {
                    self.register_target(name);
                }
                name.to_string()
            }
        };

        let this: &Self = self;
        TargetView::new(this, &this.targets[&key])
    }

    /// Names of the targets listed by the project object, in file order.
    #[must_use]
    pub fn target_names(&self) -> &[String] {
        &self.target_order
    }

    /// The project file format version (`objectVersion`).
    pub fn format_version(&self) -> Result<u32, PbxError> {
        self.format_version
            .get_or_init(|| {
                let text = self.require_text()?;
                let version = capture_one(r"\tobjectVersion = ([0-9]+);", text)?;

                match version.and_then(|v| v.parse::<u32>().ok()) {
                    Some(version) => Ok(version),
                    None => {
                        error!(
                            "Can't recover: unable to find the project version at: {}",
                            self.location.display()
                        );
                        Err(PbxError::not_found("the objectVersion entry", &self.project_name))
                    }
                }
            })
            .clone()
    }

    /// The seed used to derive identifier families for `target`.
    #[must_use]
    pub fn unique_id_for_target(&self, target: &str) -> String {
        format!("{}:{}", self.location.display(), target)
    }

    /// Dependency names of the target called `target`.
    pub fn dependency_names_for_target(&mut self, target: &str) -> Result<Vec<String>, PbxError> {
        self.target_by_name(target).dependency_names().map(<[String]>::to_vec)
    }

    /// `path:remoteId` dependency strings of the target called `target`.
    pub fn dependency_paths_for_target(&mut self, target: &str) -> Result<Vec<String>, PbxError> {
        Ok(self
            .target_by_name(target)
            .dependency_paths()?
            .iter()
            .map(ToString::to_string)
            .collect())
    }

    fn register_target(&mut self, name: &str) {
        let identifier = match self.text.as_deref() {
            Some(text) => resolve_identifier(text, name, &self.project_name, &self.location).ok(),
            None => None,
        };

        if let Some(id) = &identifier {
            self.target_names_by_id.insert(id.clone(), name.to_string());
        }
        self.targets.insert(name.to_string(), TargetState::new(name, identifier));
    }

    fn gather_all_targets(&mut self) -> Result<(), PbxError> {
        let text = self.require_text()?;

        let Some(list) = capture_one(r"targets = \(\n((?s:.+?))\);", text)? else {
            error!("Couldn't find any targets in {}", self.location.display());
            return Ok(());
        };

        let entry = compile(r"([A-Z0-9]+) /\* (.+?) \*/")?;
        let found: Vec<(String, String)> = entry
            .captures_iter(&list)
            .map(|c| (c[1].to_string(), c[2].to_string()))
            .collect();

        if found.is_empty() {
            error!("Unable to read the targets of {}", self.location.display());
            return Ok(());
        }

        for (id, name) in found {
            debug!("Found target {name} ({id}) in {}", self.project_name);
            self.target_names_by_id.insert(id.clone(), name.clone());
            self.targets.insert(name.clone(), TargetState::new(&name, Some(id)));
            self.target_order.push(name);
        }

        Ok(())
    }

    fn invalidate_derived(&mut self) {
        self.format_version = OnceCell::new();
        for state in self.targets.values_mut() {
            state.invalidate();
        }
    }

    /// Escaped project name for use inside patterns.
    pub(crate) fn escaped_project_name(&self) -> String {
        esc(&self.project_name)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\t   path: \"{}\"\n\ttargets:", self.location.display())?;
        for name in &self.target_order {
            let id = self.targets.get(name).and_then(TargetState::known_identifier).unwrap_or("?");
            write!(f, "\n            -> {name} ({id})")?;
        }
        if let Some(active) = &self.active_target {
            write!(f, "\n  active target: {active}")?;
        }
        Ok(())
    }
}

/// Project name for a `.../Name.xcodeproj/project.pbxproj` location.
fn project_name_for(location: &Path) -> String {
    let bundle = location
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let suffix = format!(".{XCODEPROJ_EXTENSION}");
    bundle.strip_suffix(&suffix).map(str::to_string).unwrap_or(bundle)
}

/// Resolves a user-supplied project path to its `project.pbxproj` file.
///
/// Accepts either the `.xcodeproj` bundle or the file itself.
#[must_use]
pub fn pbxproj_location(path: &Path) -> PathBuf {
    let is_bundle = path.extension().is_some_and(|ext| ext == XCODEPROJ_EXTENSION);
    if is_bundle {
        path.join(PBXPROJ_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

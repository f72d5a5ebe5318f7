//! Lazily resolved views of native targets.
//!
//! A [`TargetView`] answers questions about one `PBXNativeTarget` in a
//! [`Document`]: its identifier, configuration list, build phases,
//! dependencies and product. Each answer is found by an anchored search
//! against the current text the first time it is asked for, then memoized in
//! the target's state until the document text changes.
//!
//! Failures are memoized too. An accessor that cannot find its anchor logs
//! a diagnostic once and keeps returning the same [`PbxError`]; callers
//! decide whether that aborts their operation.

use std::cell::OnceCell;
use std::fmt;
use std::path::Path;

use tracing::{debug, error};

use crate::core::PbxError;
use crate::document::Document;
use crate::document::sections::{capture_one, captures, compile, esc, unquote};

/// One entry of a target's configuration list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationRef {
    /// Identifier of the `XCBuildConfiguration` record.
    pub id: String,
    /// Label of the configuration, e.g. `Debug`.
    pub label: String,
}

/// A target's product reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRef {
    /// Identifier of the product's file reference.
    pub id: String,
    /// File name of the product, e.g. `libLib.a`.
    pub name: String,
}

/// A dependency on a target living in another project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyPath {
    /// Path of the other `.xcodeproj`, relative to this project's directory.
    pub project_path: String,
    /// Identifier of the target inside the other project.
    pub remote_target_id: String,
}

impl fmt::Display for DependencyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.project_path, self.remote_target_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BuildPhases {
    resources: Option<String>,
    frameworks: Option<String>,
}

type Memo<T> = OnceCell<Result<T, PbxError>>;

/// Cached state for one target, owned by its [`Document`].
#[derive(Debug)]
pub(crate) struct TargetState {
    name: String,
    known_identifier: Option<String>,
    identifier: Memo<String>,
    configuration_list: Memo<String>,
    configurations: Memo<Vec<ConfigurationRef>>,
    build_phases: Memo<BuildPhases>,
    dependency_ids: Memo<Vec<String>>,
    dependency_names: Memo<Vec<String>>,
    dependency_paths: Memo<Vec<DependencyPath>>,
    product: Memo<ProductRef>,
}

impl TargetState {
    pub(crate) fn new(name: &str, known_identifier: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            known_identifier,
            identifier: OnceCell::new(),
            configuration_list: OnceCell::new(),
            configurations: OnceCell::new(),
            build_phases: OnceCell::new(),
            dependency_ids: OnceCell::new(),
            dependency_names: OnceCell::new(),
            dependency_paths: OnceCell::new(),
            product: OnceCell::new(),
        }
    }

    pub(crate) fn known_identifier(&self) -> Option<&str> {
        self.known_identifier.as_deref()
    }

    /// Drops every derived value. The identifier learned from the project's
    /// target list is kept.
    pub(crate) fn invalidate(&mut self) {
        let name = std::mem::take(&mut self.name);
        let known = self.known_identifier.take();
        *self = Self::new(&name, known);
    }
}

fn memo<'c, T>(cell: &'c Memo<T>, resolve: impl FnOnce() -> Result<T, PbxError>) -> Result<&'c T, PbxError> {
    cell.get_or_init(resolve).as_ref().map_err(Clone::clone)
}

/// Finds the identifier of the native target called `name`.
pub(crate) fn resolve_identifier(
    text: &str,
    name: &str,
    project: &str,
    location: &Path,
) -> Result<String, PbxError> {
    let pattern = format!(r"([A-Z0-9]+) /\* {} \*/ = \{{\n[ \t]+isa = PBXNativeTarget;(?s:.+?)buildPhases =", esc(name));

    match capture_one(&pattern, text)? {
        Some(id) => Ok(id),
        None => {
            error!(
                "Can't recover: unable to find the identifier for the target named \"{name}\" in the project loaded from: {}",
                location.display()
            );
            Err(PbxError::not_found(format!("the target '{name}'"), project))
        }
    }
}

/// Read-only view of one target within a [`Document`].
pub struct TargetView<'a> {
    document: &'a Document,
    state: &'a TargetState,
}

impl fmt::Debug for TargetView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetView")
            .field("project", &self.document.project_name())
            .field("name", &self.state.name)
            .finish()
    }
}

impl<'a> TargetView<'a> {
    pub(crate) const fn new(document: &'a Document, state: &'a TargetState) -> Self {
        Self { document, state }
    }

    /// The target's name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.state.name
    }

    /// The document this target belongs to.
    #[must_use]
    pub const fn document(&self) -> &'a Document {
        self.document
    }

    fn text(&self) -> Result<&'a str, PbxError> {
        self.document.require_text()
    }

    fn project(&self) -> &'a str {
        self.document.project_name()
    }

    fn escaped_name(&self) -> String {
        esc(&self.state.name)
    }

    /// The target's identifier.
    pub fn identifier(&self) -> Result<&'a str, PbxError> {
        let state: &'a TargetState = self.state;
        if let Some(id) = state.known_identifier.as_deref() {
            return Ok(id);
        }

        memo(&state.identifier, || {
            resolve_identifier(self.text()?, self.name(), self.project(), self.document.location())
        })
        .map(String::as_str)
    }

    /// Identifier of the target's `XCConfigurationList`.
    pub fn configuration_list(&self) -> Result<&'a str, PbxError> {
        let state: &'a TargetState = self.state;
        memo(&state.configuration_list, || {
            let pattern = format!(
                r#"[A-Z0-9]+ /\* {n} \*/ = \{{\n[ \t]+isa = PBXNativeTarget;(?s:.+?)buildConfigurationList = ([A-Z0-9]+) /\* Build configuration list for PBXNativeTarget "{n}" \*/;"#,
                n = self.escaped_name()
            );
            capture_one(&pattern, self.text()?)?.ok_or_else(|| {
                error!("Couldn't find the configuration list of target \"{}\"", self.name());
                PbxError::not_found(format!("the configuration list of target '{}'", self.name()), self.project())
            })
        })
        .map(String::as_str)
    }

    /// The target's build configurations, in list order.
    pub fn configurations(&self) -> Result<&'a [ConfigurationRef], PbxError> {
        let state: &'a TargetState = self.state;
        memo(&state.configurations, || {
            let list_id = self.configuration_list()?;
            let pattern = format!(
                r#"{} /\* Build configuration list for PBXNativeTarget "{}" \*/ = \{{\n[ \t]+isa = XCConfigurationList;\n[ \t]+buildConfigurations = \(\n((?s:.+?))\);"#,
                esc(list_id),
                self.escaped_name()
            );

            let Some(list) = capture_one(&pattern, self.text()?)? else {
                error!("Couldn't find the configuration list for the project.");
                return Err(PbxError::not_found(
                    format!("the build configurations of target '{}'", self.name()),
                    self.project(),
                ));
            };

            let entry = compile(r"[ \t]+([A-Z0-9]+) /\* (.+) \*/,\n")?;
            Ok(entry
                .captures_iter(&list)
                .map(|c| ConfigurationRef {
                    id: c[1].to_string(),
                    label: c[2].to_string(),
                })
                .collect())
        })
        .map(Vec::as_slice)
    }

    fn build_phases(&self) -> Result<&'a BuildPhases, PbxError> {
        let state: &'a TargetState = self.state;
        memo(&state.build_phases, || {
            let pattern = format!(
                r"[A-Z0-9]+ /\* {} \*/ = \{{\n[ \t]+isa = PBXNativeTarget;(?s:.+?)buildPhases = \(\n((?s:.+?))\);",
                self.escaped_name()
            );

            let Some(phases) = capture_one(&pattern, self.text()?)? else {
                error!(
                    "Can't recover: unable to find the build phases for the target named \"{}\" in the project loaded from: {}",
                    self.name(),
                    self.document.location().display()
                );
                return Err(PbxError::not_found(
                    format!("the build phases of target '{}'", self.name()),
                    self.project(),
                ));
            };

            Ok(BuildPhases {
                resources: capture_one(r"([A-Z0-9]+) /\* Resources \*/", &phases)?,
                frameworks: capture_one(r"([A-Z0-9]+) /\* Frameworks \*/", &phases)?,
            })
        })
    }

    /// Identifier of the Resources build phase; `None` when the target has none.
    pub fn resources_phase(&self) -> Result<Option<&'a str>, PbxError> {
        Ok(self.build_phases()?.resources.as_deref())
    }

    /// Identifier of the Frameworks build phase.
    ///
    /// # Errors
    ///
    /// [`PbxError::NotFound`] when the target has no "Link Binary With
    /// Libraries" phase.
    pub fn frameworks_phase(&self) -> Result<&'a str, PbxError> {
        match self.build_phases()?.frameworks.as_deref() {
            Some(id) => Ok(id),
            None => {
                error!(
                    "Couldn't find the Frameworks phase for the target named \"{}\" in the project loaded from: {}",
                    self.name(),
                    self.document.location().display()
                );
                error!("Please add a New Link Binary With Libraries Build Phase to your target");
                error!("Right click your target in the project, then click Add, then New Build Phase,");
                error!("  \"New Link Binary With Libraries Build Phase\"");
                Err(PbxError::not_found(
                    format!("the Frameworks build phase of target '{}'", self.name()),
                    self.project(),
                ))
            }
        }
    }

    /// Identifiers of the target's `PBXTargetDependency` records, in order.
    ///
    /// Empty, not an error, for a target without dependencies.
    pub fn dependency_ids(&self) -> Result<&'a [String], PbxError> {
        let state: &'a TargetState = self.state;
        memo(&state.dependency_ids, || {
            let pattern = format!(
                r"{} /\* {} \*/ = \{{\n[ \t]+isa = PBXNativeTarget;(?s:.+?)dependencies = \(\n((?:[ \t]+[A-Z0-9]+ /\* PBXTargetDependency \*/,\n)*)[ \t]*\);\n",
                esc(self.identifier()?),
                self.escaped_name()
            );

            let Some(set) = capture_one(&pattern, self.text()?)? else {
                error!("Unable to get dependencies from: {}", self.document.location().display());
                return Err(PbxError::not_found(
                    format!("the dependency list of target '{}'", self.name()),
                    self.project(),
                ));
            };

            let entry = compile(r"[ \t]+([A-Z0-9]+) /\* PBXTargetDependency \*/,\n")?;
            Ok(entry.captures_iter(&set).map(|c| c[1].to_string()).collect())
        })
        .map(Vec::as_slice)
    }

    /// Names of the target's dependencies.
    ///
    /// Dependencies whose record carries no `name` are skipped.
    pub fn dependency_names(&self) -> Result<&'a [String], PbxError> {
        let state: &'a TargetState = self.state;
        memo(&state.dependency_names, || {
            let text = self.text()?;
            let mut names = Vec::new();

            for id in self.dependency_ids()? {
                let pattern = format!(
                    r#"{} /\* PBXTargetDependency \*/ = \{{\n[ \t]+isa = PBXTargetDependency;\n[ \t]*name = (["a-zA-Z0-9\.\-]+);"#,
                    esc(id)
                );
                match capture_one(&pattern, text)? {
                    Some(name) => names.push(name),
                    None => debug!("Target dependency {id} has no name"),
                }
            }

            Ok(names)
        })
        .map(Vec::as_slice)
    }

    /// The projects and remote targets this target depends on.
    ///
    /// Each dependency is followed through its container item proxy to the
    /// file reference of the other project. A dependency whose proxy cannot
    /// be found is dropped with a diagnostic. A proxy whose project file
    /// reference cannot be found fails the whole call.
    pub fn dependency_paths(&self) -> Result<&'a [DependencyPath], PbxError> {
        let state: &'a TargetState = self.state;
        memo(&state.dependency_paths, || {
            let ids = self.dependency_ids()?;
            if ids.is_empty() {
                return Ok(Vec::new());
            }

            let text = self.text()?;

            let mut proxies = Vec::new();
            for id in ids {
                let pattern = format!(
                    r"{} /\* PBXTargetDependency \*/ = \{{\n(?s:.+?)targetProxy = ([A-Z0-9]+) /\* PBXContainerItemProxy \*/;",
                    esc(id)
                );
                match capture_one(&pattern, text)? {
                    Some(proxy) => proxies.push(proxy),
                    None => error!("Unable to find the target proxy for dependency: {id}"),
                }
            }

            let mut portals = Vec::new();
            for proxy in &proxies {
                let pattern = format!(
                    r"{} /\* PBXContainerItemProxy \*/ = \{{\n(?s:.+?)containerPortal = ([A-Z0-9]+) /\* .+? \*/;(?s:.+?)remoteGlobalIDString = ([A-Z0-9]+)",
                    esc(proxy)
                );
                match captures(&pattern, text)? {
                    Some(c) => portals.push((c[1].to_string(), c[2].to_string())),
                    None => error!("Unable to find the container portal for proxy: {proxy}"),
                }
            }

            let mut paths = Vec::new();
            for (portal, remote) in &portals {
                let pattern = format!(
                    r#"{} /\* .+? \*/ = \{{isa = PBXFileReference; lastKnownFileType = "wrapper\.pb-project"; name = .+?; path = (.+?); sourceTree = .+?; \}};"#,
                    esc(portal)
                );
                match capture_one(&pattern, text)? {
                    Some(path) => paths.push(DependencyPath {
                        project_path: unquote(&path).to_string(),
                        remote_target_id: remote.clone(),
                    }),
                    None => error!("Unable to find the path for identifier: {portal}"),
                }
            }

            if paths.len() != portals.len() {
                error!("Unable to load all dependency information from the project.");
                return Err(PbxError::inconsistent(
                    format!(
                        "resolved {} of {} dependency project paths for target '{}'",
                        paths.len(),
                        portals.len(),
                        self.name()
                    ),
                    self.project(),
                ));
            }

            Ok(paths)
        })
        .map(Vec::as_slice)
    }

    /// The target's product reference.
    pub fn product(&self) -> Result<&'a ProductRef, PbxError> {
        let state: &'a TargetState = self.state;
        memo(&state.product, || {
            let pattern = format!(
                r"{} /\* {} \*/ = \{{\n[ \t]+isa = PBXNativeTarget;(?s:.+?)productReference = ([A-Z0-9]+) /\* (.+?) \*/;",
                esc(self.identifier()?),
                self.escaped_name()
            );

            match captures(&pattern, self.text()?)? {
                Some(c) => Ok(ProductRef {
                    id: c[1].to_string(),
                    name: c[2].to_string(),
                }),
                None => {
                    error!("Unable to get the product of target \"{}\" from: {}", self.name(), self.document.location().display());
                    Err(PbxError::not_found(
                        format!("the product of target '{}'", self.name()),
                        self.project(),
                    ))
                }
            }
        })
    }

    /// Identifier of the product's file reference.
    pub fn product_id(&self) -> Result<&'a str, PbxError> {
        Ok(self.product()?.id.as_str())
    }

    /// File name of the product.
    pub fn product_name(&self) -> Result<&'a str, PbxError> {
        Ok(self.product()?.name.as_str())
    }
}

//! Cross-project dependency linking.
//!
//! Linking makes a consumer project's active target build and link against
//! the active target of a dependency project, the way dragging one
//! `.xcodeproj` into another and wiring it up by hand would in Xcode. The
//! consumer gains:
//!
//! 1. a file reference to the dependency's `.xcodeproj` bundle
//! 2. membership of that reference in the frameworks group
//! 3. a `PBXTargetDependency` with its `PBXContainerItemProxy` (proxy type 1)
//! 4. that target dependency in the active target's `dependencies`
//! 5. a `projectReferences` entry pairing a product group with the reference
//! 6. the product group, listing the dependency's product
//! 7. a second container proxy for the product (proxy type 2)
//! 8. a build file for the product
//! 9. that build file in the active target's Frameworks phase
//!
//! All identifiers come from one [`IdentifierFamily`] seeded with the
//! dependency's location and target name, so running the link again finds
//! every record it made the first time and changes nothing. The consumer is
//! written to its store once, after step 9. A failing step stops the run:
//! earlier steps stay applied in memory and nothing is persisted.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pbxlink_cli::config::LinkConfig;
//! use pbxlink_cli::document::DocumentRegistry;
//! use pbxlink_cli::linker::link_dependency;
//!
//! # fn example() -> Result<(), pbxlink_cli::core::PbxError> {
//! let mut registry = DocumentRegistry::with_filesystem();
//! let app = registry.get("App/App.xcodeproj/project.pbxproj")?;
//! let lib = registry.get("Lib/Lib.xcodeproj/project.pbxproj")?;
//!
//! app.borrow_mut().set_active_target("App");
//! lib.borrow_mut().set_active_target("Lib");
//!
//! let linked = link_dependency(&app, &lib, &LinkConfig::default())?;
//! println!("Linked {} as {}", linked.product_name, linked.product_build_file);
//! # Ok(())
//! # }
//! ```

use std::cell::RefCell;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::LinkConfig;
use crate::constants::sections;
use crate::core::PbxError;
use crate::document::Document;
use crate::document::sections::{
    capture_one, captures, ensure_section, esc, insert_into_section, section_body, splice,
};
use crate::ident::{FamilyMember, IdentifierFamily};
use crate::utils::path::{absolutize, relative_path, to_project_path_string};

/// What the consumer needs to know about the dependency project.
///
/// Gathered up front so the dependency document is no longer borrowed while
/// the consumer is edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySource {
    /// Name of the dependency project.
    pub project_name: String,
    /// Absolute path of the dependency's `.xcodeproj` bundle.
    pub xcodeproj_path: PathBuf,
    /// Seed for the identifier family.
    pub seed: String,
    /// Identifier of the dependency's active target.
    pub target_id: String,
    /// File name of the active target's product.
    pub product_name: String,
    /// Summary of the dependency document, for logging.
    pub summary: String,
}

impl DependencySource {
    /// Reads the dependency's active target details.
    ///
    /// # Errors
    ///
    /// Fails when the document is not loaded, has no active target, or the
    /// target's identifier or product cannot be found.
    pub fn from_document(dependency: &mut Document) -> Result<Self, PbxError> {
        dependency.require_text()?;

        let project_name = dependency.project_name().to_string();
        let target_name = dependency
            .active_target_name()
            .map(str::to_string)
            .ok_or_else(|| PbxError::NoActiveTarget {
                project: project_name.clone(),
            })?;

        let xcodeproj_path = absolutize(dependency.xcodeproj_path());
        let seed = dependency.unique_id_for_target(&target_name);
        let summary = dependency.to_string();

        let target = dependency.target_by_name(&target_name);
        Ok(Self {
            target_id: target.identifier()?.to_string(),
            product_name: target.product_name()?.to_string(),
            project_name,
            xcodeproj_path,
            seed,
            summary,
        })
    }

    fn bundle_name(&self) -> String {
        format!("{}.xcodeproj", self.project_name)
    }
}

/// Identifiers of the records a link produced or found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutcome {
    /// Relative path written on the project file reference.
    pub relative_path: String,
    /// File reference to the dependency `.xcodeproj`.
    pub file_reference: String,
    /// The `PBXTargetDependency` record.
    pub target_dependency: String,
    /// The product group listed in `projectReferences`.
    pub product_group: String,
    /// The product's child entry in the product group.
    pub product_reference: String,
    /// Build file linking the product.
    pub product_build_file: String,
    /// File name of the linked product.
    pub product_name: String,
}

/// Runs the link steps against a consumer document.
#[derive(Debug, Clone, Copy)]
pub struct DependencyLinker<'c> {
    config: &'c LinkConfig,
}

impl<'c> DependencyLinker<'c> {
    /// Creates a linker writing into the groups named by `config`.
    #[must_use]
    pub const fn new(config: &'c LinkConfig) -> Self {
        Self { config }
    }

    /// Links `source` into the consumer's active target and flushes the
    /// consumer.
    pub fn link(&self, consumer: &mut Document, source: &DependencySource) -> Result<LinkOutcome, PbxError> {
        consumer.require_text()?;
        if consumer.active_target_name().is_none() {
            return Err(PbxError::NoActiveTarget {
                project: consumer.project_name().to_string(),
            });
        }

        info!("Adding\n{}\nto\n{}", source.summary, consumer);

        let project_dir = absolutize(consumer.project_dir());
        let relative = to_project_path_string(&relative_path(&project_dir, &source.xcodeproj_path));
        info!("Project path:    {}", project_dir.display());
        info!("Dependency path: {}", source.xcodeproj_path.display());
        info!("Relative path:   {relative}");

        let family = IdentifierFamily::derive(&source.seed);
        let bundle = source.bundle_name();

        info!("Step 1: Add file reference to the dependency...");
        let file_reference = consumer.add_file_reference(
            &bundle,
            "pb-project",
            &family.member(FamilyMember::FileReference),
            &relative,
            &self.config.source_tree,
        )?;
        info!("Done: Added file reference: {file_reference}");

        info!("Step 2: Add file to {} group...", self.config.frameworks_group);
        consumer.add_file_to_group(&bundle, &file_reference, &self.config.frameworks_group)?;
        info!("Done: Added file to {} group.", self.config.frameworks_group);

        info!("Step 3: Add dependencies...");
        let (target_dependency, target_proxy) = self.ensure_target_dependency(consumer, source, &family)?;
        self.ensure_container_proxy(consumer, &target_proxy, &file_reference, source, 1)?;
        info!("Done: Added dependency and container proxy.");

        info!("Step 4: Add module to the dependency list...");
        self.ensure_dependency_listed(consumer, &target_dependency)?;
        info!("Done: Added module to the dependency list.");

        info!("Step 5: Create project references...");
        let product_group = self.ensure_project_reference(consumer, &file_reference, source, &family)?;
        info!("Done: Created project reference.");

        info!("Step 6: Create product group...");
        let product_reference = self.ensure_product_group(consumer, &product_group, source, &family)?;
        info!("Done: Created product group: {product_reference}");

        info!("Step 7: Add container proxy for target product...");
        let product_proxy = family.member(FamilyMember::ProductProxy);
        self.ensure_container_proxy(consumer, &product_proxy, &file_reference, source, 2)?;
        info!("Done: Added target container proxy.");

        info!("Step 8: Add target file...");
        let product_build_file = consumer.add_build_file(
            &source.product_name,
            &product_reference,
            &family.member(FamilyMember::ProductBuildFile),
        )?;
        info!("Done: Added target file.");

        info!("Step 9: Add frameworks...");
        consumer.add_file_to_frameworks_phase(&source.product_name, &product_build_file)?;
        info!("Done: Adding module.");

        consumer.flush()?;

        Ok(LinkOutcome {
            relative_path: relative,
            file_reference,
            target_dependency,
            product_group,
            product_reference,
            product_build_file,
            product_name: source.product_name.clone(),
        })
    }

    /// Finds or creates the target dependency on `source`, returning its
    /// identifier and the identifier of its container proxy.
    fn ensure_target_dependency(
        &self,
        consumer: &mut Document,
        source: &DependencySource,
        family: &IdentifierFamily,
    ) -> Result<(String, String), PbxError> {
        let text = with_section(consumer, sections::TARGET_DEPENDENCY, sections::SOURCES_BUILD_PHASE)?;

        let pattern = format!(
            r"([A-Z0-9]+) /\* PBXTargetDependency \*/ = \{{\n[ \t]+isa = PBXTargetDependency;\n[ \t]+name = {};\n[ \t]+targetProxy = ([A-Z0-9]+) /\* PBXContainerItemProxy \*/;",
            esc(&source.project_name)
        );
        let existing = captures(&pattern, &text)?.map(|c| (c[1].to_string(), c[2].to_string()));

        if let Some((dependency, proxy)) = existing {
            info!("This dependency already exists.");
            consumer.set_text(text, false)?;
            return Ok((dependency, proxy));
        }

        let dependency = family.member(FamilyMember::TargetDependency);
        let proxy = family.member(FamilyMember::TargetProxy);
        let block = format!(
            "\t\t{dependency} /* PBXTargetDependency */ = {{\n\t\t\tisa = PBXTargetDependency;\n\t\t\tname = {name};\n\t\t\ttargetProxy = {proxy} /* PBXContainerItemProxy */;\n\t\t}};\n",
            name = source.project_name
        );
        let updated = insert_into_section(&text, sections::TARGET_DEPENDENCY, &block)
            .ok_or_else(|| PbxError::not_found("the PBXTargetDependency section", consumer.project_name()))?;
        consumer.set_text(updated, false)?;
        Ok((dependency, proxy))
    }

    /// Finds or creates a container item proxy for the dependency's target.
    fn ensure_container_proxy(
        &self,
        consumer: &mut Document,
        proxy: &str,
        file_reference: &str,
        source: &DependencySource,
        proxy_type: u8,
    ) -> Result<(), PbxError> {
        let text = with_section(consumer, sections::CONTAINER_ITEM_PROXY, sections::BUILD_FILE)?;

        let exists = section_body(&text, sections::CONTAINER_ITEM_PROXY)?
            .is_some_and(|body| text[body].contains(proxy));
        if exists {
            info!("This container proxy already exists: {proxy}");
            return consumer.set_text(text, false);
        }

        let block = format!(
            "\t\t{proxy} /* PBXContainerItemProxy */ = {{\n\t\t\tisa = PBXContainerItemProxy;\n\t\t\tcontainerPortal = {file_reference} /* {bundle} */;\n\t\t\tproxyType = {proxy_type};\n\t\t\tremoteGlobalIDString = {target};\n\t\t\tremoteInfo = {name};\n\t\t}};\n",
            bundle = source.bundle_name(),
            target = source.target_id,
            name = source.project_name
        );
        let updated = insert_into_section(&text, sections::CONTAINER_ITEM_PROXY, &block)
            .ok_or_else(|| PbxError::not_found("the PBXContainerItemProxy section", consumer.project_name()))?;
        consumer.set_text(updated, false)
    }

    /// Adds the target dependency to the active target's `dependencies`.
    fn ensure_dependency_listed(&self, consumer: &mut Document, dependency: &str) -> Result<(), PbxError> {
        let project = consumer.project_name().to_string();
        let target_id = {
            let target = consumer
                .active_target()
                .ok_or_else(|| PbxError::NoActiveTarget { project: project.clone() })?;
            target.identifier()?.to_string()
        };

        let text = consumer.require_text()?;
        let pattern = format!(
            r"{} /\* .+? \*/ = \{{\n[ \t]+isa = PBXNativeTarget;(?s:.+?)[ \t]+dependencies = \(\n((?s:.*?))\);",
            esc(&target_id)
        );

        let Some(list) = captures(&pattern, text)?.and_then(|c| c.get(1)) else {
            return Err(PbxError::not_found(format!("the dependency list of target {target_id}"), project));
        };

        if list.as_str().contains(dependency) {
            info!("This dependency has already been added.");
            return Ok(());
        }

        let updated = splice(text, list.start(), &format!("\t\t\t\t{dependency} /* PBXTargetDependency */,\n"));
        consumer.set_text(updated, false)
    }

    /// Finds or creates the `projectReferences` entry for the dependency's
    /// file reference, returning the product group identifier.
    fn ensure_project_reference(
        &self,
        consumer: &mut Document,
        file_reference: &str,
        source: &DependencySource,
        family: &IdentifierFamily,
    ) -> Result<String, PbxError> {
        let project = consumer.project_name().to_string();
        let text = consumer.require_text()?;

        let Some(section) = section_body(text, sections::PROJECT)? else {
            return Err(PbxError::not_found("the PBXProject section", project));
        };
        let body = &text[section.clone()];

        let product_group = family.member(FamilyMember::ProductGroup);
        let reference = format!(
            "\t\t\t\t{{\n\t\t\t\t\tProductGroup = {product_group} /* Products */;\n\t\t\t\t\tProjectRef = {file_reference} /* {bundle} */;\n\t\t\t\t}},\n",
            bundle = source.bundle_name()
        );

        let refs = captures(r"projectReferences = \(\n((?s:.*?))[ \t]*\);", body)?.and_then(|c| c.get(1));
        let updated = match refs {
            Some(refs) => {
                let pattern = format!(
                    r"\{{\n[ \t]+ProductGroup = ([A-Z0-9]+) /\* Products \*/;\n[ \t]+ProjectRef = {}",
                    esc(file_reference)
                );
                if let Some(existing) = capture_one(&pattern, refs.as_str())? {
                    info!("This product group already exists: {existing}");
                    return Ok(existing);
                }
                splice(text, section.start + refs.start(), &reference)
            }
            None => {
                info!("Creating project references...");
                let Some(anchor) = captures(r#"projectDirPath = ".*?";\n"#, body)?.and_then(|c| c.get(0)) else {
                    return Err(PbxError::not_found("the projectDirPath entry", project));
                };
                let block = format!("\t\t\tprojectReferences = (\n{reference}\t\t\t);\n");
                splice(text, section.start + anchor.end(), &block)
            }
        };

        consumer.set_text(updated, false)?;
        Ok(product_group)
    }

    /// Finds or creates the product group, returning the identifier of its
    /// child naming the dependency's product.
    fn ensure_product_group(
        &self,
        consumer: &mut Document,
        product_group: &str,
        source: &DependencySource,
        family: &IdentifierFamily,
    ) -> Result<String, PbxError> {
        let project = consumer.project_name().to_string();
        let text = consumer.require_text()?;
        let product = &source.product_name;
        let product_reference = family.member(FamilyMember::ProductReference);

        let pattern = format!(
            r"{} /\* Products \*/ = \{{\n[ \t]+isa = PBXGroup;\n[ \t]+children = \(\n((?s:.*?))\);",
            esc(product_group)
        );

        let updated = match captures(&pattern, text)?.and_then(|c| c.get(1)) {
            Some(children) => {
                let child = format!(r"([A-Z0-9]+) /\* {} \*/", esc(product));
                if let Some(existing) = capture_one(&child, children.as_str())? {
                    info!("This product group already exists.");
                    return Ok(existing);
                }
                warn!("Product group {product_group} does not list {product}, adding it");
                splice(text, children.start(), &format!("\t\t\t\t{product_reference} /* {product} */,\n"))
            }
            None => {
                let block = format!(
                    "\t\t{product_group} /* Products */ = {{\n\t\t\tisa = PBXGroup;\n\t\t\tchildren = (\n\t\t\t\t{product_reference} /* {product} */,\n\t\t\t);\n\t\t\tname = Products;\n\t\t\tsourceTree = \"<group>\";\n\t\t}};\n"
                );
                insert_into_section(text, sections::GROUP, &block)
                    .ok_or_else(|| PbxError::not_found("the PBXGroup section", project))?
            }
        };

        consumer.set_text(updated, false)?;
        Ok(product_reference)
    }
}

/// Returns the consumer's text with `section` present, creating it empty
/// after `after` when missing.
fn with_section(consumer: &Document, section: &str, after: &str) -> Result<String, PbxError> {
    let text = consumer.require_text()?;
    let ensured = ensure_section(text, section, after)
        .ok_or_else(|| PbxError::not_found(format!("the {after} section"), consumer.project_name()))?;

    if ensured.len() != text.len() {
        info!("\tAdding a {section} section...");
    } else {
        debug!("{section} section present");
    }
    Ok(ensured)
}

/// Links the active target of `dependency` into the active target of
/// `consumer` and persists the consumer.
///
/// The dependency is read first and released before the consumer is
/// edited, so both arguments may be the same document.
pub fn link_dependency(
    consumer: &RefCell<Document>,
    dependency: &RefCell<Document>,
    config: &LinkConfig,
) -> Result<LinkOutcome, PbxError> {
    let source = DependencySource::from_document(&mut dependency.borrow_mut())?;
    DependencyLinker::new(config).link(&mut consumer.borrow_mut(), &source)
}

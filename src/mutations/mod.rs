//! Idempotent edits to project text.
//!
//! Every primitive has the same shape: search the current text for a record
//! matching a semantic key and return its identifier if one exists;
//! otherwise build the new record, splice it in right after the anchor it
//! belongs to, and store the new text with [`Document::set_text`]. Running a
//! primitive twice with the same arguments leaves the text unchanged the
//! second time.
//!
//! Nothing here persists to the store. Callers flush once their whole edit
//! sequence is done.

use std::path::PathBuf;

use tracing::{debug, error, info};

use crate::config::LinkConfig;
use crate::constants::{
    DEFAULT_FRAMEWORKS_GROUP, DEFAULT_RESOURCES_FALLBACK_GROUP, DEFAULT_RESOURCES_GROUP, FRAMEWORKS_PHASE,
    RESOURCES_PHASE, XCODE4_OBJECT_VERSION, sections,
};
use crate::core::PbxError;
use crate::document::Document;
use crate::document::sections::{
    capture_one, captures, compile, esc, insert_into_section, replace_range, section_body, splice, unquote,
};
use crate::ident::{FamilyMember, IdentifierFamily};
use crate::utils::path::absolutize;
use crate::utils::fs::normalize_path;

/// Which of a configuration's anchors to search for.
enum ConfigurationAnchor<'a> {
    Label(&'a str),
    Id(&'a str),
}

impl ConfigurationAnchor<'_> {
    fn pattern(&self) -> String {
        let head = match self {
            Self::Label(label) => format!(r"/\* {} \*/", esc(label)),
            Self::Id(id) => format!(r"{} /\* .+? \*/", esc(id)),
        };
        format!(r"{head} = \{{\n[ \t]+isa = XCBuildConfiguration;\n[ \t]+buildSettings = \{{\n((?s:.+?))\}};")
    }

    fn describe(&self) -> String {
        match self {
            Self::Label(label) => format!("the '{label}' build configuration"),
            Self::Id(id) => format!("the build configuration {id}"),
        }
    }
}

impl Document {
    /// Registers a build file pointing at `file_ref`.
    ///
    /// Keyed by `fileRef`: if any build file already references `file_ref`,
    /// its identifier is returned and nothing changes.
    pub fn add_build_file(&mut self, name: &str, file_ref: &str, proposed_id: &str) -> Result<String, PbxError> {
        self.add_build_file_in_phase(name, file_ref, proposed_id, FRAMEWORKS_PHASE)
    }

    /// Registers a build file whose comment names `phase`.
    pub fn add_build_file_in_phase(
        &mut self,
        name: &str,
        file_ref: &str,
        proposed_id: &str,
        phase: &str,
    ) -> Result<String, PbxError> {
        let text = self.require_text()?;

        let Some(body) = section_body(text, sections::BUILD_FILE)? else {
            error!("Couldn't find PBXBuildFile section.");
            return Err(PbxError::not_found("the PBXBuildFile section", self.project_name()));
        };

        let pattern = format!(r"(?m)^[ \t]*([A-Z0-9]+) /\*.+?fileRef = {}\b", esc(file_ref));
        if let Some(existing) = capture_one(&pattern, &text[body])? {
            info!("This build file already exists: {existing}");
            return Ok(existing);
        }

        let line = format!(
            "\t\t{proposed_id} /* {name} in {phase} */ = {{isa = PBXBuildFile; fileRef = {file_ref} /* {name} */; }};\n"
        );
        let updated = self.insert_into(sections::BUILD_FILE, &line)?;
        self.set_text(updated, false)?;
        Ok(proposed_id.to_string())
    }

    /// Registers a file reference.
    ///
    /// Keyed by name, `wrapper.<file_type>` and path; the path matches
    /// whether or not it was written with quotes. New references always
    /// quote the path.
    pub fn add_file_reference(
        &mut self,
        name: &str,
        file_type: &str,
        proposed_id: &str,
        relative_path: &str,
        source_tree: &str,
    ) -> Result<String, PbxError> {
        let text = self.require_text()?;
        let bare_path = unquote(relative_path);
        let quoted_path = format!("\"{bare_path}\"");

        for path in [bare_path, quoted_path.as_str()] {
            let pattern = format!(
                r#"([A-Z0-9]+) /\* {n} \*/ = \{{isa = PBXFileReference; lastKnownFileType = "wrapper\.{t}"; name = {n}; path = {p};"#,
                n = esc(name),
                t = esc(file_type),
                p = esc(path)
            );
            if let Some(existing) = capture_one(&pattern, text)? {
                info!("This file has already been added: {existing}");
                return Ok(existing);
            }
        }

        let line = format!(
            "\t\t{proposed_id} /* {name} */ = {{isa = PBXFileReference; lastKnownFileType = \"wrapper.{file_type}\"; name = {name}; path = {quoted_path}; sourceTree = {source_tree}; }};\n"
        );
        let updated = self.insert_into(sections::FILE_REFERENCE, &line)?;
        self.set_text(updated, false)?;
        Ok(proposed_id.to_string())
    }

    /// Adds `id` to the children of the group labelled `group`.
    pub fn add_file_to_group(&mut self, name: &str, id: &str, group: &str) -> Result<(), PbxError> {
        let text = self.require_text()?;
        let pattern = format!(
            r"/\* {} \*/ = \{{\n[ \t]+isa = PBXGroup;\n[ \t]+children = \(\n((?s:.*?))\);",
            esc(group)
        );

        let Some(children) = captures(&pattern, text)?.and_then(|c| c.get(1)) else {
            error!("Couldn't find the {group} group.");
            return Err(PbxError::not_found(format!("the '{group}' group"), self.project_name()));
        };

        if children.as_str().contains(id) {
            info!("{name} is already a member of the {group} group.");
            return Ok(());
        }

        let updated = splice(text, children.start(), &format!("\t\t\t\t{id} /* {name} */,\n"));
        self.set_text(updated, false)
    }

    /// Adds `id` to the default Frameworks group.
    pub fn add_file_to_frameworks(&mut self, name: &str, id: &str) -> Result<(), PbxError> {
        self.add_file_to_group(name, id, DEFAULT_FRAMEWORKS_GROUP)
    }

    /// Adds `id` to the Resources group, or to "Supporting Files" when the
    /// project has no Resources group.
    pub fn add_file_to_resources(&mut self, name: &str, id: &str) -> Result<(), PbxError> {
        self.add_file_to_resources_group(name, id, DEFAULT_RESOURCES_GROUP, DEFAULT_RESOURCES_FALLBACK_GROUP)
    }

    fn add_file_to_resources_group(&mut self, name: &str, id: &str, group: &str, fallback: &str) -> Result<(), PbxError> {
        let probe = format!(r"/\* {} \*/ = \{{\n[ \t]+isa = PBXGroup;\n[ \t]+children = \(\n", esc(group));
        let has_group = compile(&probe)?.is_match(self.require_text()?);

        if has_group {
            self.add_file_to_group(name, id, group)
        } else {
            debug!("No {group} group, using {fallback}");
            self.add_file_to_group(name, id, fallback)
        }
    }

    /// Adds build file `id` to the `files` of the build phase `phase_id`.
    pub fn add_file_to_phase(&mut self, name: &str, id: &str, phase_id: &str, phase: &str) -> Result<(), PbxError> {
        let text = self.require_text()?;
        let pattern = format!(
            r"{} /\* {} \*/ = \{{(?s:.+?)files = \(\n((?s:.*?))\);",
            esc(phase_id),
            esc(phase)
        );

        let Some(files) = captures(&pattern, text)?.and_then(|c| c.get(1)) else {
            error!("Couldn't find the {phase} phase.");
            return Err(PbxError::not_found(format!("the {phase} build phase {phase_id}"), self.project_name()));
        };

        if files.as_str().contains(id) {
            info!("The file has already been added to the {phase} phase.");
            return Ok(());
        }

        let updated = splice(text, files.start(), &format!("\t\t\t\t{id} /* {name} in {phase} */,\n"));
        self.set_text(updated, false)
    }

    /// Adds build file `id` to the active target's Frameworks phase.
    ///
    /// Fails without touching the text when there is no active target or it
    /// has no Frameworks phase.
    pub fn add_file_to_frameworks_phase(&mut self, name: &str, id: &str) -> Result<(), PbxError> {
        let project = self.project_name().to_string();
        let phase_id = {
            let target = self.active_target().ok_or(PbxError::NoActiveTarget { project })?;
            target.frameworks_phase()?.to_string()
        };
        self.add_file_to_phase(name, id, &phase_id, FRAMEWORKS_PHASE)
    }

    /// Adds build file `id` to the active target's Resources phase.
    pub fn add_file_to_resources_phase(&mut self, name: &str, id: &str) -> Result<(), PbxError> {
        let project = self.project_name().to_string();
        let phase_id = {
            let target = self.active_target().ok_or(PbxError::NoActiveTarget { project })?;
            target.resources_phase()?.map(str::to_string)
        };

        match phase_id {
            Some(phase_id) => self.add_file_to_phase(name, id, &phase_id, RESOURCES_PHASE),
            None => {
                error!("No resources build phase found in the destination project");
                error!("Please add a New Copy Bundle Resources Build Phase to your target");
                error!("Right click your target in the project, Add, New Build Phase,");
                error!("  \"New Copy Bundle Resources Build Phase\"");
                Err(PbxError::not_found("the Resources build phase", self.project_name()))
            }
        }
    }

    /// Adds or merges a build setting in the configuration labelled
    /// `configuration`.
    ///
    /// - absent: `setting = value;` is inserted
    /// - scalar equal to `value` (ignoring quotes): nothing changes
    /// - scalar that differs: promoted to a list, `value` first
    /// - list without `value`: `value` is prepended
    ///
    /// Multi-word values are matched against the form Xcode writes them in,
    /// one quoted fragment per word.
    pub fn add_build_setting(&mut self, configuration: &str, setting: &str, value: &str) -> Result<(), PbxError> {
        self.merge_build_setting(&ConfigurationAnchor::Label(configuration), setting, value)
    }

    /// Adds or merges a build setting in every configuration of the active
    /// target.
    pub fn add_build_setting_for_target(&mut self, setting: &str, value: &str) -> Result<(), PbxError> {
        let project = self.project_name().to_string();
        let configurations = {
            let target = self.active_target().ok_or(PbxError::NoActiveTarget { project })?;
            target.configurations()?.to_vec()
        };

        for configuration in &configurations {
            debug!("Adding {setting} to {} ({})", configuration.label, configuration.id);
            self.merge_build_setting(&ConfigurationAnchor::Id(&configuration.id), setting, value)?;
        }
        Ok(())
    }

    fn merge_build_setting(&mut self, anchor: &ConfigurationAnchor<'_>, setting: &str, value: &str) -> Result<(), PbxError> {
        let text = self.require_text()?;

        let Some(body) = captures(&anchor.pattern(), text)?.and_then(|c| c.get(1)) else {
            error!("Couldn't find this configuration.");
            return Err(PbxError::not_found(anchor.describe(), self.project_name()));
        };
        let settings = body.as_str();

        let pattern = format!(r"(?m)^[ \t]*{} = ((?s:.+?));", esc(setting));
        let Some(current) = captures(&pattern, settings)?.and_then(|c| c.get(1)) else {
            let line = format!("\t\t\t\t{setting} = {value};\n");
            let updated = splice(text, body.start(), &line);
            return self.set_text(updated, false);
        };

        let current_value = current.as_str();
        let updated = match current_value.find("(\n") {
            Some(open) => {
                if list_contains(current_value, value)? {
                    debug!("{setting} already contains {value}");
                    return Ok(());
                }
                let at = body.start() + current.start() + open + 2;
                splice(text, at, &format!("\t\t\t\t\t{value},\n"))
            }
            None => {
                if unquote(current_value) == unquote(value) {
                    debug!("{setting} is already {value}");
                    return Ok(());
                }
                let list = format!("(\n\t\t\t\t\t{value},\n\t\t\t\t\t{current_value},\n\t\t\t\t)");
                let start = body.start() + current.start();
                replace_range(text, start..start + current_value.len(), &list)
            }
        };

        self.set_text(updated, false)
    }

    /// Registers a system framework and links it into the active target.
    ///
    /// The framework is referenced from `System/Library/Frameworks` relative
    /// to the SDK, added to the frameworks group and to the Frameworks phase.
    pub fn add_framework(&mut self, framework: &str, config: &LinkConfig) -> Result<(), PbxError> {
        let family = IdentifierFamily::derive(framework);
        let path = format!("System/Library/Frameworks/{framework}");

        let file_ref = self.add_file_reference(
            framework,
            "framework",
            &family.member(FamilyMember::FileReference),
            &path,
            "SDKROOT",
        )?;
        let build_file = self.add_build_file(framework, &file_ref, &family.member(FamilyMember::BuildFile))?;

        self.add_file_to_group(framework, &file_ref, &config.frameworks_group)?;
        self.add_file_to_frameworks_phase(framework, &build_file)
    }

    /// Registers a resource bundle and copies it with the active target.
    ///
    /// `relative_path` is the bundle's path relative to the project directory.
    pub fn add_bundle(&mut self, bundle: &str, relative_path: &str, config: &LinkConfig) -> Result<(), PbxError> {
        let family = IdentifierFamily::derive(bundle);

        let file_ref = self.add_file_reference(
            bundle,
            "plug-in",
            &family.member(FamilyMember::FileReference),
            relative_path,
            &config.source_tree,
        )?;
        let build_file = self.add_build_file_in_phase(
            bundle,
            &file_ref,
            &family.member(FamilyMember::BuildFile),
            RESOURCES_PHASE,
        )?;

        self.add_file_to_resources_group(bundle, &file_ref, &config.resources_group, &config.resources_fallback_group)?;
        self.add_file_to_resources_phase(bundle, &build_file)
    }

    /// The file reference a build file points at.
    pub fn file_ref_for_build_file(&self, build_file: &str) -> Result<String, PbxError> {
        let pattern = format!(
            r"{} /\* .+? \*/ = \{{isa = PBXBuildFile; fileRef = ([A-Z0-9]+) /\* .+? \*/;",
            esc(build_file)
        );
        capture_one(&pattern, self.require_text()?)?.ok_or_else(|| {
            error!("Couldn't find PBXBuildFile row {build_file}.");
            PbxError::not_found(format!("the build file {build_file}"), self.project_name())
        })
    }

    /// The `path` of a file reference, as written (possibly quoted).
    pub fn path_for_file_ref(&self, file_ref: &str) -> Result<String, PbxError> {
        let pattern = format!(
            r"{} /\* .+? \*/ = \{{isa = PBXFileReference; .*?\bpath = ([^;]+);",
            esc(file_ref)
        );
        capture_one(&pattern, self.require_text()?)?.ok_or_else(|| {
            error!("Couldn't find PBXFileReference row {file_ref}.");
            PbxError::not_found(format!("the file reference {file_ref}"), self.project_name())
        })
    }

    /// Absolute paths of every file compiled by a Sources phase.
    pub fn built_sources(&self) -> Result<Vec<PathBuf>, PbxError> {
        self.built_files(sections::SOURCES_BUILD_PHASE)
    }

    /// Absolute paths of every file in a Headers phase.
    pub fn built_headers(&self) -> Result<Vec<PathBuf>, PbxError> {
        self.built_files(sections::HEADERS_BUILD_PHASE)
    }

    fn built_files(&self, section: &str) -> Result<Vec<PathBuf>, PbxError> {
        let text = self.require_text()?;
        let Some(body) = section_body(text, section)? else {
            error!("Couldn't find {section} section.");
            return Err(PbxError::not_found(format!("the {section} section"), self.project_name()));
        };

        let entry = compile(r"[ \t]+([A-Z0-9]+) /\* .+ \*/,\n")?;
        let project_dir = absolutize(self.project_dir());

        entry
            .captures_iter(&text[body])
            .map(|c| {
                let file_ref = self.file_ref_for_build_file(&c[1])?;
                let path = self.path_for_file_ref(&file_ref)?;
                Ok(normalize_path(&project_dir.join(unquote(&path))))
            })
            .collect()
    }

    /// Whether the project uses the Xcode 4 file format, either by its
    /// `objectVersion` or by the configured Xcode version.
    pub fn uses_xcode4_format(&self, config: &LinkConfig) -> Result<bool, PbxError> {
        Ok(self.format_version()? >= XCODE4_OBJECT_VERSION || config.xcode_major_version() >= 4)
    }

    /// Inserts `block` at the top of `section`, or reports the missing section.
    pub(crate) fn insert_into(&self, section: &str, block: &str) -> Result<String, PbxError> {
        insert_into_section(self.require_text()?, section, block).ok_or_else(|| {
            error!("Couldn't find the {section} section.");
            PbxError::not_found(format!("the {section} section"), self.project_name())
        })
    }
}

/// Whether a list-valued setting already holds `value`.
fn list_contains(list: &str, value: &str) -> Result<bool, PbxError> {
    if list.contains(value) {
        return Ok(true);
    }

    let split = esc(value).replace(' ', "\",\n[ \t]+\"");
    if compile(&split)?.is_match(list) {
        return Ok(true);
    }

    Ok(list.contains(unquote(value)))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::store::MemoryStore;
    use crate::test_utils::fixtures::{
        APP_FRAMEWORKS_PHASE_ID, APP_LOCATION, APP_RESOURCES_PHASE_ID, LIB_LOCATION, app_project,
        app_project_without_frameworks_phase, lib_project,
    };

    fn load(location: &str, text: &str) -> Document {
        let store = Rc::new(MemoryStore::new());
        store.insert(location, text);
        let mut document = Document::load(location, store).expect("load");
        document.set_active_target(if location == APP_LOCATION { "App" } else { "Lib" });
        document
    }

    fn app() -> Document {
        load(APP_LOCATION, &app_project())
    }

    fn text(document: &Document) -> &str {
        document.text().expect("loaded")
    }

    fn settings_of<'t>(text: &'t str, configuration_id: &str) -> &'t str {
        let start = text.find(&format!("{configuration_id} /* ")).expect("configuration");
        let rest = &text[start..];
        &rest[..rest.find("\t\t\tname = ").expect("end")]
    }

    #[test]
    fn test_add_build_file_is_idempotent() -> Result<(), PbxError> {
        let mut doc = app();
        let id = doc.add_build_file("libLib.a", "320AAAAAAAAAAAAAAAAAAAA4", "320AAAAAAAAAAAAAAAAAAAA5")?;
        assert_eq!(id, "320AAAAAAAAAAAAAAAAAAAA5");
        assert!(text(&doc).contains(
            "/* Begin PBXBuildFile section */\n\t\t320AAAAAAAAAAAAAAAAAAAA5 /* libLib.a in Frameworks */ = {isa = PBXBuildFile; fileRef = 320AAAAAAAAAAAAAAAAAAAA4 /* libLib.a */; };\n"
        ));

        let before = text(&doc).to_string();
        let again = doc.add_build_file("libLib.a", "320AAAAAAAAAAAAAAAAAAAA4", "320AAAAAAAAAAAAAAAAAAAA9")?;
        assert_eq!(again, "320AAAAAAAAAAAAAAAAAAAA5");
        assert_eq!(text(&doc), before);
        Ok(())
    }

    #[test]
    fn test_add_build_file_matches_existing_by_file_ref() -> Result<(), PbxError> {
        let mut doc = app();
        let id = doc.add_build_file("Renamed", "1DF5F4DF0D08C38300B7A737", "320AAAAAAAAAAAAAAAAAAAA1")?;
        assert_eq!(id, "1DF5F4E00D08C38300B7A737");
        assert_eq!(text(&doc), app_project());
        Ok(())
    }

    #[test]
    fn test_add_file_reference_quotes_new_paths() -> Result<(), PbxError> {
        let mut doc = app();
        let id = doc.add_file_reference("Lib.xcodeproj", "pb-project", "320AAAAAAAAAAAAAAAAAAAA0", "../Lib/Lib.xcodeproj", "SOURCE_ROOT")?;
        assert_eq!(id, "320AAAAAAAAAAAAAAAAAAAA0");
        assert!(text(&doc).contains(
            "\t\t320AAAAAAAAAAAAAAAAAAAA0 /* Lib.xcodeproj */ = {isa = PBXFileReference; lastKnownFileType = \"wrapper.pb-project\"; name = Lib.xcodeproj; path = \"../Lib/Lib.xcodeproj\"; sourceTree = SOURCE_ROOT; };\n"
        ));

        let before = text(&doc).to_string();
        let again = doc.add_file_reference("Lib.xcodeproj", "pb-project", "320AAAAAAAAAAAAAAAAAAAA7", "\"../Lib/Lib.xcodeproj\"", "SOURCE_ROOT")?;
        assert_eq!(again, id);
        assert_eq!(text(&doc), before);
        Ok(())
    }

    #[test]
    fn test_add_file_reference_finds_unquoted_path() -> Result<(), PbxError> {
        let unquoted = app_project().replace(
            "/* Begin PBXFileReference section */\n",
            "/* Begin PBXFileReference section */\n\t\t320CCCCCCCCCCCCCCCCCCCC0 /* Lib.xcodeproj */ = {isa = PBXFileReference; lastKnownFileType = \"wrapper.pb-project\"; name = Lib.xcodeproj; path = ../Lib/Lib.xcodeproj; sourceTree = SOURCE_ROOT; };\n",
        );
        let mut doc = load(APP_LOCATION, &unquoted);
        let id = doc.add_file_reference("Lib.xcodeproj", "pb-project", "320AAAAAAAAAAAAAAAAAAAA0", "../Lib/Lib.xcodeproj", "SOURCE_ROOT")?;
        assert_eq!(id, "320CCCCCCCCCCCCCCCCCCCC0");
        assert_eq!(text(&doc), unquoted);
        Ok(())
    }

    #[test]
    fn test_add_file_to_group_prepends_once() -> Result<(), PbxError> {
        let mut doc = app();
        doc.add_file_to_frameworks("Lib.xcodeproj", "320AAAAAAAAAAAAAAAAAAAA0")?;
        doc.add_file_to_frameworks("Lib.xcodeproj", "320AAAAAAAAAAAAAAAAAAAA0")?;

        assert!(text(&doc).contains(
            "/* Frameworks */ = {\n\t\t\tisa = PBXGroup;\n\t\t\tchildren = (\n\t\t\t\t320AAAAAAAAAAAAAAAAAAAA0 /* Lib.xcodeproj */,\n\t\t\t\t1DF5F4DF0D08C38300B7A737 /* UIKit.framework */,\n"
        ));
        assert_eq!(text(&doc).matches("320AAAAAAAAAAAAAAAAAAAA0").count(), 1);
        Ok(())
    }

    #[test]
    fn test_add_file_to_missing_group_fails() {
        let mut doc = app();
        let result = doc.add_file_to_group("x", "320AAAAAAAAAAAAAAAAAAAA0", "Nope");
        assert!(matches!(result, Err(PbxError::NotFound { .. })));
        assert_eq!(text(&doc), app_project());
    }

    #[test]
    fn test_add_file_to_resources_falls_back_to_supporting_files() -> Result<(), PbxError> {
        let renamed = app_project().replace("/* Resources */ = {\n\t\t\tisa = PBXGroup;", "/* Supporting Files */ = {\n\t\t\tisa = PBXGroup;");
        let mut doc = load(APP_LOCATION, &renamed);
        doc.add_file_to_resources("Kit.bundle", "320AAAAAAAAAAAAAAAAAAAA0")?;
        assert!(text(&doc).contains(
            "/* Supporting Files */ = {\n\t\t\tisa = PBXGroup;\n\t\t\tchildren = (\n\t\t\t\t320AAAAAAAAAAAAAAAAAAAA0 /* Kit.bundle */,\n"
        ));
        Ok(())
    }

    #[test]
    fn test_add_file_to_phase_is_idempotent() -> Result<(), PbxError> {
        let mut doc = app();
        doc.add_file_to_phase("libLib.a", "320AAAAAAAAAAAAAAAAAAAA5", APP_FRAMEWORKS_PHASE_ID, "Frameworks")?;
        let once = text(&doc).to_string();
        doc.add_file_to_phase("libLib.a", "320AAAAAAAAAAAAAAAAAAAA5", APP_FRAMEWORKS_PHASE_ID, "Frameworks")?;

        assert_eq!(text(&doc), once);
        assert!(once.contains(
            "files = (\n\t\t\t\t320AAAAAAAAAAAAAAAAAAAA5 /* libLib.a in Frameworks */,\n\t\t\t\t1DF5F4E00D08C38300B7A737 /* UIKit.framework in Frameworks */,\n"
        ));
        Ok(())
    }

    #[test]
    fn test_add_file_to_frameworks_phase_uses_active_target() -> Result<(), PbxError> {
        let mut doc = app();
        doc.add_file_to_frameworks_phase("libLib.a", "320AAAAAAAAAAAAAAAAAAAA5")?;
        assert!(text(&doc).contains("\t\t\t\t320AAAAAAAAAAAAAAAAAAAA5 /* libLib.a in Frameworks */,\n"));
        Ok(())
    }

    #[test]
    fn test_missing_frameworks_phase_leaves_text_unchanged() {
        let original = app_project_without_frameworks_phase();
        let mut doc = load(APP_LOCATION, &original);

        let result = doc.add_file_to_frameworks_phase("libLib.a", "320AAAAAAAAAAAAAAAAAAAA5");
        assert!(matches!(result, Err(PbxError::NotFound { .. })));
        assert_eq!(text(&doc), original);
    }

    #[test]
    fn test_no_active_target() {
        let store = Rc::new(MemoryStore::new());
        store.insert(APP_LOCATION, app_project());
        let mut doc = Document::load(APP_LOCATION, store).expect("load");

        let result = doc.add_file_to_frameworks_phase("libLib.a", "320AAAAAAAAAAAAAAAAAAAA5");
        assert!(matches!(result, Err(PbxError::NoActiveTarget { .. })));
    }

    #[test]
    fn test_add_file_to_resources_phase() -> Result<(), PbxError> {
        let mut doc = app();
        doc.add_file_to_resources_phase("Kit.bundle", "320AAAAAAAAAAAAAAAAAAAA1")?;
        let phase = format!("{APP_RESOURCES_PHASE_ID} /* Resources */ = {{");
        let start = text(&doc).find(&phase).expect("phase");
        assert!(text(&doc)[start..].contains("files = (\n\t\t\t\t320AAAAAAAAAAAAAAAAAAAA1 /* Kit.bundle in Resources */,\n"));

        let mut lib = load(LIB_LOCATION, &lib_project());
        let result = lib.add_file_to_resources_phase("Kit.bundle", "320AAAAAAAAAAAAAAAAAAAA1");
        assert!(matches!(result, Err(PbxError::NotFound { .. })));
        Ok(())
    }

    #[test]
    fn test_build_setting_merge_law() -> Result<(), PbxError> {
        let mut doc = app();

        doc.add_build_setting("Debug", "HEADER_SEARCH_PATHS", "\"a\"")?;
        assert!(settings_of(text(&doc), "1D6058940D05DD3E006BFB54")
            .contains("buildSettings = {\n\t\t\t\tHEADER_SEARCH_PATHS = \"a\";\n"));

        doc.add_build_setting("Debug", "HEADER_SEARCH_PATHS", "\"b\"")?;
        let list = "HEADER_SEARCH_PATHS = (\n\t\t\t\t\t\"b\",\n\t\t\t\t\t\"a\",\n\t\t\t\t);";
        assert!(settings_of(text(&doc), "1D6058940D05DD3E006BFB54").contains(list));

        let before = text(&doc).to_string();
        doc.add_build_setting("Debug", "HEADER_SEARCH_PATHS", "\"a\"")?;
        assert_eq!(text(&doc), before);

        doc.add_build_setting("Debug", "HEADER_SEARCH_PATHS", "\"c\"")?;
        assert!(settings_of(text(&doc), "1D6058940D05DD3E006BFB54")
            .contains("HEADER_SEARCH_PATHS = (\n\t\t\t\t\t\"c\",\n\t\t\t\t\t\"b\",\n\t\t\t\t\t\"a\",\n\t\t\t\t);"));
        Ok(())
    }

    #[test]
    fn test_build_setting_equal_scalar_is_noop() -> Result<(), PbxError> {
        let mut doc = app();
        doc.add_build_setting("Debug", "INFOPLIST_FILE", "App-Info.plist")?;
        assert_eq!(text(&doc), app_project());
        Ok(())
    }

    #[test]
    fn test_build_setting_list_prepend() -> Result<(), PbxError> {
        let mut doc = app();
        doc.add_build_setting("Release", "OTHER_LDFLAGS", "\"-lxml2\"")?;
        assert!(text(&doc).contains("OTHER_LDFLAGS = (\n\t\t\t\t\t\"-lxml2\",\n\t\t\t\t\t\"-ObjC\",\n\t\t\t\t\t\"-all_load\",\n\t\t\t\t);"));

        let before = text(&doc).to_string();
        doc.add_build_setting("Release", "OTHER_LDFLAGS", "-ObjC")?;
        assert_eq!(text(&doc), before);
        Ok(())
    }

    #[test]
    fn test_build_setting_split_multi_word_value() -> Result<(), PbxError> {
        let split = app_project().replace(
            "\t\t\t\t\t\"-ObjC\",\n",
            "\t\t\t\t\t\"-framework\",\n\t\t\t\t\t\"CoreData\",\n\t\t\t\t\t\"-ObjC\",\n",
        );
        let mut doc = load(APP_LOCATION, &split);
        doc.add_build_setting("Release", "OTHER_LDFLAGS", "\"-framework CoreData\"")?;
        assert_eq!(text(&doc), split);
        Ok(())
    }

    #[test]
    fn test_build_setting_does_not_match_setting_suffix() -> Result<(), PbxError> {
        let mut doc = app();
        doc.add_build_setting("Debug", "NAME", "X")?;
        assert!(settings_of(text(&doc), "1D6058940D05DD3E006BFB54").contains("\t\t\t\tNAME = X;\n"));
        assert!(text(&doc).contains("PRODUCT_NAME = App;"));
        Ok(())
    }

    #[test]
    fn test_build_setting_unknown_configuration() {
        let mut doc = app();
        let result = doc.add_build_setting("Profile", "X", "1");
        assert!(matches!(result, Err(PbxError::NotFound { .. })));
    }

    #[test]
    fn test_build_setting_for_target_touches_only_target_configurations() -> Result<(), PbxError> {
        let mut doc = app();
        doc.add_build_setting_for_target("GCC_TREAT_WARNINGS_AS_ERRORS", "YES")?;

        let t = text(&doc);
        assert!(settings_of(t, "1D6058940D05DD3E006BFB54").contains("GCC_TREAT_WARNINGS_AS_ERRORS = YES;"));
        assert!(settings_of(t, "1D6058950D05DD3E006BFB54").contains("GCC_TREAT_WARNINGS_AS_ERRORS = YES;"));
        assert!(!settings_of(t, "C01FCF4F08A954540054247B").contains("GCC_TREAT_WARNINGS_AS_ERRORS"));
        Ok(())
    }

    #[test]
    fn test_add_framework_is_idempotent() -> Result<(), PbxError> {
        let mut doc = app();
        let config = LinkConfig::default();
        doc.add_framework("CoreData.framework", &config)?;
        let once = text(&doc).to_string();
        doc.add_framework("CoreData.framework", &config)?;
        assert_eq!(text(&doc), once);

        let family = IdentifierFamily::derive("CoreData.framework");
        let file_ref = family.member(FamilyMember::FileReference);
        let build_file = family.member(FamilyMember::BuildFile);
        assert!(once.contains(&format!(
            "{file_ref} /* CoreData.framework */ = {{isa = PBXFileReference; lastKnownFileType = \"wrapper.framework\"; name = CoreData.framework; path = \"System/Library/Frameworks/CoreData.framework\"; sourceTree = SDKROOT; }};"
        )));
        assert!(once.contains(&format!("\t\t\t\t{file_ref} /* CoreData.framework */,\n")));
        assert!(once.contains(&format!("\t\t\t\t{build_file} /* CoreData.framework in Frameworks */,\n")));
        Ok(())
    }

    #[test]
    fn test_add_bundle() -> Result<(), PbxError> {
        let mut doc = app();
        doc.add_bundle("Kit.bundle", "../Kit/Kit.bundle", &LinkConfig::default())?;

        let family = IdentifierFamily::derive("Kit.bundle");
        let build_file = family.member(FamilyMember::BuildFile);
        let t = text(&doc);
        assert!(t.contains("lastKnownFileType = \"wrapper.plug-in\"; name = Kit.bundle; path = \"../Kit/Kit.bundle\"; sourceTree = SOURCE_ROOT;"));
        assert!(t.contains(&format!("{build_file} /* Kit.bundle in Resources */ = {{isa = PBXBuildFile;")));
        assert!(t.contains(&format!("\t\t\t\t{build_file} /* Kit.bundle in Resources */,\n")));
        Ok(())
    }

    #[test]
    fn test_file_ref_and_path_queries() -> Result<(), PbxError> {
        let doc = app();
        assert_eq!(doc.file_ref_for_build_file("7A1C04E10F2B3C4D00A1B2C3")?, "7A1C04E00F2B3C4D00A1B2C3");
        assert_eq!(doc.path_for_file_ref("7A1C04E00F2B3C4D00A1B2C3")?, "\"Classes/AppDelegate.m\"");
        assert_eq!(doc.path_for_file_ref("1D6058910D05DD3D006BFB54")?, "App.app");
        assert!(doc.file_ref_for_build_file("320FFFFFFFFFFFFFFFFFFFF0").is_err());
        Ok(())
    }

    #[test]
    fn test_built_sources_and_headers() -> Result<(), PbxError> {
        let doc = app();
        assert_eq!(
            doc.built_sources()?,
            vec![PathBuf::from("/work/App/main.m"), PathBuf::from("/work/App/Classes/AppDelegate.m")]
        );
        assert!(matches!(doc.built_headers(), Err(PbxError::NotFound { .. })));

        let lib = load(LIB_LOCATION, &lib_project());
        assert_eq!(lib.built_headers()?, vec![PathBuf::from("/work/Lib/Lib.h")]);
        assert_eq!(lib.built_sources()?, vec![PathBuf::from("/work/Lib/Source/Lib.m")]);
        Ok(())
    }

    #[test]
    fn test_uses_xcode4_format() -> Result<(), PbxError> {
        let doc = app();
        assert!(doc.uses_xcode4_format(&LinkConfig::default())?);

        let old = load(APP_LOCATION, &app_project().replace("objectVersion = 46;", "objectVersion = 45;"));
        assert!(!old.uses_xcode4_format(&LinkConfig::default())?);
        let config = LinkConfig {
            xcode_version: Some("4.0.2".to_string()),
            ..LinkConfig::default()
        };
        assert!(old.uses_xcode4_format(&config)?);
        Ok(())
    }
}

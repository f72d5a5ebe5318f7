//! Constants describing the project.pbxproj text layout.
//!
//! Identifier sizes, well-known section names and the default group and
//! source-tree names used when linking projects together.

/// A sample identifier with the length Xcode uses for every object id.
///
/// Minted identifiers are sized to match it: 24 uppercase hex characters.
pub const SAMPLE_IDENTIFIER: &str = "320FFFEEEDDDCCCBBBAAA000";

/// Length of every identifier in a project file.
pub const IDENTIFIER_LEN: usize = SAMPLE_IDENTIFIER.len();

/// Fixed prefix for identifiers minted by pbxlink.
pub const IDENTIFIER_PREFIX: &str = "320";

/// Number of hash characters kept in a family base.
///
/// One trailing character is reserved for the family member digit.
pub const IDENTIFIER_HASH_LEN: usize = IDENTIFIER_LEN - IDENTIFIER_PREFIX.len() - 1;

/// Name of the file inside an `.xcodeproj` bundle holding the project text.
pub const PBXPROJ_FILE_NAME: &str = "project.pbxproj";

/// Extension of the project bundle directory.
pub const XCODEPROJ_EXTENSION: &str = "xcodeproj";

/// Section names used by the mutation primitives.
pub mod sections {
    /// Build file records referenced from build phases.
    pub const BUILD_FILE: &str = "PBXBuildFile";
    /// Proxies for objects living in another project.
    pub const CONTAINER_ITEM_PROXY: &str = "PBXContainerItemProxy";
    /// File references.
    pub const FILE_REFERENCE: &str = "PBXFileReference";
    /// Groups shown in the project navigator.
    pub const GROUP: &str = "PBXGroup";
    /// Header build phases.
    pub const HEADERS_BUILD_PHASE: &str = "PBXHeadersBuildPhase";
    /// The root project object.
    pub const PROJECT: &str = "PBXProject";
    /// Source build phases.
    pub const SOURCES_BUILD_PHASE: &str = "PBXSourcesBuildPhase";
    /// Target dependencies.
    pub const TARGET_DEPENDENCY: &str = "PBXTargetDependency";
}

/// Default group receiving frameworks and linked project references.
pub const DEFAULT_FRAMEWORKS_GROUP: &str = "Frameworks";

/// Default group receiving resource bundles.
pub const DEFAULT_RESOURCES_GROUP: &str = "Resources";

/// Group used for resources when the project has no `Resources` group.
pub const DEFAULT_RESOURCES_FALLBACK_GROUP: &str = "Supporting Files";

/// Source tree used for references to other projects and bundles.
pub const DEFAULT_SOURCE_TREE: &str = "SOURCE_ROOT";

/// Label of the Frameworks build phase.
pub const FRAMEWORKS_PHASE: &str = "Frameworks";

/// Label of the Resources build phase.
pub const RESOURCES_PHASE: &str = "Resources";

/// Object version written by Xcode 3.2; 46 and above is the Xcode 4 format.
pub const XCODE4_OBJECT_VERSION: u32 = 46;

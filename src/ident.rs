//! Deterministic identifier families.
//!
//! Every object in a project file is keyed by a 24 character uppercase hex
//! identifier. When pbxlink inserts several related records for one logical
//! operation (a linked project needs a file reference, a target dependency,
//! two container proxies, a product group...) it derives a single
//! [`IdentifierFamily`] from a seed string and mints each record's
//! identifier by appending one decimal digit to the family base.
//!
//! The base is `"320"` followed by the first 20 characters of the uppercase
//! SHA-224 digest of the seed, so the same seed always yields the same
//! identifiers. That determinism is what lets repeated link runs find the
//! records they inserted last time. Collisions are not detected; the hash
//! width is the only guarantee.
//!
//! # Examples
//!
//! ```rust
//! use pbxlink_cli::ident::{FamilyMember, IdentifierFamily};
//!
//! let family = IdentifierFamily::derive("Lib.xcodeproj/project.pbxproj:Lib");
//! let file_ref = family.member(FamilyMember::FileReference);
//! assert_eq!(file_ref.len(), 24);
//! assert!(file_ref.starts_with("320"));
//! assert!(file_ref.ends_with('0'));
//! ```

use sha2::{Digest, Sha224};

use crate::constants::{IDENTIFIER_HASH_LEN, IDENTIFIER_PREFIX};

/// Role of one identifier within a family, mapped to its trailing digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FamilyMember {
    /// File reference to the linked project bundle, framework or bundle (0).
    FileReference,
    /// Build file for a framework or bundle (1).
    BuildFile,
    /// Target dependency on the linked project's target (1).
    TargetDependency,
    /// Container item proxy for the linked target, proxy type 1 (2).
    TargetProxy,
    /// Products group listing the linked project's products (3).
    ProductGroup,
    /// Child of the products group naming the linked product (4).
    ProductReference,
    /// Build file linking the product into the Frameworks phase (5).
    ProductBuildFile,
    /// Container item proxy for the linked product, proxy type 2 (6).
    ProductProxy,
}

impl FamilyMember {
    /// The decimal digit appended to the family base for this role.
    #[must_use]
    pub const fn digit(self) -> u8 {
        match self {
            Self::FileReference => 0,
            Self::BuildFile | Self::TargetDependency => 1,
            Self::TargetProxy => 2,
            Self::ProductGroup => 3,
            Self::ProductReference => 4,
            Self::ProductBuildFile => 5,
            Self::ProductProxy => 6,
        }
    }
}

/// A family of related identifiers sharing one derived base.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentifierFamily {
    base: String,
}

impl IdentifierFamily {
    /// Derives the family for `seed`.
    ///
    /// Pure and deterministic across calls and processes.
    #[must_use]
    pub fn derive(seed: &str) -> Self {
        let digest = Sha224::digest(seed.as_bytes());
        let hash = hex::encode_upper(digest);

        Self {
            base: format!("{IDENTIFIER_PREFIX}{}", &hash[..IDENTIFIER_HASH_LEN]),
        }
    }

    /// The 23 character base shared by every member.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Mints the identifier for `member`.
    #[must_use]
    pub fn member(&self, member: FamilyMember) -> String {
        self.with_digit(member.digit())
    }

    /// Mints the identifier ending in `digit` (0-9).
    ///
    /// Digits above 9 are clamped to 9 so the identifier keeps its length.
    #[must_use]
    pub fn with_digit(&self, digit: u8) -> String {
        format!("{}{}", self.base, digit.min(9))
    }
}

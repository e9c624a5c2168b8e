//! Static platform catalog
//!
//! Maps each supported destination to its display name, terminal glyph,
//! accent color and character limit. The catalog is fixed at compile time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SocialCmdError;

/// Wire identifier of a supported destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    LinkedIn,
    Twitter,
    Threads,
    Facebook,
}

impl PlatformId {
    /// Lowercase identifier as used by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformId::LinkedIn => "linkedin",
            PlatformId::Twitter => "twitter",
            PlatformId::Threads => "threads",
            PlatformId::Facebook => "facebook",
        }
    }

    /// Catalog entry for this identifier
    pub fn platform(&self) -> &'static Platform {
        PlatformCatalog::get(*self)
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformId {
    type Err = SocialCmdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linkedin" => Ok(PlatformId::LinkedIn),
            "twitter" | "x" => Ok(PlatformId::Twitter),
            "threads" => Ok(PlatformId::Threads),
            "facebook" => Ok(PlatformId::Facebook),
            other => Err(SocialCmdError::InvalidInput(format!(
                "Unknown platform '{}'. Valid options: linkedin, twitter, threads, facebook",
                other
            ))),
        }
    }
}

/// A destination and its posting constraints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub id: PlatformId,
    pub display_name: &'static str,
    /// Short glyph used in terminal listings
    pub icon: &'static str,
    /// Accent color as `#rrggbb`
    pub color: &'static str,
    /// Maximum number of characters in a single post
    pub character_limit: usize,
}

static PLATFORMS: [Platform; 4] = [
    Platform {
        id: PlatformId::LinkedIn,
        display_name: "LinkedIn",
        icon: "in",
        color: "#0a66c2",
        character_limit: 3000,
    },
    Platform {
        id: PlatformId::Twitter,
        display_name: "X (Twitter)",
        icon: "X",
        color: "#e7e9ea",
        character_limit: 280,
    },
    Platform {
        id: PlatformId::Threads,
        display_name: "Threads",
        icon: "@",
        color: "#f5f5f5",
        character_limit: 500,
    },
    Platform {
        id: PlatformId::Facebook,
        display_name: "Facebook",
        icon: "f",
        color: "#1877f2",
        character_limit: 63206,
    },
];

/// Read-only access to the platform table
pub struct PlatformCatalog;

impl PlatformCatalog {
    /// All platforms in catalog order
    pub fn all() -> &'static [Platform] {
        &PLATFORMS
    }

    pub fn get(id: PlatformId) -> &'static Platform {
        match id {
            PlatformId::LinkedIn => &PLATFORMS[0],
            PlatformId::Twitter => &PLATFORMS[1],
            PlatformId::Threads => &PLATFORMS[2],
            PlatformId::Facebook => &PLATFORMS[3],
        }
    }

    /// Look up a platform by its raw wire identifier
    pub fn lookup(id: &str) -> Option<&'static Platform> {
        PLATFORMS.iter().find(|p| p.id.as_str() == id)
    }

    /// Display name for a server-reported platform, falling back to the raw id
    pub fn display_name_for(id: &str) -> String {
        Self::lookup(id)
            .map(|p| p.display_name.to_string())
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_limits() {
        assert_eq!(PlatformCatalog::get(PlatformId::LinkedIn).character_limit, 3000);
        assert_eq!(PlatformCatalog::get(PlatformId::Twitter).character_limit, 280);
        assert_eq!(PlatformCatalog::get(PlatformId::Threads).character_limit, 500);
        assert_eq!(PlatformCatalog::get(PlatformId::Facebook).character_limit, 63206);
    }

    #[test]
    fn test_get_matches_id() {
        for platform in PlatformCatalog::all() {
            assert_eq!(PlatformCatalog::get(platform.id).id, platform.id);
        }
    }

    #[test]
    fn test_platform_id_from_str() {
        assert_eq!("linkedin".parse::<PlatformId>().unwrap(), PlatformId::LinkedIn);
        assert_eq!("Twitter".parse::<PlatformId>().unwrap(), PlatformId::Twitter);
        assert_eq!(" threads ".parse::<PlatformId>().unwrap(), PlatformId::Threads);
        assert_eq!("FACEBOOK".parse::<PlatformId>().unwrap(), PlatformId::Facebook);
    }

    #[test]
    fn test_platform_id_from_str_invalid() {
        let err = "myspace".parse::<PlatformId>().unwrap_err();
        assert!(err.to_string().contains("Unknown platform 'myspace'"));
    }

    #[test]
    fn test_platform_id_serialization() {
        let json = serde_json::to_string(&PlatformId::LinkedIn).unwrap();
        assert_eq!(json, r#""linkedin""#);

        let parsed: PlatformId = serde_json::from_str(r#""twitter""#).unwrap();
        assert_eq!(parsed, PlatformId::Twitter);
    }

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(PlatformCatalog::display_name_for("twitter"), "X (Twitter)");
        assert_eq!(PlatformCatalog::display_name_for("mastodon"), "mastodon");
    }
}

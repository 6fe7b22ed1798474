use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// A GitHub user record as returned by `/users/{username}`.
///
/// Every recognised key may be missing or `null`; unknown keys are ignored.
/// This is the only untyped shape in the crate, and [`map_user`] is the only
/// place that fills in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawUser {
    pub login: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub public_repos: Option<u64>,
    pub html_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Count {
    Valid(u64),
    Invalid(IgnoredAny),
}

/// Anything that is not a non-negative integer counts as absent.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Count>::deserialize(deserializer)? {
        Some(Count::Valid(n)) => Some(n),
        Some(Count::Invalid(_)) | None => None,
    })
}

/// Normalized public profile shown on the result card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub handle: String,
    pub display_name: Option<String>,
    pub avatar_url: String,
    pub biography: Option<String>,
    pub public_repo_count: u64,
    pub profile_url: String,
}

impl Profile {
    /// Headline for the card: the display name, or the handle when the user
    /// has not set one.
    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.handle)
    }
}

/// Converts an API record into a [`Profile`], substituting defaults for
/// absent fields. Never fails.
pub fn map_user(raw: RawUser) -> Profile {
    Profile {
        handle: raw.login.unwrap_or_default(),
        display_name: raw.name,
        avatar_url: raw.avatar_url.unwrap_or_default(),
        biography: raw.bio,
        public_repo_count: raw.public_repos.unwrap_or(0),
        profile_url: raw.html_url.unwrap_or_default(),
    }
}

impl From<RawUser> for Profile {
    fn from(raw: RawUser) -> Self {
        map_user(raw)
    }
}

//! Storage buckets.

use serde::{Deserialize, Serialize};

/// A flat directory holding one category of uploaded blob.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::EnumString,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Bucket {
    /// Post photos
    #[display("photos")]
    #[strum(serialize = "photos", serialize = "photo")]
    Photos,
    /// User avatars
    #[display("avatars")]
    #[strum(serialize = "avatars", serialize = "avatar")]
    Avatars,
}

impl Bucket {
    /// Directory name under the uploads root.
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Photos => "photos",
            Bucket::Avatars => "avatars",
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plural_and_singular_names() {
        assert_eq!("photos".parse::<Bucket>().ok(), Some(Bucket::Photos));
        assert_eq!("Avatar".parse::<Bucket>().ok(), Some(Bucket::Avatars));
        assert!("staging".parse::<Bucket>().is_err());
        assert_eq!(Bucket::Avatars.to_string(), Bucket::Avatars.as_str());
    }
}

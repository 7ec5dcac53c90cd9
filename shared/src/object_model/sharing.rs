use std::{fmt, str::FromStr};

use crate::ObjectModelError;

/// Per-class or per-field publish/subscribe intent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Sharing {
    #[default]
    Neither,
    Publish,
    Subscribe,
    PublishSubscribe,
}

impl Sharing {
    pub fn from_flags(published: bool, subscribed: bool) -> Self {
        match (published, subscribed) {
            (false, false) => Sharing::Neither,
            (true, false) => Sharing::Publish,
            (false, true) => Sharing::Subscribe,
            (true, true) => Sharing::PublishSubscribe,
        }
    }

    pub fn is_published(self) -> bool {
        matches!(self, Sharing::Publish | Sharing::PublishSubscribe)
    }

    pub fn is_subscribed(self) -> bool {
        matches!(self, Sharing::Subscribe | Sharing::PublishSubscribe)
    }

    pub fn union(self, other: Sharing) -> Self {
        Self::from_flags(
            self.is_published() || other.is_published(),
            self.is_subscribed() || other.is_subscribed(),
        )
    }
}

impl FromStr for Sharing {
    type Err = ObjectModelError;

    /// Accepts the object model spelling (`PublishSubscribe`) as well as the
    /// lower-case hyphenated form (`publish-subscribe`), and `none` for `Neither`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "" | "none" | "neither" => Ok(Sharing::Neither),
            "publish" => Ok(Sharing::Publish),
            "subscribe" => Ok(Sharing::Subscribe),
            "publishsubscribe" => Ok(Sharing::PublishSubscribe),
            _ => Err(ObjectModelError::InvalidSharing {
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for Sharing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sharing::Neither => "Neither",
            Sharing::Publish => "Publish",
            Sharing::Subscribe => "Subscribe",
            Sharing::PublishSubscribe => "PublishSubscribe",
        };
        f.write_str(name)
    }
}

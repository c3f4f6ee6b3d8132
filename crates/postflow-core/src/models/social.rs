use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EntityId;

/// Social networks the service can post to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    Twitter,
    Facebook,
}

impl Platform {
    /// Path segment used by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Facebook => "facebook",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Linkedin => "LinkedIn",
            Platform::Twitter => "Twitter",
            Platform::Facebook => "Facebook",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linkedin" => Ok(Platform::Linkedin),
            "twitter" | "x" => Ok(Platform::Twitter),
            "facebook" | "fb" => Ok(Platform::Facebook),
            other => Err(format!("unknown platform '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SocialAccount {
    #[serde(default, alias = "_id")]
    pub id: Option<EntityId>,
    pub platform: Platform,
    #[serde(rename = "accountName", default)]
    pub account_name: Option<String>,
    #[serde(rename = "isConnected", default)]
    pub is_connected: bool,
    #[serde(rename = "connectedAt", default)]
    pub connected_at: Option<DateTime<Utc>>,
}

impl SocialAccount {
    pub fn status_display(&self) -> &'static str {
        if self.is_connected {
            "connected"
        } else {
            "not connected"
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AccountsEnvelope {
    #[serde(default)]
    pub accounts: Vec<SocialAccount>,
}

/// Where to send the user to finish the provider's OAuth flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ConnectResponse {
    #[serde(rename = "authUrl", alias = "url")]
    pub auth_url: String,
}

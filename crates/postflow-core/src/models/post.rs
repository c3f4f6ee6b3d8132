use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Pending,
    Published,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Pending => "pending",
            PostStatus::Published => "published",
            PostStatus::Failed => "failed",
            PostStatus::Cancelled => "cancelled",
            PostStatus::Unknown => "unknown",
        }
    }
}

/// A generated post queued for (or already sent to) a platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPost {
    #[serde(default, alias = "_id")]
    pub id: Option<EntityId>,
    pub platform: Platform,
    pub content: String,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default = "default_status")]
    pub status: PostStatus,
    #[serde(default)]
    pub topic: Option<String>,
}

fn default_status() -> PostStatus {
    PostStatus::Pending
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPostInput {
    pub platform: Platform,
    pub content: String,
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PostsEnvelope {
    #[serde(default)]
    pub posts: Vec<ScheduledPost>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PostEnvelope {
    pub post: ScheduledPost,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_with_unknown_status() {
        let json = r#"{"_id":"x1","platform":"facebook","content":"Hi","scheduledAt":"2024-05-01T08:00:00Z","status":"retrying"}"#;
        let post: ScheduledPost = serde_json::from_str(json).unwrap();
        assert_eq!(post.status, PostStatus::Unknown);
        assert_eq!(post.id, Some(EntityId::Str("x1".to_string())));
        assert!(post.scheduled_at.is_some());
    }

    #[test]
    fn test_status_defaults_to_pending() {
        let post: ScheduledPost =
            serde_json::from_str(r#"{"platform":"twitter","content":"Hi"}"#).unwrap();
        assert_eq!(post.status, PostStatus::Pending);
        assert_eq!(post.status.as_str(), "pending");
    }
}

use serde::{Deserialize, Serialize};

use super::ScheduledPost;

/// Activity summary shown on the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardOverview {
    pub total_users: Option<i64>,
    pub total_posts: i64,
    pub published_posts: i64,
    pub scheduled_posts: i64,
    pub failed_posts: i64,
    pub connected_accounts: i64,
    pub active_schedules: i64,
    pub recent_posts: Vec<ScheduledPost>,
}

impl DashboardOverview {
    /// Share of attempted posts that went out, as a whole percentage.
    /// Negative counts are treated as zero.
    pub fn success_rate(&self) -> Option<u8> {
        let published = self.published_posts.max(0) as f64;
        let attempted = published + self.failed_posts.max(0) as f64;
        if attempted == 0.0 {
            return None;
        }
        Some((published * 100.0 / attempted).floor().clamp(0.0, 100.0) as u8)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OverviewEnvelope {
    #[serde(default)]
    pub overview: DashboardOverview,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_overview() {
        let env: OverviewEnvelope =
            serde_json::from_str(r#"{"overview":{"totalPosts":12,"publishedPosts":9,"failedPosts":3}}"#)
                .unwrap();
        assert_eq!(env.overview.total_posts, 12);
        assert_eq!(env.overview.scheduled_posts, 0);
        assert!(env.overview.recent_posts.is_empty());
        assert_eq!(env.overview.success_rate(), Some(75));
    }

    #[test]
    fn test_success_rate_without_attempts() {
        assert_eq!(DashboardOverview::default().success_rate(), None);
    }

    #[test]
    fn test_success_rate_with_odd_counts() {
        let overview = |published, failed| DashboardOverview {
            published_posts: published,
            failed_posts: failed,
            ..Default::default()
        };
        assert_eq!(overview(-5, 10).success_rate(), Some(0));
        assert_eq!(overview(i64::MAX, 0).success_rate(), Some(100));
        assert_eq!(overview(i64::MAX, i64::MAX).success_rate(), Some(50));
        assert_eq!(overview(2, 1).success_rate(), Some(66));
        assert_eq!(overview(-1, -1).success_rate(), None);
    }
}

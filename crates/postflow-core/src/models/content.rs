use serde::{Deserialize, Serialize};

use super::Platform;

/// Ask the backend to draft a post.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct GenerateRequest {
    pub topic: String,
    pub platform: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct GeneratedContent {
    pub content: String,
    #[serde(default)]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

impl GeneratedContent {
    /// Post body with hashtags appended, as it would be published.
    pub fn full_text(&self) -> String {
        if self.hashtags.is_empty() {
            return self.content.clone();
        }
        let tags: Vec<String> = self
            .hashtags
            .iter()
            .map(|t| {
                if t.starts_with('#') {
                    t.clone()
                } else {
                    format!("#{}", t)
                }
            })
            .collect();
        format!("{}\n\n{}", self.content, tags.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_text_appends_hashtags() {
        let c = GeneratedContent {
            content: "Shipping day.".to_string(),
            platform: Some(Platform::Linkedin),
            hashtags: vec!["rust".to_string(), "#release".to_string()],
        };
        assert_eq!(c.full_text(), "Shipping day.\n\n#rust #release");
    }

    #[test]
    fn test_full_text_without_hashtags() {
        let c: GeneratedContent = serde_json::from_str(r#"{"content":"Hello"}"#).unwrap();
        assert_eq!(c.full_text(), "Hello");
    }
}

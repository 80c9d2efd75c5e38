//! Blog post models
//!
//! JSON payloads use camelCase field names (`isDraft`, `publishDate`, ...),
//! database columns use snake_case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Blog post document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub category: String,
    /// Rendered markup produced by the editor
    pub content: String,
    /// Image URLs
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub is_draft: bool,
    pub publish_date: Option<DateTime<Utc>>,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a post
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlogPost {
    pub title: String,
    pub author: String,
    pub category: String,
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub publish_date: Option<DateTime<Utc>>,
}

impl NewBlogPost {
    /// Reject posts whose required text fields are blank
    pub fn validate(&self) -> Result<(), String> {
        require_text("title", &self.title)?;
        require_text("author", &self.author)?;
        require_text("category", &self.category)?;
        require_text("content", &self.content)?;
        Ok(())
    }
}

/// Partial update: only the fields present are written
///
/// Optional fields distinguish an absent key (`None`, left unchanged) from an
/// explicit `null` (`Some(None)`, cleared).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
    pub images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub seo_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub seo_description: Option<Option<String>>,
    pub is_draft: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub publish_date: Option<Option<DateTime<Utc>>>,
}

/// Called only for keys present in the payload, so `null` becomes `Some(None)`
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl PostUpdate {
    /// True when the update carries no field at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.category.is_none()
            && self.content.is_none()
            && self.images.is_none()
            && self.tags.is_none()
            && self.seo_title.is_none()
            && self.seo_description.is_none()
            && self.is_draft.is_none()
            && self.publish_date.is_none()
    }

    /// Reject updates that would blank a required field
    pub fn validate(&self) -> Result<(), String> {
        if self.is_empty() {
            return Err("No fields to update".to_string());
        }

        let required = [
            ("title", &self.title),
            ("author", &self.author),
            ("category", &self.category),
            ("content", &self.content),
        ];
        for (field, value) in required {
            if let Some(value) = value {
                require_text(field, value)?;
            }
        }

        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("Field `{}` is required", field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_post_defaults_optional_fields() {
        let post: NewBlogPost = serde_json::from_value(json!({
            "title": "Hello",
            "author": "alice",
            "category": "Tech",
            "content": "<p>Hi</p>"
        }))
        .unwrap();

        assert!(post.images.is_empty());
        assert!(post.tags.is_empty());
        assert!(!post.is_draft);
        assert!(post.publish_date.is_none());
        assert!(post.validate().is_ok());
    }

    #[test]
    fn test_new_post_reads_camel_case_fields() {
        let post: NewBlogPost = serde_json::from_value(json!({
            "title": "Hello",
            "author": "alice",
            "category": "Tech",
            "content": "<p>Hi</p>",
            "seoTitle": "Hello SEO",
            "isDraft": true,
            "publishDate": "2024-10-01T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(post.seo_title.as_deref(), Some("Hello SEO"));
        assert!(post.is_draft);
        assert!(post.publish_date.is_some());
    }

    #[test]
    fn test_blank_required_field_is_rejected() {
        let post: NewBlogPost = serde_json::from_value(json!({
            "title": "   ",
            "author": "alice",
            "category": "Tech",
            "content": "<p>Hi</p>"
        }))
        .unwrap();

        assert_eq!(post.validate().unwrap_err(), "Field `title` is required");
    }

    #[test]
    fn test_update_validation() {
        assert!(PostUpdate::default().validate().is_err());

        let update = PostUpdate {
            content: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = PostUpdate {
            is_draft: Some(false),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_update_tells_null_from_absent() {
        let update: PostUpdate = serde_json::from_value(json!({
            "seoTitle": null,
            "publishDate": "2024-10-01T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(update.seo_title, Some(None));
        assert!(update.seo_description.is_none());
        assert!(matches!(update.publish_date, Some(Some(_))));
        assert!(update.validate().is_ok());
    }
}

//! API models for request and response payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod post;

pub use post::{BlogPost, NewBlogPost, PostUpdate};

/// Default number of posts returned by a listing
pub const DEFAULT_LIST_LIMIT: u32 = 10;
/// Upper bound on a single listing
pub const MAX_LIST_LIMIT: u32 = 100;

/// Request for a partial update: `{id, ...fields}`
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: PostUpdate,
}

/// Request addressing a single post: `{id}`
#[derive(Debug, Deserialize)]
pub struct PostIdRequest {
    pub id: Uuid,
}

/// Query parameters for post listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Maximum number of posts (default 10, at most 100)
    pub limit: Option<u32>,
    /// Number of posts to skip
    pub offset: Option<u32>,
    /// Only return posts in this category
    pub category: Option<String>,
}

/// Normalized listing parameters handed to the store
#[derive(Debug, Clone, PartialEq)]
pub struct PostFilter {
    pub limit: i64,
    pub offset: i64,
    pub category: Option<String>,
}

impl ListQuery {
    pub fn filter(&self) -> PostFilter {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);

        PostFilter {
            limit: i64::from(limit),
            offset: i64::from(self.offset.unwrap_or(0)),
            category: self
                .category
                .as_deref()
                .map(str::trim)
                .filter(|category| !category.is_empty() && *category != "All")
                .map(str::to_string),
        }
    }
}

/// Response for post listing
#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub message: String,
    pub posts: Vec<BlogPost>,
}

/// Response for a single post
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub message: String,
    pub post: BlogPost,
}

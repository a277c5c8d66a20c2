//! Project listing model and DTOs.

use ready4u_core::project::effective_price;
use ready4u_core::types::{DbId, Rupees, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A row from the `projects` table.
///
/// Includes `download_link`; use [`PublicProject`] for unauthenticated output.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub price: Rupees,
    pub discounted_price: Option<Rupees>,
    pub short_description: String,
    pub description: String,
    pub synopsis: String,
    pub tech_stack: Vec<String>,
    pub features: Vec<String>,
    pub tags: Vec<String>,
    pub difficulty: Option<String>,
    pub how_to_run: Option<String>,
    pub youtube_link: Option<String>,
    pub trailer_link: Option<String>,
    pub repo_link: Option<String>,
    pub download_link: Option<String>,
    pub learning_resources_link: Option<String>,
    pub viva_questions_link: Option<String>,
    pub status: String,
    pub views: i64,
    pub requests: i64,
    pub sales: i64,
    pub revenue: Rupees,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Price charged for a new request.
    pub fn effective_price(&self) -> Rupees {
        effective_price(self.price, self.discounted_price)
    }
}

/// Listing view without the download link or sales figures.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProject {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub price: Rupees,
    pub discounted_price: Option<Rupees>,
    pub short_description: String,
    pub description: String,
    pub synopsis: String,
    pub tech_stack: Vec<String>,
    pub features: Vec<String>,
    pub tags: Vec<String>,
    pub difficulty: Option<String>,
    pub how_to_run: Option<String>,
    pub youtube_link: Option<String>,
    pub trailer_link: Option<String>,
    pub repo_link: Option<String>,
    pub learning_resources_link: Option<String>,
    pub viva_questions_link: Option<String>,
    pub views: i64,
    pub created_at: Timestamp,
}

impl From<Project> for PublicProject {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            name: p.name,
            category: p.category,
            subcategory: p.subcategory,
            price: p.price,
            discounted_price: p.discounted_price,
            short_description: p.short_description,
            description: p.description,
            synopsis: p.synopsis,
            tech_stack: p.tech_stack,
            features: p.features,
            tags: p.tags,
            difficulty: p.difficulty,
            how_to_run: p.how_to_run,
            youtube_link: p.youtube_link,
            trailer_link: p.trailer_link,
            repo_link: p.repo_link,
            learning_resources_link: p.learning_resources_link,
            viva_questions_link: p.viva_questions_link,
            views: p.views,
            created_at: p.created_at,
        }
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProject {
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub subcategory: Option<String>,
    pub price: Rupees,
    pub discounted_price: Option<Rupees>,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub difficulty: Option<String>,
    pub how_to_run: Option<String>,
    pub youtube_link: Option<String>,
    pub trailer_link: Option<String>,
    pub repo_link: Option<String>,
    pub download_link: Option<String>,
    pub learning_resources_link: Option<String>,
    pub viva_questions_link: Option<String>,
    /// Defaults to `active` if omitted.
    pub status: Option<String>,
}

/// DTO for updating an existing project. All fields are optional.
///
/// Nullable columns use `Option<Option<T>>`: an absent key leaves the column
/// alone, an explicit `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub subcategory: Option<Option<String>>,
    pub price: Option<Rupees>,
    #[serde(default, deserialize_with = "nullable")]
    pub discounted_price: Option<Option<Rupees>>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub synopsis: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub difficulty: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub how_to_run: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub youtube_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub trailer_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub repo_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub download_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub learning_resources_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub viva_questions_link: Option<Option<String>>,
    pub status: Option<String>,
}

impl UpdateProject {
    /// Discount the row will hold once this patch is applied.
    pub fn merged_discount(&self, current: Option<Rupees>) -> Option<Rupees> {
        match self.discounted_price {
            Some(value) => value,
            None => current,
        }
    }
}

/// Maps a present key to `Some`, so `null` arrives as `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Listing filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    pub category: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

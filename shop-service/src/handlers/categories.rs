use axum::{extract::State, Json};
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::FindOptions;
use service_core::error::AppError;

use crate::dtos::{CategoryListResponse, CategoryNode};
use crate::models::Category;
use crate::AppState;

/// Flat category list, alphabetical.
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoryListResponse>, AppError> {
    let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
    let categories = state
        .db
        .categories()
        .find(doc! {}, options)
        .await?
        .try_collect()
        .await?;

    Ok(Json(CategoryListResponse { categories }))
}

/// Categories nested by parent, roots first.
pub async fn category_tree(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryNode>>, AppError> {
    let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
    let categories: Vec<Category> = state
        .db
        .categories()
        .find(doc! {}, options)
        .await?
        .try_collect()
        .await?;

    Ok(Json(build_tree(&categories, None)))
}

/// Children of `parent_id`, each carrying its own subtree. Input order is
/// preserved, so a name-sorted input yields a name-sorted tree at every
/// level. A category whose parent is missing is simply unreachable rather
/// than an error.
fn build_tree(categories: &[Category], parent_id: Option<&str>) -> Vec<CategoryNode> {
    categories
        .iter()
        .filter(|c| c.parent_id.as_deref() == parent_id)
        .map(|c| CategoryNode {
            category: c.clone(),
            children: build_tree(categories, Some(&c.id)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, name: &str, parent: Option<&str>) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            parent_id: parent.map(str::to_string),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn nests_children_under_parents() {
        let cats = vec![
            category("1", "Jewellery", None),
            category("2", "Necklaces", Some("1")),
            category("3", "Rings", Some("1")),
            category("4", "Pottery", None),
        ];

        let tree = build_tree(&cats, None);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].category.name, "Jewellery");
        assert_eq!(tree[0].children.len(), 2);
        assert_eq!(tree[0].children[0].category.name, "Necklaces");
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn orphaned_category_is_not_a_root() {
        let cats = vec![
            category("1", "Jewellery", None),
            category("2", "Lost", Some("missing")),
        ];

        let tree = build_tree(&cats, None);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].category.name, "Jewellery");
    }

    #[test]
    fn deep_nesting_is_preserved() {
        let cats = vec![
            category("1", "Home", None),
            category("2", "Decor", Some("1")),
            category("3", "Vases", Some("2")),
        ];

        let tree = build_tree(&cats, None);
        assert_eq!(tree[0].children[0].children[0].category.name, "Vases");
    }
}

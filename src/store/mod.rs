//! Collaborators the pipeline reads from and writes to.
//!
//! Persistence and file storage live outside this crate; these traits are
//! the contracts it relies on. Lookups return `Ok(None)` for missing records
//! so callers decide what "not found" means for them.

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{Recipe, ShoppingList, ShoppingListItem, StoreChain, UserAiConfig};

#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn get_recipe(&self, recipe_id: &str) -> Result<Option<Recipe>, StoreError>;
}

#[async_trait]
pub trait ShoppingListStore: Send + Sync {
    async fn get_list(&self, list_id: &str) -> Result<Option<ShoppingList>, StoreError>;

    /// Append items to a list, returning them with their assigned ids
    async fn add_items(
        &self,
        list_id: &str,
        items: Vec<ShoppingListItem>,
    ) -> Result<Vec<ShoppingListItem>, StoreError>;

    /// Replace a stored list, item order included
    async fn update_list(&self, list: &ShoppingList) -> Result<(), StoreError>;
}

#[async_trait]
pub trait StoreChainStore: Send + Sync {
    async fn get_chain(&self, chain_id: &str) -> Result<Option<StoreChain>, StoreError>;

    async fn get_chain_by_name(&self, name: &str) -> Result<Option<StoreChain>, StoreError>;
}

#[async_trait]
pub trait AiConfigStore: Send + Sync {
    /// The user's preferred model, if they picked one
    async fn default_config(&self, user_id: &str) -> Result<Option<UserAiConfig>, StoreError>;
}

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `data` and return the URL it can be fetched from
    async fn upload_file(&self, data: &[u8]) -> Result<String, StoreError>;
}

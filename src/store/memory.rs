use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::{AiConfigStore, FileStore, RecipeStore, ShoppingListStore, StoreChainStore};
use crate::error::StoreError;
use crate::model::{Recipe, ShoppingList, ShoppingListItem, StoreChain, UserAiConfig};

#[derive(Default)]
struct Records {
    recipes: HashMap<String, Recipe>,
    lists: HashMap<String, ShoppingList>,
    chains: Vec<StoreChain>,
    ai_configs: HashMap<String, UserAiConfig>,
    files: Vec<Vec<u8>>,
}

/// Keeps every record in process memory.
///
/// Backs the CLI and the tests; nothing survives a restart.
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<Records>,
    next_item_id: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<MutexGuard<'_, Records>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError("in-memory store lock poisoned".to_string()))
    }

    pub fn insert_recipe(&self, recipe: Recipe) -> Result<(), StoreError> {
        self.records()?.recipes.insert(recipe.id.clone(), recipe);
        Ok(())
    }

    pub fn insert_list(&self, list: ShoppingList) -> Result<(), StoreError> {
        self.records()?.lists.insert(list.id.clone(), list);
        Ok(())
    }

    pub fn insert_chain(&self, chain: StoreChain) -> Result<(), StoreError> {
        self.records()?.chains.push(chain);
        Ok(())
    }

    pub fn set_ai_config(&self, config: UserAiConfig) -> Result<(), StoreError> {
        self.records()?
            .ai_configs
            .insert(config.user_id.clone(), config);
        Ok(())
    }

    pub fn file_count(&self) -> Result<usize, StoreError> {
        Ok(self.records()?.files.len())
    }
}

#[async_trait]
impl RecipeStore for InMemoryStore {
    async fn get_recipe(&self, recipe_id: &str) -> Result<Option<Recipe>, StoreError> {
        Ok(self.records()?.recipes.get(recipe_id).cloned())
    }
}

#[async_trait]
impl ShoppingListStore for InMemoryStore {
    async fn get_list(&self, list_id: &str) -> Result<Option<ShoppingList>, StoreError> {
        Ok(self.records()?.lists.get(list_id).cloned())
    }

    async fn add_items(
        &self,
        list_id: &str,
        items: Vec<ShoppingListItem>,
    ) -> Result<Vec<ShoppingListItem>, StoreError> {
        let mut records = self.records()?;
        let list = records
            .lists
            .get_mut(list_id)
            .ok_or_else(|| StoreError(format!("shopping list {} does not exist", list_id)))?;

        let mut saved = Vec::with_capacity(items.len());
        for mut item in items {
            let id = self.next_item_id.fetch_add(1, Ordering::Relaxed) + 1;
            item.id = format!("item-{}", id);
            item.list_id = list_id.to_string();
            list.items.push(item.clone());
            saved.push(item);
        }
        Ok(saved)
    }

    async fn update_list(&self, list: &ShoppingList) -> Result<(), StoreError> {
        let mut records = self.records()?;
        match records.lists.get_mut(&list.id) {
            Some(stored) => {
                *stored = list.clone();
                Ok(())
            }
            None => Err(StoreError(format!(
                "shopping list {} does not exist",
                list.id
            ))),
        }
    }
}

#[async_trait]
impl StoreChainStore for InMemoryStore {
    async fn get_chain(&self, chain_id: &str) -> Result<Option<StoreChain>, StoreError> {
        Ok(self
            .records()?
            .chains
            .iter()
            .find(|chain| chain.id == chain_id)
            .cloned())
    }

    async fn get_chain_by_name(&self, name: &str) -> Result<Option<StoreChain>, StoreError> {
        Ok(self
            .records()?
            .chains
            .iter()
            .find(|chain| chain.name.eq_ignore_ascii_case(name.trim()))
            .cloned())
    }
}

#[async_trait]
impl AiConfigStore for InMemoryStore {
    async fn default_config(&self, user_id: &str) -> Result<Option<UserAiConfig>, StoreError> {
        Ok(self.records()?.ai_configs.get(user_id).cloned())
    }
}

#[async_trait]
impl FileStore for InMemoryStore {
    async fn upload_file(&self, data: &[u8]) -> Result<String, StoreError> {
        let mut records = self.records()?;
        records.files.push(data.to_vec());
        Ok(format!("memory://files/{}", records.files.len()))
    }
}

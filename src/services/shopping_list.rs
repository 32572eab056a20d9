use log::{error, info, warn};
use std::sync::Arc;

use super::ModelResolver;
use crate::context::RequestContext;
use crate::error::{ImportError, ModelError};
use crate::model::{Category, ShoppingList, ShoppingListItem, ShoppingListItemRequest};
use crate::store::{RecipeStore, ShoppingListStore, StoreChainStore};
use crate::store_layout::{self, SortDirection, SortField};

/// Builds and orders shopping lists.
pub struct ShoppingListService {
    lists: Arc<dyn ShoppingListStore>,
    recipes: Arc<dyn RecipeStore>,
    chains: Arc<dyn StoreChainStore>,
    models: Arc<ModelResolver>,
}

impl ShoppingListService {
    pub fn new(
        lists: Arc<dyn ShoppingListStore>,
        recipes: Arc<dyn RecipeStore>,
        chains: Arc<dyn StoreChainStore>,
        models: Arc<ModelResolver>,
    ) -> Self {
        Self {
            lists,
            recipes,
            chains,
            models,
        }
    }

    /// Load a list and check it belongs to `user_id`.
    async fn owned_list(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        list_id: &str,
    ) -> Result<ShoppingList, ImportError> {
        let list = ctx
            .run(self.lists.get_list(list_id))
            .await??
            .ok_or_else(|| ImportError::not_found("shopping list", list_id))?;
        if list.user_id != user_id {
            return Err(ImportError::Unauthorized);
        }
        Ok(list)
    }

    /// Categorize `names` in one model call, one category per name.
    ///
    /// Categorization only enriches the list, so any model failure leaves
    /// every item as OTHER. Only an interrupted request is an error.
    pub async fn categorize_items(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        names: &[String],
    ) -> Result<Vec<Category>, ImportError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let labels = match self.models.resolve(ctx, user_id).await {
            Ok(provider) => provider.categorize_items(ctx, names).await,
            Err(e) => Err(e),
        };

        let labels = match labels {
            Ok(labels) => labels,
            Err(ModelError::Interrupted(interrupted)) => return Err(interrupted.into()),
            Err(e) => {
                warn!("Failed to categorize {} items: {}", names.len(), e);
                Vec::new()
            }
        };

        let unmatched = labels.iter().filter(|label| label.is_empty()).count();
        if !labels.is_empty() && unmatched > 0 {
            warn!(
                "{} of {} items got no category, defaulting to {}",
                unmatched,
                names.len(),
                Category::Other
            );
        }

        let mut categories: Vec<Category> = labels
            .iter()
            .take(names.len())
            .map(|label| Category::from_label(label))
            .collect();
        categories.resize(names.len(), Category::Other);
        Ok(categories)
    }

    /// Add every ingredient of a recipe to a list, scaled to `servings`.
    pub async fn add_recipe_to_list(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        list_id: &str,
        recipe_id: &str,
        servings: f64,
    ) -> Result<Vec<ShoppingListItem>, ImportError> {
        let result = self
            .try_add_recipe_to_list(ctx, user_id, list_id, recipe_id, servings)
            .await;
        if let Err(e) = &result {
            error!(
                "Adding recipe {} to list {} failed: {}",
                recipe_id, list_id, e
            );
        }
        result
    }

    async fn try_add_recipe_to_list(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        list_id: &str,
        recipe_id: &str,
        servings: f64,
    ) -> Result<Vec<ShoppingListItem>, ImportError> {
        self.owned_list(ctx, user_id, list_id).await?;

        let recipe = ctx
            .run(self.recipes.get_recipe(recipe_id))
            .await??
            .ok_or_else(|| ImportError::not_found("recipe", recipe_id))?;
        if recipe.is_private && recipe.user_id != user_id {
            return Err(ImportError::Unauthorized);
        }
        if recipe.servings == 0 {
            return Err(ImportError::InvalidServings {
                recipe_id: recipe_id.to_string(),
            });
        }

        let scale = servings / f64::from(recipe.servings);
        let names: Vec<String> = recipe
            .ingredients
            .iter()
            .map(|ingredient| ingredient.display_name().to_string())
            .collect();
        let categories = self.categorize_items(ctx, user_id, &names).await?;

        let items = recipe
            .ingredients
            .iter()
            .zip(names)
            .zip(categories)
            .map(|((ingredient, name), category)| ShoppingListItem {
                list_id: list_id.to_string(),
                recipe_id: Some(recipe.id.clone()),
                name,
                amount: ingredient.amount * scale,
                unit: ingredient.unit.clone(),
                category,
                ..Default::default()
            })
            .collect();

        let saved = ctx.run(self.lists.add_items(list_id, items)).await??;
        info!(
            "Added {} items from recipe {} to list {}",
            saved.len(),
            recipe_id,
            list_id
        );
        Ok(saved)
    }

    /// Add one item, categorizing it unless the caller already picked a category.
    pub async fn add_item(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        list_id: &str,
        request: ShoppingListItemRequest,
    ) -> Result<ShoppingListItem, ImportError> {
        self.owned_list(ctx, user_id, list_id).await?;

        let category = match request.category {
            Some(category) => category,
            None => self
                .categorize_items(ctx, user_id, std::slice::from_ref(&request.name))
                .await?
                .first()
                .copied()
                .unwrap_or_default(),
        };

        let item = ShoppingListItem {
            list_id: list_id.to_string(),
            name: request.name,
            amount: request.amount,
            unit: request.unit,
            category,
            notes: request.notes,
            ..Default::default()
        };

        let mut saved = ctx.run(self.lists.add_items(list_id, vec![item])).await??;
        saved
            .pop()
            .ok_or_else(|| ImportError::not_found("shopping list item", list_id))
    }

    /// The list in walking order for a store chain. Nothing is saved.
    pub async fn get_sorted_for_store(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        list_id: &str,
        chain_id: &str,
    ) -> Result<ShoppingList, ImportError> {
        let mut list = self.owned_list(ctx, user_id, list_id).await?;
        let chain = ctx
            .run(self.chains.get_chain(chain_id))
            .await??
            .ok_or_else(|| ImportError::not_found("store chain", chain_id))?;

        store_layout::organize(&mut list.items, &chain);
        Ok(list)
    }

    /// Like [`get_sorted_for_store`](Self::get_sorted_for_store), but saves the new order.
    pub async fn sort_for_store(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        list_id: &str,
        chain_id: &str,
    ) -> Result<ShoppingList, ImportError> {
        let mut list = self
            .get_sorted_for_store(ctx, user_id, list_id, chain_id)
            .await?;
        list.store_chain_id = Some(chain_id.to_string());
        ctx.run(self.lists.update_list(&list)).await??;
        Ok(list)
    }

    /// Order the list for the chain called `store_name`; `Desc` walks the store backwards.
    pub async fn get_sorted_by_store_name(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        list_id: &str,
        store_name: &str,
        direction: SortDirection,
    ) -> Result<ShoppingList, ImportError> {
        let mut list = self.owned_list(ctx, user_id, list_id).await?;
        let chain = ctx
            .run(self.chains.get_chain_by_name(store_name))
            .await??
            .ok_or_else(|| ImportError::not_found("store chain", store_name))?;

        store_layout::organize(&mut list.items, &chain);
        if direction == SortDirection::Desc {
            list.items.reverse();
        }
        Ok(list)
    }

    pub async fn get_sorted(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        list_id: &str,
        field: SortField,
        direction: SortDirection,
    ) -> Result<ShoppingList, ImportError> {
        let mut list = self.owned_list(ctx, user_id, list_id).await?;
        store_layout::sort_items(&mut list.items, field, direction);
        Ok(list)
    }
}

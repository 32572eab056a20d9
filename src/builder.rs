use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::SetupError;
use crate::providers::ProviderFactory;
use crate::services::{ModelResolver, RecipeImportService, ShoppingListService, SystemDefaults};
use crate::store::{
    AiConfigStore, FileStore, InMemoryStore, RecipeStore, ShoppingListStore, StoreChainStore,
};
use crate::url_to_text::fetchers::RequestFetcher;
use crate::url_to_text::html::ContentParser;

/// The wired-up services, sharing one model HTTP client.
pub struct Pipeline {
    pub imports: RecipeImportService,
    pub shopping_lists: ShoppingListService,
}

impl Pipeline {
    /// Creates a new builder for the pipeline
    ///
    /// # Example
    /// ```
    /// use recipe_ingest::Pipeline;
    ///
    /// let builder = Pipeline::builder();
    /// ```
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }
}

/// Builder for the pipeline's services.
///
/// Collaborators that are not set explicitly fall back to one shared
/// [`InMemoryStore`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<AppConfig>,
    recipes: Option<Arc<dyn RecipeStore>>,
    lists: Option<Arc<dyn ShoppingListStore>>,
    chains: Option<Arc<dyn StoreChainStore>>,
    preferences: Option<Arc<dyn AiConfigStore>>,
    files: Option<Arc<dyn FileStore>>,
}

impl PipelineBuilder {
    /// Use this configuration instead of the defaults
    ///
    /// # Example
    /// ```
    /// use recipe_ingest::{AppConfig, Pipeline};
    ///
    /// let builder = Pipeline::builder().config(AppConfig::default());
    /// ```
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn recipes(mut self, store: Arc<dyn RecipeStore>) -> Self {
        self.recipes = Some(store);
        self
    }

    pub fn shopping_lists(mut self, store: Arc<dyn ShoppingListStore>) -> Self {
        self.lists = Some(store);
        self
    }

    pub fn store_chains(mut self, store: Arc<dyn StoreChainStore>) -> Self {
        self.chains = Some(store);
        self
    }

    pub fn preferences(mut self, store: Arc<dyn AiConfigStore>) -> Self {
        self.preferences = Some(store);
        self
    }

    pub fn files(mut self, store: Arc<dyn FileStore>) -> Self {
        self.files = Some(store);
        self
    }

    /// Build the services
    ///
    /// # Errors
    /// Returns `SetupError` if:
    /// - An HTTP client cannot be built
    /// - The configured default model is not supported
    ///
    /// # Example
    /// ```
    /// use recipe_ingest::Pipeline;
    ///
    /// let pipeline = Pipeline::builder().build().unwrap();
    /// ```
    pub fn build(self) -> Result<Pipeline, SetupError> {
        let config = self.config.unwrap_or_default();

        let fallback = Arc::new(InMemoryStore::new());
        let recipes = self.recipes.unwrap_or_else(|| fallback.clone());
        let lists = self.lists.unwrap_or_else(|| fallback.clone());
        let chains = self.chains.unwrap_or_else(|| fallback.clone());
        let preferences = self.preferences.unwrap_or_else(|| fallback.clone());
        let files = self.files.unwrap_or_else(|| fallback.clone());

        let models = Arc::new(ModelResolver::new(
            ProviderFactory::new(&config.ai)?,
            SystemDefaults::from_config(&config.ai)?,
            preferences,
        ));

        Ok(Pipeline {
            imports: RecipeImportService::new(
                RequestFetcher::new(&config.fetch)?,
                ContentParser::new()?,
                models.clone(),
                files,
            ),
            shopping_lists: ShoppingListService::new(lists, recipes, chains, models),
        })
    }
}

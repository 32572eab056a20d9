//! AI-assisted recipe ingestion and shopping-list organization.
//!
//! Content comes in from web pages, PDFs or plain text, goes through an LLM
//! and comes out as structured [`Recipe`]s; recipes feed categorized
//! shopping lists that can be ordered by a store's layout.

pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod normalizer;
pub mod pdf_to_text;
pub mod providers;
pub mod services;
pub mod store;
pub mod store_layout;
pub mod url_to_text;

pub use builder::{Pipeline, PipelineBuilder};
pub use config::AppConfig;
pub use context::{Interrupted, RequestContext};
pub use error::{
    ExtractError, FetchError, ImportError, ModelError, NormalizeError, ParseError, SetupError,
    StoreError,
};
pub use model::{
    Category, Ingredient, Instruction, Nutrition, Recipe, ShoppingList, ShoppingListItem,
    ShoppingListItemRequest, SourceType, StoreChain, StoreSection,
};
pub use normalizer::parse_ingredient_text;
pub use providers::{ApiKey, ModelProvider, ModelType};
pub use services::{RecipeImportService, ShoppingListService};
pub use store_layout::{SortDirection, SortField};

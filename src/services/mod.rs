//! Orchestration entry points.
//!
//! Services receive an already authenticated user id and check ownership
//! themselves. System defaults are handed in at construction; there is no
//! global state.

mod model_resolver;
mod recipe_import;
mod shopping_list;

pub use model_resolver::{resolve_api_key, ModelResolver, SystemDefaults};
pub use recipe_import::RecipeImportService;
pub use shopping_list::ShoppingListService;

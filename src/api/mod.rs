//! Server API surface.
//!
//! Every remote operation the application performs goes through
//! [`RecipeApi`]; the session layer is generic over it so the whole
//! workflow can run against an in-memory double in tests. The one real
//! implementation is [`HttpApi`].

mod http;

use std::future::Future;

use crate::catalog::{CatalogEntry, IngredientKind};
use crate::errors::ApiError;
use crate::ledger::{IngredientLine, Recipe};
use crate::pricing::{PriceQuote, PricingRequest};

pub use http::HttpApi;

/// Outcome of asking the server to pull recipes from the external
/// recipe source.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    pub message: String,
}

/// The recipe server's HTTP surface, one method per endpoint.
pub trait RecipeApi: Send + Sync {
    fn list_recipes(&self) -> impl Future<Output = Result<Vec<Recipe>, ApiError>> + Send;

    fn get_recipe(&self, recipe_id: i64) -> impl Future<Output = Result<Recipe, ApiError>> + Send;

    fn create_recipe(&self, recipe: &Recipe)
        -> impl Future<Output = Result<Recipe, ApiError>> + Send;

    fn update_recipe(
        &self,
        recipe_id: i64,
        recipe: &Recipe,
    ) -> impl Future<Output = Result<Recipe, ApiError>> + Send;

    fn sync_recipes(&self) -> impl Future<Output = Result<SyncOutcome, ApiError>> + Send;

    fn list_catalog(
        &self,
        kind: IngredientKind,
    ) -> impl Future<Output = Result<Vec<CatalogEntry>, ApiError>> + Send;

    fn list_lines(
        &self,
        recipe_id: i64,
    ) -> impl Future<Output = Result<Vec<IngredientLine>, ApiError>> + Send;

    fn add_line(
        &self,
        recipe_id: i64,
        kind: IngredientKind,
        entry_id: i64,
        quantity: f64,
    ) -> impl Future<Output = Result<IngredientLine, ApiError>> + Send;

    fn update_line(
        &self,
        recipe_id: i64,
        line_id: i64,
        quantity: f64,
    ) -> impl Future<Output = Result<IngredientLine, ApiError>> + Send;

    fn delete_line(
        &self,
        recipe_id: i64,
        line_id: i64,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn compute_price(
        &self,
        request: &PricingRequest,
    ) -> impl Future<Output = Result<PriceQuote, ApiError>> + Send;
}

//! One user's working state: the active recipe, its costed ledger, the
//! recipe list and the catalog cache, all behind a single owned value.
//!
//! The session talks to the server exclusively through the [`RecipeApi`]
//! it was constructed with and performs no I/O of its own beyond that.
//! Mutating operations follow the server-first rule: the server call
//! happens first and local state only changes once it succeeds.

pub mod sequence;

use crate::api::RecipeApi;
use crate::catalog::{CatalogCache, CatalogEntry, IngredientKind};
use crate::errors::{ApiError, SessionError};
use crate::ledger::{LedgerView, Recipe};
use crate::pricing::{PriceQuote, PricingForm};

pub use sequence::{RefreshOutcome, Resource, SequenceTracker, Ticket};

pub struct Session<A: RecipeApi> {
    api: A,
    catalogs: CatalogCache,
    recipes: Vec<Recipe>,
    active: Option<Recipe>,
    view: Option<LedgerView>,
    sequence: SequenceTracker,
}

impl<A: RecipeApi> Session<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            catalogs: CatalogCache::new(),
            recipes: Vec::new(),
            active: None,
            view: None,
            sequence: SequenceTracker::new(),
        }
    }

    pub fn active_recipe(&self) -> Option<&Recipe> {
        self.active.as_ref()
    }

    pub fn ledger(&self) -> Option<&LedgerView> {
        self.view.as_ref()
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    fn require_saved_recipe(&self) -> Result<i64, SessionError> {
        let recipe = self.active.as_ref().ok_or(SessionError::NoActiveRecipe)?;
        recipe.id.ok_or(SessionError::RecipeNotSaved)
    }

    /// Starts a fresh unsaved recipe and makes it active. Purely local;
    /// nothing reaches the server until [`save_recipe`](Self::save_recipe).
    pub fn new_recipe(
        &mut self,
        name: impl Into<String>,
        volume_liters: Option<f64>,
        efficiency: Option<f64>,
    ) -> &Recipe {
        self.view = None;
        self.active.insert(Recipe::draft(name, volume_liters, efficiency))
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), SessionError> {
        let recipe = self.active.as_mut().ok_or(SessionError::NoActiveRecipe)?;
        let text = description.into();
        recipe.description = if text.is_empty() { None } else { Some(text) };
        Ok(())
    }

    /// Creates or updates the active recipe on the server, adopts the
    /// server's copy and loads its ledger. Returns the recipe id.
    pub async fn save_recipe(&mut self) -> Result<i64, SessionError> {
        let recipe = self.active.as_ref().ok_or(SessionError::NoActiveRecipe)?;
        let saved = match recipe.id {
            Some(id) => self.api.update_recipe(id, recipe).await?,
            None => self.api.create_recipe(recipe).await?,
        };
        let id = saved
            .id
            .ok_or_else(|| ApiError::Shape("saved recipe came back without an id".to_string()))?;
        self.active = Some(saved);
        self.refresh_lines().await?;
        Ok(id)
    }

    /// Fetches a recipe by id, makes it active and loads its ledger.
    pub async fn open_recipe(&mut self, recipe_id: i64) -> Result<(), SessionError> {
        let recipe = self.api.get_recipe(recipe_id).await?;
        self.active = Some(recipe);
        self.view = None;
        self.refresh_lines().await
    }

    /// Asks the server to pull recipes from the external recipe source,
    /// then refreshes the local recipe list. Returns the server's message.
    pub async fn sync_remote(&mut self) -> Result<String, SessionError> {
        let outcome = self.api.sync_recipes().await?;
        self.refresh_recipes().await?;
        Ok(outcome.message)
    }

    pub async fn refresh_recipes(&mut self) -> Result<(), SessionError> {
        let ticket = self.issue_recipes_ticket();
        let recipes = self.api.list_recipes().await?;
        let _ = self.apply_recipes(ticket, recipes);
        Ok(())
    }

    pub fn issue_recipes_ticket(&mut self) -> Ticket {
        self.sequence.issue(Resource::Recipes)
    }

    /// Adopts a fetched recipe list unless a newer recipes refresh was
    /// issued while this one was in flight.
    pub fn apply_recipes(&mut self, ticket: Ticket, recipes: Vec<Recipe>) -> RefreshOutcome {
        if !self.sequence.is_current(ticket) {
            return RefreshOutcome::Superseded;
        }
        self.recipes = recipes;
        RefreshOutcome::Applied
    }

    pub fn issue_lines_ticket(&mut self) -> Ticket {
        self.sequence.issue(Resource::Lines)
    }

    /// Fetches the active recipe's lines and prices them against the
    /// catalog cache, fetching any catalog still missing. Does not touch
    /// session state; pair with [`apply_ledger`](Self::apply_ledger).
    pub async fn fetch_ledger(&mut self) -> Result<LedgerView, SessionError> {
        let recipe_id = self.require_saved_recipe()?;
        self.ensure_catalogs().await?;
        let lines = self.api.list_lines(recipe_id).await?;
        let volume = self
            .active
            .as_ref()
            .and_then(|recipe| recipe.volume_liters)
            .unwrap_or(0.0);
        Ok(LedgerView::assemble(recipe_id, volume, lines, &self.catalogs))
    }

    /// Adopts a fetched ledger view unless a newer lines refresh was
    /// issued while this one was in flight.
    pub fn apply_ledger(&mut self, ticket: Ticket, view: LedgerView) -> RefreshOutcome {
        if !self.sequence.is_current(ticket) {
            return RefreshOutcome::Superseded;
        }
        self.view = Some(view);
        RefreshOutcome::Applied
    }

    pub async fn refresh_lines(&mut self) -> Result<(), SessionError> {
        let ticket = self.issue_lines_ticket();
        let view = self.fetch_ledger().await?;
        let _ = self.apply_ledger(ticket, view);
        Ok(())
    }

    /// Adds a catalog entry to the active recipe's ledger. Validation
    /// happens before any network call; on success the whole ledger is
    /// refreshed so server-assigned ids and totals come from one place.
    pub async fn add_line(
        &mut self,
        kind: IngredientKind,
        entry_id: i64,
        quantity: f64,
    ) -> Result<(), SessionError> {
        let recipe_id = self.require_saved_recipe()?;
        if entry_id <= 0 {
            return Err(SessionError::Validation(
                "select a catalog entry before adding".to_string(),
            ));
        }
        if !(quantity > 0.0) {
            return Err(SessionError::Validation(
                "quantity must be greater than zero".to_string(),
            ));
        }
        self.api.add_line(recipe_id, kind, entry_id, quantity).await?;
        self.refresh_lines().await
    }

    pub async fn update_line_quantity(
        &mut self,
        line_id: i64,
        quantity: f64,
    ) -> Result<(), SessionError> {
        let recipe_id = self.require_saved_recipe()?;
        if !(quantity > 0.0) {
            return Err(SessionError::Validation(
                "quantity must be greater than zero".to_string(),
            ));
        }
        self.api.update_line(recipe_id, line_id, quantity).await?;
        self.refresh_lines().await
    }

    /// Deletes a line on the server, then drops the matching row from the
    /// in-memory view and recomputes totals. No refetch: the server
    /// confirmed the deletion, so the local ledger minus that id is the
    /// server state.
    pub async fn remove_line(&mut self, line_id: i64) -> Result<(), SessionError> {
        let recipe_id = self.require_saved_recipe()?;
        self.api.delete_line(recipe_id, line_id).await?;
        if let Some(view) = self.view.as_mut() {
            view.drop_line(line_id);
        }
        Ok(())
    }

    /// Returns a category's catalog, fetching it at most once per session.
    pub async fn catalog(&mut self, kind: IngredientKind) -> Result<&[CatalogEntry], SessionError> {
        if !IngredientKind::CATALOGED.contains(&kind) {
            return Err(SessionError::Validation(format!("`{kind}` has no catalog")));
        }
        if !self.catalogs.contains(kind) {
            let entries = self.api.list_catalog(kind).await?;
            self.catalogs.store(kind, entries);
        }
        Ok(self.catalogs.entries(kind).unwrap_or_default())
    }

    /// Requests a sale-price quote for the active recipe. The product name
    /// falls back to the recipe name when the form leaves it blank.
    pub async fn price_recipe(&self, form: &PricingForm) -> Result<PriceQuote, SessionError> {
        let recipe_id = self.require_saved_recipe()?;
        let fallback = self
            .active
            .as_ref()
            .map(|recipe| recipe.name.as_str())
            .unwrap_or_default();
        let request = form.request(recipe_id, fallback);
        Ok(self.api.compute_price(&request).await?)
    }

    async fn ensure_catalogs(&mut self) -> Result<(), SessionError> {
        let (fermentables, hops, yeasts) = tokio::try_join!(
            fetch_if(
                &self.api,
                !self.catalogs.contains(IngredientKind::Fermentable),
                IngredientKind::Fermentable,
            ),
            fetch_if(
                &self.api,
                !self.catalogs.contains(IngredientKind::Hop),
                IngredientKind::Hop,
            ),
            fetch_if(
                &self.api,
                !self.catalogs.contains(IngredientKind::Yeast),
                IngredientKind::Yeast,
            ),
        )?;
        if let Some(entries) = fermentables {
            self.catalogs.store(IngredientKind::Fermentable, entries);
        }
        if let Some(entries) = hops {
            self.catalogs.store(IngredientKind::Hop, entries);
        }
        if let Some(entries) = yeasts {
            self.catalogs.store(IngredientKind::Yeast, entries);
        }
        Ok(())
    }
}

async fn fetch_if<A: RecipeApi>(
    api: &A,
    missing: bool,
    kind: IngredientKind,
) -> Result<Option<Vec<CatalogEntry>>, ApiError> {
    if !missing {
        return Ok(None);
    }
    api.list_catalog(kind).await.map(Some)
}

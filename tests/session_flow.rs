//! Session behavior against an in-memory server double: cache discipline,
//! server-first mutations and refresh ordering.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use brewcost::api::{RecipeApi, SyncOutcome};
use brewcost::catalog::{CatalogEntry, IngredientKind};
use brewcost::config::PricingDefaults;
use brewcost::errors::{ApiError, SessionError};
use brewcost::ledger::{IngredientLine, Recipe};
use brewcost::pricing::{PriceBreakdown, PriceQuote, PricingForm, PricingRequest};
use brewcost::session::{RefreshOutcome, Session};

#[derive(Default)]
struct FakeState {
    recipes: Vec<Recipe>,
    catalogs: HashMap<IngredientKind, Vec<CatalogEntry>>,
    lines: Vec<IngredientLine>,
    next_line_id: i64,
    catalog_fetches: HashMap<IngredientKind, usize>,
    line_list_fetches: usize,
    recipe_creates: usize,
    recipe_updates: usize,
    add_calls: usize,
    update_calls: usize,
    delete_calls: usize,
    fail_delete: bool,
    fail_update: bool,
    sync_message: String,
    last_pricing_request: Option<PricingRequest>,
}

#[derive(Clone, Default)]
struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    fn snapshot<T>(&self, f: impl FnOnce(&FakeState) -> T) -> T {
        f(&self.state.lock().unwrap())
    }

    fn mutate(&self, f: impl FnOnce(&mut FakeState)) {
        f(&mut self.state.lock().unwrap());
    }
}

impl RecipeApi for FakeApi {
    async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        Ok(self.state.lock().unwrap().recipes.clone())
    }

    async fn get_recipe(&self, recipe_id: i64) -> Result<Recipe, ApiError> {
        let state = self.state.lock().unwrap();
        state
            .recipes
            .iter()
            .find(|recipe| recipe.id == Some(recipe_id))
            .cloned()
            .ok_or(ApiError::Rejected {
                status: 404,
                message: format!("recipe {recipe_id} not found"),
            })
    }

    async fn create_recipe(&self, recipe: &Recipe) -> Result<Recipe, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.recipe_creates += 1;
        let mut saved = recipe.clone();
        saved.id = Some(100 + state.recipe_creates as i64);
        state.recipes.push(saved.clone());
        Ok(saved)
    }

    async fn update_recipe(&self, recipe_id: i64, recipe: &Recipe) -> Result<Recipe, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.recipe_updates += 1;
        let mut saved = recipe.clone();
        saved.id = Some(recipe_id);
        Ok(saved)
    }

    async fn sync_recipes(&self) -> Result<SyncOutcome, ApiError> {
        let state = self.state.lock().unwrap();
        Ok(SyncOutcome {
            message: state.sync_message.clone(),
        })
    }

    async fn list_catalog(&self, kind: IngredientKind) -> Result<Vec<CatalogEntry>, ApiError> {
        let mut state = self.state.lock().unwrap();
        *state.catalog_fetches.entry(kind).or_insert(0) += 1;
        Ok(state.catalogs.get(&kind).cloned().unwrap_or_default())
    }

    async fn list_lines(&self, recipe_id: i64) -> Result<Vec<IngredientLine>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.line_list_fetches += 1;
        Ok(state
            .lines
            .iter()
            .filter(|line| line.recipe_id == recipe_id)
            .cloned()
            .collect())
    }

    async fn add_line(
        &self,
        recipe_id: i64,
        kind: IngredientKind,
        entry_id: i64,
        quantity: f64,
    ) -> Result<IngredientLine, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.add_calls += 1;
        state.next_line_id += 1;
        let line = IngredientLine {
            id: state.next_line_id,
            recipe_id,
            kind,
            entry_id,
            quantity,
            addition_minutes: None,
            note: None,
        };
        state.lines.push(line.clone());
        Ok(line)
    }

    async fn update_line(
        &self,
        recipe_id: i64,
        line_id: i64,
        quantity: f64,
    ) -> Result<IngredientLine, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.update_calls += 1;
        if state.fail_update {
            return Err(ApiError::Rejected {
                status: 500,
                message: "update rejected".into(),
            });
        }
        let line = state
            .lines
            .iter_mut()
            .find(|line| line.id == line_id && line.recipe_id == recipe_id)
            .ok_or(ApiError::Rejected {
                status: 404,
                message: "line not found".into(),
            })?;
        line.quantity = quantity;
        Ok(line.clone())
    }

    async fn delete_line(&self, recipe_id: i64, line_id: i64) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.delete_calls += 1;
        if state.fail_delete {
            return Err(ApiError::Rejected {
                status: 500,
                message: "delete rejected".into(),
            });
        }
        state
            .lines
            .retain(|line| !(line.id == line_id && line.recipe_id == recipe_id));
        Ok(())
    }

    async fn compute_price(&self, request: &PricingRequest) -> Result<PriceQuote, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.last_pricing_request = Some(request.clone());
        Ok(PriceQuote {
            breakdown: PriceBreakdown {
                final_sale_value: 42.0,
                ..Default::default()
            },
            summary: None,
        })
    }
}

fn saved_recipe(id: i64, name: &str, volume: f64) -> Recipe {
    let mut recipe = Recipe::draft(name, Some(volume), None);
    recipe.id = Some(id);
    recipe
}

fn entry(id: i64, name: &str, per_kg: Option<f64>, per_unit: Option<f64>) -> CatalogEntry {
    CatalogEntry {
        id,
        name: name.to_string(),
        supplier: None,
        price_per_kg: per_kg,
        price_per_unit: per_unit,
    }
}

fn line(id: i64, recipe_id: i64, kind: IngredientKind, entry_id: i64, quantity: f64) -> IngredientLine {
    IngredientLine {
        id,
        recipe_id,
        kind,
        entry_id,
        quantity,
        addition_minutes: None,
        note: None,
    }
}

/// A 20 L pale ale with 5 kg of grain at 8.00/kg and 50 g of hops at
/// 120.00/kg: 46.00 total, 2.30 per liter.
fn fixture() -> FakeApi {
    let api = FakeApi::default();
    api.mutate(|state| {
        state.recipes = vec![saved_recipe(7, "Pale Ale", 20.0)];
        state.catalogs.insert(
            IngredientKind::Fermentable,
            vec![
                entry(1, "Pilsen", Some(8.0), None),
                entry(2, "Vienna", Some(9.5), None),
            ],
        );
        state
            .catalogs
            .insert(IngredientKind::Hop, vec![entry(3, "Citra", Some(120.0), None)]);
        state
            .catalogs
            .insert(IngredientKind::Yeast, vec![entry(4, "US-05", None, Some(35.0))]);
        state.lines = vec![
            line(10, 7, IngredientKind::Fermentable, 1, 5000.0),
            line(11, 7, IngredientKind::Hop, 3, 50.0),
        ];
        state.next_line_id = 11;
        state.sync_message = "3 recipes imported.".to_string();
    });
    api
}

#[tokio::test]
async fn open_loads_costed_ledger() {
    let mut session = Session::new(fixture());
    session.open_recipe(7).await.unwrap();

    let view = session.ledger().unwrap();
    assert_eq!(view.recipe_id, 7);
    assert_eq!(view.lines.len(), 2);
    assert!((view.totals.fermentable - 40.0).abs() < 1e-9);
    assert!((view.totals.hop - 6.0).abs() < 1e-9);
    assert!((view.totals.grand - 46.0).abs() < 1e-9);
    assert!((view.totals.per_liter - 2.3).abs() < 1e-9);
}

#[tokio::test]
async fn open_unknown_recipe_reports_rejection() {
    let mut session = Session::new(fixture());

    let err = session.open_recipe(99).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Api(ApiError::Rejected { status: 404, .. })
    ));
    assert!(session.active_recipe().is_none());
}

#[tokio::test]
async fn catalogs_fetch_once_per_session() {
    let api = fixture();
    let handle = api.clone();
    let mut session = Session::new(api);

    let first = session
        .catalog(IngredientKind::Fermentable)
        .await
        .unwrap()
        .to_vec();
    let second = session
        .catalog(IngredientKind::Fermentable)
        .await
        .unwrap()
        .to_vec();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    handle.snapshot(|state| {
        assert_eq!(
            state.catalog_fetches.get(&IngredientKind::Fermentable),
            Some(&1)
        );
    });
}

#[tokio::test]
async fn unknown_category_has_no_catalog() {
    let mut session = Session::new(fixture());

    let err = session.catalog(IngredientKind::Other).await.unwrap_err();
    assert!(matches!(err, SessionError::Validation(_)));
}

#[tokio::test]
async fn mutations_validate_before_any_network_call() {
    let api = fixture();
    let handle = api.clone();
    let mut session = Session::new(api);

    let err = session
        .add_line(IngredientKind::Hop, 3, 10.0)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::NoActiveRecipe));

    // A local draft exists but has no server id yet.
    session.new_recipe("Draft", None, None);
    let err = session
        .add_line(IngredientKind::Hop, 3, 10.0)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::RecipeNotSaved));

    let form = PricingForm::from_defaults(&PricingDefaults::default());
    let err = session.price_recipe(&form).await.unwrap_err();
    assert!(matches!(err, SessionError::RecipeNotSaved));

    handle.snapshot(|state| {
        assert_eq!(state.add_calls, 0);
        assert!(state.last_pricing_request.is_none());
    });
}

#[tokio::test]
async fn add_rejects_bad_entry_and_quantity() {
    let api = fixture();
    let handle = api.clone();
    let mut session = Session::new(api);
    session.open_recipe(7).await.unwrap();

    assert!(matches!(
        session.add_line(IngredientKind::Fermentable, 0, 100.0).await,
        Err(SessionError::Validation(_))
    ));
    assert!(matches!(
        session.add_line(IngredientKind::Fermentable, 1, 0.0).await,
        Err(SessionError::Validation(_))
    ));
    assert!(matches!(
        session
            .add_line(IngredientKind::Fermentable, 1, f64::NAN)
            .await,
        Err(SessionError::Validation(_))
    ));
    assert!(matches!(
        session.update_line_quantity(10, -5.0).await,
        Err(SessionError::Validation(_))
    ));

    handle.snapshot(|state| {
        assert_eq!(state.add_calls, 0);
        assert_eq!(state.update_calls, 0);
    });
}

#[tokio::test]
async fn add_line_adopts_server_assigned_id() {
    let mut session = Session::new(fixture());
    session.open_recipe(7).await.unwrap();

    session
        .add_line(IngredientKind::Yeast, 4, 2.0)
        .await
        .unwrap();

    let view = session.ledger().unwrap();
    assert_eq!(view.lines.len(), 3);
    let added = view.find_line(12).unwrap();
    assert_eq!(added.name, "US-05");
    assert!((added.cost - 70.0).abs() < 1e-9);
    assert!((view.totals.grand - 116.0).abs() < 1e-9);
}

#[tokio::test]
async fn remove_drops_locally_without_refetch() {
    let api = fixture();
    let handle = api.clone();
    let mut session = Session::new(api);
    session.open_recipe(7).await.unwrap();
    let fetches_after_open = handle.snapshot(|state| state.line_list_fetches);

    session.remove_line(11).await.unwrap();

    let view = session.ledger().unwrap();
    assert_eq!(view.lines.len(), 1);
    assert!(view.find_line(11).is_none());
    assert!((view.totals.grand - 40.0).abs() < 1e-9);
    handle.snapshot(|state| {
        assert_eq!(state.delete_calls, 1);
        assert_eq!(state.line_list_fetches, fetches_after_open);
    });
}

#[tokio::test]
async fn failed_remove_leaves_the_view_untouched() {
    let api = fixture();
    let handle = api.clone();
    let mut session = Session::new(api);
    session.open_recipe(7).await.unwrap();
    handle.mutate(|state| state.fail_delete = true);

    let err = session.remove_line(10).await.unwrap_err();
    assert!(matches!(err, SessionError::Api(ApiError::Rejected { .. })));

    let view = session.ledger().unwrap();
    assert_eq!(view.lines.len(), 2);
    assert!((view.totals.grand - 46.0).abs() < 1e-9);
    handle.snapshot(|state| assert_eq!(state.delete_calls, 1));
}

#[tokio::test]
async fn failed_update_leaves_the_view_untouched() {
    let api = fixture();
    let handle = api.clone();
    let mut session = Session::new(api);
    session.open_recipe(7).await.unwrap();
    handle.mutate(|state| state.fail_update = true);

    let err = session.update_line_quantity(10, 9000.0).await.unwrap_err();
    assert!(matches!(err, SessionError::Api(ApiError::Rejected { .. })));

    let view = session.ledger().unwrap();
    assert!((view.totals.grand - 46.0).abs() < 1e-9);
}

#[tokio::test]
async fn repeated_refresh_is_stable() {
    let mut session = Session::new(fixture());
    session.open_recipe(7).await.unwrap();
    let before = session.ledger().cloned().unwrap();

    session.refresh_lines().await.unwrap();

    assert_eq!(session.ledger(), Some(&before));
}

#[tokio::test]
async fn stale_ledger_snapshot_is_discarded() {
    let api = fixture();
    let handle = api.clone();
    let mut session = Session::new(api);
    session.open_recipe(7).await.unwrap();

    let old_ticket = session.issue_lines_ticket();
    let old_view = session.fetch_ledger().await.unwrap();

    handle.mutate(|state| {
        state.next_line_id += 1;
        let added = line(state.next_line_id, 7, IngredientKind::Yeast, 4, 1.0);
        state.lines.push(added);
    });

    let new_ticket = session.issue_lines_ticket();
    let new_view = session.fetch_ledger().await.unwrap();

    assert_eq!(
        session.apply_ledger(new_ticket, new_view),
        RefreshOutcome::Applied
    );
    assert_eq!(
        session.apply_ledger(old_ticket, old_view),
        RefreshOutcome::Superseded
    );
    assert_eq!(session.ledger().unwrap().lines.len(), 3);
}

#[tokio::test]
async fn save_creates_then_updates() {
    let api = FakeApi::default();
    let handle = api.clone();
    let mut session = Session::new(api);

    session.new_recipe("Wit", Some(18.0), None);
    let id = session.save_recipe().await.unwrap();
    assert_eq!(id, 101);
    assert_eq!(session.active_recipe().and_then(|recipe| recipe.id), Some(101));

    let id_again = session.save_recipe().await.unwrap();
    assert_eq!(id_again, 101);

    handle.snapshot(|state| {
        assert_eq!(state.recipe_creates, 1);
        assert_eq!(state.recipe_updates, 1);
    });
}

#[tokio::test]
async fn sync_reports_server_message_and_refreshes() {
    let mut session = Session::new(fixture());

    let message = session.sync_remote().await.unwrap();

    assert_eq!(message, "3 recipes imported.");
    assert_eq!(session.recipes().len(), 1);
}

#[tokio::test]
async fn price_uses_recipe_name_when_form_has_none() {
    let api = fixture();
    let handle = api.clone();
    let mut session = Session::new(api);
    session.open_recipe(7).await.unwrap();

    let form = PricingForm::from_defaults(&PricingDefaults::default());
    let quote = session.price_recipe(&form).await.unwrap();

    assert!((quote.breakdown.final_sale_value - 42.0).abs() < 1e-9);
    handle.snapshot(|state| {
        let request = state.last_pricing_request.as_ref().unwrap();
        assert_eq!(request.recipe_id, 7);
        assert_eq!(request.product_name, "Pale Ale");
    });
}

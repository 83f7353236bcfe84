//! Recipe records and the costed ingredient ledger.

pub mod costing;
pub mod models;

pub use costing::{line_cost, CostTotals, CostedLine, LedgerView};
pub use models::{BillFermentable, BillHop, BillYeast, IngredientLine, Recipe, RecipeBill};

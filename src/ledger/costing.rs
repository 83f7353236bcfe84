use crate::catalog::{CatalogCache, IngredientKind, PriceBasis};
use crate::ledger::models::IngredientLine;

/// Cost of a single line given its resolved unit price. Per-kilogram
/// categories store quantities in grams, so the price is scaled down by
/// a thousand; per-unit categories multiply directly.
pub fn line_cost(basis: PriceBasis, quantity: f64, unit_price: f64) -> f64 {
    match basis {
        PriceBasis::PerKilogram => quantity * unit_price / 1000.0,
        PriceBasis::PerUnit => quantity * unit_price,
    }
}

/// A ledger line joined with its catalog entry and priced.
#[derive(Debug, Clone, PartialEq)]
pub struct CostedLine {
    pub line: IngredientLine,
    pub name: String,
    pub supplier: Option<String>,
    pub unit_price: f64,
    pub cost: f64,
}

/// Per-category subtotals plus the derived figures. Never updated
/// incrementally: every mutation rebuilds these from the line list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostTotals {
    pub fermentable: f64,
    pub hop: f64,
    pub yeast: f64,
    pub other: f64,
    pub grand: f64,
    pub per_liter: f64,
}

impl CostTotals {
    pub fn compute(lines: &[CostedLine], volume_liters: f64) -> Self {
        let mut totals = Self::default();
        for costed in lines {
            let bucket = match costed.line.kind {
                IngredientKind::Fermentable => &mut totals.fermentable,
                IngredientKind::Hop => &mut totals.hop,
                IngredientKind::Yeast => &mut totals.yeast,
                IngredientKind::Other => &mut totals.other,
            };
            *bucket += costed.cost;
            totals.grand += costed.cost;
        }
        totals.per_liter = totals.grand / volume_liters.max(1.0);
        totals
    }

    pub fn subtotal(&self, kind: IngredientKind) -> f64 {
        match kind {
            IngredientKind::Fermentable => self.fermentable,
            IngredientKind::Hop => self.hop,
            IngredientKind::Yeast => self.yeast,
            IngredientKind::Other => self.other,
        }
    }
}

/// The costed view of a recipe's ledger: ordered lines as the server
/// returned them, priced against the catalog cache, with totals.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerView {
    pub recipe_id: i64,
    pub volume_liters: f64,
    pub lines: Vec<CostedLine>,
    pub totals: CostTotals,
}

impl LedgerView {
    /// Joins raw lines with the catalog cache, preserving server order.
    /// Lines whose catalog entry is unknown still appear, priced at zero
    /// with the raw entry id standing in for the name.
    pub fn assemble(
        recipe_id: i64,
        volume_liters: f64,
        lines: Vec<IngredientLine>,
        catalogs: &CatalogCache,
    ) -> Self {
        let lines: Vec<CostedLine> = lines
            .into_iter()
            .map(|line| {
                let resolved = catalogs.resolve(line.kind, line.entry_id);
                let cost = line_cost(line.kind.basis(), line.quantity, resolved.unit_price);
                CostedLine {
                    name: resolved.name,
                    supplier: resolved.supplier,
                    unit_price: resolved.unit_price,
                    cost,
                    line,
                }
            })
            .collect();
        let totals = CostTotals::compute(&lines, volume_liters);
        Self { recipe_id, volume_liters, lines, totals }
    }

    /// Removes a line by id and recomputes the totals. Returns whether a
    /// line was actually removed. Matching is by id, never by position.
    pub fn drop_line(&mut self, line_id: i64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|costed| costed.line.id != line_id);
        if self.lines.len() == before {
            return false;
        }
        self.totals = CostTotals::compute(&self.lines, self.volume_liters);
        true
    }

    pub fn find_line(&self, line_id: i64) -> Option<&CostedLine> {
        self.lines.iter().find(|costed| costed.line.id == line_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

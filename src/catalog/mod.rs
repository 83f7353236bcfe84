use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fixed ingredient categories understood by the costing rules. Anything the
/// server sends outside the three known tags lands in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngredientKind {
    Fermentable,
    Hop,
    Yeast,
    Other,
}

/// Whether a category's catalog price applies per kilogram or per discrete
/// sale unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBasis {
    PerKilogram,
    PerUnit,
}

impl IngredientKind {
    /// The three categories backed by a server catalog.
    pub const CATALOGED: [IngredientKind; 3] = [
        IngredientKind::Fermentable,
        IngredientKind::Hop,
        IngredientKind::Yeast,
    ];

    /// Tag used on the wire for this category.
    pub fn as_wire(&self) -> &'static str {
        match self {
            IngredientKind::Fermentable => "malte",
            IngredientKind::Hop => "lupulo",
            IngredientKind::Yeast => "levedura",
            IngredientKind::Other => "outro",
        }
    }

    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "malte" => IngredientKind::Fermentable,
            "lupulo" => IngredientKind::Hop,
            "levedura" => IngredientKind::Yeast,
            _ => IngredientKind::Other,
        }
    }

    /// Unknown categories follow the per-kilogram branch; without a backing
    /// catalog their price resolves to zero anyway.
    pub fn basis(&self) -> PriceBasis {
        match self {
            IngredientKind::Yeast => PriceBasis::PerUnit,
            _ => PriceBasis::PerKilogram,
        }
    }

    /// Unit quantities are entered and displayed in.
    pub fn unit_label(&self) -> &'static str {
        match self {
            IngredientKind::Yeast => "un",
            _ => "g",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IngredientKind::Fermentable => "Fermentable",
            IngredientKind::Hop => "Hop",
            IngredientKind::Yeast => "Yeast",
            IngredientKind::Other => "Other",
        }
    }
}

impl fmt::Display for IngredientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for IngredientKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for IngredientKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(IngredientKind::from_wire(&raw))
    }
}

/// Parses the category names accepted on the command line, both the English
/// labels and the wire tags.
impl FromStr for IngredientKind {
    type Err = UnknownKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "fermentable" | "malt" | "malte" => Ok(IngredientKind::Fermentable),
            "hop" | "lupulo" => Ok(IngredientKind::Hop),
            "yeast" | "levedura" => Ok(IngredientKind::Yeast),
            _ => Err(UnknownKind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownKind;

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected one of: fermentable, hop, yeast")
    }
}

impl std::error::Error for UnknownKind {}

/// A purchasable ingredient reference with a fixed unit price, as returned by
/// the server's catalog endpoints. Extra attributes sent by the server are
/// ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "fabricante", default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(rename = "preco_kg", default, skip_serializing_if = "Option::is_none")]
    pub price_per_kg: Option<f64>,
    #[serde(
        rename = "preco_unidade",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub price_per_unit: Option<f64>,
}

impl CatalogEntry {
    pub fn unit_price(&self, basis: PriceBasis) -> f64 {
        match basis {
            PriceBasis::PerKilogram => self.price_per_kg,
            PriceBasis::PerUnit => self.price_per_unit,
        }
        .unwrap_or(0.0)
    }
}

/// Price and display name resolved for one ledger line.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPrice {
    pub name: String,
    pub supplier: Option<String>,
    pub unit_price: f64,
}

/// Per-category memo of the last-fetched catalog lists. Filled lazily, once
/// per category per session; re-fetching requires a fresh session.
#[derive(Debug, Default)]
pub struct CatalogCache {
    fermentables: Option<Vec<CatalogEntry>>,
    hops: Option<Vec<CatalogEntry>>,
    yeasts: Option<Vec<CatalogEntry>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, kind: IngredientKind) -> Option<&Vec<CatalogEntry>> {
        match kind {
            IngredientKind::Fermentable => self.fermentables.as_ref(),
            IngredientKind::Hop => self.hops.as_ref(),
            IngredientKind::Yeast => self.yeasts.as_ref(),
            IngredientKind::Other => None,
        }
    }

    pub fn contains(&self, kind: IngredientKind) -> bool {
        self.slot(kind).is_some()
    }

    /// Memoizes a fetched list. Categories without a catalog are not stored.
    pub fn store(&mut self, kind: IngredientKind, entries: Vec<CatalogEntry>) {
        match kind {
            IngredientKind::Fermentable => self.fermentables = Some(entries),
            IngredientKind::Hop => self.hops = Some(entries),
            IngredientKind::Yeast => self.yeasts = Some(entries),
            IngredientKind::Other => {}
        }
    }

    pub fn entries(&self, kind: IngredientKind) -> Option<&[CatalogEntry]> {
        self.slot(kind).map(Vec::as_slice)
    }

    /// Resolves the display name and unit price for a catalog reference.
    /// A missing entry resolves to price zero with the raw id as its name, so
    /// one dangling reference never fails a whole render.
    pub fn resolve(&self, kind: IngredientKind, entry_id: i64) -> ResolvedPrice {
        let found = self
            .slot(kind)
            .and_then(|entries| entries.iter().find(|entry| entry.id == entry_id));
        match found {
            Some(entry) => ResolvedPrice {
                name: entry.name.clone(),
                supplier: entry.supplier.clone(),
                unit_price: entry.unit_price(kind.basis()),
            },
            None => ResolvedPrice {
                name: entry_id.to_string(),
                supplier: None,
                unit_price: 0.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, name: &str, price_per_kg: Option<f64>, price_per_unit: Option<f64>) -> CatalogEntry {
        CatalogEntry {
            id,
            name: name.into(),
            supplier: None,
            price_per_kg,
            price_per_unit,
        }
    }

    #[test]
    fn wire_tags_round_trip() {
        for kind in IngredientKind::CATALOGED {
            assert_eq!(IngredientKind::from_wire(kind.as_wire()), kind);
        }
        assert_eq!(
            IngredientKind::from_wire("acucar"),
            IngredientKind::Other
        );
    }

    #[test]
    fn parses_cli_aliases() {
        assert_eq!("malt".parse::<IngredientKind>(), Ok(IngredientKind::Fermentable));
        assert_eq!("lupulo".parse::<IngredientKind>(), Ok(IngredientKind::Hop));
        assert_eq!("YEAST".parse::<IngredientKind>(), Ok(IngredientKind::Yeast));
        assert!("water".parse::<IngredientKind>().is_err());
    }

    #[test]
    fn deserializes_unknown_tag_as_other() {
        let kind: IngredientKind = serde_json::from_str("\"especiaria\"").expect("kind");
        assert_eq!(kind, IngredientKind::Other);
    }

    #[test]
    fn resolves_price_by_id() {
        let mut cache = CatalogCache::new();
        cache.store(
            IngredientKind::Fermentable,
            vec![entry(1, "Pilsen", Some(8.0), None), entry(2, "Munich", Some(9.5), None)],
        );
        let resolved = cache.resolve(IngredientKind::Fermentable, 2);
        assert_eq!(resolved.name, "Munich");
        assert!((resolved.unit_price - 9.5).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_entry_resolves_to_zero_with_raw_id() {
        let mut cache = CatalogCache::new();
        cache.store(IngredientKind::Hop, vec![entry(1, "Citra", Some(120.0), None)]);
        let resolved = cache.resolve(IngredientKind::Hop, 99);
        assert_eq!(resolved.name, "99");
        assert_eq!(resolved.unit_price, 0.0);
    }

    #[test]
    fn yeast_uses_per_unit_price() {
        let mut cache = CatalogCache::new();
        cache.store(
            IngredientKind::Yeast,
            vec![entry(5, "US-05", None, Some(25.0))],
        );
        let resolved = cache.resolve(IngredientKind::Yeast, 5);
        assert!((resolved.unit_price - 25.0).abs() < f64::EPSILON);
    }
}

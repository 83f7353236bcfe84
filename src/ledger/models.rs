use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::IngredientKind;

/// A recipe as stored by the server. Locally created recipes have no `id`
/// until the first save; recipes imported from the external recipe source
/// additionally carry read-only brewing metrics and a raw ingredient bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "volume_litros", default, skip_serializing_if = "Option::is_none")]
    pub volume_liters: Option<f64>,
    #[serde(rename = "eficiencia", default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
    #[serde(rename = "estilo", default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abv: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ibu: Option<f64>,
    #[serde(rename = "cor", default, skip_serializing_if = "Option::is_none")]
    pub color: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<f64>,
    #[serde(rename = "avaliacao", default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "ingredientes", default, skip_serializing_if = "Option::is_none")]
    pub bill: Option<RecipeBill>,
    #[serde(
        rename = "data_criacao",
        default,
        deserialize_with = "lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<NaiveDateTime>,
    #[serde(
        rename = "data_atualizacao",
        default,
        deserialize_with = "lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<NaiveDateTime>,
}

impl Recipe {
    pub const DEFAULT_EFFICIENCY: f64 = 75.0;

    /// Starts an unsaved local recipe.
    pub fn draft(name: impl Into<String>, volume_liters: Option<f64>, efficiency: Option<f64>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            volume_liters,
            efficiency: efficiency.or(Some(Self::DEFAULT_EFFICIENCY)),
            style: None,
            abv: None,
            ibu: None,
            color: None,
            og: None,
            fg: None,
            rating: None,
            notes: None,
            bill: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// The raw bill of ingredients imported from the external recipe source.
/// Display-only: these lists carry no prices and contribute no costs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeBill {
    #[serde(default)]
    pub fermentables: Vec<BillFermentable>,
    #[serde(default)]
    pub hops: Vec<BillHop>,
    #[serde(default)]
    pub yeasts: Vec<BillYeast>,
}

impl RecipeBill {
    pub fn is_empty(&self) -> bool {
        self.fermentables.is_empty() && self.hops.is_empty() && self.yeasts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillFermentable {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    /// Kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(rename = "yield", default, skip_serializing_if = "Option::is_none")]
    pub yield_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillHop {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    /// Grams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillYeast {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    /// Packages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attenuation: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// One association between a recipe and a catalog entry with a quantity.
/// Grams for fermentables and hops, sale units for yeast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub id: i64,
    #[serde(rename = "receita_id")]
    pub recipe_id: i64,
    #[serde(rename = "tipo_ingrediente")]
    pub kind: IngredientKind,
    #[serde(rename = "ingrediente_id")]
    pub entry_id: i64,
    #[serde(rename = "quantidade")]
    pub quantity: f64,
    #[serde(rename = "tempo_adicao", default, skip_serializing_if = "Option::is_none")]
    pub addition_minutes: Option<f64>,
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Accepts the timestamp spellings the server has been seen to emit, both
/// ISO 8601 and the space-separated variant, and drops anything else rather
/// than failing the whole record.
fn lenient_datetime<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_datetime))
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

//! Sale-price computation inputs and results.
//!
//! The arithmetic itself lives on the server; this module only shapes the
//! request the user assembled and decodes whichever envelope the server
//! answers with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::PricingDefaults;

/// Packaging presets the pricing form can start from. Selecting one is a
/// local operation; only the resulting volume travels to the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Packaging {
    LongNeck,
    Bottle500,
    #[default]
    Bottle600,
    Can,
    Growler,
}

impl Packaging {
    pub const ALL: [Packaging; 5] = [
        Packaging::LongNeck,
        Packaging::Bottle500,
        Packaging::Bottle600,
        Packaging::Can,
        Packaging::Growler,
    ];

    pub fn volume_ml(self) -> f64 {
        match self {
            Packaging::LongNeck => 355.0,
            Packaging::Bottle500 => 500.0,
            Packaging::Bottle600 => 600.0,
            Packaging::Can => 473.0,
            Packaging::Growler => 1000.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Packaging::LongNeck => "Long Neck 355ml",
            Packaging::Bottle500 => "Garrafa 500ml",
            Packaging::Bottle600 => "Garrafa 600ml",
            Packaging::Can => "Lata 473ml",
            Packaging::Growler => "Growler 1L",
        }
    }

    fn as_wire(self) -> &'static str {
        match self {
            Packaging::LongNeck => "long_neck",
            Packaging::Bottle500 => "garrafa_500",
            Packaging::Bottle600 => "garrafa_600",
            Packaging::Can => "lata_473",
            Packaging::Growler => "growler_1l",
        }
    }
}

impl fmt::Display for Packaging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownPackaging;

impl fmt::Display for UnknownPackaging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected one of: longneck, garrafa500, garrafa600, lata, growler")
    }
}

impl std::error::Error for UnknownPackaging {}

impl FromStr for Packaging {
    type Err = UnknownPackaging;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        let packaging = match normalized.as_str() {
            "longneck" | "longneck355" | "355" | "355ml" => Packaging::LongNeck,
            "garrafa500" | "bottle500" | "500" | "500ml" => Packaging::Bottle500,
            "garrafa" | "garrafa600" | "bottle600" | "600" | "600ml" => Packaging::Bottle600,
            "lata" | "lata473" | "can" | "473" | "473ml" => Packaging::Can,
            "growler" | "growler1l" | "1000" | "1000ml" | "1l" => Packaging::Growler,
            _ => return Err(UnknownPackaging),
        };
        Ok(packaging)
    }
}

/// Everything the user can tune before asking for a quote. Lives on the
/// shell context so repeated `price` calls keep the previous answers.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingForm {
    pub product_name: Option<String>,
    pub packaging: Packaging,
    pub unit_volume_ml: f64,
    pub packaging_cost: f64,
    pub label_cost: f64,
    pub cap_cost: f64,
    pub profit_margin: f64,
    pub card_fee: f64,
    pub sanitation_percent: f64,
    pub tax_percent: f64,
}

impl PricingForm {
    pub fn from_defaults(defaults: &PricingDefaults) -> Self {
        let packaging = Packaging::default();
        Self {
            product_name: None,
            packaging,
            unit_volume_ml: packaging.volume_ml(),
            packaging_cost: 0.0,
            label_cost: 0.0,
            cap_cost: 0.0,
            profit_margin: defaults.profit_margin,
            card_fee: defaults.card_fee,
            sanitation_percent: defaults.sanitation_percent,
            tax_percent: defaults.tax_percent,
        }
    }

    pub fn select_packaging(&mut self, packaging: Packaging) {
        self.packaging = packaging;
        self.unit_volume_ml = packaging.volume_ml();
    }

    pub fn request(&self, recipe_id: i64, fallback_name: &str) -> PricingRequest {
        let product_name = self
            .product_name
            .clone()
            .unwrap_or_else(|| fallback_name.to_string());
        PricingRequest {
            recipe_id,
            product_name,
            packaging: self.packaging.as_wire().to_string(),
            unit_volume_ml: self.unit_volume_ml,
            packaging_cost: self.packaging_cost,
            label_cost: self.label_cost,
            cap_cost: self.cap_cost,
            profit_margin: self.profit_margin,
            card_fee: self.card_fee,
            sanitation_percent: self.sanitation_percent,
            tax_percent: self.tax_percent,
        }
    }
}

/// Body of `POST /api/calcular`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingRequest {
    #[serde(rename = "receita_id")]
    pub recipe_id: i64,
    #[serde(rename = "nome_produto")]
    pub product_name: String,
    #[serde(rename = "tipo_embalagem")]
    pub packaging: String,
    #[serde(rename = "quantidade_ml")]
    pub unit_volume_ml: f64,
    #[serde(rename = "custo_embalagem")]
    pub packaging_cost: f64,
    #[serde(rename = "custo_impressao")]
    pub label_cost: f64,
    #[serde(rename = "custo_tampinha")]
    pub cap_cost: f64,
    #[serde(rename = "percentual_lucro")]
    pub profit_margin: f64,
    #[serde(rename = "margem_cartao")]
    pub card_fee: f64,
    #[serde(rename = "percentual_sanitizacao")]
    pub sanitation_percent: f64,
    #[serde(rename = "percentual_impostos")]
    pub tax_percent: f64,
}

/// Cost breakdown the server computes per bottle. Fields default to zero
/// so schema drift degrades a figure instead of failing the decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct PriceBreakdown {
    #[serde(rename = "custo_ingredientes", default)]
    pub ingredient_cost: f64,
    #[serde(rename = "custo_total_litro", default)]
    pub cost_per_liter: f64,
    #[serde(rename = "custo_embalagem", default)]
    pub packaging_cost: f64,
    #[serde(rename = "custo_impressao", default)]
    pub label_cost: f64,
    #[serde(rename = "custo_tampinha", default)]
    pub cap_cost: f64,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(rename = "valor_lucro", default)]
    pub profit_value: f64,
    #[serde(rename = "margem_cartao", default)]
    pub card_fee_value: f64,
    #[serde(rename = "valor_sanitizacao", default)]
    pub sanitation_value: f64,
    #[serde(rename = "valor_impostos", default)]
    pub tax_value: f64,
    #[serde(rename = "valor_total", default)]
    pub total_value: f64,
    #[serde(rename = "valor_venda_final", default)]
    pub final_sale_value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct PriceSummary {
    #[serde(rename = "custo_total_ingredientes", default)]
    pub total_ingredient_cost: f64,
    #[serde(rename = "valor_final", default)]
    pub final_value: f64,
    #[serde(rename = "margem_lucro", default)]
    pub profit_margin: f64,
    #[serde(rename = "quantidade_ml", default)]
    pub unit_volume_ml: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub breakdown: PriceBreakdown,
    pub summary: Option<PriceSummary>,
}

/// Top-level `/api/calcular` response. The server has shipped two layouts
/// for `resultado`: the breakdown directly, and a wrapper object holding
/// the breakdown plus the summary. Both are accepted.
#[derive(Debug, Deserialize)]
pub(crate) struct PricingEnvelope {
    #[serde(default)]
    pub(crate) success: bool,
    #[serde(default)]
    resultado: Option<BreakdownEnvelope>,
    #[serde(default)]
    resumo: Option<PriceSummary>,
}

// `Nested` must stay first: the breakdown's fields are all defaulted, so
// the flat variant matches any map at all.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BreakdownEnvelope {
    Nested {
        resultado: PriceBreakdown,
        #[serde(default)]
        resumo: Option<PriceSummary>,
    },
    Flat(PriceBreakdown),
}

impl PricingEnvelope {
    pub(crate) fn into_quote(self) -> Option<PriceQuote> {
        match self.resultado? {
            BreakdownEnvelope::Nested { resultado, resumo } => Some(PriceQuote {
                breakdown: resultado,
                summary: resumo.or(self.resumo),
            }),
            BreakdownEnvelope::Flat(breakdown) => Some(PriceQuote {
                breakdown,
                summary: self.resumo,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_carry_their_volumes() {
        assert_eq!(Packaging::LongNeck.volume_ml(), 355.0);
        assert_eq!(Packaging::Bottle500.volume_ml(), 500.0);
        assert_eq!(Packaging::Bottle600.volume_ml(), 600.0);
        assert_eq!(Packaging::Can.volume_ml(), 473.0);
        assert_eq!(Packaging::Growler.volume_ml(), 1000.0);
        assert_eq!(Packaging::default(), Packaging::Bottle600);
    }

    #[test]
    fn parses_preset_spellings() {
        assert_eq!("garrafa500".parse::<Packaging>(), Ok(Packaging::Bottle500));
        assert_eq!("Long Neck".parse::<Packaging>(), Ok(Packaging::LongNeck));
        assert_eq!("473".parse::<Packaging>(), Ok(Packaging::Can));
        assert_eq!("1L".parse::<Packaging>(), Ok(Packaging::Growler));
        assert!("barril".parse::<Packaging>().is_err());
    }

    #[test]
    fn selecting_packaging_updates_volume() {
        let mut form = PricingForm::from_defaults(&PricingDefaults::default());
        assert_eq!(form.unit_volume_ml, 600.0);
        form.select_packaging(Packaging::Bottle500);
        assert_eq!(form.unit_volume_ml, 500.0);
    }

    #[test]
    fn form_starts_from_configured_defaults() {
        let defaults = PricingDefaults {
            profit_margin: 40.0,
            card_fee: 2.5,
            sanitation_percent: 1.0,
            tax_percent: 6.0,
        };
        let form = PricingForm::from_defaults(&defaults);
        assert_eq!(form.profit_margin, 40.0);
        assert_eq!(form.card_fee, 2.5);
        assert_eq!(form.sanitation_percent, 1.0);
        assert_eq!(form.tax_percent, 6.0);
    }

    #[test]
    fn request_serializes_wire_names() {
        let form = PricingForm::from_defaults(&PricingDefaults::default());
        let request = form.request(3, "Pilsen de Verao");
        let value = serde_json::to_value(&request).expect("request");
        assert_eq!(value["receita_id"], 3);
        assert_eq!(value["nome_produto"], "Pilsen de Verao");
        assert_eq!(value["tipo_embalagem"], "garrafa_600");
        assert_eq!(value["quantidade_ml"], 600.0);
        assert_eq!(value["percentual_lucro"], 30.0);
    }

    #[test]
    fn decodes_flat_result_envelope() {
        let raw = r#"{
            "success": true,
            "resultado": {"custo_ingredientes": 46.0, "valor_venda_final": 18.5},
            "resumo": {"valor_final": 18.5, "quantidade_ml": 600}
        }"#;
        let envelope: PricingEnvelope = serde_json::from_str(raw).expect("envelope");
        assert!(envelope.success);
        let quote = envelope.into_quote().expect("quote");
        assert_eq!(quote.breakdown.ingredient_cost, 46.0);
        assert_eq!(quote.breakdown.final_sale_value, 18.5);
        assert_eq!(quote.summary.expect("summary").unit_volume_ml, 600.0);
    }

    #[test]
    fn decodes_nested_result_envelope() {
        let raw = r#"{
            "success": true,
            "resultado": {
                "resultado": {"custo_ingredientes": 46.0, "valor_total": 12.0},
                "resumo": {"valor_final": 18.5, "margem_lucro": 30.0}
            }
        }"#;
        let envelope: PricingEnvelope = serde_json::from_str(raw).expect("envelope");
        let quote = envelope.into_quote().expect("quote");
        assert_eq!(quote.breakdown.total_value, 12.0);
        assert_eq!(quote.summary.expect("summary").profit_margin, 30.0);
    }

    #[test]
    fn missing_result_yields_no_quote() {
        let raw = r#"{"success": true}"#;
        let envelope: PricingEnvelope = serde_json::from_str(raw).expect("envelope");
        assert!(envelope.into_quote().is_none());
    }
}

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, IngredientKind};
use crate::errors::ApiError;
use crate::ledger::{IngredientLine, Recipe};
use crate::pricing::{PriceQuote, PricingEnvelope, PricingRequest};

use super::{RecipeApi, SyncOutcome};

const GENERIC_FAILURE: &str = "the server reported a failure without details";

/// Reqwest-backed implementation of [`RecipeApi`].
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn catalog_path(kind: IngredientKind) -> Option<&'static str> {
        match kind {
            IngredientKind::Fermentable => Some("/api/maltes"),
            IngredientKind::Hop => Some("/api/lupulos"),
            IngredientKind::Yeast => Some("/api/leveduras"),
            IngredientKind::Other => None,
        }
    }
}

impl RecipeApi for HttpApi {
    async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let response = self.client.get(self.endpoint("/api/receitas")).send().await?;
        let envelope: RecipesEnvelope = decode(response).await?;
        Ok(envelope.receitas)
    }

    async fn get_recipe(&self, recipe_id: i64) -> Result<Recipe, ApiError> {
        let url = self.endpoint(&format!("/api/receitas/{recipe_id}"));
        let response = self.client.get(url).send().await?;
        let envelope: RecipeEnvelope = decode(response).await?;
        Ok(envelope.receita)
    }

    async fn create_recipe(&self, recipe: &Recipe) -> Result<Recipe, ApiError> {
        let response = self
            .client
            .post(self.endpoint("/api/receitas"))
            .json(&RecipePayload::from(recipe))
            .send()
            .await?;
        let envelope: RecipeEnvelope = decode(response).await?;
        Ok(envelope.receita)
    }

    async fn update_recipe(&self, recipe_id: i64, recipe: &Recipe) -> Result<Recipe, ApiError> {
        let url = self.endpoint(&format!("/api/receitas/{recipe_id}"));
        let response = self
            .client
            .put(url)
            .json(&RecipePayload::from(recipe))
            .send()
            .await?;
        let envelope: RecipeEnvelope = decode(response).await?;
        Ok(envelope.receita)
    }

    async fn sync_recipes(&self) -> Result<SyncOutcome, ApiError> {
        let response = self
            .client
            .post(self.endpoint("/api/brewfather/sync/recipes"))
            .send()
            .await?;
        let status = response.status().as_u16();
        let envelope: SyncEnvelope = decode(response).await?;
        if !envelope.success {
            let message = envelope.message.unwrap_or_else(|| GENERIC_FAILURE.to_string());
            tracing::error!("recipe sync failed: {message}");
            return Err(ApiError::Rejected { status, message });
        }
        Ok(SyncOutcome {
            message: envelope
                .message
                .unwrap_or_else(|| "recipes synchronized".to_string()),
        })
    }

    async fn list_catalog(&self, kind: IngredientKind) -> Result<Vec<CatalogEntry>, ApiError> {
        // The unknown bucket has no backing endpoint.
        let Some(path) = Self::catalog_path(kind) else {
            return Err(ApiError::Shape(format!("no catalog endpoint for `{kind}`")));
        };
        let response = self.client.get(self.endpoint(path)).send().await?;
        decode(response).await
    }

    async fn list_lines(&self, recipe_id: i64) -> Result<Vec<IngredientLine>, ApiError> {
        let url = self.endpoint(&format!("/api/receitas/{recipe_id}/ingredientes"));
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    async fn add_line(
        &self,
        recipe_id: i64,
        kind: IngredientKind,
        entry_id: i64,
        quantity: f64,
    ) -> Result<IngredientLine, ApiError> {
        let url = self.endpoint(&format!("/api/receitas/{recipe_id}/ingredientes"));
        let payload = NewLinePayload {
            tipo_ingrediente: kind.as_wire(),
            ingrediente_id: entry_id,
            quantidade: quantity,
        };
        let response = self.client.post(url).json(&payload).send().await?;
        decode(response).await
    }

    async fn update_line(
        &self,
        recipe_id: i64,
        line_id: i64,
        quantity: f64,
    ) -> Result<IngredientLine, ApiError> {
        let url = self.endpoint(&format!("/api/receitas/{recipe_id}/ingredientes/{line_id}"));
        let payload = QuantityPayload { quantidade: quantity };
        let response = self.client.put(url).json(&payload).send().await?;
        decode(response).await
    }

    async fn delete_line(&self, recipe_id: i64, line_id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/api/receitas/{recipe_id}/ingredientes/{line_id}"));
        let response = self.client.delete(url).send().await?;
        expect_ok(response).await
    }

    async fn compute_price(&self, request: &PricingRequest) -> Result<PriceQuote, ApiError> {
        let response = self
            .client
            .post(self.endpoint("/api/calcular"))
            .json(request)
            .send()
            .await?;
        let status = response.status().as_u16();
        let envelope: PricingEnvelope = decode(response).await?;
        if !envelope.success {
            tracing::error!("price computation rejected without an error message");
            return Err(ApiError::Rejected {
                status,
                message: GENERIC_FAILURE.to_string(),
            });
        }
        envelope
            .into_quote()
            .ok_or_else(|| ApiError::Shape("pricing response carried no result".to_string()))
    }
}

/// Reads the response body and applies the server's failure convention:
/// a non-2xx status or an explicit `error` field rejects the call, with
/// the server-provided message when one exists.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        let message = error_message(&body).unwrap_or_else(|| GENERIC_FAILURE.to_string());
        tracing::error!(status = status.as_u16(), "server rejected request: {message}");
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        });
    }
    if let Some(message) = error_message(&body) {
        tracing::error!(status = status.as_u16(), "server reported failure: {message}");
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        });
    }
    serde_json::from_str(&body).map_err(|err| ApiError::Shape(err.to_string()))
}

async fn expect_ok(response: Response) -> Result<(), ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        let message = error_message(&body).unwrap_or_else(|| GENERIC_FAILURE.to_string());
        tracing::error!(status = status.as_u16(), "server rejected request: {message}");
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        });
    }
    if let Some(message) = error_message(&body) {
        tracing::error!(status = status.as_u16(), "server reported failure: {message}");
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        });
    }
    Ok(())
}

fn error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
}

#[derive(Serialize)]
struct RecipePayload<'a> {
    nome: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    descricao: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    volume_litros: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    eficiencia: Option<f64>,
}

impl<'a> From<&'a Recipe> for RecipePayload<'a> {
    fn from(recipe: &'a Recipe) -> Self {
        Self {
            nome: &recipe.name,
            descricao: recipe.description.as_deref(),
            volume_litros: recipe.volume_liters,
            eficiencia: recipe.efficiency,
        }
    }
}

#[derive(Serialize)]
struct NewLinePayload<'a> {
    tipo_ingrediente: &'a str,
    ingrediente_id: i64,
    quantidade: f64,
}

#[derive(Serialize)]
struct QuantityPayload {
    quantidade: f64,
}

#[derive(Deserialize)]
struct RecipesEnvelope {
    #[serde(default)]
    receitas: Vec<Recipe>,
}

#[derive(Deserialize)]
struct RecipeEnvelope {
    receita: Recipe,
}

#[derive(Deserialize)]
struct SyncEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_slashes() {
        let api = HttpApi::new("http://localhost:5000///");
        assert_eq!(api.base_url(), "http://localhost:5000");
        assert_eq!(api.endpoint("/api/receitas"), "http://localhost:5000/api/receitas");
    }

    #[test]
    fn error_message_reads_explicit_field() {
        assert_eq!(
            error_message(r#"{"error": "receita nao encontrada"}"#).as_deref(),
            Some("receita nao encontrada")
        );
    }

    #[test]
    fn error_message_ignores_clean_bodies() {
        assert!(error_message(r#"{"receitas": []}"#).is_none());
        assert!(error_message("[]").is_none());
        assert!(error_message("<html>502</html>").is_none());
    }

    #[test]
    fn recipe_payload_serializes_wire_names() {
        let recipe = Recipe::draft("IPA", Some(20.0), Some(70.0));
        let payload = serde_json::to_value(RecipePayload::from(&recipe)).expect("payload");
        assert_eq!(payload["nome"], "IPA");
        assert_eq!(payload["volume_litros"], 20.0);
        assert_eq!(payload["eficiencia"], 70.0);
        assert!(payload.get("descricao").is_none());
    }
}

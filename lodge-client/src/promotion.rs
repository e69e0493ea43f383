//! Promotion admin service

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use shared::models::{Promotion, PromotionDraft};
use shared::response::normalize_list;
use shared::validation::{PromotionMode, validate_promotion};

use crate::http::{ApiRequest, HttpClient};
use crate::{ClientError, ClientResult};

pub const PROMOTIONS_PATH: &str = "/api/promotions";
pub const NEXT_ID_PATH: &str = "/api/promotions/next-id";

/// Fallback when a failed save carries no server message
pub const SAVE_FAILURE: &str = "Failed to save promotion. Please try again.";

/// Local id used when the sequence endpoint is unavailable
pub fn fallback_promotion_id(now_millis: i64) -> String {
    format!("P{:03}", now_millis.rem_euclid(10_000))
}

fn id_from_body(body: &Value) -> Option<String> {
    let raw = match body {
        Value::String(id) => Some(id.as_str()),
        Value::Object(_) => ["nextId", "next_id", "promotion_id", "promotionId", "data"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str)),
        _ => None,
    };
    raw.map(str::trim).filter(|id| !id.is_empty()).map(str::to_string)
}

#[derive(Clone)]
pub struct PromotionService {
    client: Arc<dyn HttpClient>,
}

impl PromotionService {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }

    async fn send(&self, request: ApiRequest) -> ClientResult<Value> {
        self.client.execute(request).await?.into_result()
    }

    /// All promotions; records that do not parse are skipped with a warning
    pub async fn list(&self) -> ClientResult<Vec<Promotion>> {
        let body = self.send(ApiRequest::get(PROMOTIONS_PATH)).await?;
        let items = normalize_list(&body, "promotions")?;
        Ok(items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Promotion>(item) {
                Ok(promotion) => Some(promotion),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed promotion");
                    None
                }
            })
            .collect())
    }

    /// Id for the create form. Never fails: falls back to a local id.
    pub async fn next_id(&self) -> String {
        match self.send(ApiRequest::get(NEXT_ID_PATH)).await {
            Ok(body) => match id_from_body(&body) {
                Some(id) => return id,
                None => tracing::warn!("next-id response has no id, using local fallback"),
            },
            Err(err) => tracing::warn!(error = %err, "next-id request failed, using local fallback"),
        }
        fallback_promotion_id(shared::util::now_millis())
    }

    pub async fn create(&self, draft: &PromotionDraft, today: NaiveDate) -> ClientResult<Value> {
        let payload = validate_promotion(draft, PromotionMode::Create, today)?;
        let body = self
            .send(ApiRequest::post(PROMOTIONS_PATH).with_json(&payload)?)
            .await?;
        tracing::info!(promotion_id = ?payload.promotion_id, "Promotion created");
        Ok(body)
    }

    /// The promotion id addresses the record and is never sent in the body
    pub async fn update(
        &self,
        promotion_id: &str,
        draft: &PromotionDraft,
        today: NaiveDate,
    ) -> ClientResult<Value> {
        let promotion_id = promotion_id.trim();
        if promotion_id.is_empty() {
            return Err(ClientError::Internal("Promotion id is required for update".into()));
        }
        let payload = validate_promotion(draft, PromotionMode::Update, today)?;
        let body = self
            .send(ApiRequest::put(format!("{PROMOTIONS_PATH}/{promotion_id}")).with_json(&payload)?)
            .await?;
        tracing::info!(promotion_id, "Promotion updated");
        Ok(body)
    }

    pub async fn delete(&self, promotion_id: &str) -> ClientResult<()> {
        self.send(ApiRequest::delete(format!("{PROMOTIONS_PATH}/{}", promotion_id.trim())))
            .await?;
        tracing::info!(promotion_id, "Promotion deleted");
        Ok(())
    }
}

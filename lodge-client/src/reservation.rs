//! Reservation intake and admin reservation services

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use serde_json::Value;
use shared::models::{
    AnalyticsPeriod, Reservation, ReservationAnalytics, ReservationDraft, ReservationRequest,
    ReservationUpdate, Room, RoomPackage,
};
use shared::pricing;
use shared::request::{AdminReservationQuery, ReservationPage};
use shared::response::{normalize_list, single_item};
use shared::submission::{SubmitGuard, SubmitState};
use shared::validation::validate_reservation;

use crate::http::{ApiRequest, HttpClient, IDEMPOTENCY_KEY_HEADER};
use crate::{ClientError, ClientResult};

pub const RESERVE_PATH: &str = "/api/reservations/reserve";
pub const ADMIN_PATH: &str = "/api/reservations/admin";
pub const ANALYTICS_PATH: &str = "/api/reservations/admin/analytics";
pub const PACKAGES_PATH: &str = "/api/room_package/packages";
pub const ROOM_IDS_PATH: &str = "/api/room/ids";
pub const ROOM_PATH: &str = "/api/room";

/// Fallback when a failed submit carries no server message
pub const SUBMIT_FAILURE: &str = "Failed to create reservation. Please try again.";

/// Upper bound on pages walked by [`ReservationService::admin_list_all`]
const MAX_EXPORT_PAGES: u32 = 500;

/// A reservation the API confirmed with `ok: true`
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedReservation {
    /// Record exactly as returned; `Null` when the reply carried none
    pub raw: Value,
    /// Typed view of `raw`, when it decodes
    pub reservation: Option<Reservation>,
}

impl CreatedReservation {
    fn from_record(raw: Value) -> Self {
        let reservation = Reservation::from_wire(raw.clone()).ok();
        Self { raw, reservation }
    }

    /// Server id of the new record, if it sent one
    pub fn id(&self) -> Option<&str> {
        self.reservation
            .as_ref()
            .map(|r| r.id.as_str())
            .filter(|id| !id.is_empty())
    }
}

pub struct ReservationService {
    client: Arc<dyn HttpClient>,
    guard: Mutex<SubmitGuard>,
}

impl ReservationService {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self::with_guard(client, SubmitGuard::new())
    }

    pub fn with_guard(client: Arc<dyn HttpClient>, guard: SubmitGuard) -> Self {
        Self {
            client,
            guard: Mutex::new(guard),
        }
    }

    fn guard(&self) -> MutexGuard<'_, SubmitGuard> {
        self.guard.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Guard state at `now`, for disabling the submit button
    pub fn submit_state(&self, now: i64) -> SubmitState {
        self.guard().state(now)
    }

    // ── Intake ──────────────────────────────────────────────────────

    /// Validate and submit using the wall clock
    pub async fn submit(
        &self,
        draft: &ReservationDraft,
        package: Option<&RoomPackage>,
        on_success: impl FnOnce(&CreatedReservation),
    ) -> ClientResult<CreatedReservation> {
        self.submit_at(
            draft,
            package,
            shared::util::today(),
            shared::util::now_millis(),
            on_success,
        )
        .await
    }

    /// Validate the draft, pass the duplicate-submission guard, then POST
    /// once with a fresh idempotency key. Nothing is sent when validation
    /// fails or the guard rejects; failed requests are not retried.
    ///
    /// Once the API answers `ok: true` the submission counts as done, even
    /// when the returned record does not decode.
    pub async fn submit_at(
        &self,
        draft: &ReservationDraft,
        package: Option<&RoomPackage>,
        today: NaiveDate,
        now: i64,
        on_success: impl FnOnce(&CreatedReservation),
    ) -> ClientResult<CreatedReservation> {
        let reservation = validate_reservation(draft, today)?;

        let ticket = self.guard().try_begin(now).map_err(|rejection| {
            tracing::warn!(reason = %rejection, "Reservation submit suppressed");
            ClientError::from(rejection)
        })?;

        let total_amount = pricing::quote_reservation(&reservation, package).map(|q| q.total);
        let body = ReservationRequest {
            reservation,
            total_amount,
            idempotency_key: ticket.idempotency_key.clone(),
        };

        let result = self.post_reservation(&body).await;
        match result {
            Ok(record) => {
                self.guard().succeed(&ticket);
                let created = CreatedReservation::from_record(record);
                if created.reservation.is_none() {
                    tracing::warn!(
                        idempotency_key = %ticket.idempotency_key,
                        "Created reservation did not decode, returning the raw record"
                    );
                }
                tracing::info!(
                    id = created.id().unwrap_or_default(),
                    idempotency_key = %ticket.idempotency_key,
                    "Reservation created"
                );
                on_success(&created);
                Ok(created)
            }
            Err(err) => {
                self.guard().fail();
                tracing::warn!(
                    idempotency_key = %ticket.idempotency_key,
                    error = %err,
                    "Reservation submit failed"
                );
                Err(err)
            }
        }
    }

    /// The created record, once the API confirmed with `ok: true`
    async fn post_reservation(&self, body: &ReservationRequest) -> ClientResult<Value> {
        let request = ApiRequest::post(RESERVE_PATH)
            .with_header(IDEMPOTENCY_KEY_HEADER, body.idempotency_key.clone())
            .with_json(body)?;
        let reply = self.client.execute(request).await?;
        let status = reply.status;
        let body = reply.into_result()?;

        if body.get("ok").and_then(Value::as_bool) != Some(true) {
            return Err(ClientError::Api {
                status,
                message: shared::response::server_message(&body).unwrap_or_default(),
            });
        }
        Ok(body.get("reservation").cloned().unwrap_or(Value::Null))
    }

    // ── Form lookups ────────────────────────────────────────────────

    async fn get(&self, request: ApiRequest) -> ClientResult<Value> {
        self.client.execute(request).await?.into_result()
    }

    /// Packages offered on the reservation form; unparseable entries are skipped
    pub async fn packages(&self) -> ClientResult<Vec<RoomPackage>> {
        let body = self.get(ApiRequest::get(PACKAGES_PATH)).await?;
        let items = normalize_list(&body, "packages")?;
        Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect())
    }

    /// Room ids for the admin custom-room selector, as strings or `{roomId}` objects
    pub async fn room_ids(&self) -> ClientResult<Vec<String>> {
        let body = self.get(ApiRequest::get(ROOM_IDS_PATH)).await?;
        let items = normalize_list(&body, "roomIds")?;
        let mut ids: Vec<String> = items
            .iter()
            .filter_map(|item| match item {
                Value::String(id) => Some(id.clone()),
                Value::Object(obj) => ["roomId", "room_id"]
                    .iter()
                    .find_map(|key| obj.get(*key).and_then(Value::as_str))
                    .map(str::to_string),
                _ => None,
            })
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    pub async fn room(&self, room_id: &str) -> ClientResult<Room> {
        let body = self.get(ApiRequest::get(format!("{ROOM_PATH}/{room_id}"))).await?;
        let record = single_item(&body, "room")
            .cloned()
            .ok_or_else(|| ClientError::InvalidResponse(format!("Room {room_id} not in response")))?;
        Ok(serde_json::from_value(record)?)
    }

    // ── Admin ───────────────────────────────────────────────────────

    async fn admin(&self, request: ApiRequest) -> ClientResult<Value> {
        let session = self.client.session();
        self.client
            .execute(request)
            .await
            .and_then(|reply| reply.into_result())
            .map_err(|err| session.expire_on_auth_failure(err))
    }

    pub async fn admin_list(&self, query: &AdminReservationQuery) -> ClientResult<ReservationPage> {
        let body = self
            .admin(ApiRequest::get(ADMIN_PATH).with_query(query.to_pairs()))
            .await?;
        Ok(ReservationPage::from_body(&body, query))
    }

    /// Every page matching the filters, for export
    pub async fn admin_list_all(&self, query: &AdminReservationQuery) -> ClientResult<Vec<Reservation>> {
        let mut query = query.clone().page(1);
        let mut all = Vec::new();
        for page_no in 1..=MAX_EXPORT_PAGES {
            let page = self.admin_list(&query).await?;
            let last = page.items.is_empty() || u64::from(page_no) >= page.total_pages();
            all.extend(page.items);
            if last {
                break;
            }
            query = query.page(page_no + 1);
        }
        Ok(all)
    }

    pub async fn admin_update(&self, id: &str, update: &ReservationUpdate) -> ClientResult<Value> {
        let body = self
            .admin(ApiRequest::put(format!("{ADMIN_PATH}/{id}")).with_json(update)?)
            .await?;
        tracing::info!(id, "Reservation updated");
        Ok(body)
    }

    pub async fn admin_delete(&self, id: &str) -> ClientResult<()> {
        self.admin(ApiRequest::delete(format!("{ADMIN_PATH}/{id}"))).await?;
        tracing::info!(id, "Reservation deleted");
        Ok(())
    }

    /// Dashboard aggregates, overall or for one period
    pub async fn analytics(&self, period: Option<AnalyticsPeriod>) -> ClientResult<ReservationAnalytics> {
        let path = match period {
            Some(period) => format!("{ANALYTICS_PATH}/{}", period.as_str()),
            None => ANALYTICS_PATH.to_string(),
        };
        let body = self.admin(ApiRequest::get(path)).await?;
        let record = single_item(&body, "analytics")
            .cloned()
            .ok_or_else(|| ClientError::InvalidResponse("Analytics response is not an object".into()))?;
        Ok(serde_json::from_value(record)?)
    }
}

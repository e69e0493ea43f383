//! Generic admin CRUD over the module registry
//!
//! Every registered module gets the same list/create/update/delete flow.
//! List fetches never fail: an unreachable API or an unknown envelope
//! degrades to one demo record plus a warning. Mutations report failure
//! to the caller and leave the current view untouched; on success the
//! list is fetched again rather than patched locally.

use std::sync::Arc;

use serde_json::{Value, json};
use shared::registry::{DeleteMode, ModuleDescriptor, UpdateMethod, find_module};
use shared::response::normalize_list;

use crate::http::{ApiRequest, HttpClient};
use crate::{ClientError, ClientResult};

/// Shown when the server gives no usable message
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Result of a list fetch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOutcome {
    pub items: Vec<Value>,
    /// Set when `items` is demo data
    pub warning: Option<String>,
}

impl ListOutcome {
    pub fn is_demo(&self) -> bool {
        self.warning.is_some()
    }
}

/// What an admin table shows for one module
#[derive(Debug, Clone)]
pub struct ModuleView {
    pub module: &'static ModuleDescriptor,
    pub items: Vec<Value>,
    /// Non-fatal banner (demo data in use)
    pub warning: Option<String>,
    /// Message of the last failed mutation
    pub error: Option<String>,
}

impl ModuleView {
    fn apply(&mut self, outcome: ListOutcome) {
        self.items = outcome.items;
        self.warning = outcome.warning;
    }

    fn fail(&mut self, err: &ClientError) {
        self.error = Some(err.user_message(GENERIC_FAILURE));
    }
}

#[derive(Clone)]
pub struct CrudService {
    client: Arc<dyn HttpClient>,
}

impl CrudService {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }

    /// Descriptor for a module key
    pub fn module(key: &str) -> ClientResult<&'static ModuleDescriptor> {
        find_module(key).ok_or_else(|| ClientError::Internal(format!("Unknown module: {key}")))
    }

    /// 401/403 come back as ordinary errors; the session is left alone
    async fn send(&self, request: ApiRequest) -> ClientResult<Value> {
        self.client.execute(request).await?.into_result()
    }

    /// GET the list endpoint and map items through the module's adapter
    pub async fn fetch_list(&self, module: &ModuleDescriptor) -> ListOutcome {
        let result = self
            .send(ApiRequest::get(module.endpoints.list))
            .await
            .and_then(|body| normalize_list(&body, module.key).map_err(ClientError::from));

        match result {
            Ok(items) => ListOutcome {
                items: items.into_iter().map(|item| module.from_wire(item)).collect(),
                warning: None,
            },
            Err(err) => {
                tracing::warn!(module = module.key, error = %err, "List fetch failed, using demo data");
                ListOutcome {
                    items: vec![module.demo_record()],
                    warning: Some(format!(
                        "Could not load {} from the server. Showing demo data.",
                        module.name
                    )),
                }
            }
        }
    }

    /// POST the shaped payload to the create endpoint
    pub async fn create_item(&self, module: &ModuleDescriptor, payload: Value) -> ClientResult<Value> {
        let request = ApiRequest::post(module.endpoints.create).with_body(module.to_wire(payload));
        let body = self.send(request).await?;
        tracing::info!(module = module.key, "Record created");
        Ok(body)
    }

    /// PUT, or PATCH for modules that update partially
    pub async fn update_item(
        &self,
        module: &ModuleDescriptor,
        id: &str,
        payload: Value,
    ) -> ClientResult<Value> {
        let path = module.endpoints.update_path(id);
        let request = match module.update_method {
            UpdateMethod::Put => ApiRequest::put(path),
            UpdateMethod::Patch => ApiRequest::patch(path),
        };
        let body = self.send(request.with_body(module.to_wire(payload))).await?;
        tracing::info!(module = module.key, id, "Record updated");
        Ok(body)
    }

    /// Hard DELETE, or a PATCH setting `isDeleted` for soft-delete modules
    pub async fn delete_item(&self, module: &ModuleDescriptor, id: &str) -> ClientResult<()> {
        let request = match module.delete_mode {
            DeleteMode::Hard => ApiRequest::delete(module.endpoints.delete_path(id)),
            DeleteMode::SoftFlag => {
                ApiRequest::patch(module.endpoints.update_path(id)).with_body(json!({ "isDeleted": true }))
            }
        };
        self.send(request).await?;
        tracing::info!(module = module.key, id, "Record deleted");
        Ok(())
    }

    // ── View flows ──────────────────────────────────────────────────

    pub async fn load(&self, module: &'static ModuleDescriptor) -> ModuleView {
        let mut view = ModuleView {
            module,
            items: Vec::new(),
            warning: None,
            error: None,
        };
        view.apply(self.fetch_list(module).await);
        view
    }

    pub async fn refresh(&self, view: &mut ModuleView) {
        view.apply(self.fetch_list(view.module).await);
    }

    pub async fn create(&self, view: &mut ModuleView, payload: Value) -> ClientResult<()> {
        match self.create_item(view.module, payload).await {
            Ok(_) => self.after_mutation(view).await,
            Err(err) => {
                view.fail(&err);
                Err(err)
            }
        }
    }

    pub async fn update(&self, view: &mut ModuleView, id: &str, payload: Value) -> ClientResult<()> {
        match self.update_item(view.module, id, payload).await {
            Ok(_) => self.after_mutation(view).await,
            Err(err) => {
                view.fail(&err);
                Err(err)
            }
        }
    }

    pub async fn delete(&self, view: &mut ModuleView, id: &str) -> ClientResult<()> {
        match self.delete_item(view.module, id).await {
            Ok(()) => self.after_mutation(view).await,
            Err(err) => {
                view.fail(&err);
                Err(err)
            }
        }
    }

    async fn after_mutation(&self, view: &mut ModuleView) -> ClientResult<()> {
        view.error = None;
        self.refresh(view).await;
        Ok(())
    }
}

// Catalog controller: one handler per user action. Each handler issues a
// single catalog call, waits for it to settle, then applies at most one view
// mutation (replace the list, append an entry, or remove an entry).
//
// Execution is single-threaded and cooperative. Handlers borrow the view
// only after their call has settled and never across an await, so two
// in-flight actions can interleave freely without overlapping mutations.

use crate::api::{CatalogApi, Confirmation};
use crate::error::ApiError;
use crate::model::{Cupcake, CupcakeForm, CupcakeId, SearchForm, UpdateForm};
use crate::view::{Entry, ViewPort};
use std::cell::{Cell, Ref, RefCell};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// How responses that replace the whole list (load and search) are ordered
/// when several are in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplaceOrdering {
    /// Every response is applied as it arrives; the last to resolve wins.
    #[default]
    LastResolvedWins,
    /// Responses to requests issued before the one currently shown are dropped.
    LatestIssuedWins,
}

impl FromStr for ReplaceOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "last-resolved" => Ok(ReplaceOrdering::LastResolvedWins),
            "latest-issued" => Ok(ReplaceOrdering::LatestIssuedWins),
            other => Err(format!("unknown ordering '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Empty the create form even when the create call failed.
    pub clear_form_on_failed_create: bool,
    pub ordering: ReplaceOrdering,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        ControllerSettings {
            clear_form_on_failed_create: true,
            ordering: ReplaceOrdering::default(),
        }
    }
}

/// What happened to the view when a list-replacing request settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    Rendered { count: usize },
    /// A newer request had already been applied; the view was left alone.
    Stale,
}

pub struct CatalogController<A, V> {
    api: A,
    view: RefCell<V>,
    settings: ControllerSettings,
    issued: Cell<u64>,
    applied: Cell<u64>,
}

impl<A: CatalogApi, V: ViewPort> CatalogController<A, V> {
    pub fn new(api: A, view: V, settings: ControllerSettings) -> Self {
        CatalogController {
            api,
            view: RefCell::new(view),
            settings,
            issued: Cell::new(0),
            applied: Cell::new(0),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn settings(&self) -> ControllerSettings {
        self.settings
    }

    /// Borrow the view for reading. Do not hold the borrow across an await.
    pub fn view(&self) -> Ref<'_, V> {
        self.view.borrow()
    }

    /// Clear the list, then append one entry per cupcake in input order.
    pub fn render(&self, cupcakes: &[Cupcake]) {
        let mut view = self.view.borrow_mut();
        view.clear();
        for cupcake in cupcakes {
            view.append(Entry::from_cupcake(cupcake));
        }
    }

    /// Initial fetch-all. A failed fetch renders an empty list.
    pub async fn load(&self) -> Result<ReplaceOutcome, ApiError> {
        let seq = self.issue();
        let result = self.api.fetch_all().await;
        self.settle_replace("fetch_all", seq, result)
    }

    /// Search trigger: fully replace the list with the matches, even when
    /// there are none.
    pub async fn submit_search(&self, form: &SearchForm) -> Result<ReplaceOutcome, ApiError> {
        let seq = self.issue();
        debug!(event = "controller.search_started", term = %form.term, seq = seq);
        let result = self.api.search(&form.term).await;
        self.settle_replace("search", seq, result)
    }

    /// Create-form submission: on success append exactly one entry to the
    /// current list. The form is cleared afterwards; after a failure only
    /// when `clear_form_on_failed_create` is set.
    pub async fn submit_create(&self, form: &mut CupcakeForm) -> Result<Cupcake, ApiError> {
        let payload = form.payload();
        let result = self.api.create(&payload).await;

        match &result {
            Ok(cupcake) => {
                self.view.borrow_mut().append(Entry::from_cupcake(cupcake));
                info!(event = "controller.create_completed", id = %cupcake.id, flavor = %cupcake.flavor);
            }
            Err(e) => warn!(event = "controller.create_failed", code = e.error_code(), error = %e),
        }

        if result.is_ok() || self.settings.clear_form_on_failed_create {
            form.clear();
        }
        result
    }

    /// Delete trigger for one rendered entry. The entry is removed only if
    /// the server answers with a truthy confirmation.
    pub async fn click_delete(&self, entry: &Entry) -> Result<Confirmation, ApiError> {
        let id = entry.id;
        let result = self
            .api
            .delete(id)
            .await
            .and_then(|confirmation| match confirmation.is_truthy() {
                true => Ok(confirmation),
                false => Err(ApiError::absent("confirmation")),
            });

        match &result {
            Ok(_) => {
                let removed = self.view.borrow_mut().remove(id);
                info!(event = "controller.delete_completed", id = %id, removed = removed);
            }
            Err(e) => {
                warn!(event = "controller.delete_failed", id = %id, code = e.error_code(), error = %e)
            }
        }
        result
    }

    /// Update-form submission. The list is not refreshed; the entry keeps
    /// its old label until the next load or search.
    pub async fn submit_update(&self, form: &UpdateForm) -> Result<Cupcake, ApiError> {
        let id = form
            .cupcake_id
            .parse::<CupcakeId>()
            .map_err(|e| ApiError::invalid(format!("cupcake id '{}': {}", form.cupcake_id, e)));
        let result = match id {
            Ok(id) => self.api.update(id, &form.fields.payload()).await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(cupcake) => info!(event = "controller.update_completed", id = %cupcake.id),
            Err(e) => warn!(event = "controller.update_failed", code = e.error_code(), error = %e),
        }
        result
    }

    /// Follow an entry's update link: load the cupcake and pre-populate an
    /// update form with it.
    pub async fn follow_update_link(
        &self,
        entry: &Entry,
        csrf_token: &str,
    ) -> Result<UpdateForm, ApiError> {
        match self.api.get(entry.id).await {
            Ok(cupcake) => Ok(UpdateForm::from_cupcake(&cupcake, csrf_token)),
            Err(e) => {
                warn!(event = "controller.edit_load_failed", id = %entry.id, code = e.error_code(), error = %e);
                Err(e)
            }
        }
    }

    fn issue(&self) -> u64 {
        let seq = self.issued.get() + 1;
        self.issued.set(seq);
        seq
    }

    fn settle_replace(
        &self,
        action: &'static str,
        seq: u64,
        result: Result<Vec<Cupcake>, ApiError>,
    ) -> Result<ReplaceOutcome, ApiError> {
        if self.settings.ordering == ReplaceOrdering::LatestIssuedWins && seq < self.applied.get() {
            debug!(event = "controller.replace_discarded", action = action, seq = seq, applied = self.applied.get());
            return Ok(ReplaceOutcome::Stale);
        }
        self.applied.set(seq);

        match result {
            Ok(cupcakes) => {
                self.render(&cupcakes);
                debug!(event = "controller.replace_rendered", action = action, seq = seq, count = cupcakes.len());
                Ok(ReplaceOutcome::Rendered {
                    count: cupcakes.len(),
                })
            }
            Err(e) => {
                warn!(event = "controller.replace_failed", action = action, code = e.error_code(), error = %e);
                self.render(&[]);
                Err(e)
            }
        }
    }
}

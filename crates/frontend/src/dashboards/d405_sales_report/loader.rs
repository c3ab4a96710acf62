use contracts::dashboards::d405_sales_report::{
    fan_out_catalogs, CatalogItem, CatalogMap, Debouncer, Dimension, FilterHierarchyStore,
    FilterQuery, RefreshScope,
};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::api;

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Keeps the catalogs of active dimensions in sync with the server.
///
/// Refreshes are debounced through a single `Debouncer` slot; the browser timer
/// only wakes it up. Pending scopes merge, and query params are read from the
/// store when the timer fires.
#[derive(Clone, Copy)]
pub struct CatalogLoader {
    store: RwSignal<FilterHierarchyStore>,
    pub catalogs: RwSignal<CatalogMap>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    debouncer: StoredValue<Debouncer<RefreshScope>>,
    timer: StoredValue<Option<Timeout>, LocalStorage>,
    /// Sequence of the latest issued request; older responses are dropped
    request_seq: StoredValue<u64>,
}

impl CatalogLoader {
    pub fn new(store: RwSignal<FilterHierarchyStore>) -> Self {
        Self {
            store,
            catalogs: RwSignal::new(CatalogMap::new()),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
            debouncer: StoredValue::new(Debouncer::default()),
            timer: StoredValue::new_local(None),
            request_seq: StoredValue::new(0),
        }
    }

    /// Catalog of a dimension; `None` until it has been fetched.
    pub fn catalog(&self, dim: Dimension) -> Option<Vec<CatalogItem>> {
        self.catalogs.with(|c| c.get(&dim).cloned())
    }

    /// Schedules a debounced refresh. Restarts the delay.
    pub fn schedule(&self, scope: RefreshScope) {
        if scope.is_none() {
            return;
        }
        let ticket = self
            .debouncer
            .try_update_value(|d| {
                let merged = d.pending().map_or(scope, |pending| pending.merge(scope));
                d.schedule(now_ms(), merged)
            })
            .unwrap_or_default();
        let delay = self.debouncer.with_value(|d| d.delay_ms());
        self.arm(ticket, delay);
    }

    fn arm(&self, ticket: u64, delay_ms: u64) {
        let loader = *self;
        let timeout = Timeout::new(delay_ms as u32, move || loader.on_timer(ticket));
        // Replacing the handle drops (cancels) the previous timer
        self.timer.set_value(Some(timeout));
    }

    fn on_timer(&self, ticket: u64) {
        let fired = self
            .debouncer
            .try_update_value(|d| d.fire(ticket, now_ms()))
            .flatten();
        match fired {
            Some(scope) => self.refresh(scope),
            None => {
                // Browser timers may wake up a millisecond early
                if self.debouncer.with_value(|d| d.is_current(ticket)) {
                    self.arm(ticket, 1);
                }
            }
        }
    }

    /// Drops the cached catalog so a later activation starts from a fresh fetch.
    pub fn forget(&self, dim: Dimension) {
        self.catalogs.update(|c| {
            c.remove(&dim);
        });
    }

    /// Manual retry: a fresh unconstrained refresh, no debounce.
    pub fn retry(&self) {
        self.debouncer.update_value(|d| {
            d.cancel();
        });
        self.timer.set_value(None);
        self.refresh(RefreshScope::All);
    }

    pub fn dismiss_error(&self) {
        self.error.set(None);
    }

    /// Fetches catalogs now. `All` replaces every catalog; `From` replaces the
    /// catalogs of the active dimensions it covers.
    pub fn refresh(&self, scope: RefreshScope) {
        if scope.is_none() {
            return;
        }
        let (query, targets) = self.store.with_untracked(|store| {
            (
                FilterQuery::for_scope(store, scope),
                FilterQuery::targets(store, scope),
            )
        });
        let seq = self
            .request_seq
            .try_update_value(|s| {
                *s += 1;
                *s
            })
            .unwrap_or_default();
        let loader = *self;

        self.loading.set(true);
        log::debug!(
            "D405: refreshing catalogs {:?} ({} params)",
            scope,
            query.params.len()
        );

        spawn_local(async move {
            let result = api::fetch_filters(&query).await;
            if loader.request_seq.get_value() != seq {
                log::debug!("D405: dropping stale catalog response #{}", seq);
                return;
            }
            match result {
                Ok(response) => {
                    let fresh = fan_out_catalogs(&response);
                    loader.catalogs.update(|catalogs| {
                        for (dim, items) in fresh {
                            let replace = match scope {
                                RefreshScope::All => true,
                                _ => targets.contains(&dim),
                            };
                            if replace {
                                catalogs.insert(dim, items);
                            }
                        }
                    });
                    loader.error.set(None);
                }
                Err(e) => {
                    // Catalogs stay at their last known value
                    log::error!("D405: failed to load filter catalogs: {}", e);
                    loader.error.set(Some(e));
                }
            }
            loader.loading.set(false);
        });
    }
}

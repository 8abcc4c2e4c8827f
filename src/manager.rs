//! Search manager: owns the live searchable registry and keeps it current.
//!
//! The manager builds the registry lazily on first query, then listens to the
//! package event stream and rebuilds it in full on every added/removed/changed
//! event. Readers never wait on a rebuild: each rebuild constructs a complete
//! [`SearchableRegistry`] off to the side and publishes it with a single
//! atomic swap, so a reader holds either the old snapshot or the new one.
//!
//! A single state lock serializes the lazy initialization, every rebuild and
//! every change of the default web search target.

use crate::config::RegistryOptions;
use crate::error::RegistryError;
use crate::events::{PackageEvent, SearchablesChanged};
use crate::inspector::PackageInspector;
use crate::registry::SearchableRegistry;
use crate::searchable::SearchableInfo;
use crate::types::ComponentName;
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::thread::JoinHandle;
use tokio::sync::broadcast::{self, error::RecvError};

/// Buffered change notifications per subscriber before it starts lagging.
const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Name of the thread that handles package events.
const LISTENER_THREAD_NAME: &str = "searchables-events";

/// Handle to the search manager. Cheap to clone; all clones share one registry.
#[derive(Clone)]
pub struct SearchManager {
    inner: Arc<Inner>,
}

struct Inner {
    inspector: Arc<dyn PackageInspector>,
    options: RegistryOptions,

    /// Guards initialization, rebuilds and default changes
    state: Mutex<ManagerState>,

    /// Published snapshot; `None` until the first query
    current: ArcSwapOption<SearchableRegistry>,

    changed: broadcast::Sender<SearchablesChanged>,
}

#[derive(Default)]
struct ManagerState {
    /// System event bus, held only until the first use subscribes to it
    package_events: Option<broadcast::Sender<PackageEvent>>,

    /// Default web search target set by an administrative call
    default_override: Option<ComponentName>,

    /// Package event listener, started on first use
    listener: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for SearchManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let current = self.inner.current.load_full();
        f.debug_struct("SearchManager")
            .field("initialized", &current.is_some())
            .field("searchables", &current.as_ref().map(|r| r.len()))
            .field("subscribers", &self.inner.changed.receiver_count())
            .finish()
    }
}

impl SearchManager {
    /// Create a manager. Nothing is scanned until the first query.
    pub fn new(
        inspector: Arc<dyn PackageInspector>,
        package_events: broadcast::Sender<PackageEvent>,
        options: RegistryOptions,
    ) -> Self {
        let (changed, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                inspector,
                options,
                state: Mutex::new(ManagerState {
                    package_events: Some(package_events),
                    ..ManagerState::default()
                }),
                current: ArcSwapOption::empty(),
                changed,
            }),
        }
    }

    /// True once the registry has been built.
    pub fn is_initialized(&self) -> bool {
        self.inner.current.load().is_some()
    }

    /// True while the package event listener is running.
    pub fn is_listening(&self) -> bool {
        self.inner
            .state
            .lock()
            .listener
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// The current registry snapshot, building it on first use.
    ///
    /// Use this when several reads must agree with each other.
    pub fn snapshot(&self) -> Arc<SearchableRegistry> {
        self.inner.registry()
    }

    /// Searchable record for a component.
    ///
    /// With `use_global` the component is ignored and the default web search
    /// target is returned instead.
    pub fn searchable_info(&self, component: Option<&ComponentName>, use_global: bool) -> Option<Arc<SearchableInfo>> {
        if use_global {
            return self.default_web_search_target();
        }

        let Some(component) = component else {
            tracing::error!("searchable_info() called without a component");
            return None;
        };
        self.snapshot().get(component).cloned()
    }

    /// Searchables that can be included in global search, in build order.
    pub fn global_search_candidates(&self) -> Vec<Arc<SearchableInfo>> {
        self.snapshot().global_search_candidates().to_vec()
    }

    /// Searchables that handle web searches, in build order.
    pub fn web_search_candidates(&self) -> Vec<Arc<SearchableInfo>> {
        self.snapshot().web_search_candidates().to_vec()
    }

    pub fn default_web_search_target(&self) -> Option<Arc<SearchableInfo>> {
        self.snapshot().default_web_search().cloned()
    }

    /// Make `component` the default web search target.
    ///
    /// The choice survives rebuilds until it is replaced or its component is
    /// no longer installed. Subscribers are notified.
    pub fn set_default_web_search_target(&self, component: &ComponentName) -> Result<(), RegistryError> {
        self.inner.set_default_web_search(component)?;
        self.inner.notify();
        Ok(())
    }

    /// Receive a [`SearchablesChanged`] after every rebuild or default change.
    pub fn subscribe(&self) -> broadcast::Receiver<SearchablesChanged> {
        self.inner.changed.subscribe()
    }

    /// Deliver a package event directly, bypassing the event bus.
    ///
    /// Rebuilds synchronously on the calling thread, then notifies subscribers.
    pub fn handle_package_event(&self, event: &PackageEvent) {
        self.inner.handle(&event.to_string());
    }
}

impl Inner {
    /// Load the published snapshot, building it if this is the first use.
    fn registry(self: &Arc<Self>) -> Arc<SearchableRegistry> {
        if let Some(registry) = self.current.load_full() {
            return registry;
        }

        let mut state = self.state.lock();

        // Another caller may have finished initialization while we waited
        if let Some(registry) = self.current.load_full() {
            return registry;
        }

        // Subscribe before scanning so no event between scan and publish is lost.
        // Dropping our sender afterwards lets the bus close with its publishers.
        let events = state.package_events.take().map(|bus| bus.subscribe());
        let registry = Arc::new(self.build(&state));
        self.current.store(Some(Arc::clone(&registry)));
        state.listener = events.and_then(|events| spawn_event_listener(Arc::downgrade(self), events));

        tracing::info!("Search manager initialized with {} searchables", registry.len());
        registry
    }

    fn build(&self, state: &ManagerState) -> SearchableRegistry {
        let components = self.inspector.list_searchable_components();
        SearchableRegistry::build(
            &components,
            self.inspector.as_ref(),
            &self.options,
            state.default_override.as_ref(),
        )
    }

    /// Rescan everything in response to a package event, then notify.
    fn handle(self: &Arc<Self>, reason: &str) {
        tracing::debug!("Rebuilding searchables: {}", reason);

        if self.current.load().is_none() {
            // The initial build already reflects this event
            self.registry();
        } else {
            self.rebuild();
        }
        self.notify();
    }

    fn rebuild(&self) {
        let mut state = self.state.lock();
        let registry = self.build(&state);

        if let Some(explicit) = state.default_override.as_ref() {
            if !registry.contains(explicit) {
                tracing::info!(
                    "Default web search {} was removed, reverting",
                    explicit.flatten_to_short_string()
                );
                state.default_override = None;
            }
        }

        self.current.store(Some(Arc::new(registry)));
    }

    fn set_default_web_search(self: &Arc<Self>, component: &ComponentName) -> Result<(), RegistryError> {
        // Outside the lock: first use takes it to initialize
        self.registry();

        let mut state = self.state.lock();
        let current = self.current.load_full().unwrap_or_default();
        let updated = current.with_default_web_search(component)?;
        state.default_override = Some(component.clone());
        self.current.store(Some(Arc::new(updated)));

        tracing::info!(
            "Default web search set to {}",
            component.flatten_to_short_string()
        );
        Ok(())
    }

    fn notify(&self) {
        // Each subscriber has its own queue; a slow or dropped one affects nobody else
        if self.changed.send(SearchablesChanged).is_err() {
            tracing::trace!("No subscribers for searchables change");
        }
    }
}

/// Start the thread that turns package events into rebuilds.
///
/// The thread exits once every publisher has dropped the event bus. It holds
/// only a weak reference to the manager, so a manager dropped while publishers
/// remain leaves the thread parked until the next event arrives, at which
/// point it exits without rebuilding.
fn spawn_event_listener(
    inner: Weak<Inner>,
    mut events: broadcast::Receiver<PackageEvent>,
) -> Option<JoinHandle<()>> {
    let spawned = std::thread::Builder::new()
        .name(LISTENER_THREAD_NAME.to_string())
        .spawn(move || {
            loop {
                let reason = match events.blocking_recv() {
                    Ok(event) => event.to_string(),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Missed {} package events, rescanning", skipped);
                        format!("{} missed package events", skipped)
                    }
                    Err(RecvError::Closed) => {
                        tracing::debug!("Package event stream closed");
                        break;
                    }
                };

                let Some(inner) = inner.upgrade() else {
                    break;
                };
                inner.handle(&reason);
            }
        });

    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::error!("Failed to start package event listener: {}", e);
            None
        }
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource lifecycle controller
//!
//! Owns at most one resource at a time and drives it through
//! `Idle → Loading → Ready → Showing → Idle`. Provider events for every
//! instance arrive on one channel and are handled serially by the controller's
//! event pump, tagged with the instance generation so that events from a
//! released instance are ignored.

use crate::error::ControllerError;
use crate::guard;
use crate::state::{ResourceState, SettleReason};
use preload_adapters::{
    InstanceEvent, InstanceEventReceiver, ResourceEvent, ResourceEvents, ResourceProvider,
    UiContext,
};
use preload_core::{CoalescingDispatcher, ControllerConfig};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const SHOW_CONTEXT: &str = "ResourceController::request_show";
const SETTLE_CONTEXT: &str = "ResourceController::settle";
const LOAD_CONTEXT: &str = "ResourceController::request_load";
const EVENT_CONTEXT: &str = "ResourceController::handle_event";

type Settle = Box<dyn FnOnce() + Send + 'static>;

/// A resource instance the controller currently owns
struct Held<H> {
    handle: H,
    generation: u64,
}

/// The show request bound to the held resource
struct ShowTicket {
    id: u64,
    settle: Settle,
}

enum Slot<H> {
    Idle,
    Loading(Held<H>),
    Ready(Held<H>),
    Showing {
        held: Held<H>,
        /// Load still outstanding when the show began
        loading: bool,
        ticket: ShowTicket,
    },
}

impl<H> Slot<H> {
    fn state(&self) -> ResourceState {
        match self {
            Slot::Idle => ResourceState::Idle,
            Slot::Loading(_) => ResourceState::Loading,
            Slot::Ready(_) => ResourceState::Ready,
            Slot::Showing { .. } => ResourceState::Showing,
        }
    }

    fn generation(&self) -> Option<u64> {
        match self {
            Slot::Idle => None,
            Slot::Loading(held) | Slot::Ready(held) | Slot::Showing { held, .. } => {
                Some(held.generation)
            }
        }
    }

    /// Release the resource, handing back the pending show's callback
    fn release(self) -> Option<Settle> {
        match self {
            Slot::Showing { ticket, .. } => Some(ticket.settle),
            _ => None,
        }
    }
}

/// Outcome of trying to start a show
enum ShowStart<H> {
    AlreadyShowing,
    NoResource(Settle),
    Started {
        show_id: u64,
        generation: u64,
        handle: H,
    },
}

struct Inner<P: ResourceProvider, U> {
    provider: P,
    ui: U,
    config: ControllerConfig,
    events_tx: mpsc::UnboundedSender<InstanceEvent>,
    slot: Mutex<Slot<P::Handle>>,
    next_generation: AtomicU64,
    next_show: AtomicU64,
    reload: Option<CoalescingDispatcher<()>>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

/// Mediates a single pre-fetched, single-use resource.
///
/// Cloning shares the same controller. Must be created within a Tokio runtime.
/// Dropping the last handle stops the event pump, as [`shutdown`](Self::shutdown) does.
pub struct ResourceController<P: ResourceProvider, U> {
    inner: Arc<Inner<P, U>>,
}

impl<P: ResourceProvider, U> Clone for ResourceController<P, U> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, U> ResourceController<P, U>
where
    P: ResourceProvider,
    U: UiContext,
{
    /// Create a controller and start its event pump
    pub fn new(provider: P, ui: U, config: ControllerConfig) -> Result<Self, ControllerError> {
        config.validate()?;

        let (events_tx, events_rx) = ResourceEvents::channel();
        let reload = config.reload_debounce.map(CoalescingDispatcher::new);
        let inner = Arc::new(Inner {
            provider,
            ui,
            config,
            events_tx,
            slot: Mutex::new(Slot::Idle),
            next_generation: AtomicU64::new(0),
            next_show: AtomicU64::new(0),
            reload,
            pump: Mutex::new(None),
        });

        let handle = tokio::spawn(pump_events(Arc::downgrade(&inner), events_rx));
        *inner.pump.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);

        tracing::debug!(unit_id = %inner.config.unit_id, "controller started");
        Ok(Self { inner })
    }

    /// Create and start loading a resource unless one is already held
    pub fn request_load(&self) {
        self.inner.request_load();
    }

    /// Show the held resource, calling `on_settled` once the show is over.
    ///
    /// Never blocks. A call made while another show is in progress is ignored
    /// and its `on_settled` is dropped without being called. Otherwise
    /// `on_settled` runs exactly once: immediately when nothing is held, after
    /// the grace period when the resource never became ready, or when the
    /// provider reports the display ended or failed.
    pub fn request_show<F>(&self, on_settled: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let show_id = self.inner.next_show.fetch_add(1, Ordering::Relaxed) + 1;

        match self.inner.begin_show(show_id, Box::new(on_settled)) {
            ShowStart::AlreadyShowing => {
                tracing::debug!("show already in progress, request ignored");
            }
            ShowStart::NoResource(settle) => {
                self.inner.invoke_settle(settle, &SettleReason::NoResource);
                self.inner.request_load();
            }
            ShowStart::Started {
                show_id,
                generation,
                handle,
            } => {
                tracing::info!(generation, show_id, "show requested");
                let inner = Arc::clone(&self.inner);
                tokio::spawn(async move {
                    let flow = Arc::clone(&inner).wait_and_display(show_id, generation, handle);
                    if let Err(e) = guard::run_async(SHOW_CONTEXT, flow).await {
                        inner.abandon_show(show_id, SettleReason::Error(e.to_string()));
                    }
                });
            }
        }
    }

    pub fn state(&self) -> ResourceState {
        self.inner.lock().state()
    }

    pub fn has_resource(&self) -> bool {
        self.inner.lock().generation().is_some()
    }

    pub fn unit_id(&self) -> &str {
        &self.inner.config.unit_id
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    /// Stop processing provider events
    pub fn shutdown(&self) {
        if let Some(handle) = self
            .inner
            .pump
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            handle.abort();
            tracing::debug!(unit_id = %self.inner.config.unit_id, "controller stopped");
        }
    }
}

impl<P, U> Inner<P, U>
where
    P: ResourceProvider,
    U: UiContext,
{
    fn lock(&self) -> MutexGuard<'_, Slot<P::Handle>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the slot through `f` under the lock
    fn transition<R>(&self, f: impl FnOnce(Slot<P::Handle>) -> (Slot<P::Handle>, R)) -> R {
        let mut slot = self.lock();
        let current = std::mem::replace(&mut *slot, Slot::Idle);
        let (next, result) = f(current);
        *slot = next;
        result
    }

    fn request_load(&self) {
        let unit_id = self.config.unit_id.as_str();
        let mut slot = self.lock();
        if !matches!(*slot, Slot::Idle) {
            tracing::trace!(state = %slot.state(), "load skipped, resource held");
            return;
        }

        // Provider events are queued, so holding the lock here cannot deadlock
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let events = ResourceEvents::new(generation, self.events_tx.clone());
        let started = guard::catch(LOAD_CONTEXT, || self.start_load(unit_id, generation, events));
        match started {
            Ok(Some(handle)) => {
                *slot = Slot::Loading(Held { handle, generation });
                tracing::info!(unit_id, generation, "resource loading");
            }
            // Already logged; the slot stays idle
            Ok(None) | Err(_) => {}
        }
    }

    fn start_load(
        &self,
        unit_id: &str,
        generation: u64,
        events: ResourceEvents,
    ) -> Option<P::Handle> {
        let handle = match self.provider.create(unit_id, events) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(unit_id, generation, error = %e, "resource create failed");
                return None;
            }
        };
        if let Err(e) = self.provider.load(&handle) {
            tracing::warn!(unit_id, generation, error = %e, "resource load failed to start");
            return None;
        }
        Some(handle)
    }

    fn begin_show(&self, show_id: u64, settle: Settle) -> ShowStart<P::Handle> {
        self.transition(|slot| match slot {
            Slot::Idle => (Slot::Idle, ShowStart::NoResource(settle)),
            showing @ Slot::Showing { .. } => (showing, ShowStart::AlreadyShowing),
            Slot::Loading(held) => {
                let start = ShowStart::Started {
                    show_id,
                    generation: held.generation,
                    handle: held.handle.clone(),
                };
                let ticket = ShowTicket {
                    id: show_id,
                    settle,
                };
                (
                    Slot::Showing {
                        held,
                        loading: true,
                        ticket,
                    },
                    start,
                )
            }
            Slot::Ready(held) => {
                let start = ShowStart::Started {
                    show_id,
                    generation: held.generation,
                    handle: held.handle.clone(),
                };
                let ticket = ShowTicket {
                    id: show_id,
                    settle,
                };
                (
                    Slot::Showing {
                        held,
                        loading: false,
                        ticket,
                    },
                    start,
                )
            }
        })
    }

    /// Display now if ready, otherwise give the load one grace period
    async fn wait_and_display(self: Arc<Self>, show_id: u64, generation: u64, handle: P::Handle) {
        if !self.provider.is_ready(&handle) {
            tracing::debug!(
                generation,
                grace_ms = self.config.grace_period.as_millis() as u64,
                "resource not ready, waiting"
            );
            tokio::time::sleep(self.config.grace_period).await;

            if !self.provider.is_ready(&handle) {
                self.abandon_show(show_id, SettleReason::NotReady);
                return;
            }
        }

        self.display(show_id, generation, handle);
    }

    /// Hand the display step to the UI context
    fn display(self: &Arc<Self>, show_id: u64, generation: u64, handle: P::Handle) {
        let weak = Arc::downgrade(self);
        self.ui.run(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            // The show may have settled while this action was queued
            if !inner.is_current_show(show_id) {
                tracing::debug!(generation, show_id, "show no longer current, not displaying");
                return;
            }

            let shown = guard::catch(SHOW_CONTEXT, || inner.provider.show(&handle))
                .and_then(|r| r.map_err(ControllerError::from));
            match shown {
                Ok(()) => tracing::info!(generation, show_id, "resource displayed"),
                Err(e) => inner.end_show(generation, SettleReason::ShowFailed(e.to_string())),
            }
        });
    }

    fn is_current_show(&self, show_id: u64) -> bool {
        matches!(&*self.lock(), Slot::Showing { ticket, .. } if ticket.id == show_id)
    }

    /// Settle a show that never reached the screen; the resource is kept
    fn abandon_show(&self, show_id: u64, reason: SettleReason) {
        let settle = self.transition(|slot| match slot {
            Slot::Showing {
                held,
                loading,
                ticket,
            } if ticket.id == show_id => {
                let next = if loading {
                    Slot::Loading(held)
                } else {
                    Slot::Ready(held)
                };
                (next, Some(ticket.settle))
            }
            other => (other, None),
        });

        if let Some(settle) = settle {
            self.invoke_settle(settle, &reason);
        }
    }

    fn handle_event(self: &Arc<Self>, event: InstanceEvent) {
        let generation = event.generation;
        tracing::trace!(generation, event = event.event.name(), "provider event");

        match event.event {
            ResourceEvent::Loaded => self.on_loaded(generation),
            ResourceEvent::LoadFailed { reason } => self.on_load_failed(generation, reason),
            ResourceEvent::ShowFailed { reason } => {
                self.end_show(generation, SettleReason::ShowFailed(reason))
            }
            ResourceEvent::Dismissed => self.end_show(generation, SettleReason::Dismissed),
        }
    }

    fn on_loaded(&self, generation: u64) {
        let applied = self.transition(|slot| match slot {
            Slot::Loading(held) if held.generation == generation => (Slot::Ready(held), true),
            Slot::Showing {
                held,
                loading: true,
                ticket,
            } if held.generation == generation => (
                Slot::Showing {
                    held,
                    loading: false,
                    ticket,
                },
                true,
            ),
            other => (other, false),
        });

        if applied {
            tracing::info!(generation, "resource ready");
        } else {
            tracing::debug!(generation, "stale loaded event ignored");
        }
    }

    /// Drop the resource; no reload until someone asks again
    fn on_load_failed(&self, generation: u64, reason: String) {
        let released = self.transition(|slot| {
            if slot.generation() == Some(generation) {
                (Slot::Idle, Some(slot.release()))
            } else {
                (slot, None)
            }
        });

        let Some(settle) = released else {
            tracing::debug!(generation, "stale load failure ignored");
            return;
        };

        tracing::warn!(generation, reason = %reason, "resource load failed");
        if let Some(settle) = settle {
            self.invoke_settle(settle, &SettleReason::LoadFailed(reason));
        }
    }

    /// Terminal show outcome: release, settle, then fetch the next resource
    fn end_show(self: &Arc<Self>, generation: u64, reason: SettleReason) {
        let released = self.transition(|slot| {
            if slot.generation() == Some(generation) {
                (Slot::Idle, Some(slot.release()))
            } else {
                (slot, None)
            }
        });

        let Some(settle) = released else {
            tracing::debug!(generation, reason = %reason, "stale show outcome ignored");
            return;
        };

        match &reason {
            SettleReason::Dismissed => tracing::info!(generation, "resource dismissed"),
            other => tracing::warn!(generation, reason = %other, "resource show ended"),
        }
        if let Some(settle) = settle {
            self.invoke_settle(settle, &reason);
        }
        self.schedule_reload();
    }

    fn schedule_reload(self: &Arc<Self>) {
        match &self.reload {
            Some(dispatcher) => {
                let weak = Arc::downgrade(self);
                dispatcher.debounce(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.request_load();
                    }
                });
            }
            None => self.request_load(),
        }
    }

    /// Run the caller's callback; never called with the slot locked
    fn invoke_settle(&self, settle: Settle, reason: &SettleReason) {
        tracing::debug!(reason = %reason, displayed = reason.was_displayed(), "show settled");
        let _ = guard::catch(SETTLE_CONTEXT, settle);
    }
}

impl<P: ResourceProvider, U> Drop for Inner<P, U> {
    fn drop(&mut self) {
        // Providers may outlive the controller and keep the event channel open
        if let Some(handle) = self.pump.get_mut().unwrap_or_else(|e| e.into_inner()).take() {
            handle.abort();
        }
    }
}

/// Deliver provider events to the controller one at a time
async fn pump_events<P, U>(inner: Weak<Inner<P, U>>, mut events: InstanceEventReceiver)
where
    P: ResourceProvider,
    U: UiContext,
{
    while let Some(event) = events.recv().await {
        let Some(inner) = inner.upgrade() else {
            break;
        };
        // A failing handler costs this event only, never the pump
        let _ = guard::catch(EVENT_CONTEXT, || inner.handle_event(event));
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;

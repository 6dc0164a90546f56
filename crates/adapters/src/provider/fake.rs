// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake resource provider for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ProviderError, ResourceEvent, ResourceEvents, ResourceProvider};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Recorded provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Create { unit_id: String },
    Load { id: u64 },
    Show { id: u64 },
    IsReady { id: u64 },
}

/// Handle to a fake resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FakeResource(pub u64);

/// Fake resource state
#[derive(Debug, Clone)]
pub struct FakeInstance {
    pub unit_id: String,
    pub ready: bool,
    pub load_started: bool,
    pub shown: bool,
    events: ResourceEvents,
}

#[derive(Default)]
struct FakeState {
    instances: HashMap<u64, FakeInstance>,
    next_id: u64,
    auto_load: bool,
    fail_create: Option<String>,
    panic_create: Option<String>,
    fail_load: Option<String>,
    fail_show: Option<String>,
}

/// Fake provider for testing
#[derive(Clone, Default)]
pub struct FakeProvider {
    state: Arc<Mutex<FakeState>>,
    calls: Arc<Mutex<Vec<ProviderCall>>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete every load as soon as it starts
    pub fn with_auto_load(self) -> Self {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).auto_load = true;
        self
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn create_count(&self) -> usize {
        self.count(|c| matches!(c, ProviderCall::Create { .. }))
    }

    pub fn load_count(&self) -> usize {
        self.count(|c| matches!(c, ProviderCall::Load { .. }))
    }

    pub fn show_count(&self) -> usize {
        self.count(|c| matches!(c, ProviderCall::Show { .. }))
    }

    fn count(&self, pred: impl Fn(&ProviderCall) -> bool) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|c| pred(c))
            .count()
    }

    /// Most recently created resource
    pub fn latest(&self) -> Option<FakeResource> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.instances.keys().max().copied().map(FakeResource)
    }

    /// Get a resource's state
    pub fn instance(&self, resource: FakeResource) -> Option<FakeInstance> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .instances
            .get(&resource.0)
            .cloned()
    }

    /// Make the next `create` fail
    pub fn fail_next_create(&self, reason: &str) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).fail_create = Some(reason.to_string());
    }

    /// Make the next `create` panic, as a misbehaving SDK would
    pub fn panic_next_create(&self, message: &str) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).panic_create = Some(message.to_string());
    }

    /// Make the next `load` fail synchronously
    pub fn fail_next_load(&self, reason: &str) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).fail_load = Some(reason.to_string());
    }

    /// Make the next `show` fail synchronously
    pub fn fail_next_show(&self, reason: &str) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).fail_show = Some(reason.to_string());
    }

    /// Change readiness without raising an event
    pub fn set_ready(&self, resource: FakeResource, ready: bool) {
        if let Some(instance) = self
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .instances
            .get_mut(&resource.0)
        {
            instance.ready = ready;
        }
    }

    /// Mark ready and raise `Loaded`
    pub fn complete_load(&self, resource: FakeResource) {
        self.set_ready(resource, true);
        self.emit(resource, ResourceEvent::Loaded);
    }

    pub fn fail_load(&self, resource: FakeResource, reason: &str) {
        self.emit(
            resource,
            ResourceEvent::LoadFailed {
                reason: reason.to_string(),
            },
        );
    }

    pub fn fail_show(&self, resource: FakeResource, reason: &str) {
        self.emit(
            resource,
            ResourceEvent::ShowFailed {
                reason: reason.to_string(),
            },
        );
    }

    pub fn dismiss(&self, resource: FakeResource) {
        self.emit(resource, ResourceEvent::Dismissed);
    }

    /// Raise an arbitrary event for a resource; returns false if unknown or unheard
    pub fn emit(&self, resource: FakeResource, event: ResourceEvent) -> bool {
        let events = self
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .instances
            .get(&resource.0)
            .map(|i| i.events.clone());
        match events {
            Some(events) => events.emit(event),
            None => false,
        }
    }

    fn record(&self, call: ProviderCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

impl ResourceProvider for FakeProvider {
    type Handle = FakeResource;

    fn create(&self, unit_id: &str, events: ResourceEvents) -> Result<FakeResource, ProviderError> {
        self.record(ProviderCall::Create {
            unit_id: unit_id.to_string(),
        });

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(message) = state.panic_create.take() {
            drop(state);
            panic!("{message}");
        }
        if let Some(reason) = state.fail_create.take() {
            return Err(ProviderError::CreateFailed {
                unit_id: unit_id.to_string(),
                reason,
            });
        }

        state.next_id += 1;
        let id = state.next_id;
        state.instances.insert(
            id,
            FakeInstance {
                unit_id: unit_id.to_string(),
                ready: false,
                load_started: false,
                shown: false,
                events,
            },
        );
        Ok(FakeResource(id))
    }

    fn load(&self, handle: &FakeResource) -> Result<(), ProviderError> {
        self.record(ProviderCall::Load { id: handle.0 });

        let auto_load = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(reason) = state.fail_load.take() {
                return Err(ProviderError::LoadFailed(reason));
            }
            let auto_load = state.auto_load;
            let instance = state
                .instances
                .get_mut(&handle.0)
                .ok_or_else(|| ProviderError::LoadFailed(format!("unknown resource {}", handle.0)))?;
            instance.load_started = true;
            auto_load
        };

        if auto_load {
            self.complete_load(*handle);
        }
        Ok(())
    }

    fn show(&self, handle: &FakeResource) -> Result<(), ProviderError> {
        self.record(ProviderCall::Show { id: handle.0 });

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(reason) = state.fail_show.take() {
            return Err(ProviderError::ShowFailed(reason));
        }
        let instance = state
            .instances
            .get_mut(&handle.0)
            .ok_or_else(|| ProviderError::ShowFailed(format!("unknown resource {}", handle.0)))?;
        if !instance.ready {
            return Err(ProviderError::ShowFailed("resource not loaded".to_string()));
        }
        instance.shown = true;
        Ok(())
    }

    fn is_ready(&self, handle: &FakeResource) -> bool {
        self.record(ProviderCall::IsReady { id: handle.0 });

        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .instances
            .get(&handle.0)
            .map(|i| i.ready)
            .unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

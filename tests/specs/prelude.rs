//! Shared helpers for behavioral specs

pub use preload_adapters::{
    FakeProvider, FakeResource, InlineUiContext, NoOpProvider, ProviderCall, TracedProvider,
};
pub use preload_core::{CoalescingDispatcher, ControllerConfig, Settings};
pub use preload_engine::{ResourceController, ResourceState};
pub use std::sync::atomic::{AtomicUsize, Ordering};
pub use std::sync::Arc;
pub use std::time::Duration;

pub const UNIT: &str = "interstitial-main";

/// Let spawned tasks run without moving the clock
pub async fn flush() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

/// Counter shared with settle callbacks
#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn callback(&self) -> impl FnOnce() + Send + 'static {
        let inner = Arc::clone(&self.0);
        move || {
            inner.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Controller wired to a fake provider
pub struct Harness {
    pub provider: FakeProvider,
    pub controller: ResourceController<FakeProvider, InlineUiContext>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::new(UNIT))
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        let provider = FakeProvider::new();
        let controller = ResourceController::new(provider.clone(), InlineUiContext, config).unwrap();
        Self {
            provider,
            controller,
        }
    }

    pub fn latest(&self) -> FakeResource {
        self.provider.latest().unwrap()
    }

    pub fn create(&self) -> ProviderCall {
        ProviderCall::Create {
            unit_id: UNIT.to_string(),
        }
    }
}

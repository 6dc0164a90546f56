//! Lifecycle specs
//!
//! Verify the load → show → dismiss → reload loop as seen by the provider.

use crate::prelude::*;

#[tokio::test]
async fn full_cycle_reloads_after_dismissal() {
    let h = Harness::new();

    h.controller.request_load();
    let first = h.latest();
    h.provider.complete_load(first);
    flush().await;

    let settled = Counter::default();
    h.controller.request_show(settled.callback());
    flush().await;
    h.provider.dismiss(first);
    flush().await;

    assert_eq!(settled.get(), 1);
    let second = h.latest();
    similar_asserts::assert_eq!(
        h.provider.calls(),
        vec![
            h.create(),
            ProviderCall::Load { id: first.0 },
            ProviderCall::IsReady { id: first.0 },
            ProviderCall::Show { id: first.0 },
            h.create(),
            ProviderCall::Load { id: second.0 },
        ]
    );
    assert_eq!(h.controller.state(), ResourceState::Loading);
}

#[tokio::test]
async fn every_cycle_shows_a_fresh_resource() {
    let h = Harness::new();
    h.controller.request_load();

    let mut shown = Vec::new();
    for _ in 0..3 {
        let resource = h.latest();
        h.provider.complete_load(resource);
        flush().await;

        let settled = Counter::default();
        h.controller.request_show(settled.callback());
        flush().await;
        h.provider.dismiss(resource);
        flush().await;

        assert_eq!(settled.get(), 1);
        shown.push(resource);
    }

    shown.dedup();
    assert_eq!(shown.len(), 3);
    assert_eq!(h.provider.show_count(), 3);
    assert_eq!(h.provider.create_count(), 4);
}

#[tokio::test]
async fn first_show_falls_back_and_second_show_displays() {
    let h = Harness::new();

    // Nothing pre-fetched: caller proceeds, load begins
    let first = Counter::default();
    h.controller.request_show(first.callback());
    assert_eq!(first.get(), 1);
    assert_eq!(h.provider.show_count(), 0);

    h.provider.complete_load(h.latest());
    flush().await;

    let second = Counter::default();
    h.controller.request_show(second.callback());
    flush().await;

    assert_eq!(h.provider.show_count(), 1);
    assert_eq!(second.get(), 0);
}

#[tokio::test]
async fn late_load_within_grace_still_displays() {
    tokio::time::pause();
    let h = Harness::new();
    h.controller.request_load();
    let resource = h.latest();

    let settled = Counter::default();
    h.controller.request_show(settled.callback());
    flush().await;

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    h.provider.complete_load(resource);
    tokio::time::sleep(Duration::from_millis(600)).await;
    flush().await;

    assert_eq!(h.provider.show_count(), 1);
    assert_eq!(settled.get(), 0);
}

#[tokio::test]
async fn load_failure_waits_for_next_trigger() {
    let h = Harness::new();
    h.controller.request_load();
    h.provider.fail_load(h.latest(), "no fill");
    flush().await;

    assert_eq!(h.controller.state(), ResourceState::Idle);
    assert_eq!(h.provider.create_count(), 1);

    // A show request is the next trigger
    let settled = Counter::default();
    h.controller.request_show(settled.callback());
    assert_eq!(settled.get(), 1);
    assert_eq!(h.provider.create_count(), 2);
}

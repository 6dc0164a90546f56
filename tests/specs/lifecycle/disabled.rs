//! Disabled and traced provider specs
//!
//! Verify the controller never blocks callers when resources are unavailable.

use crate::prelude::*;

#[tokio::test]
async fn disabled_provider_settles_every_show_immediately() {
    let controller =
        ResourceController::new(NoOpProvider::new(), InlineUiContext, ControllerConfig::new(UNIT))
            .unwrap();

    let settled = Counter::default();
    for _ in 0..3 {
        controller.request_show(settled.callback());
    }

    assert_eq!(settled.get(), 3);
    assert_eq!(controller.state(), ResourceState::Idle);
    assert!(!controller.has_resource());
}

#[tokio::test]
async fn traced_provider_is_transparent_to_the_controller() {
    let fake = FakeProvider::new().with_auto_load();
    let controller = ResourceController::new(
        TracedProvider::new(fake.clone()),
        InlineUiContext,
        ControllerConfig::new(UNIT),
    )
    .unwrap();

    controller.request_load();
    flush().await;
    assert_eq!(controller.state(), ResourceState::Ready);

    let settled = Counter::default();
    controller.request_show(settled.callback());
    flush().await;
    fake.dismiss(fake.latest().unwrap());
    flush().await;

    assert_eq!(settled.get(), 1);
    assert_eq!(fake.show_count(), 1);
    assert_eq!(fake.create_count(), 2);
}

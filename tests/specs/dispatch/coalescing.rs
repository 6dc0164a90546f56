//! Dispatcher specs
//!
//! Verify bursts of triggers collapse into one delayed execution.

use crate::prelude::*;

#[tokio::test]
async fn burst_of_reload_triggers_loads_once() {
    tokio::time::pause();
    let h = Harness::new();
    let dispatcher = CoalescingDispatcher::new(Duration::from_millis(250));

    for _ in 0..10 {
        let controller = h.controller.clone();
        dispatcher.debounce(move || controller.request_load());
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(h.provider.create_count(), 0);

    tokio::time::sleep(Duration::from_millis(300)).await;
    flush().await;

    assert_eq!(h.provider.create_count(), 1);
    assert!(!dispatcher.is_pending());
}

#[tokio::test]
async fn coalesced_callers_share_the_last_result() {
    tokio::time::pause();
    let dispatcher: CoalescingDispatcher<String> =
        CoalescingDispatcher::new(Duration::from_millis(100));

    let handles: Vec<_> = (0..4)
        .map(|i| dispatcher.submit(move || async move { Ok::<_, String>(format!("request-{}", i)) }))
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), "request-3");
    }
}

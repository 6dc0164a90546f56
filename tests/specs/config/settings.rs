//! Settings specs
//!
//! Verify a settings file drives the controller's behaviour.

use crate::prelude::*;
use std::io::Write;

#[tokio::test]
async fn settings_file_configures_grace_period() {
    tokio::time::pause();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[controller]\nunit_id = \"{}\"\ngrace_period = \"500ms\"\n\n[logging]\nfilter = \"debug\"",
        UNIT
    )
    .unwrap();

    let settings = Settings::load(file.path()).unwrap();
    assert_eq!(settings.logging.filter, "debug");
    let h = Harness::with_config(settings.controller);
    h.controller.request_load();

    let settled = Counter::default();
    h.controller.request_show(settled.callback());
    flush().await;
    tokio::time::sleep(Duration::from_millis(501)).await;
    flush().await;

    assert_eq!(settled.get(), 1);
    assert_eq!(h.provider.show_count(), 0);
    assert_eq!(h.controller.unit_id(), UNIT);
}

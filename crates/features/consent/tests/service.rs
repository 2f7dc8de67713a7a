use consent_core::*;
use consent_domain::config::EngineConfig;
use consent_domain::{ConsentCategory, ServiceDescriptor};
use consent_events::EventReceiverExt;
use consent_storage::MemoryStore;
use std::time::Duration;

fn ga() -> ServiceDescriptor {
    ServiceDescriptor::new("ga", "Google Analytics", ConsentCategory::Analytics)
}

fn engine() -> ConsentEngine {
    ConsentEngine::builder().store(MemoryStore::new()).init().unwrap()
}

fn not_ready_count(events: &[std::sync::Arc<ConsentEvent>]) -> usize {
    events.iter().filter(|e| matches!(***e, ConsentEvent::ConsentModeNotReady(_))).count()
}

#[test]
fn attach_registers_and_gates_by_consent() {
    let engine = engine();
    let handle = engine.attach(ga().into());

    assert_eq!(engine.services(), vec![ga()]);
    assert!(!handle.may_run().unwrap());
    assert_eq!(handle.gate("script").unwrap(), None);
    assert_eq!(handle.gate_or("script", "placeholder").unwrap(), "placeholder");

    engine.accept_all();

    assert!(handle.is_enabled().unwrap());
    assert_eq!(handle.gate("script").unwrap(), Some("script"));
}

#[test]
fn consent_mode_service_runs_once_bridge_is_active() {
    let engine = engine();
    let plain = engine.attach(
        ServiceDescriptor::new("other-analytics", "Other Analytics", ConsentCategory::Analytics)
            .into(),
    );
    let signalled = engine.attach(ServiceDeclaration::new(ga()).consent_mode(true));

    assert!(!signalled.may_run().unwrap());

    engine.set_consent_mode_active(true);

    assert!(signalled.may_run().unwrap());
    assert!(!signalled.is_enabled().unwrap());
    assert!(!plain.may_run().unwrap());
}

#[test]
fn handle_after_engine_drop_reports_missing_context() {
    let engine = engine();
    let handle = engine.attach(ga().into());
    drop(engine);

    assert!(matches!(handle.may_run(), Err(ConsentError::MissingContext { .. })));
    assert!(matches!(handle.gate(()), Err(ConsentError::MissingContext { .. })));
    assert!(matches!(handle.detach(), Err(ConsentError::MissingContext { .. })));
}

#[test]
fn detach_removes_only_its_own_entry() {
    let engine = engine();
    let first = engine.attach(ga().into());
    let second = engine.attach(
        ServiceDescriptor::new("pixel", "Ad Pixel", ConsentCategory::Marketing).into(),
    );

    assert!(first.detach().unwrap());

    assert_eq!(engine.services().len(), 1);
    assert_eq!(second.descriptor().id, "pixel");
}

#[test]
fn consent_mode_without_runtime_skips_diagnostics() {
    let engine = engine();
    let handle = engine.attach(ServiceDeclaration::new(ga()).consent_mode(true));

    assert!(!handle.may_run().unwrap());
}

#[tokio::test(start_paused = true)]
async fn inactive_bridge_is_reported_after_grace_period() {
    let engine = engine();
    let mut rx = engine.subscribe();

    let _handle = engine.attach(ServiceDeclaration::new(ga()).consent_mode(true));

    tokio::time::sleep(Duration::from_millis(2_900)).await;
    assert_eq!(not_ready_count(&rx.drain()), 0);

    tokio::time::sleep(Duration::from_millis(200)).await;
    let event = rx.recv_event().await.unwrap();
    assert_eq!(*event, ConsentEvent::ConsentModeNotReady(ga()));
}

#[tokio::test(start_paused = true)]
async fn grace_period_follows_configuration() {
    let mut config = EngineConfig::default();
    config.diagnostics.consent_mode_warning_ms = 100;
    let engine = ConsentEngine::builder().config(config).store(MemoryStore::new()).init().unwrap();
    let mut rx = engine.subscribe();

    let _handle = engine.attach(ServiceDeclaration::new(ga()).consent_mode(true));
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(not_ready_count(&rx.drain()), 1);
}

#[tokio::test(start_paused = true)]
async fn detach_before_grace_period_cancels_report() {
    let engine = engine();
    let mut rx = engine.subscribe();

    let handle = engine.attach(ServiceDeclaration::new(ga()).consent_mode(true));
    tokio::time::sleep(Duration::from_millis(1_000)).await;
    assert!(handle.detach().unwrap());

    tokio::time::sleep(Duration::from_millis(5_000)).await;
    assert_eq!(not_ready_count(&rx.drain()), 0);
}

#[tokio::test(start_paused = true)]
async fn activation_within_grace_period_suppresses_report() {
    let engine = engine();
    let mut rx = engine.subscribe();

    let _handle = engine.attach(ServiceDeclaration::new(ga()).consent_mode(true));
    tokio::time::sleep(Duration::from_millis(1_000)).await;
    engine.set_consent_mode_active(true);

    tokio::time::sleep(Duration::from_millis(5_000)).await;
    assert_eq!(not_ready_count(&rx.drain()), 0);
}

#[tokio::test(start_paused = true)]
async fn already_active_bridge_schedules_nothing() {
    let engine = engine();
    engine.set_consent_mode_active(true);
    let mut rx = engine.subscribe();

    let handle = engine.attach(ServiceDeclaration::new(ga()).consent_mode(true));
    tokio::time::sleep(Duration::from_millis(5_000)).await;

    assert!(handle.may_run().unwrap());
    assert_eq!(not_ready_count(&rx.drain()), 0);
}

#[tokio::test(start_paused = true)]
async fn pending_check_does_not_keep_engine_alive() {
    let engine = engine();
    let handle = engine.attach(ServiceDeclaration::new(ga()).consent_mode(true));
    drop(engine);

    tokio::time::sleep(Duration::from_millis(5_000)).await;

    assert!(matches!(handle.is_enabled(), Err(ConsentError::MissingContext { .. })));
}

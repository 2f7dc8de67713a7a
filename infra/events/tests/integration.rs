use consent_events::*;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Toggled(u64);

#[tokio::test]
async fn test_event_flow() {
    let notifier = ChangeNotifier::new();
    let mut rx = notifier.subscribe();

    assert_eq!(notifier.publish(Toggled(42)), 1);

    let received = rx.recv_event().await.unwrap();
    assert_eq!(*received, Toggled(42));
}

#[tokio::test]
async fn test_publish_without_subscribers_is_dropped() {
    let notifier = ChangeNotifier::<Toggled>::new();
    assert_eq!(notifier.publish(Toggled(1)), 0);
    assert_eq!(notifier.subscriber_count(), 0);
}

#[tokio::test]
async fn test_receiver_lagged_recovery() {
    let capacity = 2;
    let notifier = ChangeNotifier::with_capacity(capacity).unwrap();
    let mut rx = notifier.subscribe();

    let total = 100u64;
    for i in 0..total {
        notifier.publish(Toggled(i));
    }

    let first = rx.recv_event().await.unwrap();
    assert!(first.0 >= total - capacity as u64, "expected fresh tail, got {}", first.0);

    let second = rx.recv_event().await.unwrap();
    assert_eq!(second.0, first.0 + 1);
}

#[tokio::test]
async fn test_multiple_subscribers_isolation() {
    let notifier = ChangeNotifier::new();
    let mut rx1 = notifier.subscribe();
    let mut rx2 = notifier.subscribe();

    assert_eq!(notifier.publish(Toggled(100)), 2);

    assert_eq!(*rx1.recv_event().await.unwrap(), Toggled(100));
    assert_eq!(*rx2.recv_event().await.unwrap(), Toggled(100));
}

#[tokio::test]
async fn test_clones_share_channel() {
    let notifier = ChangeNotifier::new();
    let twin = notifier.clone();
    let mut rx = notifier.subscribe();

    twin.publish(Toggled(7));

    assert_eq!(rx.drain().iter().map(|e| e.0).collect::<Vec<_>>(), vec![7]);
}

#[tokio::test]
async fn test_drain_returns_buffered_events_in_order() {
    let notifier = ChangeNotifier::new();
    let mut rx = notifier.subscribe();

    for i in 0..3 {
        notifier.publish(Toggled(i));
    }

    let drained: Vec<u64> = rx.drain().iter().map(|e| e.0).collect();
    assert_eq!(drained, vec![0, 1, 2]);
    assert!(rx.drain().is_empty());
}

#[tokio::test]
async fn test_closed_channel_yields_none() {
    let notifier = ChangeNotifier::<Toggled>::new();
    let mut rx = notifier.subscribe();
    drop(notifier);

    let res = tokio::time::timeout(Duration::from_secs(1), rx.recv_event()).await;
    assert_eq!(res.unwrap(), None);
}

#[test]
fn test_zero_capacity_rejected() {
    let err = ChangeNotifier::<Toggled>::with_capacity(0).unwrap_err();
    assert!(matches!(err, EventError::InvalidCapacity { .. }));
}

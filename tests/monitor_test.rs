use async_trait::async_trait;
use order_monitor::config::MonitorConfig;
use order_monitor::detect::{ScanReport, TableChanges};
use order_monitor::model::{OrderId, TableId};
use order_monitor::monitor::{ChangeMonitor, MonitorError};
use order_monitor::notify::{Notice, NoticeKind, Notifier, NotifyError};
use order_monitor::store::mock::MockStore;
use order_monitor::store::StoreError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
struct CountingNotifier {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Notifier for CountingNotifier {
    async fn notify(&self, _notice: &Notice) -> Result<(), NotifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Takes a while per notice, recording the orders it was asked about.
#[derive(Clone, Default)]
struct SlowNotifier {
    seen: Arc<Mutex<Vec<OrderId>>>,
}

#[async_trait]
impl Notifier for SlowNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), NotifyError> {
        self.seen.lock().unwrap().push(notice.order);
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok(())
    }
}

fn floating_notice(id: u32) -> Notice {
    Notice {
        order: OrderId(id),
        label: format!("Kiosk {id}"),
        kind: NoticeKind::Floating,
    }
}

/// Monitor against a scripted store: a failing sweep costs one tick, nothing more.
#[tokio::test(start_paused = true)]
async fn test_monitor_with_mocked_store() {
    let mock = MockStore::new();
    mock.expect_sweep().return_err(StoreError::Dropped);
    mock.expect_sweep().return_ok(ScanReport {
        inspected: 2,
        notices: vec![floating_notice(1), floating_notice(2)],
        failures: Vec::new(),
    });
    mock.expect_sweep().return_ok(ScanReport::default());

    let notifier = CountingNotifier::default();
    let config = MonitorConfig {
        poll_interval_ms: 1000,
        ..MonitorConfig::default()
    };
    let monitor = ChangeMonitor::new(mock.client(), notifier.clone(), &config);
    let handle = monitor.start();

    // Tick 1 fails, tick 2 delivers, tick 3 is quiet.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 0);
    assert!(monitor.is_running());

    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 2);

    assert!(monitor.stop(handle).await.unwrap());
    mock.verify();
}

/// `stop` landing while the first of three notices is delivered: the other two never go out.
#[tokio::test(start_paused = true)]
async fn test_stop_mid_scan_suppresses_remaining_notices() {
    let mock = MockStore::new();
    mock.expect_sweep().return_ok(ScanReport {
        inspected: 3,
        notices: vec![floating_notice(1), floating_notice(2), floating_notice(3)],
        failures: Vec::new(),
    });

    let notifier = SlowNotifier::default();
    let monitor = ChangeMonitor::new(mock.client(), notifier.clone(), &MonitorConfig::default());
    let handle = monitor.start();

    // First tick at 2000ms; notice 1 is in flight until 2300ms.
    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert_eq!(notifier.seen.lock().unwrap().len(), 1);

    assert!(monitor.stop(handle).await.unwrap());
    assert!(!monitor.is_running());
    assert_eq!(*notifier.seen.lock().unwrap(), vec![OrderId(1)]);

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(*notifier.seen.lock().unwrap(), vec![OrderId(1)]);
    assert_eq!(mock.remaining(), 0);
    mock.verify();
}

#[tokio::test]
async fn test_table_store_failure_surfaces() {
    let mock = MockStore::new();
    mock.expect_table(TableId(9)).return_err(StoreError::Closed);
    mock.expect_table(TableId(9)).return_ok(TableChanges {
        table: TableId(9),
        changes: 0,
        notice: None,
    });

    let notifier = CountingNotifier::default();
    let monitor = ChangeMonitor::new(mock.client(), notifier.clone(), &MonitorConfig::default());

    assert!(matches!(
        monitor.table_changes(TableId(9)).await,
        Err(MonitorError::Store(StoreError::Closed))
    ));
    let changes = monitor.table_changes(TableId(9)).await.unwrap();
    assert_eq!(changes.changes, 0);
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 0);
    mock.verify();
}

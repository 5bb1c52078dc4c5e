/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use chrono::{Duration, Utc};
use tvrelay_models::models::{AlertRef, NewNotificationLog, NotificationLogFilter};

use crate::fixtures::TestFixture;

#[tokio::test]
#[ignore]
async fn test_logs_survive_alert_deletion() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();
    let alert = fixture.insert_webhook_alert(config.id, None);

    let log = fixture
        .dal
        .notification_logs()
        .create(&NewNotificationLog::delivered(
            AlertRef::Webhook(alert.id),
            None,
            "hello".to_string(),
        ))
        .unwrap();
    assert_eq!(log.alert_id, Some(alert.id));

    fixture.dal.tradingview_alerts().delete(alert.id).unwrap();

    let page = fixture
        .dal
        .notification_logs()
        .list(&NotificationLogFilter::default(), 1, 20)
        .unwrap();
    let kept = page.items.iter().find(|l| l.id == log.id).unwrap();
    assert_eq!(kept.alert_id, None);
    assert_eq!(kept.message_sent.as_deref(), Some("hello"));
}

#[tokio::test]
#[ignore]
async fn test_delete_older_than_cutoff() {
    let fixture = TestFixture::new().await;
    fixture
        .dal
        .notification_logs()
        .create(&NewNotificationLog::failed(
            AlertRef::Unknown,
            None,
            None,
            "boom",
        ))
        .unwrap();

    let removed = fixture
        .dal
        .notification_logs()
        .delete_older_than(Utc::now() - Duration::days(1))
        .unwrap();
    assert_eq!(removed, 0);

    let removed = fixture
        .dal
        .notification_logs()
        .delete_older_than(Utc::now() + Duration::minutes(1))
        .unwrap();
    assert!(removed >= 1);
}

#[tokio::test]
#[ignore]
async fn test_filter_by_status() {
    let fixture = TestFixture::new().await;
    let logs = fixture.dal.notification_logs();
    logs.create(&NewNotificationLog::delivered(AlertRef::Unknown, None, "ok".to_string()))
        .unwrap();
    logs.create(&NewNotificationLog::failed(AlertRef::Unknown, None, None, "nope"))
        .unwrap();

    let failed = logs
        .list(
            &NotificationLogFilter {
                status: Some("failed".to_string()),
                ..Default::default()
            },
            1,
            20,
        )
        .unwrap();
    assert!(failed.items.iter().all(|l| !l.is_success()));
    assert!(failed.total >= 1);
}

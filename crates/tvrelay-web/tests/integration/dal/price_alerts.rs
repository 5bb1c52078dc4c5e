/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use chrono::Utc;
use tvrelay_models::models::AlertType;

use crate::fixtures::TestFixture;

#[tokio::test]
#[ignore]
async fn test_list_due_skips_fired_one_time_alerts() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();
    let recurring = fixture.insert_price_alert(config.id, "SPX", AlertType::Above, 5000.0, false);
    let one_time = fixture.insert_price_alert(config.id, "AAPL", AlertType::Below, 150.0, true);
    let fired = fixture.insert_price_alert(config.id, "MSFT", AlertType::Above, 400.0, true);

    fixture
        .dal
        .price_alerts()
        .mark_triggered(fired.id, Utc::now())
        .unwrap();

    let due: Vec<_> = fixture
        .dal
        .price_alerts()
        .list_due()
        .unwrap()
        .into_iter()
        .map(|a| a.id)
        .collect();

    assert!(due.contains(&recurring.id));
    assert!(due.contains(&one_time.id));
    assert!(!due.contains(&fired.id));
}

#[tokio::test]
#[ignore]
async fn test_mark_triggered_sets_timestamp() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();
    let alert = fixture.insert_price_alert(config.id, "BTCUSD", AlertType::Above, 70000.0, true);

    let at = Utc::now();
    let updated = fixture
        .dal
        .price_alerts()
        .mark_triggered(alert.id, at)
        .unwrap()
        .unwrap();

    assert!(updated.is_triggered);
    assert!(updated.last_triggered_at.is_some());
    assert!(!updated.is_due());
}

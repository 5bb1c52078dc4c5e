/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use tvrelay_models::models::UpdateTelegramConfig;
use tvrelay_web::dal::DalError;

use crate::fixtures::TestFixture;

#[tokio::test]
#[ignore]
async fn test_update_telegram_config() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();

    let update = UpdateTelegramConfig::new(None, Some("-2002".to_string()), Some(false)).unwrap();
    let updated = fixture
        .dal
        .telegram_configs()
        .update(config.id, &update)
        .expect("Failed to update config")
        .expect("Config not found");

    assert_eq!(updated.chat_id, "-2002");
    assert!(!updated.is_active);
    assert_eq!(updated.bot_token, config.bot_token);
    assert!(updated.updated_at >= config.updated_at);
}

#[tokio::test]
#[ignore]
async fn test_delete_refuses_config_in_use() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();
    fixture.insert_webhook_alert(config.id, None);

    let err = fixture.dal.telegram_configs().delete(config.id).unwrap_err();
    match err {
        DalError::InUse(msg) => assert_eq!(
            msg,
            "Cannot delete configuration with associated alerts (1 webhook, 0 price)"
        ),
        other => panic!("Unexpected error: {}", other),
    }
    assert!(fixture.dal.telegram_configs().get(config.id).unwrap().is_some());
}

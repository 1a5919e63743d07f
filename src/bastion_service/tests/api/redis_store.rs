use std::{sync::Arc, time::Duration};

use bastion_adapters::{config::RedisSetting, persistence::RedisChallengeStore};
use bastion_core::{
    Challenge, ChallengeCode, ChallengeKey, ChallengeSecret, ChallengeStore, CodeType, OwnerKey,
};
use bastion_service::configure_redis;
use testcontainers_modules::redis::{REDIS_PORT, Redis};
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use tokio::sync::RwLock;

fn challenge() -> Challenge {
    Challenge::new(
        CodeType::Image,
        ChallengeSecret::Code(ChallengeCode::new("4821".to_string())),
        Duration::from_secs(60),
    )
    .unwrap()
}

#[tokio::test]
#[ignore = "requires docker"]
async fn redis_store_round_trip_and_compare_and_set() {
    let container = Redis::default().start().await.unwrap();
    let port = container.get_host_port_ipv4(REDIS_PORT).await.unwrap();

    let conn = configure_redis(&RedisSetting {
        host_name: format!("127.0.0.1:{}", port),
        timeout_ms: 2_000,
    })
    .unwrap();
    let store = RedisChallengeStore::new(Arc::new(RwLock::new(conn)));
    let key = ChallengeKey::new(CodeType::Image, OwnerKey::new());

    assert!(store.get(&key).await.unwrap().is_none());

    let issued = challenge();
    store
        .set(&key, issued.clone(), Duration::from_secs(60))
        .await
        .unwrap();
    let stored = store.get(&key).await.unwrap().unwrap();
    assert_eq!(stored.version(), 0);

    let mut armed = issued.clone();
    armed
        .begin_second_check(
            ChallengeCode::new("second".to_string()),
            Duration::from_secs(30),
            chrono::Utc::now(),
        )
        .unwrap();
    assert!(
        store
            .compare_and_set(&key, 0, armed.clone(), Duration::from_secs(30))
            .await
            .unwrap()
    );
    assert!(
        !store
            .compare_and_set(&key, 0, armed, Duration::from_secs(30))
            .await
            .unwrap()
    );
    assert!(store.get(&key).await.unwrap().unwrap().second_check_pending());

    assert!(store.delete(&key).await.unwrap());
    assert!(!store.delete(&key).await.unwrap());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn redis_store_entries_expire() {
    let container = Redis::default().start().await.unwrap();
    let port = container.get_host_port_ipv4(REDIS_PORT).await.unwrap();

    let conn = configure_redis(&RedisSetting {
        host_name: format!("127.0.0.1:{}", port),
        timeout_ms: 2_000,
    })
    .unwrap();
    let store = RedisChallengeStore::new(Arc::new(RwLock::new(conn)));
    let key = ChallengeKey::new(CodeType::Image, OwnerKey::new());

    store
        .set(&key, challenge(), Duration::from_millis(100))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(store.get(&key).await.unwrap().is_none());
}

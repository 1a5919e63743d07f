use std::{sync::Arc, time::Duration};

use bastion_core::{Challenge, ChallengeKey, ChallengeStore, ChallengeStoreError};
use redis::{Commands, Connection};
use tokio::sync::RwLock;

/// Replaces the value only while the stored challenge is at the expected
/// version. KEYS[1] key, ARGV[1] expected version, ARGV[2] new value,
/// ARGV[3] ttl in milliseconds.
const COMPARE_AND_SET: &str = r#"
local current = redis.call('GET', KEYS[1])
if not current then
    return 0
end
local decoded = cjson.decode(current)
if tonumber(decoded['version']) ~= tonumber(ARGV[1]) then
    return 0
end
redis.call('SET', KEYS[1], ARGV[2], 'PX', ARGV[3])
return 1
"#;

/// Challenge store shared by every node of a deployment.
///
/// Expiry is delegated to Redis key TTLs, so expired challenges are simply
/// absent.
#[derive(Clone)]
pub struct RedisChallengeStore {
    conn: Arc<RwLock<Connection>>,
    compare_and_set: Arc<redis::Script>,
}

impl RedisChallengeStore {
    pub fn new(conn: Arc<RwLock<Connection>>) -> Self {
        Self {
            conn,
            compare_and_set: Arc::new(redis::Script::new(COMPARE_AND_SET)),
        }
    }
}

#[async_trait::async_trait]
impl ChallengeStore for RedisChallengeStore {
    async fn get(&self, key: &ChallengeKey) -> Result<Option<Challenge>, ChallengeStoreError> {
        let key = get_key(key);
        let mut conn = self.conn.write().await;
        let value: Option<String> = conn
            .get(&key)
            .map_err(|e| ChallengeStoreError::Unavailable(e.to_string()))?;

        value
            .map(|json| {
                serde_json::from_str(&json)
                    .map_err(|e| ChallengeStoreError::Serialization(e.to_string()))
            })
            .transpose()
    }

    async fn set(
        &self,
        key: &ChallengeKey,
        challenge: Challenge,
        ttl: Duration,
    ) -> Result<(), ChallengeStoreError> {
        let key = get_key(key);
        let value = serde_json::to_string(&challenge)
            .map_err(|e| ChallengeStoreError::Serialization(e.to_string()))?;

        let mut conn = self.conn.write().await;
        conn.pset_ex(key, value, ttl_millis(ttl))
            .map_err(|e| ChallengeStoreError::Unavailable(e.to_string()))
    }

    async fn delete(&self, key: &ChallengeKey) -> Result<bool, ChallengeStoreError> {
        let key = get_key(key);
        let mut conn = self.conn.write().await;
        let removed: i64 = conn
            .del(&key)
            .map_err(|e| ChallengeStoreError::Unavailable(e.to_string()))?;
        Ok(removed > 0)
    }

    async fn compare_and_set(
        &self,
        key: &ChallengeKey,
        expected_version: u64,
        challenge: Challenge,
        ttl: Duration,
    ) -> Result<bool, ChallengeStoreError> {
        let key = get_key(key);
        let value = serde_json::to_string(&challenge)
            .map_err(|e| ChallengeStoreError::Serialization(e.to_string()))?;

        let mut conn = self.conn.write().await;
        let replaced: i64 = self
            .compare_and_set
            .key(key)
            .arg(expected_version)
            .arg(value)
            .arg(ttl_millis(ttl))
            .invoke(&mut *conn)
            .map_err(|e| ChallengeStoreError::Unavailable(e.to_string()))?;
        Ok(replaced == 1)
    }
}

// Keep challenges apart from anything else sharing the Redis instance.
const CHALLENGE_KEY_PREFIX: &str = "bastion:";

fn get_key(key: &ChallengeKey) -> String {
    format!("{}{}", CHALLENGE_KEY_PREFIX, key)
}

fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

pub mod hashmap_challenge_store;
pub mod redis_challenge_store;
pub mod static_permission_provider;

pub use hashmap_challenge_store::HashMapChallengeStore;
pub use redis_challenge_store::RedisChallengeStore;
pub use static_permission_provider::StaticPermissionProvider;

//! Redis client and Redis-backed verification record store

pub mod redis_client;
pub mod verification_store;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use verification_store::RedisVerificationStore;

pub mod store;

mod macros;

pub use store::Cache;
pub use store::CacheKey;
pub use store::KeyLockGuard;

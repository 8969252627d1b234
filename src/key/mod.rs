pub mod keys;
pub mod store;
pub mod toml;

pub use keys::Pair;
pub use store::FileStore;

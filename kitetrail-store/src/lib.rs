pub mod app_config;
pub mod remote;
pub mod snapshot;

pub use remote::HttpSeatSync;
pub use snapshot::SnapshotStore;

pub mod catalog;
pub mod gateway;
pub mod intent;
pub mod listing;
pub mod recommendations;
pub mod storage;

pub use catalog::{MovieCatalog, TmdbCatalog};
pub use gateway::{route_utterance, GatewayResponse};
pub use intent::IntentClassifier;
pub use storage::{BackendlessStore, RecordStore};

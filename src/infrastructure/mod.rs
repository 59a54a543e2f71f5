pub mod certs;
pub mod config;
pub mod preload;
pub mod storage;
pub mod telemetry;

pub use certs::{CertError, CertificateBundle};
pub use config::{AppConfig, ConfigError, LogFormat};
pub use preload::{PreloadEntry, PreloadReport, Preloader};
pub use storage::{FsDocumentRepository, InMemoryDocumentRepository, StorageLayout};
pub use telemetry::init_tracing;

//! Datasources: loading files, caching them, and finding records in them.
//!
//! # Architecture
//!
//! ```text
//! discover_files ──> load ──> Registry <── watcher (put / remove)
//!                               │
//!                               └──> find_by_public_name ──> find_by_id
//! ```

pub mod error;
pub mod loader;
pub mod lookup;
pub mod registry;
pub mod types;

pub use error::{DatasourceError, DatasourceResult};
pub use loader::{LoadStats, discover_files, load, load_all, load_as};
pub use lookup::{ID_FIELD, find_by_id};
pub use registry::Registry;
pub use types::{
    Datasource, Format, JsonRecord, Payload, Record, RecordRef, ShapeKind, TextRecord,
    public_name,
};

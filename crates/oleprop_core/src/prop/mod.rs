mod buffer;
mod bytes;
mod classify;
mod clip;
mod engine;
mod error;
mod extract;
mod property;
mod store;
mod text;
mod time;
mod value;
mod variant;
mod vartype;

/// Out-of-line allocation handle and leak counter.
pub use buffer::{OwnedBuffer, live_buffers};
/// Tag inference for dynamic values.
pub use classify::{classify, classify_kind, list_element_kind};
/// Raw clip-data record.
pub use clip::ClipRecord;
/// Byte-level serialize/deserialize engines and options.
pub use engine::{Engine, EngineOptions, Status, TypedValueEngine};
/// Error and result aliases.
pub use error::{PropError, Result};
/// Record-to-value extraction entry points.
pub use extract::{extract, extract_owned};
/// Enumerated property records and the enumerator contract.
pub use property::{PropSpec, Properties, Property, PropertySource, RawProperty};
/// In-memory property store and its serialized image.
pub use store::{PropertySet, PropertyStore, STORAGE_VERSION, StoreSource, USER_DEFINED_FMTID};
/// Calendar conversions for `FILETIME` and OLE Automation dates.
pub use time::{from_file_time, from_ole_date, to_file_time, to_ole_date, to_positive_file_time};
/// Dynamic value model.
pub use value::{Array, ClipData, Currency, Decimal, FileTime, ObjectRef, Value};
/// Tagged-union property record.
pub use variant::{DISP_E_PARAMNOTFOUND, Variant};
/// Tag taxonomy.
pub use vartype::{BaseType, Kind, VarType};

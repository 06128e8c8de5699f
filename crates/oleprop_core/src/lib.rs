//! Typed property values: a dynamic value model, the tagged-union record it
//! converts to, a byte-level engine, and an in-memory property store.

/// Value classification, record construction and extraction, serialization, and property storage.
pub mod prop;

use std::fmt;

use uuid::Uuid;

use crate::prop::{Result, Value, VarType, Variant};

/// Property key inside one property set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropSpec {
	/// Integer property id.
	Id(u32),
	/// String name, only valid in the user-defined property set.
	Name(String),
}

impl fmt::Display for PropSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Id(id) => write!(f, "{id}"),
			Self::Name(name) => write!(f, "'{name}'"),
		}
	}
}

/// One enumerated record as supplied by a property-storage enumerator.
#[derive(Debug)]
pub struct RawProperty {
	/// Format id of the owning property set.
	pub format_id: Uuid,
	/// Integer property id, `0` for named properties.
	pub id: u32,
	/// Property name, when the key is a string.
	pub name: Option<String>,
	/// Owned value record; released once its value is extracted.
	pub record: Variant,
}

/// Enumerator contract over raw property records.
pub trait PropertySource {
	/// Yield the next record, `None` once exhausted.
	fn next_raw(&mut self) -> Result<Option<RawProperty>>;
}

/// Property with its value extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
	/// Property name, when the key is a string.
	pub name: Option<String>,
	/// Format id of the owning property set.
	pub format_id: Uuid,
	/// Integer property id.
	pub id: u32,
	/// Tag the value was stored with.
	pub var_type: VarType,
	/// Extracted value.
	pub value: Value,
}

impl Property {
	/// Key of the property within its set.
	pub fn spec(&self) -> PropSpec {
		match &self.name {
			Some(name) => PropSpec::Name(name.clone()),
			None => PropSpec::Id(self.id),
		}
	}
}

impl fmt::Display for Property {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {} => {}", self.format_id.braced(), self.spec(), self.value)
	}
}

/// Iterator extracting every record of a [`PropertySource`].
///
/// Stops after the first error.
pub struct Properties<S> {
	source: S,
	done: bool,
}

impl<S: PropertySource> Properties<S> {
	/// Wrap a source.
	pub fn new(source: S) -> Self {
		Self { source, done: false }
	}
}

impl<S: PropertySource> Iterator for Properties<S> {
	type Item = Result<Property>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}

		let mut raw = match self.source.next_raw() {
			Ok(Some(raw)) => raw,
			Ok(None) => {
				self.done = true;
				return None;
			}
			Err(err) => {
				self.done = true;
				return Some(Err(err));
			}
		};

		let var_type = raw.record.var_type();
		match raw.record.take_value() {
			Ok(value) => Some(Ok(Property {
				name: raw.name,
				format_id: raw.format_id,
				id: raw.id,
				var_type,
				value,
			})),
			Err(err) => {
				self.done = true;
				Some(Err(err))
			}
		}
	}
}

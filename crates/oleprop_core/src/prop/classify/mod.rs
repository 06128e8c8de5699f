use crate::prop::{BaseType, Kind, PropError, Result, Value, VarType};

/// Pick the variant tag a dynamic value becomes.
///
/// Sequences classify once from their declared kind (or their first item)
/// and never re-derive the element tag per item.
pub fn classify(value: &Value) -> Result<VarType> {
	let base = match value {
		Value::Null => BaseType::Null,
		Value::Empty => BaseType::Empty,
		Value::Array(array) => return vector_tag(array.kind),
		Value::List(items) => return vector_tag(list_element_kind(items)),
		Value::Object(_) => return Err(PropError::UnsupportedValue { kind: value.kind_name() }),
		scalar => {
			let kind = scalar.kind().ok_or(PropError::UnsupportedValue { kind: scalar.kind_name() })?;
			classify_kind(kind)
		}
	};
	Ok(VarType::scalar(base))
}

fn vector_tag(kind: Kind) -> Result<VarType> {
	if kind == Kind::Blob {
		return Err(PropError::UnsupportedValue { kind: "vector of blob" });
	}
	Ok(VarType::vector_of(classify_kind(kind)))
}

/// Map a native kind to the base tag it is stored as.
pub fn classify_kind(kind: Kind) -> BaseType {
	match kind {
		Kind::Bool => BaseType::Bool,
		Kind::I8 => BaseType::I1,
		Kind::U8 => BaseType::Ui1,
		Kind::I16 => BaseType::I2,
		Kind::U16 => BaseType::Ui2,
		Kind::I32 => BaseType::I4,
		Kind::U32 => BaseType::Ui4,
		Kind::I64 => BaseType::I8,
		Kind::U64 => BaseType::Ui8,
		Kind::F32 => BaseType::R4,
		Kind::F64 => BaseType::R8,
		Kind::Currency => BaseType::Cy,
		Kind::Decimal => BaseType::Decimal,
		Kind::Error => BaseType::Error,
		Kind::Char | Kind::String => BaseType::Lpwstr,
		Kind::DateTime | Kind::FileTime => BaseType::FileTime,
		Kind::Guid => BaseType::Clsid,
		Kind::Blob => BaseType::Blob,
		Kind::Clip => BaseType::Cf,
		Kind::Any => BaseType::Variant,
	}
}

/// Element kind of an undeclared sequence: the first item's kind, or `Any`.
///
/// An empty list and a list led by a value without a scalar kind (null,
/// nested sequence, object) fall back to a vector of nested variants.
pub fn list_element_kind(items: &[Value]) -> Kind {
	items.first().and_then(Value::kind).unwrap_or(Kind::Any)
}

/// Check that an item may be stored in a vector of `kind`.
pub(crate) fn check_item(kind: Kind, index: usize, item: &Value) -> Result<()> {
	if kind == Kind::Any || item.kind() == Some(kind) {
		return Ok(());
	}
	Err(PropError::TypeMismatch {
		index,
		expected: kind,
		found: item.kind_name(),
	})
}

#[cfg(test)]
mod tests;

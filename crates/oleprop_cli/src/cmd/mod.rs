/// Serialized value decode command.
pub mod decode;
/// Literal encode command.
pub mod encode;
/// Property store listing command.
pub mod store;

pub(crate) mod util;

#[cfg(test)]
pub(crate) mod test_support;

pub(crate) mod text;
pub mod xml;
pub(crate) mod zip;

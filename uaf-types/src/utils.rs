#[macro_use]
pub(crate) mod repr_enum;

pub mod crypto;
pub mod encoding;
pub mod rand;

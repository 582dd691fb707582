//! Implementation of the message types defined in the [FIDO UAF protocol].
//!
//! [FIDO UAF protocol]: https://fidoalliance.org/specs/fido-uaf-v1.1-ps-20170202/fido-uaf-protocol-v1.1-ps-20170202.html

mod final_challenge;
mod header;
mod request;
mod response;

pub use self::{final_challenge::*, header::*, request::*, response::*};

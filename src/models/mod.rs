//! Data models shared by the API layer and the repository.
//!
//! Field names are the wire contract of the dashboard frontend and are kept
//! verbatim; request structs use optional fields so that omission means
//! "leave unchanged".

mod agenda;
mod berita;
mod edukasi;
mod gallery;
mod kontak;
mod opd;
mod partisipasi;
mod settings;
mod user;

pub use agenda::*;
pub use berita::*;
pub use edukasi::*;
pub use gallery::*;
pub use kontak::*;
pub use opd::*;
pub use partisipasi::*;
pub use settings::*;
pub use user::*;

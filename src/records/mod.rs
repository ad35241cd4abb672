//! Records persisted by the serialization stage
//!
//! Both records use an explicit binary layout: fields are written in a fixed
//! order and decoding is checked, so a file of the wrong shape fails to load
//! instead of producing a half-filled value.

pub mod audit;
pub mod codec;
pub mod profile;

pub use audit::AuditRecord;
pub use codec::{load, save, BinaryRecord};
pub use profile::UserProfile;

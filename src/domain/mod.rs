//! Domain types: identifiers, the form resource, and friendly-id generation.

pub mod form;
pub mod friendly_id;
pub mod id;

pub use form::{Form, FormAttributes, FormChanges, FormEnvelope, NewForm};
pub use friendly_id::FriendlyIdGenerator;
pub use id::{FormId, UserId};

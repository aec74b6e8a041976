//! These models are the data contracts exchanged with the chat interface
//!
//! There are two directions to cover:
//! - ui messages and chat requests, sent from the interface to the server
//! - ui message stream chunks, sent from the server back to the interface
//!
//! Both sides use the AI SDK wire conventions: a `type` discriminator, lowerCamelCase field
//! names, unknown fields rejected, and absent optional fields omitted rather than sent as null.
//! A few discriminators are dynamic (`data-{name}`, `tool-{name}`), so the tagged enums here
//! implement their serde glue by hand on top of derived per-variant structs.
pub mod chunk;
pub mod message;
pub mod request;

mod tagged;

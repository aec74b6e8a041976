pub mod agent;
pub mod agents;
pub mod emitter;
pub mod errors;
pub mod event;
pub mod models;
pub mod session;
pub mod tool;
pub mod translator;

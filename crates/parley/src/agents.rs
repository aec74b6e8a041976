//! Agents that ship with the crate.
//!
//! None of them talk to a model provider: `demo` replays a canned greeting, `echo` runs a
//! registered tool on the prompt and `mock` replays scripted events for tests.
pub mod demo;
pub mod echo;
pub mod mock;

pub use demo::DemoAgent;
pub use echo::{register_echo_tool, EchoAgent};
pub use mock::MockAgent;

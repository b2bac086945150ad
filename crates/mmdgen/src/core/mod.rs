//! Core types shared by the generation pipeline and its front ends

mod cancel;
mod config;
mod error;
mod format;
pub mod logging;
mod request;

pub use cancel::*;
pub use config::*;
pub use error::*;
pub use format::*;
pub use logging::*;
pub use request::*;

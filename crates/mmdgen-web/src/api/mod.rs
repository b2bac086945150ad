pub mod artifacts;
pub mod editor;
pub mod health;

pub use artifacts::{download_artifact, show_artifact};
pub use editor::{example, generate, index};
pub use health::health_check;

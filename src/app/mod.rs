// Application composition.

pub mod app;
pub mod server;

pub use app::{App, Slots};

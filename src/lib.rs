pub mod catalog;
pub mod images;
pub mod location;
pub mod models;
pub mod pages;
pub mod run;
pub mod session;
pub mod sync;
pub mod view;

pub use models::{Cli, Settings};
pub use run::run;

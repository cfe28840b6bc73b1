mod actions;
mod app;
pub mod config;
mod dom;
mod logger;
pub mod net;
mod pdfjs;
mod persistence;
mod render;
mod state;
mod toast;
mod upload;

pub use app::run;
pub use net::ApiClient;

pub mod app;
pub mod cli;
pub mod domain;
pub mod host;
pub mod infra;

pub fn init() {
    tracing_subscriber::fmt::init();
}

pub mod logging;

pub use logging::init_tracing;

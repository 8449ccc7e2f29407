pub mod error;
pub mod logging;
pub mod output_macros;

#[cfg(feature = "ac")]
pub mod ac;
#[cfg(feature = "chrono")]
pub mod chrono;
pub mod core;
#[cfg(feature = "rand")]
pub mod rand;

mod utils;
pub use utils::*;

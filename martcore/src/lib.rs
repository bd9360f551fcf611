pub mod ac;
pub mod error;
pub mod platform;

#[cfg(feature = "chrono")]
pub(crate) mod chrono {
    pub use ::chrono::*;
    #[cfg(test)]
    pub use test_mart::chrono::Utc;
}

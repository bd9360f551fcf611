use rand::{
    Rng,
    RngCore,
};
use std::sync::Mutex;
use super::SessionToken;

/// Mints session tokens.  The random source is pluggable so tests can
/// produce predictable tokens.
#[derive(Default)]
pub struct SessionTokenFactory {
    rng: Option<Box<Mutex<dyn RngCore + Send>>>,
}

impl SessionTokenFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Some(Box::new(Mutex::new(rng)));
        self
    }

    pub fn create(&self) -> SessionToken {
        SessionToken(
            self.rng
                .as_ref()
                .map(|m| m.lock()
                    .expect("not poisoned")
                    .gen()
                )
                .unwrap_or_else(|| rand::thread_rng().gen())
        )
    }
}

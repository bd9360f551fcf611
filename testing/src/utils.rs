/// Compile-time probe for types that must be shared across threads.
pub fn is_send_sync<T: Send + Sync>() {}

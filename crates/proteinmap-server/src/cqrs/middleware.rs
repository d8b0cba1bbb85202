//! Marker traits separating write operations from read operations

/// A request that mutates catalog state
pub trait Command {}

/// A request that only reads catalog state
pub trait Query {}

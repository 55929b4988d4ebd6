//! Interview sessions: storage ports, the orchestrating service, and the
//! small pure helpers it and the realtime gateway share.

pub mod chunker;
pub mod clock;
pub mod content;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

//! Result persistence for callers; the engine itself never touches files.

pub mod export;

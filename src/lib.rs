pub mod arguments;
pub mod config;
pub mod contracts; // Versioned schema documents and alias maps
pub mod dispatch; // Idempotent action execution against downstream adapters
pub mod errors; // Structured error taxonomy
pub mod feedback;
pub mod logger;
pub mod normalizer;
pub mod pipeline; // Per-request orchestration
pub mod plan; // Plan builder and risk classification
pub mod validation;

#[cfg(feature = "web")]
pub mod webserver;

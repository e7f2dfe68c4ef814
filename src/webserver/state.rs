/// Shared application state for the webserver
///
/// Contains the adapter registry and feedback sink assembled at process
/// start, shared by all route handlers.
use std::sync::Arc;

use crate::config::Config;
use crate::dispatch::AdapterRegistry;
use crate::feedback::{FeedbackSink, LogFeedbackSink, MemoryFeedbackSink};

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    /// Capability -> adapter lookup, fixed for the process lifetime
    pub registry: Arc<AdapterRegistry>,

    /// External feedback collaborator
    pub feedback_sink: Arc<dyn FeedbackSink>,

    /// Server startup time
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Assemble state from the loaded configuration
    pub fn from_config(config: &Config) -> Self {
        let feedback_sink: Arc<dyn FeedbackSink> = match config.feedback.sink.as_str() {
            "memory" => Arc::new(MemoryFeedbackSink::new()),
            _ => Arc::new(LogFeedbackSink),
        };

        Self {
            registry: Arc::new(AdapterRegistry::from_config(&config.dispatch)),
            feedback_sink,
            startup_time: chrono::Utc::now(),
        }
    }

    /// Server uptime in seconds
    pub fn uptime_seconds(&self) -> i64 {
        (chrono::Utc::now() - self.startup_time).num_seconds()
    }
}

//! Core types: calendar events, integration records, operation results, tracing

pub mod event;
pub mod integration;
pub mod outcome;
pub mod tracing;

pub use event::{CalendarEvent, EventDateTime};
pub use integration::IntegrationRecord;
pub use outcome::{ErrorCode, OperationError, OperationKind, OperationResult};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};

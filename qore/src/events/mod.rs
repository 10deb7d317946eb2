//! Lifecycle events emitted by pipeline runs.
//!
//! Event types used by the runner:
//!
//! | type                 | payload                                   |
//! |----------------------|-------------------------------------------|
//! | `pipeline.started`   | `run_id`, `mode`, `stages`                |
//! | `stage.started`      | `run_id`, `stage`                         |
//! | `stage.completed`    | `run_id`, `stage`, `duration_ms`          |
//! | `stage.failed`       | `run_id`, `stage`, `error`, `duration_ms` |
//! | `pipeline.completed` | `run_id`, `mode`, `duration_ms`, `tier`   |
//! | `pipeline.failed`    | `run_id`, `mode`, `error`                 |

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink, RecordedEvent};

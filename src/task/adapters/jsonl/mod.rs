//! JSON-lines file adapters for durable task storage.

mod record;
mod repository;

pub use record::{RecordError, decode_record_line, encode_record_line};
pub use repository::JsonlTaskRepository;

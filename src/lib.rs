//! Bylines - transcript speaker annotation.
//!
//! Takes a raw interview transcript, splits it into bounded-size chunks at
//! sentence boundaries, and sends each chunk to a chat-completion service
//! that labels the speakers by name. Annotated chunks are appended to the
//! output file as they finish, so an interrupted run keeps everything
//! completed so far.

pub mod annotate;
pub mod config;
pub mod logger;
pub mod openai;
pub mod pipeline;
pub mod segment;

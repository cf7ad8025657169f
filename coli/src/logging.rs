//! One-line diagnostic summaries, in the same spirit as the teacher
//! crate's `logging::msg_summary` — built for `log::trace!`/`log::debug!`
//! call sites, not for display to end users.

use coli_msg::message::MessageHeader;
use coli_msg::request_reply::{ReplyHeader, RequestHeader};

/// Summarize a request header and its framing message header for a log
/// line.
pub(crate) fn request_summary(header: &MessageHeader, request: &RequestHeader) -> String {
  format!("request #{} {:?} op={:?} ({} byte body)",
          request.request_id(),
          header.message_type,
          request.operation(),
          header.message_size)
}

/// Summarize a reply header and its framing message header for a log
/// line.
pub(crate) fn reply_summary(header: &MessageHeader, reply: &ReplyHeader) -> String {
  format!("reply #{} {:?} status={:?} ({} byte body)",
          reply.request_id(),
          header.message_type,
          reply.reply_status(),
          header.message_size)
}

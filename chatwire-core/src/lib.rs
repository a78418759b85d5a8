//! Chatwire Core Library
//!
//! Typed model and wire-exact JSON encoding for chat completion requests.
//!
//! ```
//! use chatwire_core::protocol::{ChatRequest, ContentPart, Message, WireFormat};
//!
//! let request = ChatRequest::new(
//!     "gpt-4o",
//!     vec![
//!         Message::system("Describe images briefly."),
//!         Message::user_parts(vec![
//!             ContentPart::text("What is this?"),
//!             ContentPart::image_url("https://example.com/cat.png"),
//!         ])?,
//!     ],
//! );
//! let json = request.to_wire()?;
//! assert_eq!(json["messages"][1]["content"][1]["type"], "image_url");
//! # Ok::<(), chatwire_core::protocol::ProtocolError>(())
//! ```

pub mod config;
pub mod protocol;
pub mod validation;

pub use protocol::{ChatRequest, Message, ProtocolError, ProtocolResult, WireFormat};

/// Returns the version of the Chatwire Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}

pub mod error;
pub mod config;
pub mod content;
pub mod message;
pub mod request;
pub mod response;

/*

msgwire: typed request/response bodies for the Messages API.
No transport here; hand `MessageRequest::to_json()` to whatever
HTTP client you use and feed the body back to `MessageResponse`.

msgwire/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports
│   ├── error.rs        # Error type
│   ├── config.rs       # Builder defaults, diagnostics
│   ├── content.rs      # Content blocks, image sources
│   ├── message.rs      # Role, Message, Metadata
│   ├── request.rs      # MessageRequest + builder
│   └── response.rs     # MessageResponse, ErrorResponse
└── tests/

*/

pub use error::Error;
pub use config::{Config, RequestDefaults};
pub use content::{Content, Contents, MediaType, Source, SourceKind};
pub use message::{Message, Metadata, Role};
pub use request::{MessageRequest, MessageRequestBuilder};
pub use response::{
  ApiError, ErrorResponse, MessageResponse, ResponseKind, StopReason, Usage
};

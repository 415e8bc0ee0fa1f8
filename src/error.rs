use std::fmt;

/// Error type for building and decoding wire documents
/// Implements Clone so callers can stash it alongside a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// A required field was never supplied
    MissingRequiredField(String)
  , /// A value does not have the declared type
    TypeMismatch(String)
  , /// Input is not a JSON document
    Parse(String)
  , /// Failed to encode a value as JSON
    Serialize(String)
  , /// Invalid configuration
    InvalidConfiguration(String)
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingRequiredField(field) => {
              write!(f, "Missing required field: {}", field)
            }
          , Error::TypeMismatch(msg) => {
              write!(f, "Type mismatch: {}", msg)
            }
          , Error::Parse(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::Serialize(msg) => {
              write!(f, "Serialize error: {}", msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error
{   fn from(e: serde_json::Error) -> Self
    {   use serde_json::error::Category;
        match e.classify()
        {   Category::Syntax | Category::Eof | Category::Io => {
              Error::Parse(e.to_string())
            }
          , Category::Data => {
              // serde reports absent keys as data errors
              missing_field_name(&e.to_string())
                .map(Error::MissingRequiredField)
                .unwrap_or_else(|| Error::TypeMismatch(e.to_string()))
            }
        }
    }
}

/// Pull `name` out of serde's "missing field `name`" message
fn missing_field_name(msg: &str) -> Option<String>
{   let rest = msg.strip_prefix("missing field `")?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

//! Client types and calls for the Gemini `generateContent` API

mod core;
pub use self::core::*;

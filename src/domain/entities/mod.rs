mod document;
mod identifier;

pub use document::{Document, DocumentMetadata};
pub use identifier::{DocumentId, ID_ALPHABET, ID_LENGTH, MAX_ID_LENGTH};

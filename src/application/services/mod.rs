mod document;
mod identifier;

pub use document::DocumentService;
pub use identifier::IdentifierGenerator;

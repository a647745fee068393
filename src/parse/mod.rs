pub mod loader;
pub mod translation;
pub mod xml_reader;
pub mod xml_writer;

pub use loader::{culture_from_file_name, load_dir, load_file, save_v1, save_v2, LoadOutcome};
pub use translation::{CultureDocument, FormatVersion, ParsedDocument, SkippedEntry, TranslationEntry};
pub use xml_reader::XmlReader;
pub use xml_writer::XmlWriter;

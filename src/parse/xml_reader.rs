//! Reader for both dictionary interchange formats.
//!
//! ```text
//! v1:  <translation>
//!        <text key="a.b" count="1" mod="10" acceptmissing="true" comment="...">value</text>
//!      </translation>
//!
//! v2:  <translation>
//!        <culture name="de" primary="true">
//!          <text key="a.b">value</text>
//!        </culture>
//!      </translation>
//! ```
//!
//! A malformed `<text>` element is skipped and recorded; a document that is
//! not a well-formed `<translation>` document is an error.

use crate::error::{DictError, Result};
use crate::tree::KeyPath;
use log::{debug, trace, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::translation::{
    CultureDocument, FormatVersion, ParsedDocument, SkippedEntry, TranslationEntry,
};

const ROOT_ELEMENT: &[u8] = b"translation";
const CULTURE_ELEMENT: &[u8] = b"culture";
const TEXT_ELEMENT: &[u8] = b"text";

/// A `<text>` element being read
struct PendingText {
    entry: std::result::Result<TranslationEntry, SkippedEntry>,
    buffer: String,
}

impl PendingText {
    /// Text values are plain; any nested element spoils the entry
    fn reject_element(&mut self, name: &[u8]) {
        if let Ok(entry) = &self.entry {
            self.entry = Err(SkippedEntry {
                culture: String::new(),
                key: Some(entry.key.clone()),
                reason: format!(
                    "unexpected element <{}> inside text",
                    String::from_utf8_lossy(name)
                ),
            });
        }
    }
}

pub struct XmlReader;

impl XmlReader {
    /// Parse a document of either format.
    ///
    /// `v1_culture` names the culture of a v1 document, usually taken from
    /// its file name; a v1 document without it is rejected.
    pub fn parse(xml: &str, source_name: &str, v1_culture: Option<&str>) -> Result<ParsedDocument> {
        let mut reader = Reader::from_str(xml);
        let mut root_seen = false;
        let mut root_closed = false;
        let mut v1_doc: Option<CultureDocument> = None;
        let mut current_culture: Option<CultureDocument> = None;
        let mut cultures: Vec<CultureDocument> = Vec::new();
        let mut pending: Option<PendingText> = None;
        let mut skipped: Vec<SkippedEntry> = Vec::new();

        let structural = |reason: String| DictError::invalid_document(source_name, reason);

        loop {
            let event = reader
                .read_event()
                .map_err(|e| structural(format!("malformed XML: {}", e)))?;

            match event {
                Event::Start(e) if !root_seen => {
                    check_root(&e, source_name)?;
                    root_seen = true;
                }
                Event::Empty(e) if !root_seen => {
                    check_root(&e, source_name)?;
                    root_seen = true;
                    root_closed = true;
                }
                Event::Start(e) => {
                    let name = e.name().as_ref().to_vec();
                    if let Some(text) = pending.as_mut() {
                        reader
                            .read_to_end(e.name())
                            .map_err(|err| structural(format!("malformed XML: {}", err)))?;
                        text.reject_element(&name);
                    } else if name == CULTURE_ELEMENT && current_culture.is_none() {
                        current_culture = Some(Self::open_culture(&e, source_name)?);
                    } else if name == TEXT_ELEMENT {
                        pending = Some(PendingText {
                            entry: Self::read_text_attributes(&e),
                            buffer: String::new(),
                        });
                    } else {
                        trace!(
                            "{}: ignoring element <{}>",
                            source_name,
                            String::from_utf8_lossy(&name)
                        );
                        reader
                            .read_to_end(e.name())
                            .map_err(|err| structural(format!("malformed XML: {}", err)))?;
                    }
                }
                Event::Empty(e) => {
                    let name = e.name().as_ref().to_vec();
                    if let Some(text) = pending.as_mut() {
                        text.reject_element(&name);
                        continue;
                    }
                    if name == CULTURE_ELEMENT && current_culture.is_none() {
                        cultures.push(Self::open_culture(&e, source_name)?);
                    } else if name == TEXT_ELEMENT {
                        let target = Self::target_culture(
                            &mut current_culture,
                            &mut v1_doc,
                            v1_culture,
                            source_name,
                        )?;
                        Self::finish_text(Self::read_text_attributes(&e), String::new(), target, &mut skipped);
                    }
                }
                Event::Text(t) => {
                    if let Some(text) = pending.as_mut() {
                        match t.unescape() {
                            Ok(value) => text.buffer.push_str(&value),
                            Err(err) => {
                                if let Ok(entry) = &text.entry {
                                    text.entry = Err(SkippedEntry {
                                        culture: String::new(),
                                        key: Some(entry.key.clone()),
                                        reason: format!("invalid text content: {}", err),
                                    });
                                }
                            }
                        }
                    }
                }
                Event::CData(c) => {
                    if let Some(text) = pending.as_mut() {
                        text.buffer.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Event::End(e) => {
                    let name = e.name().as_ref().to_vec();
                    if name == TEXT_ELEMENT {
                        if let Some(text) = pending.take() {
                            let target = Self::target_culture(
                                &mut current_culture,
                                &mut v1_doc,
                                v1_culture,
                                source_name,
                            )?;
                            Self::finish_text(text.entry, text.buffer, target, &mut skipped);
                        }
                    } else if name == CULTURE_ELEMENT {
                        if let Some(culture) = current_culture.take() {
                            cultures.push(culture);
                        }
                    } else if name == ROOT_ELEMENT {
                        root_closed = true;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !root_seen {
            return Err(structural("document has no root element".to_string()));
        }
        if !root_closed {
            return Err(structural("unexpected end of document".to_string()));
        }

        let format = if cultures.is_empty() {
            FormatVersion::V1
        } else {
            FormatVersion::V2
        };
        if format == FormatVersion::V1 && v1_doc.is_none() {
            // An empty v1 file still declares its culture
            if let Some(culture) = v1_culture {
                v1_doc = Some(CultureDocument {
                    name: culture.to_string(),
                    primary: false,
                    entries: Vec::new(),
                });
            }
        }
        if let Some(doc) = v1_doc {
            cultures.insert(0, doc);
        }

        for skip in &skipped {
            warn!(
                "{}: skipped text {} in culture '{}': {}",
                source_name,
                skip.key.as_deref().unwrap_or("<no key>"),
                skip.culture,
                skip.reason
            );
        }

        let doc = ParsedDocument {
            source_name: source_name.to_string(),
            format,
            cultures,
            skipped,
        };
        debug!(
            "{}: read {:?} document with {} cultures and {} entries",
            source_name,
            doc.format,
            doc.cultures.len(),
            doc.entry_count()
        );
        Ok(doc)
    }

    fn open_culture(e: &BytesStart, source_name: &str) -> Result<CultureDocument> {
        let mut name = None;
        let mut primary = false;
        for attr in e.attributes() {
            let attr = attr.map_err(|err| {
                DictError::invalid_document(source_name, format!("bad culture attribute: {}", err))
            })?;
            let value = attr
                .unescape_value()
                .map_err(|err| {
                    DictError::invalid_document(source_name, format!("bad culture attribute: {}", err))
                })?
                .into_owned();
            match attr.key.as_ref() {
                b"name" => name = Some(value),
                b"primary" => primary = is_true(&value),
                _ => {}
            }
        }
        let name = name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| DictError::invalid_document(source_name, "<culture> without a name"))?;
        Ok(CultureDocument {
            name,
            primary,
            entries: Vec::new(),
        })
    }

    /// Culture that receives a `<text>`: the open `<culture>` element, or
    /// the v1 culture for texts directly below the root
    fn target_culture<'a>(
        current_culture: &'a mut Option<CultureDocument>,
        v1_doc: &'a mut Option<CultureDocument>,
        v1_culture: Option<&str>,
        source_name: &str,
    ) -> Result<&'a mut CultureDocument> {
        if let Some(culture) = current_culture.as_mut() {
            return Ok(culture);
        }
        if v1_doc.is_none() {
            let name = v1_culture.ok_or_else(|| {
                DictError::invalid_document(
                    source_name,
                    "text outside of a <culture> element and no culture known for the file",
                )
            })?;
            *v1_doc = Some(CultureDocument {
                name: name.to_string(),
                primary: false,
                entries: Vec::new(),
            });
        }
        v1_doc.as_mut().ok_or_else(|| {
            DictError::invalid_document(source_name, "no culture for text")
        })
    }

    fn finish_text(
        entry: std::result::Result<TranslationEntry, SkippedEntry>,
        text: String,
        culture: &mut CultureDocument,
        skipped: &mut Vec<SkippedEntry>,
    ) {
        match entry {
            Ok(mut entry) => {
                entry.text = text;
                culture.entries.push(entry);
            }
            Err(mut skip) => {
                skip.culture = culture.name.clone();
                skipped.push(skip);
            }
        }
    }

    fn read_text_attributes(e: &BytesStart) -> std::result::Result<TranslationEntry, SkippedEntry> {
        let mut entry = TranslationEntry::default();
        let mut key = None;
        let mut count = None;
        let mut modulo = None;

        let skip = |key: Option<String>, reason: String| SkippedEntry {
            culture: String::new(),
            key,
            reason,
        };

        for attr in e.attributes() {
            let attr = attr.map_err(|err| skip(None, format!("bad attribute: {}", err)))?;
            let value = attr
                .unescape_value()
                .map_err(|err| skip(None, format!("bad attribute value: {}", err)))?
                .into_owned();
            match attr.key.as_ref() {
                b"key" => key = Some(value),
                b"count" => count = Some(value),
                b"mod" => modulo = Some(value),
                b"acceptmissing" => entry.accept_missing = is_true(&value),
                b"acceptplaceholders" => entry.accept_placeholders = is_true(&value),
                b"acceptpunctuation" => entry.accept_punctuation = is_true(&value),
                b"comment" => entry.comment = Some(value).filter(|c| !c.is_empty()),
                _ => {}
            }
        }

        let key = key.ok_or_else(|| skip(None, "missing key attribute".to_string()))?;
        if let Err(err) = KeyPath::parse(&key) {
            return Err(skip(Some(key), err.to_string()));
        }

        if let Some(raw) = count {
            let parsed = raw
                .trim()
                .parse::<i32>()
                .map_err(|_| skip(Some(key.clone()), format!("invalid count '{}'", raw)))?;
            entry.count = Some(parsed);
        }
        if let Some(raw) = modulo {
            if entry.count.is_none() {
                return Err(skip(Some(key), "mod without count".to_string()));
            }
            entry.modulo = raw
                .trim()
                .parse::<i32>()
                .map_err(|_| skip(Some(key.clone()), format!("invalid mod '{}'", raw)))?;
        }

        entry.key = key;
        Ok(entry)
    }
}

fn is_true(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn check_root(e: &BytesStart, source_name: &str) -> Result<()> {
    if e.name().as_ref() == ROOT_ELEMENT {
        Ok(())
    } else {
        Err(DictError::invalid_document(
            source_name,
            format!(
                "root element is <{}>, expected <translation>",
                String::from_utf8_lossy(e.name().as_ref())
            ),
        ))
    }
}

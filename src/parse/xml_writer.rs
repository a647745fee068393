use crate::error::{DictError, Result};
use crate::tree::{CultureText, Dictionary, DictionaryNode};
use log::{debug, info};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Serializes a dictionary into the interchange formats
pub struct XmlWriter<'a> {
    dict: &'a Dictionary,
}

impl<'a> XmlWriter<'a> {
    pub fn new(dict: &'a Dictionary) -> Self {
        Self { dict }
    }

    /// One document with a `<culture>` element per culture, primary first
    pub fn write_v2(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);
        write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write_event(&mut writer, Event::Start(BytesStart::new("translation")))?;

        for culture in self.ordered_cultures() {
            let mut element = BytesStart::new("culture");
            element.push_attribute(("name", culture));
            if self.dict.primary_culture() == Some(culture) {
                element.push_attribute(("primary", "true"));
            }
            write_event(&mut writer, Event::Start(element))?;
            self.write_texts(&mut writer, culture)?;
            write_event(&mut writer, Event::End(BytesEnd::new("culture")))?;
        }

        write_event(&mut writer, Event::End(BytesEnd::new("translation")))?;
        let xml = into_string(writer)?;
        info!(
            "wrote v2 document: {} keys, {} cultures",
            self.dict.len(),
            self.dict.cultures().len()
        );
        Ok(xml)
    }

    /// The document of a single culture
    pub fn write_v1(&self, culture: &str) -> Result<String> {
        if !self.dict.cultures().iter().any(|c| c == culture) {
            return Err(DictError::InvalidOperation(format!(
                "unknown culture '{}'",
                culture
            )));
        }
        let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);
        write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write_event(&mut writer, Event::Start(BytesStart::new("translation")))?;
        self.write_texts(&mut writer, culture)?;
        write_event(&mut writer, Event::End(BytesEnd::new("translation")))?;
        let xml = into_string(writer)?;
        info!("wrote v1 document for culture '{}'", culture);
        Ok(xml)
    }

    fn ordered_cultures(&self) -> Vec<&'a str> {
        let primary = self.dict.primary_culture();
        primary
            .into_iter()
            .chain(
                self.dict
                    .cultures()
                    .iter()
                    .map(String::as_str)
                    .filter(|c| Some(*c) != primary),
            )
            .collect()
    }

    fn write_texts(&self, writer: &mut Writer<Vec<u8>>, culture: &str) -> Result<()> {
        let with_comments = self.dict.comment_culture() == Some(culture);
        let empty = CultureText::default();
        let mut written = 0usize;

        for id in self.dict.full_keys() {
            let node = self.dict.get(id)?;
            let text = node.culture_text(culture).unwrap_or(&empty);
            let comment = if with_comments { node.comment() } else { None };

            let mut element = text_element(node, None, text);
            if let Some(comment) = comment {
                element.push_attribute(("comment", comment));
            }
            write_text(writer, element, &text.text)?;

            for q in text.quantified() {
                let element = text_element(node, Some((q.count, q.modulo)), text);
                write_text(writer, element, &q.text)?;
            }
            written += 1;
        }
        debug!("culture '{}': {} entries written", culture, written);
        Ok(())
    }
}

/// `<text>` with attributes in the order key, count, mod, accept flags
fn text_element<'b>(
    node: &'b DictionaryNode,
    quantity: Option<(i32, i32)>,
    text: &CultureText,
) -> BytesStart<'b> {
    let mut element = BytesStart::new("text");
    element.push_attribute(("key", node.full_key()));
    if let Some((count, modulo)) = quantity {
        element.push_attribute(("count", count.to_string().as_str()));
        if modulo != 0 {
            element.push_attribute(("mod", modulo.to_string().as_str()));
        }
    }
    if text.accept_missing {
        element.push_attribute(("acceptmissing", "true"));
    }
    if text.accept_placeholders {
        element.push_attribute(("acceptplaceholders", "true"));
    }
    if text.accept_punctuation {
        element.push_attribute(("acceptpunctuation", "true"));
    }
    element
}

fn write_text(writer: &mut Writer<Vec<u8>>, element: BytesStart, value: &str) -> Result<()> {
    if value.is_empty() {
        return write_event(writer, Event::Empty(element));
    }
    write_event(writer, Event::Start(element))?;
    write_event(writer, Event::Text(BytesText::new(value)))?;
    write_event(writer, Event::End(BytesEnd::new("text")))
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| DictError::Serialize(e.to_string()))
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String> {
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| DictError::Serialize(e.to_string()))
}

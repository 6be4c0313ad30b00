//! `.docx` header stamping.
//!
//! A `.docx` file is a zip package of XML parts. Stamping reads every part into
//! memory, rewrites the first section's default header (adding one when the
//! section has none), and writes the package back to the same path.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{Cursor, Read, Write};
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};
use crate::header::{HeaderStamper, DEFAULT_FONT_SIZE_PT};

const DOCUMENT_PART: &str = "word/document.xml";
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

const HEADER_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
const HEADER_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";

const EMPTY_HEADER: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    "<w:p/></w:hdr>"
);

const EMPTY_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"/>"#
);

/// Stamps labels into the default header of `.docx` documents.
#[derive(Debug, Clone)]
pub struct DocxHeaderStamper {
    font_size_pt: f32,
}

impl Default for DocxHeaderStamper {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_SIZE_PT)
    }
}

impl DocxHeaderStamper {
    /// Create a stamper writing labels at the given font size.
    pub fn new(font_size_pt: f32) -> Self {
        Self { font_size_pt }
    }

    /// Font size as stored in `w:sz`, which counts half-points.
    fn half_points(&self) -> u32 {
        (self.font_size_pt * 2.0).round().max(1.0) as u32
    }

    /// Stamp `label` into the document, reporting why it failed if it did.
    pub fn try_stamp(&self, path: &Path, label: &str) -> Result<()> {
        let mut package = Package::read(path)?;

        let document = package.require(DOCUMENT_PART)?;
        let section = find_first_section(document)?
            .ok_or_else(|| Error::Document("document has no sections".into()))?;

        let header_part = match section.default_header {
            Some(rel_id) => {
                let rels = package.require(DOCUMENT_RELS_PART)?;
                let target = find_relationship_target(rels, &rel_id)?.ok_or_else(|| {
                    Error::Document(format!("header relationship '{}' not found", rel_id))
                })?;
                resolve_part_name(&target)
            }
            None => add_header_part(&mut package)?,
        };

        let header = package.require(&header_part)?;
        let stamped = stamp_header_xml(header, label, self.half_points())?;
        package.put(&header_part, stamped);

        package.write(path)
    }
}

impl HeaderStamper for DocxHeaderStamper {
    fn stamp(&self, path: &Path, label: &str) -> bool {
        match self.try_stamp(path, label) {
            Ok(()) => {
                tracing::debug!("Stamped header of {} with '{}'", path.display(), label);
                true
            }
            Err(e) => {
                tracing::warn!("Could not stamp header of {}: {}", path.display(), e);
                false
            }
        }
    }
}

/// One entry of a zip package.
struct Part {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
    is_dir: bool,
}

/// All entries of a zip package, in their original order.
struct Package {
    parts: Vec<Part>,
}

impl Package {
    fn read(path: &Path) -> Result<Self> {
        let mut archive = ZipArchive::new(File::open(path)?)?;
        let mut parts = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            parts.push(Part {
                name: entry.name().to_string(),
                data,
                compression: entry.compression(),
                is_dir: entry.is_dir(),
            });
        }

        Ok(Self { parts })
    }

    fn get(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    fn require(&self, name: &str) -> Result<&[u8]> {
        self.get(name)
            .ok_or_else(|| Error::Document(format!("missing part '{}'", name)))
    }

    fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|p| p.name == name)
    }

    fn put(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|p| p.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(Part {
                name: name.to_string(),
                data,
                compression: CompressionMethod::Deflated,
                is_dir: false,
            }),
        }
    }

    fn write(&self, path: &Path) -> Result<()> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for part in &self.parts {
            let method = match part.compression {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let options = SimpleFileOptions::default().compression_method(method);

            if part.is_dir {
                writer.add_directory(part.name.as_str(), options)?;
            } else {
                writer.start_file(part.name.as_str(), options)?;
                writer.write_all(&part.data)?;
            }
        }

        // Build the whole archive first so a failure never truncates the file
        let bytes = writer.finish()?.into_inner();
        fs::write(path, bytes)?;
        Ok(())
    }
}

/// What the first `w:sectPr` of the document says about its header.
#[derive(Debug, PartialEq, Eq)]
struct SectionInfo {
    /// Relationship id of the default header, if the section has one.
    default_header: Option<String>,
}

fn attr_value(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

fn is_default_header_ref(e: &BytesStart<'_>) -> bool {
    e.local_name().as_ref() == b"headerReference"
        && attr_value(e, b"type").as_deref() == Some("default")
}

fn prefix_of(e: &BytesStart<'_>) -> String {
    e.name()
        .prefix()
        .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned())
        .unwrap_or_else(|| "w".to_string())
}

fn qualified(prefix: &str, local: &str) -> String {
    format!("{}:{}", prefix, local)
}

fn find_first_section(xml: &[u8]) -> Result<Option<SectionInfo>> {
    let mut reader = Reader::from_reader(xml);
    let mut in_section = false;
    let mut default_header = None;

    loop {
        match reader.read_event()? {
            Event::Empty(e) if !in_section && e.local_name().as_ref() == b"sectPr" => {
                return Ok(Some(SectionInfo {
                    default_header: None,
                }));
            }
            Event::Start(e) if !in_section && e.local_name().as_ref() == b"sectPr" => {
                in_section = true;
            }
            Event::Start(e) | Event::Empty(e)
                if in_section && default_header.is_none() && is_default_header_ref(&e) =>
            {
                default_header = attr_value(&e, b"id");
            }
            Event::End(e) if in_section && e.local_name().as_ref() == b"sectPr" => {
                return Ok(Some(SectionInfo { default_header }));
            }
            Event::Eof => {
                return Ok(None);
            }
            _ => {}
        }
    }
}

fn find_relationship_target(rels: &[u8], rel_id: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_reader(rels);

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e)
                if e.local_name().as_ref() == b"Relationship"
                    && attr_value(&e, b"Id").as_deref() == Some(rel_id) =>
            {
                return Ok(attr_value(&e, b"Target"));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn relationship_ids(rels: &[u8]) -> Result<HashSet<String>> {
    let mut reader = Reader::from_reader(rels);
    let mut ids = HashSet::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let Some(id) = attr_value(&e, b"Id") {
                    ids.insert(id);
                }
            }
            Event::Eof => return Ok(ids),
            _ => {}
        }
    }
}

/// Map a relationship target of the main document to a package part name.
fn resolve_part_name(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("word/{}", target),
    }
}

/// Create an empty default header for the first section and return its part name.
fn add_header_part(package: &mut Package) -> Result<String> {
    let index = (1..)
        .find(|n| !package.contains(&format!("word/header{}.xml", n)))
        .unwrap_or(1);
    let file_name = format!("header{}.xml", index);
    let part_name = format!("word/{}", file_name);

    let rels = package
        .get(DOCUMENT_RELS_PART)
        .map(<[u8]>::to_vec)
        .unwrap_or_else(|| EMPTY_RELS.as_bytes().to_vec());
    let taken = relationship_ids(&rels)?;
    let rel_id = (1..)
        .map(|n| format!("rId{}", n))
        .find(|id| !taken.contains(id))
        .unwrap_or_else(|| "rId1".to_string());

    let relationship = BytesStart::new("Relationship").with_attributes([
        ("Id", rel_id.as_str()),
        ("Type", HEADER_REL_TYPE),
        ("Target", file_name.as_str()),
    ]);
    let rels = append_to_root(&rels, relationship)?;

    let part_uri = format!("/{}", part_name);
    let override_type = BytesStart::new("Override").with_attributes([
        ("PartName", part_uri.as_str()),
        ("ContentType", HEADER_CONTENT_TYPE),
    ]);
    let content_types = append_to_root(package.require(CONTENT_TYPES_PART)?, override_type)?;

    let document = insert_header_reference(package.require(DOCUMENT_PART)?, &rel_id)?;

    package.put(DOCUMENT_RELS_PART, rels);
    package.put(CONTENT_TYPES_PART, content_types);
    package.put(DOCUMENT_PART, document);
    package.put(&part_name, EMPTY_HEADER.as_bytes().to_vec());

    Ok(part_name)
}

/// Append `child` as the last element inside the root element.
fn append_to_root(xml: &[u8], child: BytesStart<'_>) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::new());
    let mut depth = 0usize;
    let mut appended = false;

    loop {
        match reader.read_event()? {
            Event::Empty(e) if depth == 0 && !appended => {
                writer.write_event(Event::Start(e.borrow()))?;
                writer.write_event(Event::Empty(child.borrow()))?;
                writer.write_event(Event::End(e.to_end()))?;
                appended = true;
            }
            Event::Start(e) => {
                depth += 1;
                writer.write_event(Event::Start(e))?;
            }
            Event::End(e) => {
                if depth == 1 && !appended {
                    writer.write_event(Event::Empty(child.borrow()))?;
                    appended = true;
                }
                depth = depth.saturating_sub(1);
                writer.write_event(Event::End(e))?;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    if !appended {
        return Err(Error::Document("part has no root element".into()));
    }
    Ok(writer.into_inner())
}

/// Make `rel_id` the default header of the first section.
fn insert_header_reference(xml: &[u8], rel_id: &str) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::new());
    let mut inserted = false;

    let reference = |prefix: &str| {
        BytesStart::new(qualified(prefix, "headerReference")).with_attributes([
            (qualified(prefix, "type").as_str(), "default"),
            ("r:id", rel_id),
        ])
    };

    loop {
        match reader.read_event()? {
            Event::Start(e) if !inserted && e.local_name().as_ref() == b"sectPr" => {
                writer.write_event(Event::Start(e.borrow()))?;
                writer.write_event(Event::Empty(reference(&prefix_of(&e))))?;
                inserted = true;
            }
            Event::Empty(e) if !inserted && e.local_name().as_ref() == b"sectPr" => {
                writer.write_event(Event::Start(e.borrow()))?;
                writer.write_event(Event::Empty(reference(&prefix_of(&e))))?;
                writer.write_event(Event::End(e.to_end()))?;
                inserted = true;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    if !inserted {
        return Err(Error::Document("document has no sections".into()));
    }
    Ok(writer.into_inner())
}

/// Replace the content of the header's first paragraph with a single run.
///
/// Paragraph properties survive; a header without paragraphs gets one.
fn stamp_header_xml(xml: &[u8], label: &str, half_points: u32) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::new());
    let mut depth = 0usize;
    let mut prefix = "w".to_string();
    let mut stamped = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if depth == 1 && !stamped && e.local_name().as_ref() == b"p" => {
                writer.write_event(Event::Start(e.borrow()))?;
                copy_paragraph_properties(&mut reader, &mut writer)?;
                write_label_run(&mut writer, &prefix, label, half_points)?;
                writer.write_event(Event::End(e.to_end()))?;
                stamped = true;
            }
            Event::Empty(e) if depth == 1 && !stamped && e.local_name().as_ref() == b"p" => {
                writer.write_event(Event::Start(e.borrow()))?;
                write_label_run(&mut writer, &prefix, label, half_points)?;
                writer.write_event(Event::End(e.to_end()))?;
                stamped = true;
            }
            Event::Empty(e) if depth == 0 && !stamped => {
                // <w:hdr/>
                prefix = prefix_of(&e);
                writer.write_event(Event::Start(e.borrow()))?;
                write_label_paragraph(&mut writer, &prefix, label, half_points)?;
                writer.write_event(Event::End(e.to_end()))?;
                stamped = true;
            }
            Event::Start(e) => {
                if depth == 0 {
                    prefix = prefix_of(&e);
                }
                depth += 1;
                writer.write_event(Event::Start(e))?;
            }
            Event::End(e) => {
                if depth == 1 && !stamped {
                    write_label_paragraph(&mut writer, &prefix, label, half_points)?;
                    stamped = true;
                }
                depth = depth.saturating_sub(1);
                writer.write_event(Event::End(e))?;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    if !stamped {
        return Err(Error::Document("header part has no root element".into()));
    }
    Ok(writer.into_inner())
}

/// Consume a paragraph's content up to its end tag, copying only `pPr`.
fn copy_paragraph_properties(reader: &mut Reader<&[u8]>, writer: &mut Writer<Vec<u8>>) -> Result<()> {
    let mut depth = 0usize;
    let mut in_properties = false;

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Start(e) => {
                if depth == 0 && e.local_name().as_ref() == b"pPr" {
                    in_properties = true;
                }
                depth += 1;
            }
            Event::End(_) if depth == 0 => return Ok(()),
            Event::End(_) => depth -= 1,
            Event::Eof => {
                return Err(Error::Document("unterminated header paragraph".into()));
            }
            _ => {}
        }

        let keep = in_properties
            || matches!(&event, Event::Empty(e) if depth == 0 && e.local_name().as_ref() == b"pPr");
        if keep {
            writer.write_event(event)?;
        }
        if in_properties && depth == 0 {
            in_properties = false;
        }
    }
}

fn write_label_paragraph(
    writer: &mut Writer<Vec<u8>>,
    prefix: &str,
    label: &str,
    half_points: u32,
) -> Result<()> {
    let p = qualified(prefix, "p");
    writer.write_event(Event::Start(BytesStart::new(p.as_str())))?;
    write_label_run(writer, prefix, label, half_points)?;
    writer.write_event(Event::End(BytesEnd::new(p.as_str())))?;
    Ok(())
}

fn write_label_run(
    writer: &mut Writer<Vec<u8>>,
    prefix: &str,
    label: &str,
    half_points: u32,
) -> Result<()> {
    let run = qualified(prefix, "r");
    let run_props = qualified(prefix, "rPr");
    let text = qualified(prefix, "t");
    let size = half_points.to_string();
    let size_attr = qualified(prefix, "val");

    writer.write_event(Event::Start(BytesStart::new(run.as_str())))?;
    writer.write_event(Event::Start(BytesStart::new(run_props.as_str())))?;
    writer.write_event(Event::Empty(
        BytesStart::new(qualified(prefix, "sz"))
            .with_attributes([(size_attr.as_str(), size.as_str())]),
    ))?;
    writer.write_event(Event::End(BytesEnd::new(run_props.as_str())))?;
    writer.write_event(Event::Start(
        BytesStart::new(text.as_str()).with_attributes([("xml:space", "preserve")]),
    ))?;
    writer.write_event(Event::Text(BytesText::new(label)))?;
    writer.write_event(Event::End(BytesEnd::new(text.as_str())))?;
    writer.write_event(Event::End(BytesEnd::new(run.as_str())))?;
    Ok(())
}

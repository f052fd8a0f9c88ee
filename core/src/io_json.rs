use crate::{BlockGeometry, Document};
use std::collections::HashSet;

pub fn export_json(doc: &Document) -> serde_json::Result<String> {
    serde_json::to_string_pretty(doc)
}

// Block records serialize to roughly their text plus a fixed envelope.
fn encoded_len_hint(doc: &Document) -> usize {
    doc.blocks.iter().map(|b| b.text.len() + b.tool.len() + 160).sum::<usize>() + 256
}

pub fn export_json_into(doc: &Document, buf: &mut Vec<u8>) -> serde_json::Result<()> {
    buf.clear();
    buf.reserve(encoded_len_hint(doc));
    serde_json::to_writer(buf, doc)
}

pub fn import_json(raw: &str) -> serde_json::Result<Document> {
    serde_json::from_str(raw)
}

pub fn sanitize_doc(mut doc: Document) -> Document {
    let mut seen = HashSet::with_capacity(doc.blocks.len());
    doc.blocks.retain(|b| seen.insert(b.id));
    doc.blocks
        .iter_mut()
        .filter(|b| !b.geometry.is_measured())
        .for_each(|b| b.geometry = BlockGeometry::default());
    doc
}

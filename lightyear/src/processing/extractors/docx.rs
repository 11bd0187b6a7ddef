use crate::processing::ExtractionError;

/// Converts an OOXML word-processing document into plain text.
///
/// Paragraphs become lines, heading styles gain a `#` prefix per level, list
/// items are indented by nesting level, and tables are rendered as
/// pipe-delimited rows.
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| ExtractionError::DocxParse(format!("DOCX parse error: {e}")))?;

        let mut blocks: Vec<String> = Vec::new();

        for child in &docx.document.children {
            match child {
                docx_rs::DocumentChild::Paragraph(paragraph) => {
                    let line = Self::render_paragraph(paragraph);
                    if !line.trim().is_empty() {
                        blocks.push(line);
                    }
                }
                docx_rs::DocumentChild::Table(table) => {
                    let rendered = Self::render_table(table);
                    if !rendered.is_empty() {
                        blocks.push(rendered);
                    }
                }
                _ => {}
            }
        }

        Ok(blocks.join("\n"))
    }

    fn render_paragraph(paragraph: &docx_rs::Paragraph) -> String {
        let content = Self::paragraph_text(paragraph);
        if content.is_empty() {
            return content;
        }

        if let Some(level) = Self::heading_level(paragraph) {
            return format!("{} {content}", "#".repeat(level));
        }

        match &paragraph.property.numbering_property {
            Some(numbering) => {
                let depth = numbering.level.as_ref().map(|l| l.val).unwrap_or(0);
                format!("{}- {content}", "  ".repeat(depth))
            }
            None => content,
        }
    }

    /// `Title` counts as level 1; `Heading1`..`Heading6` map to their number.
    fn heading_level(paragraph: &docx_rs::Paragraph) -> Option<usize> {
        let style = paragraph.property.style.as_ref()?;
        if style.val == "Title" {
            return Some(1);
        }
        let level: usize = style.val.strip_prefix("Heading")?.parse().ok()?;
        (1..=6).contains(&level).then_some(level)
    }

    fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
        let mut content = String::new();
        for para_child in &paragraph.children {
            if let docx_rs::ParagraphChild::Run(run) = para_child {
                for run_child in &run.children {
                    match run_child {
                        docx_rs::RunChild::Text(text) => content.push_str(&text.text),
                        docx_rs::RunChild::Tab(_) => content.push('\t'),
                        _ => {}
                    }
                }
            }
        }
        content
    }

    fn render_table(table: &docx_rs::Table) -> String {
        let mut lines = Vec::new();

        for table_child in &table.rows {
            let docx_rs::TableChild::TableRow(row) = table_child;
            let cells: Vec<String> = row
                .cells
                .iter()
                .map(|row_child| {
                    let docx_rs::TableRowChild::TableCell(cell) = row_child;
                    cell.children
                        .iter()
                        .filter_map(|content| match content {
                            docx_rs::TableCellContent::Paragraph(para) => {
                                Some(Self::paragraph_text(para))
                            }
                            _ => None,
                        })
                        .filter(|text| !text.trim().is_empty())
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();

            if cells.iter().any(|c| !c.trim().is_empty()) {
                lines.push(format!("| {} |", cells.join(" | ")));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bytes_that_are_not_a_zip_container() {
        let result = DocxExtractor::extract(b"definitely not a word document");
        assert!(matches!(result, Err(ExtractionError::DocxParse(_))));
    }

    #[test]
    fn rejects_legacy_binary_doc() {
        // OLE compound file signature used by pre-2007 .doc files
        let ole = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00, 0x00];
        let result = DocxExtractor::extract(&ole);
        assert!(matches!(result, Err(ExtractionError::DocxParse(_))));
    }
}

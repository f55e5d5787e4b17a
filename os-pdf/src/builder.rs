//! PDF document builder
//!
//! Provides a fluent API for building paginated text documents.

use crate::encoding::{escape_literal, to_win_ansi};

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN_LEFT: f32 = 48.0;
const MARGIN_RIGHT: f32 = 48.0;
const MARGIN_TOP: f32 = 56.0;
const MARGIN_BOTTOM: f32 = 56.0;

/// Regular font resource name (Helvetica)
const FONT_REGULAR: &str = "F1";
/// Bold font resource name (Helvetica-Bold)
const FONT_BOLD: &str = "F2";

/// PDF document builder
///
/// Builds an A4, text-only PDF. Lines are appended top to bottom; when
/// the cursor reaches the bottom margin a new page is started
/// automatically, so arbitrarily long documents never overflow.
///
/// Output is fully deterministic: same calls, same bytes.
pub struct PdfBuilder {
    /// Content stream operations, one buffer per page
    pages: Vec<Vec<u8>>,
    /// Vertical cursor on the current page (PDF origin is bottom-left)
    y: f32,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: PAGE_HEIGHT - MARGIN_TOP,
        }
    }

    /// Number of pages accumulated so far
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    // === Text Output ===

    /// Large bold line (document title)
    pub fn title(&mut self, text: &str) -> &mut Self {
        self.write_text(FONT_BOLD, 16.0, 22.0, text)
    }

    /// Bold section heading
    pub fn heading(&mut self, text: &str) -> &mut Self {
        self.write_text(FONT_BOLD, 12.0, 18.0, text)
    }

    /// Regular body line
    pub fn line(&mut self, text: &str) -> &mut Self {
        self.write_text(FONT_REGULAR, 10.0, 14.0, text)
    }

    /// Bold body line
    pub fn bold_line(&mut self, text: &str) -> &mut Self {
        self.write_text(FONT_BOLD, 10.0, 14.0, text)
    }

    /// Vertical gap of one body line
    pub fn blank(&mut self) -> &mut Self {
        self.advance(10.0);
        self
    }

    /// Horizontal rule across the text width
    pub fn separator(&mut self) -> &mut Self {
        self.advance(10.0);
        let op = format!(
            "0.5 w {left:.2} {y:.2} m {right:.2} {y:.2} l S\n",
            left = MARGIN_LEFT,
            right = PAGE_WIDTH - MARGIN_RIGHT,
            y = self.y,
        );
        self.current_page().extend_from_slice(op.as_bytes());
        self.advance(6.0);
        self
    }

    fn write_text(&mut self, font: &str, size: f32, leading: f32, text: &str) -> &mut Self {
        self.advance(leading);
        let prefix = format!(
            "BT /{font} {size:.0} Tf {x:.2} {y:.2} Td (",
            x = MARGIN_LEFT,
            y = self.y,
        );
        let encoded = escape_literal(&to_win_ansi(text));
        let page = self.current_page();
        page.extend_from_slice(prefix.as_bytes());
        page.extend_from_slice(&encoded);
        page.extend_from_slice(b") Tj ET\n");
        self
    }

    /// Move the cursor down, breaking to a new page at the bottom margin
    fn advance(&mut self, leading: f32) {
        if self.y - leading < MARGIN_BOTTOM {
            self.pages.push(Vec::new());
            self.y = PAGE_HEIGHT - MARGIN_TOP;
        }
        self.y -= leading;
    }

    fn current_page(&mut self) -> &mut Vec<u8> {
        // pages is never empty: new() seeds one and advance() only appends
        self.pages.last_mut().unwrap()
    }

    // === Assembly ===

    /// Assemble the final PDF byte stream
    ///
    /// Object layout: 1 catalog, 2 page tree, 3/4 fonts, then one page
    /// object and one content stream per page. Cross-reference offsets
    /// are computed while writing.
    pub fn build(self) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::with_capacity(4096);
        let mut offsets: Vec<usize> = Vec::new();

        out.extend_from_slice(b"%PDF-1.4\n");
        // Binary marker comment so transports treat the file as binary
        out.extend_from_slice(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n']);

        let page_count = self.pages.len();
        let kids = (0..page_count)
            .map(|i| format!("{} 0 R", 5 + 2 * i))
            .collect::<Vec<_>>()
            .join(" ");

        // 1: catalog
        push_object(
            &mut out,
            &mut offsets,
            1,
            b"<< /Type /Catalog /Pages 2 0 R >>",
        );
        // 2: page tree
        push_object(
            &mut out,
            &mut offsets,
            2,
            format!("<< /Type /Pages /Kids [ {kids} ] /Count {page_count} >>").as_bytes(),
        );
        // 3/4: standard fonts, WinAnsi encoded
        push_object(
            &mut out,
            &mut offsets,
            3,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        );
        push_object(
            &mut out,
            &mut offsets,
            4,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
        );

        for (i, content) in self.pages.iter().enumerate() {
            let page_obj = 5 + 2 * i;
            let content_obj = page_obj + 1;
            push_object(
                &mut out,
                &mut offsets,
                page_obj,
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH:.2} {PAGE_HEIGHT:.2}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {content_obj} 0 R >>"
                )
                .as_bytes(),
            );

            offsets.push(out.len());
            out.extend_from_slice(
                format!("{content_obj} 0 obj\n<< /Length {} >>\nstream\n", content.len())
                    .as_bytes(),
            );
            out.extend_from_slice(content);
            out.extend_from_slice(b"\nendstream\nendobj\n");
        }

        // Cross-reference table
        let xref_pos = out.len();
        let total = offsets.len() + 1;
        out.extend_from_slice(format!("xref\n0 {total}\n").as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(
            format!("trailer\n<< /Size {total} /Root 1 0 R >>\nstartxref\n{xref_pos}\n%%EOF")
                .as_bytes(),
        );

        out
    }
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn push_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>, number: usize, body: &[u8]) {
    offsets.push(out.len());
    out.extend_from_slice(format!("{number} 0 obj\n").as_bytes());
    out.extend_from_slice(body);
    out.extend_from_slice(b"\nendobj\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn single_page_document_structure() {
        let mut b = PdfBuilder::new();
        b.title("Recibo").line("Cliente: Maria");
        let bytes = b.build();

        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF"));
        assert!(contains(&bytes, b"/Count 1"));
        assert!(contains(&bytes, b"(Recibo) Tj"));
        assert!(contains(&bytes, b"/BaseFont /Helvetica-Bold"));
    }

    #[test]
    fn output_is_deterministic() {
        let render = || {
            let mut b = PdfBuilder::new();
            b.title("Ordem de Serviço OS2501-0007");
            for i in 0..30 {
                b.line(&format!("Linha {i}"));
            }
            b.build()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn long_documents_paginate() {
        let mut b = PdfBuilder::new();
        for i in 0..60 {
            b.line(&format!("Serviço {i}"));
        }
        assert!(b.page_count() >= 2, "expected a page break, got {}", b.page_count());

        let pages = b.page_count();
        let bytes = b.build();
        assert!(contains(&bytes, format!("/Count {pages}").as_bytes()));
    }

    #[test]
    fn parentheses_are_escaped_in_streams() {
        let mut b = PdfBuilder::new();
        b.line("Troca de tela (2x) - 100.00");
        let bytes = b.build();
        assert!(contains(&bytes, b"Troca de tela \\(2x\\) - 100.00"));
    }
}

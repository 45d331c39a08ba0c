//! Text extraction from various file formats

use crate::error::{AnalyticaError, Result};
use pulldown_cmark::{html, Parser};
use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::io::{Cursor, Read};

/// Plain text pulled out of a document, plus the original markup when the
/// format is worth annotating later.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    pub plain: String,
    pub raw_markup: Option<String>,
}

impl ExtractedText {
    pub fn plain(text: String) -> Self {
        Self {
            plain: text,
            raw_markup: None,
        }
    }
}

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText> {
        let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            AnalyticaError::PdfExtraction(format!(
                "Could not parse PDF file. The file may be corrupted or password-protected: {}",
                e
            ))
        })?;

        let text = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        if text.is_empty() {
            return Err(AnalyticaError::PdfExtraction(
                "No text content found in PDF".to_string(),
            ));
        }

        Ok(ExtractedText::plain(text))
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            AnalyticaError::DocxExtraction(format!(
                "Could not parse DOCX file. The file may be corrupted: {}",
                e
            ))
        })?;

        let mut document_xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| {
                AnalyticaError::DocxExtraction(format!("Missing document body: {}", e))
            })?
            .read_to_string(&mut document_xml)?;

        let text = self.document_xml_to_text(&document_xml)?;
        if text.is_empty() {
            return Err(AnalyticaError::DocxExtraction(
                "No text content found in DOCX".to_string(),
            ));
        }

        Ok(ExtractedText::plain(text))
    }
}

impl DocxExtractor {
    /// Collect `<w:t>` runs, breaking lines at paragraph and table-cell ends
    fn document_xml_to_text(&self, xml: &str) -> Result<String> {
        let mut reader = Reader::from_str(xml);
        let mut text = String::new();
        let mut in_run_text = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    if e.name().as_ref() == b"w:t" {
                        in_run_text = true;
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if in_run_text {
                        let unescaped = e.unescape().map_err(|err| {
                            AnalyticaError::DocxExtraction(format!("Invalid text run: {}", err))
                        })?;
                        text.push_str(&unescaped);
                    }
                }
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"w:t" => in_run_text = false,
                    b"w:p" | b"w:tc" => text.push('\n'),
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"w:tab" => text.push('\t'),
                    b"w:br" | b"w:p" => text.push('\n'),
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(AnalyticaError::DocxExtraction(format!(
                        "Malformed document.xml at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {}
            }
        }

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

pub struct LatexExtractor;

impl TextExtractor for LatexExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText> {
        let latex_raw = String::from_utf8_lossy(bytes).into_owned();

        if latex_raw.trim().is_empty() {
            return Err(AnalyticaError::LatexExtraction("Empty LaTeX file".to_string()));
        }

        let text = self.latex_to_text(&latex_raw)?;
        if text.is_empty() {
            return Err(AnalyticaError::LatexExtraction(
                "Could not extract meaningful text from LaTeX".to_string(),
            ));
        }

        Ok(ExtractedText {
            plain: text,
            raw_markup: Some(latex_raw),
        })
    }
}

impl LatexExtractor {
    fn latex_to_text(&self, latex: &str) -> Result<String> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| AnalyticaError::LatexExtraction(e.to_string()))
        };

        let body_re = compile(r"(?s)\\begin\{document\}(.*?)(?:\\end\{document\}|\z)")?;
        let comment_re = compile(r"(?m)(^|[^\\])%.*$")?;
        let line_break_re = compile(r"\\\\(?:\[[^\]]*\])?")?;
        let wrapped_re = compile(r"\\[a-zA-Z]+\*?(?:\[[^\]]*\])?\{([^{}]*)\}")?;
        let command_re = compile(r"\\[a-zA-Z]+\*?")?;
        let escaped_re = compile(r"\\([%&$#_])")?;

        let body = body_re
            .captures(latex)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str())
            .unwrap_or(latex);

        let mut text = comment_re.replace_all(body, "$1").into_owned();
        text = line_break_re.replace_all(&text, "\n").into_owned();

        // Unwrap innermost groups first so nested commands collapse
        for _ in 0..8 {
            let next = wrapped_re.replace_all(&text, "$1").into_owned();
            if next == text {
                break;
            }
            text = next;
        }

        text = escaped_re.replace_all(&text, "$1").into_owned();
        text = command_re.replace_all(&text, "").into_owned();
        text = text.replace(['{', '}'], "").replace('~', " ");

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText> {
        let content = String::from_utf8(bytes.to_vec()).map_err(|e| {
            AnalyticaError::InvalidInput(format!("Text file is not valid UTF-8: {}", e))
        })?;
        Ok(ExtractedText::plain(content))
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText> {
        let markdown_content = String::from_utf8(bytes.to_vec()).map_err(|e| {
            AnalyticaError::InvalidInput(format!("Markdown file is not valid UTF-8: {}", e))
        })?;

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        let text = self.html_to_text(&html_output)?;
        Ok(ExtractedText::plain(text))
    }
}

impl MarkdownExtractor {
    fn html_to_text(&self, html: &str) -> Result<String> {
        let text = html
            .replace("<br>", "\n")
            .replace("<br />", "\n")
            .replace("</p>", "\n\n")
            .replace("</li>", "\n")
            .replace("&nbsp;", " ");

        let re = Regex::new(r"<[^>]*>").map_err(|e| AnalyticaError::InvalidInput(e.to_string()))?;
        let clean_text = re.replace_all(&text, "");
        let clean_text = match unescape(&clean_text) {
            Ok(decoded) => decoded.into_owned(),
            // Stray `&` or HTML-only entities; keep the text as written
            Err(_) => clean_text.to_string(),
        };

        let lines: Vec<String> = clean_text
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("word/document.xml", options).unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_docx_paragraphs_and_entities() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
            <w:p><w:r><w:t xml:space="preserve">Rust &amp; Go </w:t></w:r><w:r><w:t>developer</w:t></w:r></w:p>
        </w:body></w:document>"#;

        let extracted = DocxExtractor.extract(&build_docx(xml)).unwrap();
        assert_eq!(extracted.plain, "Jane Doe\nRust & Go developer");
        assert!(extracted.raw_markup.is_none());
    }

    #[test]
    fn test_docx_numeric_references_tabs_and_breaks() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Caf&#233; lead &#x2014; Rust</w:t></w:r></w:p>
            <w:tbl><w:tr>
                <w:tc><w:p><w:r><w:t>Skills</w:t><w:tab/><w:t>Go</w:t></w:r></w:p></w:tc>
                <w:tc><w:p><w:r><w:t>Tokio</w:t><w:br/><w:t>Serde</w:t></w:r></w:p></w:tc>
            </w:tr></w:tbl>
            <w:p/>
        </w:body></w:document>"#;

        let extracted = DocxExtractor.extract(&build_docx(xml)).unwrap();
        assert_eq!(extracted.plain, "Caf\u{e9} lead \u{2014} Rust\nSkills\tGo\nTokio\nSerde");
    }

    #[test]
    fn test_docx_malformed_xml_rejected() {
        let err = DocxExtractor
            .extract(&build_docx("<w:document><w:p><w:t>open</w:p></w:document>"))
            .unwrap_err();
        assert!(matches!(err, AnalyticaError::DocxExtraction(_)));
    }

    #[test]
    fn test_docx_rejects_garbage() {
        let err = DocxExtractor.extract(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, AnalyticaError::DocxExtraction(_)));
    }

    #[test]
    fn test_latex_body_is_cleaned() {
        let latex = r"\documentclass{article}
\usepackage{hyperref}
\begin{document}
\section*{Experience}
% a private note
\textbf{Senior Engineer} at Acme \\
Built \emph{\textbf{payment}} systems with 40\% less latency
\end{document}";

        let extracted = LatexExtractor.extract(latex.as_bytes()).unwrap();
        assert!(extracted.plain.contains("Experience"));
        assert!(extracted.plain.contains("Senior Engineer at Acme"));
        assert!(extracted.plain.contains("Built payment systems with 40% less latency"));
        assert!(!extracted.plain.contains("private note"));
        assert!(!extracted.plain.contains("hyperref"));
        assert_eq!(extracted.raw_markup.as_deref(), Some(latex));
    }

    #[test]
    fn test_latex_empty_rejected() {
        assert!(matches!(
            LatexExtractor.extract(b"   \n").unwrap_err(),
            AnalyticaError::LatexExtraction(_)
        ));
    }

    #[test]
    fn test_markdown_strips_formatting() {
        let md = "# John Doe\n\n**Software Engineer** with *React* and `Node.js`.\n\n- Led team of 4\n";
        let extracted = MarkdownExtractor.extract(md.as_bytes()).unwrap();
        assert!(extracted.plain.contains("John Doe"));
        assert!(extracted.plain.contains("Software Engineer with React and Node.js."));
        assert!(!extracted.plain.contains("**"));
        assert!(!extracted.plain.contains('#'));
    }

    #[test]
    fn test_markdown_decodes_character_references() {
        let md = "Tom &amp; Jerry &#8212; caf&eacute; owner &lt;3\n";
        let extracted = MarkdownExtractor.extract(md.as_bytes()).unwrap();
        assert!(extracted.plain.starts_with("Tom & Jerry \u{2014}"));
    }
}

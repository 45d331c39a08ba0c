//! Suggestion comments for LaTeX resumes

const BEGIN_DOCUMENT: &str = "\\begin{document}";
const BANNER: &str = "% ===== Resume Analytica suggestions =====";
const FOOTER: &str = "% ========================================";

/// Insert the suggestions as a LaTeX comment block right after
/// `\begin{document}`, or at the very top when the marker is missing.
/// The document compiles exactly as before.
pub fn insert_suggestions_into_latex(latex: &str, suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return latex.to_string();
    }

    let mut block = String::new();
    block.push_str(BANNER);
    block.push('\n');
    for (i, suggestion) in suggestions.iter().enumerate() {
        let single_line = suggestion.split_whitespace().collect::<Vec<_>>().join(" ");
        block.push_str(&format!("% {}. {}\n", i + 1, single_line));
    }
    block.push_str(FOOTER);
    block.push('\n');

    match latex.find(BEGIN_DOCUMENT) {
        Some(position) => {
            let insert_at = position + BEGIN_DOCUMENT.len();
            let (head, tail) = latex.split_at(insert_at);
            let tail = tail.strip_prefix('\n').unwrap_or(tail);
            format!("{}\n{}{}", head, block, tail)
        }
        None => format!("{}{}", block, latex),
    }
}

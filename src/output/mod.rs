//! Report rendering and LaTeX annotation

pub mod formatter;
pub mod latex;

pub use formatter::{save_report_to_file, suggest_filename, OutputFormatter, ReportGenerator};
pub use latex::insert_suggestions_into_latex;

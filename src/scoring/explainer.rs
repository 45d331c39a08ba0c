use crate::scoring::{FinalScore, ScoreComponents};

/// One-sentence summary of a score, e.g.
/// "Score 85%: Excellent keyword coverage, strong semantic alignment."
pub fn explain(components: &ScoreComponents, score: FinalScore) -> String {
    let mut clauses = vec![coverage_clause(components.recall), alignment_clause(components.semantic)];

    if components.context > 0.05 {
        clauses.push("good seniority/domain fit");
    } else if components.context < -0.05 {
        clauses.push("seniority/domain mismatch");
    }

    format!("Score {}%: {}.", score, clauses.join(", "))
}

fn coverage_clause(recall: f64) -> &'static str {
    if recall >= 0.8 {
        "Excellent keyword coverage"
    } else if recall >= 0.6 {
        "Good keyword coverage"
    } else if recall >= 0.4 {
        "Moderate keyword coverage"
    } else {
        "Low keyword coverage"
    }
}

fn alignment_clause(semantic: f64) -> &'static str {
    if semantic >= 0.7 {
        "strong semantic alignment"
    } else if semantic >= 0.5 {
        "moderate semantic alignment"
    } else {
        "weak semantic alignment"
    }
}

//! Technical keyword extraction against a curated skills vocabulary

use crate::error::{AnalyticaError, Result};
use aho_corasick::{AhoCorasick, MatchKind};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Curated vocabulary of technical skills, matched case-insensitively
pub const TECHNICAL_SKILLS: &[&str] = &[
    // Languages
    "python", "java", "javascript", "typescript", "c++", "c#", "go", "rust", "php", "ruby",
    "swift", "kotlin", "scala", "r", "matlab", "sql", "html", "css", "bash", "shell",
    // Frontend
    "react", "vue", "angular", "next.js", "nuxt.js", "svelte", "jquery", "bootstrap",
    "tailwind", "sass", "less", "webpack", "vite", "parcel",
    // Backend
    "node.js", "express", "fastapi", "django", "flask", "spring", "spring boot",
    "rails", "laravel", "asp.net", ".net core", "gin", "fiber", "nest.js",
    // Databases
    "postgresql", "postgres", "mysql", "mongodb", "redis", "elasticsearch",
    "sqlite", "oracle", "cassandra", "dynamodb", "neo4j", "influxdb",
    // Cloud and DevOps
    "aws", "azure", "gcp", "google cloud", "docker", "kubernetes", "k8s",
    "terraform", "ansible", "jenkins", "gitlab ci", "github actions", "ci/cd",
    "lambda", "s3", "ec2", "cloudfront", "cloudflare", "nginx", "apache",
    // Data and ML
    "pandas", "numpy", "scikit-learn", "tensorflow", "pytorch", "keras",
    "jupyter", "matplotlib", "seaborn", "plotly", "apache spark", "hadoop",
    "airflow", "kafka", "rabbitmq", "etl", "data pipeline", "machine learning",
    "deep learning", "nlp", "computer vision", "rag", "llm",
    // APIs and protocols
    "rest", "restful", "graphql", "grpc", "soap", "websocket", "api",
    "json", "xml", "yaml", "oauth", "jwt", "microservices",
    // Testing
    "jest", "pytest", "junit", "selenium", "cypress", "playwright",
    "unit testing", "integration testing", "tdd", "bdd", "mocha", "chai",
    // Tools
    "git", "github", "gitlab", "bitbucket", "jira", "confluence", "slack",
    "figma", "sketch", "adobe xd", "photoshop", "illustrator", "postman",
    "insomnia", "swagger", "openapi",
    // Methodologies
    "agile", "scrum", "kanban", "lean", "waterfall", "devops", "sre",
    "pair programming", "code review", "continuous deployment",
    // Vector databases
    "chromadb", "pinecone", "weaviate", "qdrant", "milvus", "faiss",
    "vector database", "embedding", "similarity search",
];

/// Phrases that mark a nearby skill as a hard requirement
const REQUIREMENT_INDICATORS: &[&str] = &[
    "required",
    "must have",
    "essential",
    "mandatory",
    "need",
    "experience with",
    "proficient",
    "expert",
    "skilled",
];

/// Characters inspected on either side of a keyword for requirement indicators
const INDICATOR_WINDOW: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedKeywords {
    /// Sorted, unique, lowercase
    pub keywords: Vec<String>,
    pub critical: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordPartition {
    pub found: Vec<String>,
    pub missing: Vec<String>,
}

pub struct SkillMatcher {
    matcher: AhoCorasick,
    skills: Vec<String>,
    section_splitter: Regex,
}

impl SkillMatcher {
    pub fn new() -> Result<Self> {
        Self::with_custom_skills(&[])
    }

    /// Extend the built-in vocabulary. Single-character entries are ignored.
    pub fn with_custom_skills(custom_skills: &[String]) -> Result<Self> {
        let skills: Vec<String> = TECHNICAL_SKILLS
            .iter()
            .map(|s| s.to_string())
            .chain(custom_skills.iter().map(|s| s.trim().to_lowercase()))
            .filter(|s| s.chars().count() > 1)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&skills)
            .map_err(|e| {
                AnalyticaError::KeywordExtraction(format!("Failed to build skill matcher: {}", e))
            })?;

        let section_splitter = Regex::new(r"\n\s*\n|\n\s*[A-Z][A-Za-z\s]+:").map_err(|e| {
            AnalyticaError::KeywordExtraction(format!("Invalid section pattern: {}", e))
        })?;

        Ok(Self {
            matcher,
            skills,
            section_splitter,
        })
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    /// Every vocabulary skill that occurs on token boundaries, plus the subset
    /// that looks critical
    pub fn extract(&self, text: &str) -> ExtractedKeywords {
        let keywords: BTreeSet<String> = self
            .matcher
            .find_overlapping_iter(text)
            .filter(|m| on_token_boundary(text, m.start(), m.end()))
            .map(|m| self.skills[m.pattern().as_usize()].clone())
            .collect();

        let critical = self.find_critical(text, &keywords);
        debug!(
            "Extracted {} keywords ({} critical)",
            keywords.len(),
            critical.len()
        );

        ExtractedKeywords {
            keywords: keywords.into_iter().collect(),
            critical,
        }
    }

    /// Critical when repeated, spread over several sections, or mentioned close
    /// to a requirement phrase
    fn find_critical(&self, text: &str, keywords: &BTreeSet<String>) -> BTreeSet<String> {
        let text_lower = text.to_lowercase();
        let sections: Vec<String> = self
            .section_splitter
            .split(text)
            .map(str::to_lowercase)
            .collect();

        keywords
            .iter()
            .filter(|keyword| {
                let count = text_lower.matches(keyword.as_str()).count();
                let section_hits = sections
                    .iter()
                    .filter(|section| section.contains(keyword.as_str()))
                    .count();

                count >= 2 || section_hits >= 2 || near_requirement_indicator(&text_lower, keyword)
            })
            .cloned()
            .collect()
    }

    /// Split job keywords into those the resume mentions and those it lacks
    pub fn partition(&self, job_keywords: &[String], resume_text: &str) -> KeywordPartition {
        let resume_lower = resume_text.to_lowercase();
        let (found, missing) = job_keywords
            .iter()
            .cloned()
            .partition(|keyword| resume_lower.contains(&keyword.to_lowercase()));

        KeywordPartition { found, missing }
    }
}

fn on_token_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// Look around the first occurrence only
fn near_requirement_indicator(text_lower: &str, keyword: &str) -> bool {
    let Some(position) = text_lower.find(keyword) else {
        return false;
    };
    let keyword_end = position + keyword.len();

    let window_start = text_lower[..position]
        .char_indices()
        .rev()
        .take(INDICATOR_WINDOW)
        .last()
        .map_or(position, |(i, _)| i);
    let window_end = text_lower[keyword_end..]
        .char_indices()
        .nth(INDICATOR_WINDOW)
        .map_or(text_lower.len(), |(i, _)| keyword_end + i);

    let window = &text_lower[window_start..window_end];
    REQUIREMENT_INDICATORS
        .iter()
        .any(|indicator| window.contains(indicator))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_matcher_creation() {
        let matcher = SkillMatcher::new().unwrap();
        // "r" is dropped
        assert_eq!(matcher.skill_count(), TECHNICAL_SKILLS.len() - 1);
    }

    #[test]
    fn test_extracts_sorted_lowercase_keywords() {
        let matcher = SkillMatcher::new().unwrap();
        let extracted = matcher.extract("We build APIs in Python and React, deployed with Docker on AWS.");
        assert_eq!(extracted.keywords, strings(&["aws", "docker", "python", "react"]));
    }

    #[test]
    fn test_token_boundaries_respected() {
        let matcher = SkillMatcher::new().unwrap();
        let extracted = matcher.extract("Golang services, a RESTful gateway and Spring Boot apps");
        assert!(!extracted.keywords.contains(&"go".to_string()));
        assert!(!extracted.keywords.contains(&"rest".to_string()));
        assert!(extracted.keywords.contains(&"restful".to_string()));
        assert!(extracted.keywords.contains(&"spring".to_string()));
        assert!(extracted.keywords.contains(&"spring boot".to_string()));
    }

    #[test]
    fn test_symbol_skills() {
        let matcher = SkillMatcher::new().unwrap();
        let extracted = matcher.extract("Shipped C++ and C# tools, CI/CD with Node.js.");
        for skill in ["c++", "c#", "ci/cd", "node.js"] {
            assert!(extracted.keywords.contains(&skill.to_string()), "missing {}", skill);
        }
    }

    #[test]
    fn test_critical_by_repetition_sections_and_indicators() {
        let matcher = SkillMatcher::new().unwrap();
        let text = format!(
            "Kubernetes experience required.\n\n{}\n\nPython is used daily. We also like python scripts. Our stack includes Docker.",
            "The team ships weekly and values calm, careful work. ".repeat(3)
        );
        let extracted = matcher.extract(&text);

        assert_eq!(extracted.keywords, strings(&["docker", "kubernetes", "python"]));
        assert!(extracted.critical.contains("python"));
        assert!(extracted.critical.contains("kubernetes"));
        assert!(!extracted.critical.contains("docker"));

        let spread = matcher.extract("Skills: Terraform\n\nProjects: Terraform modules");
        assert!(spread.critical.contains("terraform"));
    }

    #[test]
    fn test_indicator_window_is_bounded() {
        let far = format!("Rust{}required", " ".repeat(150));
        assert!(!near_requirement_indicator(&far.to_lowercase(), "rust"));

        let near = format!("Rust{}required", " ".repeat(50));
        assert!(near_requirement_indicator(&near.to_lowercase(), "rust"));
    }

    #[test]
    fn test_custom_skills() {
        let matcher = SkillMatcher::with_custom_skills(&strings(&["Bevy", "x"])).unwrap();
        let extracted = matcher.extract("Built games with bevy");
        assert_eq!(extracted.keywords, strings(&["bevy"]));
    }

    #[test]
    fn test_partition_by_substring() {
        let matcher = SkillMatcher::new().unwrap();
        let partition = matcher.partition(
            &strings(&["aws", "docker", "python"]),
            "Senior PYTHON engineer, some AWS",
        );
        assert_eq!(partition.found, strings(&["aws", "python"]));
        assert_eq!(partition.missing, strings(&["docker"]));
    }

    #[test]
    fn test_empty_text() {
        let matcher = SkillMatcher::new().unwrap();
        let extracted = matcher.extract("");
        assert!(extracted.keywords.is_empty());
        assert!(extracted.critical.is_empty());
    }
}

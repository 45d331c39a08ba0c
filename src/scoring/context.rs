//! Seniority, experience and domain adjustment

use crate::error::{AnalyticaError, Result};
use crate::scoring::cues::{
    domains_in, CueTable, JOB_JUNIOR_CUES, JOB_SENIOR_CUES, RESUME_JUNIOR_CUES, RESUME_SENIOR_CUES,
};
use crate::scoring::{Diagnostic, ScoringStage};
use chrono::Datelike;
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const CONTEXT_BONUS_LIMIT: f64 = 0.1;

/// Per-signal contributions. `total` is the clamped sum.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContextBreakdown {
    pub seniority: f64,
    pub years: f64,
    pub domain: f64,
    pub total: f64,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Seniority {
    junior: bool,
    senior: bool,
}

impl Seniority {
    fn detect(side: &str, junior: &CueTable, senior: &CueTable, lowered: &str) -> Self {
        let junior_hits = junior.matched_cues(lowered);
        let senior_hits = senior.matched_cues(lowered);
        debug!("{} seniority cues: junior {:?}, senior {:?}", side, junior_hits, senior_hits);
        Self {
            junior: !junior_hits.is_empty(),
            senior: !senior_hits.is_empty(),
        }
    }
}

pub struct ContextBonusCalculator {
    current_year: i32,
    job_year_patterns: Vec<Regex>,
    resume_years_pattern: Regex,
    date_range_pattern: Regex,
}

impl ContextBonusCalculator {
    pub fn new() -> Result<Self> {
        Self::with_current_year(chrono::Local::now().year())
    }

    /// Open-ended date ranges ("2019 - present") end at `current_year`
    pub fn with_current_year(current_year: i32) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                AnalyticaError::Scoring(format!("Invalid experience pattern {}: {}", pattern, e))
            })
        };

        let years_of_experience = r"([0-9]+)\+?\s*years?\s+(?:of\s+)?experience";

        Ok(Self {
            current_year,
            job_year_patterns: vec![
                compile(years_of_experience)?,
                compile(r"([0-9]+)\+?\s*years?\s+(?:in|with)")?,
                compile(r"minimum\s+([0-9]+)\s+years?")?,
                compile(r"at\s+least\s+([0-9]+)\s+years?")?,
            ],
            resume_years_pattern: compile(years_of_experience)?,
            date_range_pattern: compile(r"([0-9]{4})\s*[-–—]\s*(present|current|[0-9]{4})")?,
        })
    }

    /// Combined adjustment in [-0.1, 0.1]
    pub fn context_bonus(&self, job_text: &str, resume_text: &str) -> f64 {
        self.breakdown(job_text, resume_text).total
    }

    pub fn breakdown(&self, job_text: &str, resume_text: &str) -> ContextBreakdown {
        let job_lower = job_text.to_lowercase();
        let resume_lower = resume_text.to_lowercase();
        let mut diagnostics = Vec::new();

        let mut settle = |signal: std::result::Result<f64, Diagnostic>| match signal {
            Ok(value) => value,
            Err(diag) => {
                warn!("{}", diag);
                diagnostics.push(diag);
                0.0
            }
        };

        let seniority = settle(self.seniority_bonus(&job_lower, &resume_lower));
        let years = settle(self.years_bonus(&job_lower, &resume_lower));
        let domain = settle(self.domain_bonus(&job_lower, &resume_lower));

        let total = (seniority + years + domain).clamp(-CONTEXT_BONUS_LIMIT, CONTEXT_BONUS_LIMIT);
        debug!(
            "Context bonus: seniority={:+.2} years={:+.2} domain={:+.2} total={:+.2}",
            seniority, years, domain, total
        );

        ContextBreakdown {
            seniority,
            years,
            domain,
            total,
            diagnostics,
        }
    }

    /// Both arguments must already be lowercased
    pub fn seniority_bonus(
        &self,
        job_lower: &str,
        resume_lower: &str,
    ) -> std::result::Result<f64, Diagnostic> {
        let job = Seniority::detect("Job", &JOB_JUNIOR_CUES, &JOB_SENIOR_CUES, job_lower);
        let resume =
            Seniority::detect("Resume", &RESUME_JUNIOR_CUES, &RESUME_SENIOR_CUES, resume_lower);

        let bonus = match (job.junior, job.senior) {
            (true, false) => {
                if resume.junior && !resume.senior {
                    0.08
                } else if resume.senior {
                    -0.05
                } else {
                    0.02
                }
            }
            (false, true) => {
                if resume.senior {
                    0.08
                } else if resume.junior {
                    -0.08
                } else {
                    0.0
                }
            }
            _ => 0.02,
        };

        Ok(bonus)
    }

    /// Both arguments must already be lowercased
    pub fn years_bonus(
        &self,
        job_lower: &str,
        resume_lower: &str,
    ) -> std::result::Result<f64, Diagnostic> {
        let job_years = self.job_years(job_lower)?;
        let resume_years = self.resume_years(resume_lower)?;

        let (Some(job_max), Some(resume_max)) =
            (job_years.iter().max().copied(), resume_years.iter().max().copied())
        else {
            return Ok(0.0);
        };

        let bonus = if resume_max >= job_max {
            0.02
        } else if resume_max as f64 >= 0.7 * job_max as f64 {
            0.01
        } else {
            -0.02
        };
        Ok(bonus)
    }

    /// Both arguments must already be lowercased
    pub fn domain_bonus(
        &self,
        job_lower: &str,
        resume_lower: &str,
    ) -> std::result::Result<f64, Diagnostic> {
        let job_domains = domains_in(job_lower);
        if job_domains.is_empty() {
            return Ok(0.0);
        }

        let resume_domains = domains_in(resume_lower);
        if job_domains.intersection(&resume_domains).next().is_some() {
            Ok(0.02)
        } else {
            Ok(-0.01)
        }
    }

    /// Year requirements stated in a job description
    pub fn job_years(&self, job_lower: &str) -> std::result::Result<Vec<u64>, Diagnostic> {
        let mut years = Vec::new();
        for pattern in &self.job_year_patterns {
            for cap in pattern.captures_iter(job_lower) {
                years.push(parse_years(&cap[1]));
            }
        }
        Ok(years)
    }

    /// Stated years plus the length of every plausible date range
    pub fn resume_years(&self, resume_lower: &str) -> std::result::Result<Vec<u64>, Diagnostic> {
        let mut years = Vec::new();
        for cap in self.resume_years_pattern.captures_iter(resume_lower) {
            years.push(parse_years(&cap[1]));
        }

        for cap in self.date_range_pattern.captures_iter(resume_lower) {
            let start = parse_year(&cap[1])?;
            let end = match &cap[2] {
                "present" | "current" => self.current_year,
                year => parse_year(year)?,
            };
            if end > start && start > 1990 {
                years.push((end - start) as u64);
            }
        }

        Ok(years)
    }
}

/// `raw` is all ASCII digits, so overflow is the only failure; it saturates
fn parse_years(raw: &str) -> u64 {
    raw.parse::<u64>().unwrap_or(u64::MAX)
}

fn parse_year(raw: &str) -> std::result::Result<i32, Diagnostic> {
    raw.parse::<i32>().map_err(|e| {
        Diagnostic::new(ScoringStage::Years, format!("cannot read calendar year {:?}: {}", raw, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> ContextBonusCalculator {
        ContextBonusCalculator::with_current_year(2024).unwrap()
    }

    #[test]
    fn test_seniority_detect_from_cue_hits() {
        let detected = Seniority::detect(
            "Resume",
            &RESUME_JUNIOR_CUES,
            &RESUME_SENIOR_CUES,
            "senior engineer who mentored the team",
        );
        assert_eq!(detected, Seniority { junior: false, senior: true });
    }

    #[test]
    fn test_seniority_policy_table() {
        let calc = calculator();
        let cases: &[(&str, &str, f64)] = &[
            ("junior developer", "bootcamp graduate", 0.08),
            ("junior developer", "senior engineer", -0.05),
            ("junior developer", "backend engineer", 0.02),
            ("senior developer", "senior engineer, led team", 0.08),
            ("senior developer", "apprentice", -0.08),
            ("senior developer", "backend engineer", 0.0),
            ("backend developer", "backend engineer", 0.02),
            ("junior or senior developer", "backend engineer", 0.02),
        ];

        for (job, resume, expected) in cases {
            let bonus = calc.seniority_bonus(job, resume).unwrap();
            assert_eq!(bonus, *expected, "job={:?} resume={:?}", job, resume);
        }
    }

    #[test]
    fn test_years_from_open_date_range() {
        let calc = calculator();
        let bonus = calc
            .years_bonus("5+ years experience with rust", "backend engineer, 2019 - present")
            .unwrap();
        assert_eq!(bonus, 0.02);
    }

    #[test]
    fn test_years_partial_and_short() {
        let calc = calculator();
        assert_eq!(
            calc.years_bonus("minimum 5 years", "4 years of experience").unwrap(),
            0.01
        );
        assert_eq!(
            calc.years_bonus("at least 10 years", "2 years experience").unwrap(),
            -0.02
        );
        assert_eq!(calc.years_bonus("no requirement", "9 years experience").unwrap(), 0.0);
        assert_eq!(calc.years_bonus("3 years in go", "no dates here").unwrap(), 0.0);
    }

    #[test]
    fn test_date_ranges_filtered() {
        let calc = calculator();
        let years = calc
            .resume_years("1985 - 1999 consultant; 2020 – 2018 typo; 2015 - 2021 engineer; 2022 - current")
            .unwrap();
        assert_eq!(years, vec![6, 2]);
    }

    #[test]
    fn test_oversized_year_count_saturates() {
        let calc = calculator();
        let job = "99999999999999999999999 years of experience";
        assert_eq!(calc.job_years(job).unwrap(), vec![u64::MAX]);
        assert_eq!(calc.years_bonus(job, "5 years experience").unwrap(), -0.02);
        assert_eq!(
            calc.years_bonus("5 years experience", "123456789012345678901234 years of experience")
                .unwrap(),
            0.02
        );

        let breakdown = calc.breakdown(job, "5 years experience");
        assert_eq!(breakdown.years, -0.02);
        assert!(breakdown.diagnostics.is_empty());
    }

    #[test]
    fn test_domain_alignment() {
        let calc = calculator();
        assert_eq!(calc.domain_bonus("banking backend", "payment systems").unwrap(), 0.02);
        assert_eq!(calc.domain_bonus("banking backend", "hospital systems").unwrap(), -0.01);
        assert_eq!(calc.domain_bonus("backend with rust", "hospital systems").unwrap(), 0.0);
    }

    #[test]
    fn test_total_is_clamped() {
        let calc = calculator();
        let breakdown = calc.breakdown(
            "Senior engineer, 5+ years experience, banking",
            "Senior engineer who led team. 2015 - present at a banking firm.",
        );
        assert_eq!(breakdown.seniority, 0.08);
        assert_eq!(breakdown.years, 0.02);
        assert_eq!(breakdown.domain, 0.02);
        assert_eq!(breakdown.total, CONTEXT_BONUS_LIMIT);
        assert!(breakdown.diagnostics.is_empty());
    }

    #[test]
    fn test_neutral_texts() {
        let calc = calculator();
        assert_eq!(calc.context_bonus("We use python, aws and docker.", "Built tools in python."), 0.02);
        assert_eq!(calc.context_bonus("", ""), 0.02);
    }
}

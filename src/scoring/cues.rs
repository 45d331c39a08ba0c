//! Cue tables for seniority and domain detection
//!
//! All matching is plain substring containment on text the caller has already
//! lowercased, so a cue such as "lead" also fires on "leadership".

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A named list of substrings that signal one category
#[derive(Debug, Clone, Copy)]
pub struct CueTable {
    pub name: &'static str,
    pub cues: &'static [&'static str],
}

impl CueTable {
    pub fn matches(&self, lowered: &str) -> bool {
        self.cues.iter().any(|cue| lowered.contains(cue))
    }

    pub fn matched_cues(&self, lowered: &str) -> Vec<&'static str> {
        self.cues
            .iter()
            .copied()
            .filter(|cue| lowered.contains(cue))
            .collect()
    }
}

pub const JOB_JUNIOR_CUES: CueTable = CueTable {
    name: "job-junior",
    cues: &[
        "junior",
        "entry",
        "entry-level",
        "graduate",
        "new grad",
        "0-2 years",
        "0-3 years",
        "early career",
        "associate",
        "bootcamp",
        "internship",
        "trainee",
    ],
};

pub const JOB_SENIOR_CUES: CueTable = CueTable {
    name: "job-senior",
    cues: &[
        "senior",
        "lead",
        "principal",
        "staff",
        "architect",
        "manager",
        "director",
        "5+ years",
        "3+ years",
        "experienced",
        "expert",
        "advanced",
    ],
};

pub const RESUME_JUNIOR_CUES: CueTable = CueTable {
    name: "resume-junior",
    cues: &[
        "intern",
        "internship",
        "graduate",
        "bootcamp",
        "entry",
        "junior",
        "associate",
        "trainee",
        "apprentice",
        "recent graduate",
        "new to",
        "learning",
    ],
};

pub const RESUME_SENIOR_CUES: CueTable = CueTable {
    name: "resume-senior",
    cues: &[
        "lead",
        "senior",
        "principal",
        "manager",
        "director",
        "architect",
        "staff",
        "expert",
        "experienced",
        "mentored",
        "managed team",
        "led team",
        "supervised",
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Fintech,
    Healthcare,
    Ecommerce,
    Saas,
    Gaming,
    Security,
    Data,
    Mobile,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::Fintech => "fintech",
            Domain::Healthcare => "healthcare",
            Domain::Ecommerce => "ecommerce",
            Domain::Saas => "saas",
            Domain::Gaming => "gaming",
            Domain::Security => "security",
            Domain::Data => "data",
            Domain::Mobile => "mobile",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DomainGroup {
    pub domain: Domain,
    pub cues: CueTable,
}

pub const DOMAIN_GROUPS: &[DomainGroup] = &[
    DomainGroup {
        domain: Domain::Fintech,
        cues: CueTable {
            name: "fintech",
            cues: &["finance", "banking", "trading", "payment", "fintech", "cryptocurrency", "blockchain"],
        },
    },
    DomainGroup {
        domain: Domain::Healthcare,
        cues: CueTable {
            name: "healthcare",
            cues: &["healthcare", "medical", "hospital", "patient", "clinical", "pharma", "biotech"],
        },
    },
    DomainGroup {
        domain: Domain::Ecommerce,
        cues: CueTable {
            name: "ecommerce",
            cues: &["ecommerce", "e-commerce", "retail", "shopping", "marketplace", "commerce"],
        },
    },
    DomainGroup {
        domain: Domain::Saas,
        cues: CueTable {
            name: "saas",
            cues: &["saas", "b2b", "enterprise", "subscription", "platform"],
        },
    },
    DomainGroup {
        domain: Domain::Gaming,
        cues: CueTable {
            name: "gaming",
            cues: &["gaming", "game", "unity", "unreal", "mobile games", "console"],
        },
    },
    DomainGroup {
        domain: Domain::Security,
        cues: CueTable {
            name: "security",
            cues: &["security", "cybersecurity", "infosec", "penetration", "vulnerability", "encryption"],
        },
    },
    DomainGroup {
        domain: Domain::Data,
        cues: CueTable {
            name: "data",
            cues: &["data science", "analytics", "big data", "machine learning", "ai", "ml"],
        },
    },
    DomainGroup {
        domain: Domain::Mobile,
        cues: CueTable {
            name: "mobile",
            cues: &["mobile", "ios", "android", "react native", "flutter", "swift", "kotlin"],
        },
    },
];

/// Every domain with at least one cue present in the lowercased text
pub fn domains_in(lowered: &str) -> BTreeSet<Domain> {
    DOMAIN_GROUPS
        .iter()
        .filter(|group| group.cues.matches(lowered))
        .map(|group| group.domain)
        .collect()
}

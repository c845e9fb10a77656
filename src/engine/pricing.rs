//! Task credit estimation from the skills a task needs.
use serde::Serialize;
use std::collections::BTreeSet;

/// No task is priced above this, however many skills it lists.
pub const CREDIT_CAP: u64 = 100_000;

// Flat price per skill, in rupees. Also the skill catalogue, in display order.
const SKILL_PRICING: &[(&str, u64)] = &[
    ("Web Design", 6400),
    ("JavaScript", 5600),
    ("React", 7200),
    ("Graphic Design", 4800),
    ("Plumbing", 500),
    ("Electrician", 500),
    ("Python", 6400),
    ("Data Analysis", 7200),
    ("Content Writing", 3200),
    ("SEO Optimization", 4800),
    ("Social Media Marketing", 5600),
    ("Video Editing", 25000),
    ("Photography", 25000),
    ("Carpentry", 4000),
    ("Painting", 4000),
    ("Tutoring", 2400),
    ("HTML", 4800),
    ("CSS", 4800),
    ("Node.js", 6400),
    ("Illustration", 5600),
    ("Branding", 7200),
    ("Manual Labor", 400),
    ("Welding", 400),
    ("Database Management", 6400),
];

const PHOTOGRAPHY_VIDEOGRAPHY: &[&str] = &["Photography", "Video Editing"];
const SPECIFIC_SERVICE: &[&str] = &["Electrician", "Plumbing", "Welding"];
const DAILY_RATE_TECHNICAL: &[&str] = &[
    "Web Design", "JavaScript", "React", "Graphic Design", "Python", "Data Analysis",
    "SEO Optimization", "Social Media Marketing", "HTML", "CSS", "Node.js",
    "Illustration", "Database Management",
];

/// Notes shown next to an estimate. They never change the amount.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Disclaimer {
    PhotographyVideography,
    SpecificService,
    DailyRateTechnical,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreditEstimate {
    pub amount: u64,
    pub disclaimers: Vec<Disclaimer>,
}

pub fn price_per_skill(skill: &str) -> u64 {
    SKILL_PRICING
        .iter()
        .find(|(name, _)| *name == skill)
        .map_or(0, |(_, price)| *price)
}

/// Sum of per-skill prices, capped at [`CREDIT_CAP`]. Unknown skills add nothing.
pub fn estimate_credit(skills: &BTreeSet<String>) -> u64 {
    let total: u64 = skills.iter().map(|s| price_per_skill(s)).sum();
    total.min(CREDIT_CAP)
}

pub fn disclaimers(skills: &BTreeSet<String>) -> Vec<Disclaimer> {
    let any_of = |group: &[&str]| group.iter().any(|g| skills.contains(*g));
    let mut notes = Vec::new();
    if any_of(PHOTOGRAPHY_VIDEOGRAPHY) {
        notes.push(Disclaimer::PhotographyVideography);
    }
    if any_of(SPECIFIC_SERVICE) {
        notes.push(Disclaimer::SpecificService);
    }
    if any_of(DAILY_RATE_TECHNICAL) {
        notes.push(Disclaimer::DailyRateTechnical);
    }
    notes
}

pub fn estimate(skills: &BTreeSet<String>) -> CreditEstimate {
    CreditEstimate {
        amount: estimate_credit(skills),
        disclaimers: disclaimers(skills),
    }
}

pub fn all_skills() -> Vec<&'static str> {
    SKILL_PRICING.iter().map(|(name, _)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_estimate_credit() {
        assert_eq!(estimate_credit(&set(&["Plumbing"])), 500);
        assert_eq!(estimate_credit(&set(&[])), 0);
        assert_eq!(estimate_credit(&set(&["Web Design", "React"])), 13600);
        assert_eq!(estimate_credit(&set(&["Plumbing", "Underwater Basket Weaving"])), 500);
    }

    #[test]
    fn test_estimate_credit_is_capped() {
        let everything: BTreeSet<String> = all_skills().into_iter().map(String::from).collect();
        let raw: u64 = everything.iter().map(|s| price_per_skill(s)).sum();
        assert!(raw > CREDIT_CAP);
        assert_eq!(estimate_credit(&everything), CREDIT_CAP);
    }

    #[test]
    fn test_disclaimers_do_not_change_amount() {
        let skills = set(&["Photography", "Welding"]);
        let result = estimate(&skills);
        assert_eq!(result.amount, 25400);
        assert_eq!(
            result.disclaimers,
            vec![Disclaimer::PhotographyVideography, Disclaimer::SpecificService]
        );
        assert!(disclaimers(&set(&["Tutoring"])).is_empty());
        assert_eq!(disclaimers(&set(&["CSS"])), vec![Disclaimer::DailyRateTechnical]);
    }

    #[test]
    fn test_catalogue() {
        let skills = all_skills();
        assert_eq!(skills.len(), 24);
        assert_eq!(skills[0], "Web Design");
        assert!(skills.contains(&"Database Management"));
    }
}

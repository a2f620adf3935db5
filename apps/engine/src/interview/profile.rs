//! Profile Classifier — derives seniority, role category, and a
//! management-experience flag from free-form résumé and vacancy fields.
//!
//! Pure, deterministic, total: never calls the network and never fails.
//! Ambiguous input degrades to the most conservative classification.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Months of experience assumed per listed position when the résumé carries
/// no explicit total duration.
const MONTHS_PER_POSITION: u32 = 18;

/// Detected seniority tier of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeniorityLevel {
    Junior,
    Middle,
    Senior,
    Lead,
    Unknown,
}

/// Detected role category, matched against a fixed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleCategory {
    Developer,
    Qa,
    Devops,
    Analyst,
    ProjectManager,
    Designer,
    DataScientist,
    SystemAdmin,
    Other,
}

/// One prior position from the résumé.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionEntry {
    pub title: String,
    pub description: String,
}

/// Free-form résumé fields in the shape of a job-board export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeData {
    pub title: String,
    /// Total prior experience in months, when the source provides it.
    pub total_experience_months: Option<u32>,
    pub positions: Vec<PositionEntry>,
    pub skills: Vec<String>,
}

/// Free-form vacancy fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VacancyData {
    pub title: String,
    pub description: String,
    pub key_skills: Vec<String>,
}

/// The classified candidate. Created once per simulation, immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub detected_level: SeniorityLevel,
    pub detected_role: RoleCategory,
    pub years_of_experience: Option<u32>,
    pub key_technologies: BTreeSet<String>,
    pub management_experience: bool,
}

/// Role vocabulary, first matching category wins. Order matters: narrower
/// roles (QA, DevOps, data science) are checked before the generic developer
/// bucket so that e.g. "QA-инженер" does not land in Developer via "инженер".
const ROLE_KEYWORDS: &[(RoleCategory, &[&str])] = &[
    (RoleCategory::Qa, &["qa", "тестиров", "test engineer", "sdet"]),
    (
        RoleCategory::Devops,
        &["devops", "sre", "инфраструктур", "ci/cd"],
    ),
    (
        RoleCategory::DataScientist,
        &["data scien", "machine learning", "ml-", "данных", "аналитик данных"],
    ),
    (
        RoleCategory::Analyst,
        &["аналитик", "analyst", "бизнес-анализ"],
    ),
    (
        RoleCategory::ProjectManager,
        &["менеджер проект", "project manager", "scrum", "продакт", "product manager"],
    ),
    (
        RoleCategory::Designer,
        &["дизайнер", "designer", "ux", "ui-дизайн"],
    ),
    (
        RoleCategory::SystemAdmin,
        &["системный администратор", "sysadmin", "system administrator"],
    ),
    (
        RoleCategory::Developer,
        &["разработчик", "программист", "developer", "engineer", "инженер"],
    ),
];

/// People-leadership markers scanned over position titles and descriptions.
const MANAGEMENT_KEYWORDS: &[&str] = &[
    "team lead",
    "тимлид",
    "руководител",
    "руководил",
    "управлял команд",
    "управление командой",
    "head of",
    "начальник отдела",
];

/// Fixed technology vocabulary intersected with résumé skills and
/// position descriptions.
const TECH_KEYWORDS: &[&str] = &[
    "python", "java", "rust", "go", "javascript", "typescript", "c++", "c#", "sql", "postgresql",
    "mysql", "mongodb", "redis", "kafka", "docker", "kubernetes", "linux", "git", "react", "vue",
    "django", "fastapi", "spring", "aws", "terraform", "ansible", "pytorch", "tensorflow",
];

/// Classifies a candidate from résumé and vacancy data.
pub fn classify(resume: &ResumeData, vacancy: &VacancyData) -> CandidateProfile {
    let total_months = resume
        .total_experience_months
        .or_else(|| match resume.positions.len() {
            0 => None,
            n => Some(n as u32 * MONTHS_PER_POSITION),
        });

    let detected_level = detect_level(total_months, resume.positions.len());
    let detected_role = detect_role(resume, vacancy);
    let management_experience = detect_management(resume);
    let key_technologies = collect_technologies(resume);

    CandidateProfile {
        detected_level,
        detected_role,
        years_of_experience: total_months.map(|m| m / 12),
        key_technologies,
        management_experience,
    }
}

fn detect_level(total_months: Option<u32>, position_count: usize) -> SeniorityLevel {
    let months = match total_months {
        Some(m) => m,
        None => return SeniorityLevel::Unknown,
    };

    let by_duration = match months {
        0..=23 => SeniorityLevel::Junior,
        24..=59 => SeniorityLevel::Middle,
        60..=107 => SeniorityLevel::Senior,
        _ => SeniorityLevel::Lead,
    };

    // Many full positions is a senior signal on its own, even when the
    // declared duration is short.
    if position_count >= 6 && matches!(by_duration, SeniorityLevel::Junior | SeniorityLevel::Middle)
    {
        return SeniorityLevel::Senior;
    }
    by_duration
}

fn detect_role(resume: &ResumeData, vacancy: &VacancyData) -> RoleCategory {
    let haystack = format!(
        "{} {} {}",
        vacancy.title.to_lowercase(),
        vacancy.description.to_lowercase(),
        resume.title.to_lowercase()
    );

    for (role, keywords) in ROLE_KEYWORDS {
        if keywords.iter().any(|kw| haystack.contains(kw)) {
            return *role;
        }
    }
    RoleCategory::Other
}

fn detect_management(resume: &ResumeData) -> bool {
    let haystack = resume
        .positions
        .iter()
        .flat_map(|p| [p.title.to_lowercase(), p.description.to_lowercase()])
        .collect::<Vec<_>>()
        .join(" ");

    MANAGEMENT_KEYWORDS.iter().any(|kw| haystack.contains(kw))
}

fn collect_technologies(resume: &ResumeData) -> BTreeSet<String> {
    let mut haystack = resume
        .skills
        .iter()
        .map(|s| s.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    for p in &resume.positions {
        haystack.push(' ');
        haystack.push_str(&p.description.to_lowercase());
    }

    TECH_KEYWORDS
        .iter()
        .filter(|kw| haystack.contains(*kw))
        .map(|kw| kw.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resume_with_months(months: u32) -> ResumeData {
        ResumeData {
            title: "Разработчик".to_string(),
            total_experience_months: Some(months),
            positions: vec![],
            skills: vec![],
        }
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(detect_level(Some(12), 1), SeniorityLevel::Junior);
        assert_eq!(detect_level(Some(36), 2), SeniorityLevel::Middle);
        assert_eq!(detect_level(Some(72), 3), SeniorityLevel::Senior);
        assert_eq!(detect_level(Some(120), 4), SeniorityLevel::Lead);
    }

    #[test]
    fn test_many_positions_bump_to_senior() {
        // Six positions with a short declared duration still reads as senior.
        assert_eq!(detect_level(Some(30), 6), SeniorityLevel::Senior);
    }

    #[test]
    fn test_no_signal_is_unknown() {
        assert_eq!(detect_level(None, 0), SeniorityLevel::Unknown);
    }

    #[test]
    fn test_missing_total_falls_back_to_position_count() {
        let resume = ResumeData {
            title: "Developer".to_string(),
            total_experience_months: None,
            positions: vec![PositionEntry::default(), PositionEntry::default()],
            skills: vec![],
        };
        let profile = classify(&resume, &VacancyData::default());
        // 2 positions * 18 months = 36 months → middle
        assert_eq!(profile.detected_level, SeniorityLevel::Middle);
        assert_eq!(profile.years_of_experience, Some(3));
    }

    #[test]
    fn test_role_first_match_wins() {
        let vacancy = VacancyData {
            title: "QA-инженер".to_string(),
            description: "Тестирование веб-приложений".to_string(),
            key_skills: vec![],
        };
        let profile = classify(&resume_with_months(24), &vacancy);
        // "инженер" also matches Developer, but QA is checked first.
        assert_eq!(profile.detected_role, RoleCategory::Qa);
    }

    #[test]
    fn test_role_defaults_to_other() {
        let vacancy = VacancyData {
            title: "Специалист".to_string(),
            description: "Работа с документами".to_string(),
            key_skills: vec![],
        };
        let resume = ResumeData {
            title: "Специалист".to_string(),
            total_experience_months: Some(24),
            positions: vec![],
            skills: vec![],
        };
        assert_eq!(classify(&resume, &vacancy).detected_role, RoleCategory::Other);
    }

    #[test]
    fn test_management_detected_from_position_title() {
        let resume = ResumeData {
            title: "Разработчик".to_string(),
            total_experience_months: Some(84),
            positions: vec![PositionEntry {
                title: "Тимлид команды бэкенда".to_string(),
                description: "Руководил командой из 5 человек".to_string(),
            }],
            skills: vec![],
        };
        let profile = classify(&resume, &VacancyData::default());
        assert!(profile.management_experience);
    }

    #[test]
    fn test_technologies_collected_from_skills_and_descriptions() {
        let resume = ResumeData {
            title: "Developer".to_string(),
            total_experience_months: Some(48),
            positions: vec![PositionEntry {
                title: "Backend developer".to_string(),
                description: "Сервисы на Python и PostgreSQL, деплой в Docker".to_string(),
            }],
            skills: vec!["Kafka".to_string(), "Git".to_string()],
        };
        let profile = classify(&resume, &VacancyData::default());
        for tech in ["python", "postgresql", "docker", "kafka", "git"] {
            assert!(profile.key_technologies.contains(tech), "missing {tech}");
        }
    }

    #[test]
    fn test_classifier_is_total_on_empty_input() {
        let profile = classify(&ResumeData::default(), &VacancyData::default());
        assert_eq!(profile.detected_level, SeniorityLevel::Unknown);
        assert_eq!(profile.detected_role, RoleCategory::Other);
        assert!(!profile.management_experience);
        assert!(profile.key_technologies.is_empty());
        assert!(profile.years_of_experience.is_none());
    }
}

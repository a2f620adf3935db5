//! Rule-based red-flag detector. Scans the lower-cased concatenation of all
//! candidate answers against four fixed pattern categories, plus a structural
//! check for consistently short answers. No generation calls.

use std::sync::LazyLock;

use regex::Regex;

/// A category is flagged at most once even if several patterns match.
struct FlagCategory {
    label: &'static str,
    patterns: &'static [&'static str],
}

const CATEGORIES: &[FlagCategory] = &[
    FlagCategory {
        label: "Негатив о прошлых работодателях",
        patterns: &[
            r"ужасн\w* начальник",
            r"плох\w* (компани|руководств|начальств)",
            r"ненави\w* (работ|компан|начальств)",
            r"токсичн",
            r"кошмарн\w* (работ|компан)",
        ],
    },
    FlagCategory {
        label: "Отсутствие конкретики в ответах",
        patterns: &[
            r"не помню подробност",
            r"затрудняюсь ответить",
            r"сложно сказать",
            r"не могу привести пример",
        ],
    },
    FlagCategory {
        label: "Завышенные зарплатные ожидания",
        patterns: &[
            r"только (из-за|ради) денег",
            r"не меньше \d{3}",
            r"минимум \d+ ?(тысяч|т\.|k)",
            r"зарплата[^.]*главное",
        ],
    },
    FlagCategory {
        label: "Нежелание развиваться",
        patterns: &[
            r"не хочу учиться",
            r"не вижу смысла (учиться|развиваться)",
            r"хватит того, что (я )?(умею|знаю)",
            r"зачем мне (это )?изучать",
        ],
    },
];

/// Answers shorter than this (in chars) count as "too short".
const SHORT_ANSWER_CHARS: usize = 50;
/// How many short answers trip the structural flag.
const SHORT_ANSWER_LIMIT: usize = 3;

pub const SHORT_ANSWERS_FLAG: &str = "Слишком краткие ответы на большинство вопросов";

static COMPILED: LazyLock<Vec<(&'static str, Vec<Regex>)>> = LazyLock::new(|| {
    CATEGORIES
        .iter()
        .map(|c| {
            let regexes = c
                .patterns
                .iter()
                .map(|p| Regex::new(p).expect("invalid red-flag pattern"))
                .collect();
            (c.label, regexes)
        })
        .collect()
});

/// Scans candidate answers and returns the detected red flags in fixed
/// category order.
pub fn detect_red_flags(candidate_answers: &[&str]) -> Vec<String> {
    let haystack = candidate_answers.join(" ").to_lowercase();

    let mut flags: Vec<String> = COMPILED
        .iter()
        .filter(|(_, regexes)| regexes.iter().any(|re| re.is_match(&haystack)))
        .map(|(label, _)| label.to_string())
        .collect();

    let short_count = candidate_answers
        .iter()
        .filter(|a| a.chars().count() < SHORT_ANSWER_CHARS)
        .count();
    if short_count >= SHORT_ANSWER_LIMIT {
        flags.push(SHORT_ANSWERS_FLAG.to_string());
    }

    flags
}

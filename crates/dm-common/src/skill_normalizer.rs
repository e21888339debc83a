use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use strsim::damerau_levenshtein;
use unicode_normalization::UnicodeNormalization;

/// Leading phrases stripped before alias substitution.
const PREFIX_PHRASES: &[&[&str]] = &[
    &["knowledge", "of"],
    &["experience", "with"],
    &["proficiency", "in"],
    &["skills", "in"],
    &["understanding", "of"],
];

/// Trailing filler tokens stripped before alias substitution.
const SUFFIX_TOKENS: &[&str] = &[
    "basics",
    "fundamentals",
    "framework",
    "library",
    "development",
    "programming",
    "language",
];

/// Ordered alias table: token pattern → canonical form. First match wins;
/// multi-token patterns are listed before shorter patterns sharing a head.
///
/// NOTE: normalization output is the matching key — any edit here changes
/// which skills compare equal, so keep the table in sync with its tests.
const ALIASES: &[(&[&str], &str)] = &[
    (&["js"], "javascript"),
    (&["ecmascript"], "javascript"),
    (&["ts"], "typescript"),
    (&["py"], "python"),
    (&["nodejs"], "node.js"),
    (&["node", "js"], "node.js"),
    (&["reactjs"], "react"),
    (&["react", "js"], "react"),
    (&["angularjs"], "angular"),
    (&["angular", "js"], "angular"),
    (&["vuejs"], "vue"),
    (&["vue", "js"], "vue"),
    (&["c", "++"], "c++"),
    (&["c", "#"], "c#"),
    (&["aws", "services"], "aws"),
    (&["cloud", "technologies"], "cloud computing"),
    (&["rest", "api"], "rest"),
    (&["sql", "database"], "sql"),
    (&["nosql", "databases"], "nosql"),
    (&["nosql", "database"], "nosql"),
    (&["ml"], "machine learning"),
    (&["ai"], "artificial intelligence"),
    (&["nlp"], "natural language processing"),
    (&["db"], "database"),
    (&["rdbms"], "relational database"),
    (&["gcp"], "google cloud platform"),
    (&["oop"], "object-oriented programming"),
    (&["fp"], "functional programming"),
    (&["ui/ux"], "ui/ux design"),
    (&["ui"], "user interface"),
    (&["ux"], "user experience"),
];

const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "a", "an", "in", "on", "with", "using", "for", "to",
];

static STOP_WORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

fn nfkc_lower(input: &str) -> String {
    input.nfkc().collect::<String>().trim().to_lowercase()
}

/// Trim a possessive marker so "ecmascript's" keys the same as "ecmascript".
fn clean_token(token: &str) -> &str {
    token.strip_suffix("'s").unwrap_or(token)
}

fn strip_prefix_phrase(tokens: &mut Vec<String>) {
    for phrase in PREFIX_PHRASES {
        if tokens.len() > phrase.len()
            && tokens
                .iter()
                .zip(phrase.iter())
                .all(|(token, expected)| token == expected)
        {
            tokens.drain(..phrase.len());
            return;
        }
    }
}

fn strip_suffix_token(tokens: &mut Vec<String>) {
    if tokens.len() < 2 {
        return;
    }
    if let Some(last) = tokens.last() {
        if SUFFIX_TOKENS.contains(&last.as_str()) {
            tokens.pop();
        }
    }
}

fn apply_aliases(tokens: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let mut replaced = false;
        for (pattern, canonical) in ALIASES {
            if tokens.len() - i >= pattern.len()
                && tokens[i..i + pattern.len()]
                    .iter()
                    .zip(pattern.iter())
                    .all(|(token, expected)| token == expected)
            {
                out.extend(canonical.split_whitespace().map(|t| t.to_string()));
                i += pattern.len();
                replaced = true;
                break;
            }
        }
        if !replaced {
            out.push(tokens[i].clone());
            i += 1;
        }
    }

    out
}

/// Canonicalize a free-text skill name so that differently-phrased skills
/// compare equal. Applied in fixed order: lower-case (NFKC fold), prefix
/// phrase strip, suffix token strip, alias substitution, stop-word removal,
/// whitespace collapse. Pure and idempotent; the output is the matching key.
pub fn normalize_skill(skill: &str) -> String {
    let lowered = nfkc_lower(skill);
    if lowered.is_empty() {
        return String::new();
    }

    let mut tokens: Vec<String> = lowered
        .split_whitespace()
        .map(|t| clean_token(t).to_string())
        .filter(|t| !t.is_empty())
        .collect();

    strip_prefix_phrase(&mut tokens);
    strip_suffix_token(&mut tokens);

    let tokens = apply_aliases(&tokens);

    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if STOP_WORD_SET.contains(token.as_str()) {
            continue;
        }
        // Adjacent duplicates collapse ("javascript javascript" after alias
        // substitution must key as "javascript").
        if out.last().map(|prev| prev == &token).unwrap_or(false) {
            continue;
        }
        out.push(token);
    }

    out.join(" ")
}

/// Normalize a skill list into a set (membership tests, coarse overlap).
pub fn normalize_skill_set(skills: &[String]) -> HashSet<String> {
    skills
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| normalize_skill(s))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Normalize a skill list into a sorted, deduplicated Vec (storage keys).
pub fn normalize_skills_vec(skills: &[String]) -> Vec<String> {
    let mut result: Vec<String> = skills
        .iter()
        .map(|s| normalize_skill(s))
        .filter(|s| !s.is_empty())
        .collect();
    result.sort();
    result.dedup();
    result
}

/// Compact key: NFKC-folded, lowercased, with separator characters removed.
/// Lets "React.js", "react js" and "reactjs" share one lookup key.
fn compact_key(input: &str) -> String {
    input
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-' | '_' | '/' | ','))
        .collect()
}

/// Compact alias/canonical keys for the fuzzy lookup used on mined text.
static COMPACT_TO_CANONICAL: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for (pattern, canonical) in ALIASES {
        map.entry(compact_key(canonical)).or_insert(*canonical);
        map.entry(compact_key(&pattern.join(" "))).or_insert(*canonical);
    }
    map
});

/// Typo-tolerant canonical lookup for skills mined out of free text.
///
/// Not part of the `normalize_skill` contract: exact normalization stays
/// byte-deterministic, while mined text ("javascirpt, typescritp") gets one
/// Damerau-Levenshtein edit of slack (two for length >= 8). Tokens shorter
/// than five characters are never fuzzed to avoid false positives on brief
/// inputs.
pub fn fuzzy_canonical(skill: &str) -> Option<String> {
    let compact = compact_key(skill);
    if let Some(canonical) = COMPACT_TO_CANONICAL.get(&compact) {
        return Some((*canonical).to_string());
    }

    if compact.len() < 5 {
        return None;
    }

    // Ties broken by canonical name so the result does not depend on map
    // iteration order.
    let mut best: Option<(usize, &str)> = None;
    for (alias, canonical) in COMPACT_TO_CANONICAL.iter() {
        if alias.len() < 5 || canonical.len() < 5 {
            continue;
        }

        let distance = damerau_levenshtein(&compact, alias);
        let len = compact.len().max(alias.len());
        let acceptable = distance == 1 || (len >= 8 && distance == 2);
        if !acceptable {
            continue;
        }

        if best.map_or(true, |b| (distance, *canonical) < b) {
            best = Some((distance, canonical));
        }
    }

    best.map(|(_, canonical)| canonical.to_string())
}

/// Dedup key for extracted skills: prefer the fuzzy canonical form so a
/// typo'd technology does not survive next to its canonical spelling.
pub fn dedup_key(skill: &str) -> String {
    fuzzy_canonical(skill).unwrap_or_else(|| normalize_skill(skill))
}

//! Regex-based extraction of task lists and problem statements.
//!
//! The statement page layout has changed over the years, so nothing here
//! relies on absolute positions: statement sections are found by scanning
//! every `<div class="part"><section>` block and classifying it by heading.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::error::{Fragment, ParseError, excerpt};
use super::models::{Problem, ProblemInfo, SampleTest};

struct Patterns {
    part: Regex,
    heading: Regex,
    pre: Regex,
    sample_input: Regex,
    sample_output: Regex,
    tbody: Regex,
    row: Regex,
    cell: Regex,
    href: Regex,
    tag: Regex,
    entity: Regex,
}

impl Patterns {
    fn new() -> Self {
        Self {
            part: Regex::new(r#"(?s)<div class="part">\s*<section>(.*?)</section>"#)
                .expect("part pattern"),
            heading: Regex::new(r"(?s)<h3[^>]*>(.*?)</h3>").expect("heading pattern"),
            pre: Regex::new(r"(?s)<pre[^>]*>(.*?)</pre>").expect("pre pattern"),
            sample_input: Regex::new(r"^(?:入力例|Sample Input)\s*(\d+)").expect("sample pattern"),
            sample_output: Regex::new(r"^(?:出力例|Sample Output)\s*(\d+)")
                .expect("sample pattern"),
            tbody: Regex::new(r"(?s)<tbody[^>]*>(.*?)</tbody>").expect("tbody pattern"),
            row: Regex::new(r"(?s)<tr[^>]*>(.*?)</tr>").expect("row pattern"),
            cell: Regex::new(r"(?s)<td[^>]*>(.*?)</td>").expect("cell pattern"),
            href: Regex::new(r#"href="([^"]+)""#).expect("href pattern"),
            tag: Regex::new(r"(?s)<[^>]*>").expect("tag pattern"),
            entity: Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("entity pattern"),
        }
    }
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(Patterns::new);

const STATEMENT_MARKER: &str = r#"id="task-statement""#;
const JA_MARKER: &str = r#"<span class="lang-ja">"#;
const EN_MARKER: &str = r#"<span class="lang-en">"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Required(Fragment),
    SampleInput(usize),
    SampleOutput(usize),
}

fn classify(heading: &str) -> Option<Section> {
    let p = &*PATTERNS;
    if let Some(index) = sample_index(&p.sample_input, heading) {
        return Some(Section::SampleInput(index));
    }
    if let Some(index) = sample_index(&p.sample_output, heading) {
        return Some(Section::SampleOutput(index));
    }
    match heading {
        "問題文" | "問題" | "Problem Statement" | "Statement" => {
            Some(Section::Required(Fragment::Statement))
        }
        "制約" | "Constraints" => Some(Section::Required(Fragment::Constraints)),
        "入力" | "Input" => Some(Section::Required(Fragment::InputFormat)),
        "出力" | "Output" => Some(Section::Required(Fragment::OutputFormat)),
        _ => None,
    }
}

fn sample_index(pattern: &Regex, heading: &str) -> Option<usize> {
    pattern
        .captures(heading)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Narrow the page to the statement, preferring the Japanese block when the
/// page carries both languages.
fn statement_region(html: &str) -> Result<&str, ParseError> {
    let start = html
        .find(STATEMENT_MARKER)
        .ok_or(ParseError::StatementNotFound)?;
    let region = &html[start..];

    let Some(ja) = region.find(JA_MARKER) else {
        return Ok(region);
    };
    let ja_region = &region[ja..];
    match ja_region.find(EN_MARKER) {
        Some(end) => Ok(&ja_region[..end]),
        None => Ok(ja_region),
    }
}

/// Parse a problem statement page
pub fn parse_problem_info(html: &str) -> Result<ProblemInfo, ParseError> {
    let p = &*PATTERNS;
    let region = statement_region(html)?;

    let mut fragments: BTreeMap<&'static str, String> = BTreeMap::new();
    let mut inputs: BTreeMap<usize, String> = BTreeMap::new();
    let mut outputs: BTreeMap<usize, String> = BTreeMap::new();

    for part in p.part.captures_iter(region) {
        let body = part.get(1).map_or("", |m| m.as_str());
        let Some(heading) = p.heading.captures(body).and_then(|c| c.get(1)) else {
            continue;
        };
        let heading = text_content(heading.as_str());

        match classify(heading.trim()) {
            Some(Section::Required(fragment)) => {
                fragments
                    .entry(fragment_key(fragment))
                    .or_insert_with(|| body.trim().to_string());
            }
            Some(Section::SampleInput(index)) => {
                if let Some(text) = pre_text(body) {
                    inputs.entry(index).or_insert(text);
                }
            }
            Some(Section::SampleOutput(index)) => {
                if let Some(text) = pre_text(body) {
                    outputs.entry(index).or_insert(text);
                }
            }
            None => {}
        }
    }

    let mut take = |fragment: Fragment| {
        fragments
            .remove(fragment_key(fragment))
            .ok_or(ParseError::MissingFragment(fragment))
    };
    let problem = take(Fragment::Statement)?;
    let constraints = take(Fragment::Constraints)?;
    let input = take(Fragment::InputFormat)?;
    let output = take(Fragment::OutputFormat)?;

    let mut tests = Vec::new();
    for index in 1.. {
        match (inputs.remove(&index), outputs.remove(&index)) {
            (Some(input), Some(output)) => tests.push(SampleTest { input, output }),
            _ => break,
        }
    }

    Ok(ProblemInfo {
        problem,
        constraints,
        input,
        output,
        tests,
    })
}

fn fragment_key(fragment: Fragment) -> &'static str {
    match fragment {
        Fragment::Statement => "statement",
        Fragment::Constraints => "constraints",
        Fragment::InputFormat => "input",
        Fragment::OutputFormat => "output",
    }
}

fn pre_text(section: &str) -> Option<String> {
    PATTERNS
        .pre
        .captures(section)
        .and_then(|c| c.get(1))
        .map(|m| text_content(m.as_str()).replace("\r\n", "\n"))
}

/// Parse a contest's task list page. `base_url` resolves relative links.
pub fn parse_task_list(html: &str, base_url: &str) -> Result<Vec<Problem>, ParseError> {
    let p = &*PATTERNS;
    let tbody = p
        .tbody
        .captures(html)
        .and_then(|c| c.get(1))
        .ok_or(ParseError::TaskTableNotFound)?
        .as_str();

    p.row
        .captures_iter(tbody)
        .map(|row| parse_task_row(row.get(1).map_or("", |m| m.as_str()), base_url))
        .collect()
}

fn parse_task_row(row: &str, base_url: &str) -> Result<Problem, ParseError> {
    let p = &*PATTERNS;
    let cells: Vec<&str> = p
        .cell
        .captures_iter(row)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    let malformed = || ParseError::MalformedTaskRow(excerpt(row));

    let href = cells
        .first()
        .and_then(|cell| p.href.captures(cell))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(malformed)?;
    let id = href
        .rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit('_').next())
        .filter(|id| !id.is_empty())
        .ok_or_else(malformed)?;

    let text_at = |index: usize| {
        cells
            .get(index)
            .map(|cell| text_content(cell).trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(malformed)
    };

    Ok(Problem {
        id: id.to_string(),
        title: text_at(1)?,
        url: absolute_url(base_url, href),
        run_time_limitation: text_at(2)?,
        memory_limitation: text_at(3)?,
    })
}

fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{}{}", base, href)
    } else {
        format!("{}/{}", base, href)
    }
}

/// Strip tags and decode entities
fn text_content(html: &str) -> String {
    let stripped = PATTERNS.tag.replace_all(html, "");
    decode_entities(&stripped)
}

fn decode_entities(text: &str) -> String {
    PATTERNS
        .entity
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let decoded = match name {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => name
                    .strip_prefix("#x")
                    .or_else(|| name.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

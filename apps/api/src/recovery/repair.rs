//! Structural repair of truncated or noisy JSON.
//!
//! The scanner walks the text once, tracking container nesting and string state,
//! and remembers the last "safe point": a prefix that becomes valid JSON once the
//! containers open at that point are closed. Candidates are tried from most to least
//! complete and each is checked with `serde_json` before it is returned.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Expect {
    Key,
    Colon,
    Value,
    CommaOrClose,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    container: Container,
    expect: Expect,
}

fn closers(stack: &[Frame]) -> String {
    stack
        .iter()
        .rev()
        .map(|f| match f.container {
            Container::Object => '}',
            Container::Array => ']',
        })
        .collect()
}

#[derive(Default)]
struct Scan {
    stack: Vec<Frame>,
    in_string: bool,
    string_is_key: bool,
    escape_pending: bool,
    unicode_left: u8,
    escape_start: usize,
    scalar_start: Option<usize>,
    /// End offset and closing sequence of the last safe prefix.
    safe: Option<(usize, String)>,
    /// End offset of the top-level value once it has closed.
    complete_at: Option<usize>,
}

impl Scan {
    /// Marks the value that ends at `end` as complete.
    fn value_done(&mut self, end: usize) {
        match self.stack.last_mut() {
            Some(frame) => {
                frame.expect = Expect::CommaOrClose;
                self.safe = Some((end, closers(&self.stack)));
            }
            None => self.complete_at = Some(end),
        }
    }

    fn run(text: &str) -> Scan {
        let mut scan = Scan::default();

        for (i, c) in text.char_indices() {
            if scan.complete_at.is_some() {
                break;
            }

            if scan.in_string {
                if scan.unicode_left > 0 {
                    scan.unicode_left -= 1;
                } else if scan.escape_pending {
                    scan.escape_pending = false;
                    if c == 'u' {
                        scan.unicode_left = 4;
                    }
                } else if c == '\\' {
                    scan.escape_pending = true;
                    scan.escape_start = i;
                } else if c == '"' {
                    scan.in_string = false;
                    if scan.string_is_key {
                        if let Some(frame) = scan.stack.last_mut() {
                            frame.expect = Expect::Colon;
                        }
                    } else {
                        scan.value_done(i + 1);
                    }
                }
                continue;
            }

            if scan.scalar_start.is_some() {
                if c.is_whitespace() || matches!(c, ',' | '}' | ']' | ':') {
                    scan.scalar_start = None;
                    scan.value_done(i);
                    if scan.complete_at.is_some() {
                        break;
                    }
                } else {
                    continue;
                }
            }

            match c {
                c if c.is_whitespace() => {}
                '{' | '[' => {
                    // An empty object inside an array is worse than dropping it.
                    let in_array = matches!(
                        scan.stack.last(),
                        Some(Frame {
                            container: Container::Array,
                            ..
                        })
                    );
                    let frame = if c == '{' {
                        Frame {
                            container: Container::Object,
                            expect: Expect::Key,
                        }
                    } else {
                        Frame {
                            container: Container::Array,
                            expect: Expect::Value,
                        }
                    };
                    scan.stack.push(frame);
                    if !(c == '{' && in_array) {
                        scan.safe = Some((i + 1, closers(&scan.stack)));
                    }
                }
                '}' | ']' => {
                    if scan.stack.pop().is_none() {
                        break;
                    }
                    scan.value_done(i + 1);
                }
                ':' => {
                    if let Some(frame) = scan.stack.last_mut() {
                        frame.expect = Expect::Value;
                    }
                }
                ',' => {
                    if let Some(frame) = scan.stack.last_mut() {
                        frame.expect = match frame.container {
                            Container::Object => Expect::Key,
                            Container::Array => Expect::Value,
                        };
                    }
                }
                '"' => {
                    scan.in_string = true;
                    scan.string_is_key = matches!(
                        scan.stack.last(),
                        Some(Frame {
                            container: Container::Object,
                            expect: Expect::Key,
                        })
                    );
                }
                _ => scan.scalar_start = Some(i),
            }
        }

        scan
    }
}

fn parses(candidate: &str) -> bool {
    serde_json::from_str::<Value>(candidate).is_ok()
}

/// Closes unbalanced strings, arrays and objects so a truncated payload parses.
///
/// Leading prose before the first `{`/`[` and trailing text after the top-level
/// value are dropped. Returns `None` when the text holds no container at all.
pub fn repair_truncated_json(text: &str) -> Option<String> {
    let start = text.find(['{', '['])?;
    let body = &text[start..];
    let scan = Scan::run(body);

    let mut candidates: Vec<String> = Vec::new();

    if let Some(end) = scan.complete_at {
        candidates.push(body[..end].to_string());
    } else {
        if scan.in_string && !scan.string_is_key {
            // Keep the partial string value, minus any half-written escape.
            let cut = if scan.escape_pending || scan.unicode_left > 0 {
                scan.escape_start
            } else {
                body.len()
            };
            candidates.push(format!("{}\"{}", &body[..cut], closers(&scan.stack)));
        }
        if scan.scalar_start.is_some() {
            // A trailing number or literal may already be complete.
            candidates.push(format!("{}{}", body.trim_end(), closers(&scan.stack)));
        }
    }

    if let Some((end, closing)) = &scan.safe {
        candidates.push(format!("{}{}", &body[..*end], closing));
    }

    candidates.into_iter().find(|c| parses(c))
}

fn trailing_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",(\s*[}\]])").expect("static regex"))
}

/// Cheap fixes for near-valid JSON: trailing commas and typographic quotes.
pub fn sanitize_json(text: &str) -> String {
    let fixed = text.replace(['\u{201C}', '\u{201D}'], "\"");
    trailing_comma_re().replace_all(&fixed, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
  "careerPathId": "staff-frontend-engineer",
  "overallGapSeverity": "Very High",
  "estimatedTimeToClose": "6-9 months",
  "skillGaps": [
    {"skillName": "System \"design\"", "currentLevel": "Beginner", "requiredLevel": "Advanced", "importance": "Medium", "learningResources": ["DDIA", "café talks\n"]},
    {"skillName": "Mentoring", "currentLevel": "None", "requiredLevel": "Intermediate", "importance": "High"},
    {"skillName": "Rust é", "score": -12.5e1, "flags": [true, false, null]}
  ],
  "summary": "Solid base."
}"#;

    fn parse(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn test_every_truncation_point_repairs_to_valid_json() {
        let boundaries: Vec<usize> = SAMPLE
            .char_indices()
            .map(|(i, _)| i)
            .filter(|&i| i > 0)
            .collect();
        for cut in boundaries {
            let prefix = &SAMPLE[..cut];
            let repaired = repair_truncated_json(prefix)
                .unwrap_or_else(|| panic!("no repair for prefix ending at {cut}: {prefix:?}"));
            assert!(
                serde_json::from_str::<Value>(&repaired).is_ok(),
                "repair of prefix {cut} did not parse: {repaired}"
            );
        }
    }

    #[test]
    fn test_truncated_mid_array_keeps_complete_elements() {
        let cut = SAMPLE.find(r#"{"skillName": "Mentoring""#).unwrap() + 20;
        let repaired = parse(&repair_truncated_json(&SAMPLE[..cut]).unwrap());
        let gaps = repaired["skillGaps"].as_array().unwrap();
        assert_eq!(gaps[0]["skillName"], "System \"design\"");
        assert_eq!(repaired["overallGapSeverity"], "Very High");
    }

    #[test]
    fn test_truncated_string_value_is_closed() {
        let repaired = repair_truncated_json(r#"{"summary": "Strong found"#).unwrap();
        assert_eq!(parse(&repaired)["summary"], "Strong found");
    }

    #[test]
    fn test_dangling_escape_is_dropped() {
        let repaired = repair_truncated_json(r#"{"summary": "line\"#).unwrap();
        assert_eq!(parse(&repaired)["summary"], "line");
        let repaired = repair_truncated_json(r#"{"summary": "caf\u00"#).unwrap();
        assert_eq!(parse(&repaired)["summary"], "caf");
    }

    #[test]
    fn test_dangling_key_is_dropped() {
        let repaired = repair_truncated_json(r#"{"a": 1, "b": [2, 3], "c"#).unwrap();
        assert_eq!(parse(&repaired), serde_json::json!({"a": 1, "b": [2, 3]}));
        let repaired = repair_truncated_json(r#"{"a": 1, "b":"#).unwrap();
        assert_eq!(parse(&repaired), serde_json::json!({"a": 1}));
    }

    #[test]
    fn test_trailing_number_is_kept_when_complete() {
        let repaired = repair_truncated_json(r#"{"timelineMonths": 12"#).unwrap();
        assert_eq!(parse(&repaired)["timelineMonths"], 12);
        let repaired = repair_truncated_json(r#"{"ok": tr"#).unwrap();
        assert_eq!(parse(&repaired), serde_json::json!({}));
    }

    #[test]
    fn test_leading_prose_and_trailing_text_dropped() {
        let text = "Here is your roadmap:\n{\"phases\": []}\nLet me know if you need more!";
        assert_eq!(repair_truncated_json(text).unwrap(), "{\"phases\": []}");
    }

    #[test]
    fn test_top_level_array() {
        let repaired = repair_truncated_json(r#"[{"id": "a"}, {"id": "#).unwrap();
        assert_eq!(parse(&repaired), serde_json::json!([{"id": "a"}]));
    }

    #[test]
    fn test_no_container_returns_none() {
        assert!(repair_truncated_json("I cannot help with that.").is_none());
    }

    #[test]
    fn test_sanitize_removes_trailing_commas_and_smart_quotes() {
        let fixed = sanitize_json("{\u{201C}a\u{201D}: [1, 2, ], \"b\": {\"c\": 1,\n}}");
        assert_eq!(parse(&fixed), serde_json::json!({"a": [1, 2], "b": {"c": 1}}));
    }
}

use std::sync::LazyLock;

use regex::Regex;

pub const NO_TIPS_FALLBACK: &str = "No tips available for this color.";

/// Tips shorter than this many characters are dropped.
const MIN_TIP_CHARS: usize = 11;

static SUBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"using (.*?) \((.*?)\)").expect("valid subject regex"));

static MARKDOWN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[*_`]").expect("valid markdown regex"));

static LIST_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d•\-*.\s]+").expect("valid list marker regex"));

static EDGE_PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\w\s]+|[^\w\s]+$").expect("valid punctuation regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipsSubject {
    pub name: String,
    pub code: String,
}

/// Pulls the color out of `... using {name} ({code})`. The first match wins.
pub fn parse_tips_subject(message: &str) -> Option<TipsSubject> {
    let captures = SUBJECT_RE.captures(message)?;
    Some(TipsSubject {
        name: captures.get(1)?.as_str().to_string(),
        code: captures.get(2)?.as_str().to_string(),
    })
}

pub fn tips_prompt(subject: &TipsSubject) -> String {
    format!(
        "Generate specific tips for using {} ({}) in interior design. For each tip, include:\n\
         1. A specific room or space where this color works well\n\
         2. Complementary colors that pair with this color\n\
         3. Practical application advice\n\
         4. Lighting considerations\n\
         5. Style recommendations\n\
         \n\
         Format each tip as a simple sentence without any special characters, bullet points, \
         or markdown formatting.",
        subject.name, subject.code
    )
}

/// Turns free-form model output into plain one-sentence tips.
///
/// Each line loses markdown emphasis, leading list markers and edge
/// punctuation, then has its whitespace collapsed. Lines left with fewer than
/// eleven characters are dropped. An empty result becomes the single
/// [`NO_TIPS_FALLBACK`] line.
pub fn clean_tips(raw: &str) -> Vec<String> {
    let tips: Vec<String> = raw.split('\n').filter_map(clean_tip_line).collect();
    if tips.is_empty() {
        return vec![NO_TIPS_FALLBACK.to_string()];
    }
    tips
}

fn clean_tip_line(line: &str) -> Option<String> {
    let stripped = MARKDOWN_RE.replace_all(line, "");
    let stripped = LIST_MARKER_RE.replace_all(&stripped, "");
    let stripped = EDGE_PUNCTUATION_RE.replace_all(&stripped, "");
    let collapsed = stripped.split_whitespace().collect::<Vec<&str>>().join(" ");
    if collapsed.chars().count() < MIN_TIP_CHARS {
        return None;
    }
    Some(collapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_is_parsed_from_tips_request() {
        assert_eq!(
            parse_tips_subject("Generate 3 specific tips for using Simply White (OC-117)"),
            Some(TipsSubject {
                name: "Simply White".to_string(),
                code: "OC-117".to_string(),
            })
        );
    }

    #[test]
    fn subject_requires_parenthesized_code() {
        assert_eq!(
            parse_tips_subject("Generate 3 specific tips for using Simply White"),
            None
        );
    }

    #[test]
    fn subject_stops_at_first_parenthesis() {
        let subject =
            parse_tips_subject("Generate 3 specific tips for using Hale Navy (HC-154) (extra)");
        assert_eq!(
            subject,
            Some(TipsSubject {
                name: "Hale Navy".to_string(),
                code: "HC-154".to_string(),
            })
        );
    }

    #[test]
    fn prompt_names_the_color() {
        let prompt = tips_prompt(&TipsSubject {
            name: "Hale Navy".to_string(),
            code: "HC-154".to_string(),
        });
        assert!(prompt.starts_with("Generate specific tips for using Hale Navy (HC-154)"));
        assert!(prompt.contains("5. Style recommendations"));
    }

    #[test]
    fn markdown_and_markers_are_stripped() {
        assert_eq!(
            clean_tips("1. **Use in bathrooms** for a bright look!!"),
            vec!["Use in bathrooms for a bright look"]
        );
    }

    #[test]
    fn bullets_dashes_and_spacing_are_normalised() {
        let raw = concat!(
            "• Pair   with warm _oak_ floors.\n",
            "- `Test` samples at noon and dusk\n\r\n",
            "   3)   Try it in a north-facing study",
        );
        assert_eq!(
            clean_tips(raw),
            vec![
                "Pair with warm oak floors",
                "Test samples at noon and dusk",
                "Try it in a north-facing study",
            ]
        );
    }

    #[test]
    fn short_lines_are_dropped() {
        // "Tenletters" is ten characters, one short of the minimum
        assert_eq!(
            clean_tips("Tenletters\nEleven char!\n"),
            vec!["Eleven char"]
        );
        assert_eq!(clean_tips("Use gloss!\nUse satin!!"), vec![NO_TIPS_FALLBACK]);
    }

    #[test]
    fn empty_output_falls_back() {
        assert_eq!(clean_tips(""), vec![NO_TIPS_FALLBACK]);
        assert_eq!(clean_tips("**\n1.\n---"), vec![NO_TIPS_FALLBACK]);
    }
}

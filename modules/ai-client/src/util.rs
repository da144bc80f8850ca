use std::sync::LazyLock;

use regex::Regex;

static RE_FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[A-Za-z]*[ \t]*\r?\n?(.*?)```").expect("valid regex"));

/// Strip markdown code fences from a model response.
///
/// The first fenced block wins, even when the model wrapped it in prose.
/// An unterminated fence is trimmed from the ends instead.
pub fn strip_code_blocks(response: &str) -> &str {
    if let Some(inner) = RE_FENCED_BLOCK
        .captures(response)
        .and_then(|caps| caps.get(1))
    {
        return inner.as_str().trim();
    }

    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_blocks() {
        assert_eq!(strip_code_blocks("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("```\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("{}"), "{}");
    }

    #[test]
    fn strips_fence_surrounded_by_prose() {
        let text = "Sure, here it is:\n```json\n{\"is_valid\": false}\n```\nLet me know!";
        assert_eq!(strip_code_blocks(text), "{\"is_valid\": false}");
    }

    #[test]
    fn unterminated_fence_is_trimmed() {
        assert_eq!(strip_code_blocks("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn single_line_fence() {
        assert_eq!(strip_code_blocks("```{\"a\": 1}```"), "{\"a\": 1}");
    }
}

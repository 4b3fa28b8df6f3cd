//! Whitespace handling for rendered Markdown.

/// Drop trailing spaces and tabs from the buffer.
pub(crate) fn trim_trailing_whitespace(output: &mut String) {
    while output.ends_with(' ') || output.ends_with('\t') {
        output.pop();
    }
}

/// Start a new line unless the buffer is empty or already at one.
pub(crate) fn ensure_line_start(output: &mut String) {
    trim_trailing_whitespace(output);
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
}

/// Leave exactly one blank line before the next block.
pub(crate) fn ensure_blank_line(output: &mut String) {
    trim_trailing_whitespace(output);
    if output.is_empty() || output.ends_with("\n\n") {
        return;
    }
    if output.ends_with('\n') {
        output.push('\n');
    } else {
        output.push_str("\n\n");
    }
}

fn at_line_start(output: &str) -> bool {
    output.is_empty() || output.ends_with('\n')
}

/// Append text where all whitespace runs count as a single space.
///
/// Used for headings, list item text and link labels. Whitespace is never
/// emitted at the start of a line or after another space.
pub(crate) fn push_inline_text(output: &mut String, text: &str) {
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !at_line_start(output) && !output.ends_with(' ') {
            output.push(' ');
        }
        pending_space = false;
        output.push(ch);
    }
    if pending_space && !at_line_start(output) && !output.ends_with(' ') {
        output.push(' ');
    }
}

/// Append running text, keeping its line structure.
///
/// A whitespace run holding one newline becomes a newline (a Markdown soft
/// break) and two or more become a paragraph break. Runs without a newline
/// collapse to one space. Runs at the start of a line are dropped, which
/// discards the indentation and blank lines of the source markup.
pub(crate) fn push_flow_text(output: &mut String, text: &str) {
    let mut run = String::new();
    for ch in text.chars() {
        if ch.is_whitespace() {
            run.push(ch);
            continue;
        }
        if !run.is_empty() {
            push_whitespace_run(output, &run);
            run.clear();
        }
        output.push(ch);
    }
    if !run.is_empty() {
        push_whitespace_run(output, &run);
    }
}

fn push_whitespace_run(output: &mut String, run: &str) {
    if at_line_start(output) {
        return;
    }
    match run.matches('\n').count() {
        0 => {
            if !output.ends_with(' ') {
                output.push(' ');
            }
        }
        1 => {
            trim_trailing_whitespace(output);
            output.push('\n');
        }
        _ => {
            trim_trailing_whitespace(output);
            output.push_str("\n\n");
        }
    }
}

/// Final cleanup of rendered Markdown.
///
/// Trailing whitespace is removed from every line, runs of blank lines
/// shrink to one, blank lines at either end disappear, and the result is
/// trimmed. Leading indentation is kept, since it carries list nesting.
pub(crate) fn postprocess(markdown: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = true;
    for line in markdown.lines() {
        let line = line.trim_end();
        let blank = line.is_empty();
        if blank && previous_blank {
            continue;
        }
        lines.push(line);
        previous_blank = blank;
    }
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_text_collapses_all_whitespace() {
        let mut out = String::new();
        push_inline_text(&mut out, "\n   Get\n  groceries.  ");
        assert_eq!(out, "Get groceries. ");
        push_inline_text(&mut out, "  now");
        assert_eq!(out, "Get groceries. now");
    }

    #[test]
    fn flow_text_keeps_soft_and_paragraph_breaks() {
        let mut out = String::new();
        push_flow_text(&mut out, "line one\n   line  two\n\n\n  para two");
        assert_eq!(out, "line one\nline two\n\npara two");
    }

    #[test]
    fn flow_text_collapses_spaces_and_tabs() {
        let mut out = String::new();
        push_flow_text(&mut out, "a     b\tc \t d");
        assert_eq!(out, "a b c d");
    }

    #[test]
    fn flow_text_drops_whitespace_at_line_start() {
        let mut out = String::from("# Heading\n\n");
        push_flow_text(&mut out, "\n        ");
        assert_eq!(out, "# Heading\n\n");
    }

    #[test]
    fn block_separators_do_not_stack() {
        let mut out = String::from("text  ");
        ensure_blank_line(&mut out);
        ensure_blank_line(&mut out);
        assert_eq!(out, "text\n\n");
        ensure_line_start(&mut out);
        assert_eq!(out, "text\n\n");

        let mut empty = String::new();
        ensure_blank_line(&mut empty);
        ensure_line_start(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn postprocess_collapses_blank_runs_and_keeps_indentation() {
        let raw = "\n\n# Title\n\n\n\nText   \n- a\n  - b\t\n\n\n\nEnd\n\n";
        assert_eq!(postprocess(raw), "# Title\n\nText\n- a\n  - b\n\nEnd");
    }

    #[test]
    fn postprocess_trims_the_result_but_not_inner_indentation() {
        assert_eq!(postprocess("  - nested\n"), "- nested");
        assert_eq!(postprocess("- top\n  - nested\n"), "- top\n  - nested");
    }
}

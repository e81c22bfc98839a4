//! Renders failures and log lines for humans.
//!
//! Everything goes through a `WriteColor`, so the same code paints stderr and
//! fills plain buffers in tests.

use std::io;

use difference::{Changeset, Difference};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::config::Config;
use crate::failure::Failure;

// ============================================================================
// DIFFS
// ============================================================================

/// Line diff between two rendered values. Only produced when at least one
/// side spans several lines; single-line values read fine side by side.
pub fn render_diff(left: &str, right: &str) -> Option<String> {
    if !left.contains('\n') && !right.contains('\n') {
        return None;
    }
    let changeset = Changeset::new(left, right, "\n");
    let mut out = String::new();
    for diff in &changeset.diffs {
        let (marker, text) = match diff {
            Difference::Same(x) => (' ', x),
            Difference::Rem(x) => ('-', x),
            Difference::Add(x) => ('+', x),
        };
        for line in text.split('\n') {
            out.push(marker);
            out.push_str(line);
            out.push('\n');
        }
    }
    Some(out)
}

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Writes one failure: a coloured header line followed by the message.
pub fn write_failure<W: WriteColor>(
    out: &mut W,
    test: &str,
    failure: &Failure,
    config: &Config,
) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(out, "FAIL")?;
    out.reset()?;
    writeln!(out, " {test} [{}]", failure.code_str())?;
    writeln!(out, "{failure}")?;

    if config.show_diff {
        if let Some(diff) = failure.diff() {
            write_diff(out, diff)?;
        }
    }
    Ok(())
}

/// Writes a log line attributed to a test.
pub fn write_log<W: WriteColor>(out: &mut W, test: &str, line: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
    write!(out, "{test}:")?;
    out.reset()?;
    writeln!(out, " {line}")
}

/// Buffer matching the configured colour choice.
pub fn buffer_for(config: &Config) -> Buffer {
    if config.use_colors {
        Buffer::ansi()
    } else {
        Buffer::no_color()
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn write_diff<W: WriteColor>(out: &mut W, diff: &str) -> io::Result<()> {
    for line in diff.lines() {
        match line.chars().next() {
            Some('+') => out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?,
            Some('-') => out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?,
            _ => out.reset()?,
        }
        writeln!(out, "{line}")?;
    }
    out.reset()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_values_have_no_diff() {
        assert!(render_diff("1", "2").is_none());
    }

    #[test]
    fn test_diff_marks_changed_lines() {
        let diff = render_diff("a\nb\nc", "a\nx\nc").unwrap();
        assert!(diff.contains("-b\n"));
        assert!(diff.contains("+x\n"));
        assert!(diff.contains(" a\n"));
    }

    #[test]
    fn test_plain_failure_output() {
        let mut buf = Buffer::no_color();
        let failure = Failure::Condition {
            description: "1+2=4".to_string(),
        };
        write_failure(&mut buf, "math", &failure, &Config::plain()).unwrap();
        let text = String::from_utf8(buf.into_inner()).unwrap();
        assert_eq!(text, "FAIL math [testutil::ok]\n(assertion) 1+2=4\n");
    }
}

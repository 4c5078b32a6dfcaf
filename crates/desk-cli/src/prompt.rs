//! Line prompts on stdin for values not given as flags.

use std::io::{self, BufRead, Write};

use anyhow::Context;

/// Return `given`, or ask for it on stdin.
pub fn value_or_prompt(given: Option<&str>, label: &str) -> anyhow::Result<String> {
    if let Some(value) = given {
        return Ok(value.to_string());
    }
    let stdin = io::stdin();
    ask(&mut stdin.lock(), &mut io::stderr(), label)
}

/// Ask a yes/no question. Anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    let stdin = io::stdin();
    let answer = ask(&mut stdin.lock(), &mut io::stderr(), &format!("{question} [y/N]"))?;
    Ok(is_yes(&answer))
}

fn ask(
    input: &mut impl BufRead,
    prompt_out: &mut impl Write,
    label: &str,
) -> anyhow::Result<String> {
    write!(prompt_out, "{label}: ").context("failed to write prompt")?;
    prompt_out.flush().context("failed to flush prompt")?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read from stdin")?;
    if read == 0 {
        anyhow::bail!("no input for '{label}' (stdin closed)");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_strips_line_ending() {
        let mut input = io::Cursor::new(b"hunter2\r\n".to_vec());
        let mut out = Vec::new();
        let value = ask(&mut input, &mut out, "Password").unwrap();
        assert_eq!(value, "hunter2");
        assert_eq!(out, b"Password: ");
    }

    #[test]
    fn closed_stdin_is_an_error() {
        let mut input = io::Cursor::new(Vec::new());
        assert!(ask(&mut input, &mut Vec::new(), "Password").is_err());
    }

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("sure"));
    }
}

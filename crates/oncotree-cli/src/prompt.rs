//! Interactive confirmation of a change report

use oncotree_core::errors::{ReconcileError, Result};
use oncotree_core::report::{render_human_summary, ChangeReport};
use oncotree_core::ChangeConfirmer;
use std::cell::RefCell;
use std::io::{BufRead, Write};

const QUESTION: &str = "\nPlease confirm that all of the above changes are intentional.\n\
                        Enter [y]es if the changes were intentional, [n]o if not: ";

fn confirmation_error(e: std::io::Error) -> ReconcileError {
    ReconcileError::Confirmation {
        reason: e.to_string(),
    }
}

/// Whether an answer means yes; anything else is a no
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Prints the report and reads one answer line
pub struct TerminalConfirmer<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl<R: BufRead, W: Write> TerminalConfirmer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }
}

impl TerminalConfirmer<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> ChangeConfirmer for TerminalConfirmer<R, W> {
    fn confirm(&self, report: &ChangeReport) -> Result<bool> {
        let mut output = self.output.borrow_mut();
        write!(output, "{}{}", render_human_summary(report), QUESTION)
            .and_then(|_| output.flush())
            .map_err(confirmation_error)?;

        let mut answer = String::new();
        let read = self
            .input
            .borrow_mut()
            .read_line(&mut answer)
            .map_err(confirmation_error)?;
        if read == 0 {
            return Err(ReconcileError::Confirmation {
                reason: "no answer was given".to_string(),
            });
        }
        let accepted = is_yes(&answer);
        tracing::info!(accepted, "Curator answered confirmation prompt");
        Ok(accepted)
    }
}

/// Prints the report and accepts it, for `--yes`
pub struct AutoConfirmer<W> {
    output: RefCell<W>,
}

impl<W: Write> AutoConfirmer<W> {
    pub fn new(output: W) -> Self {
        Self {
            output: RefCell::new(output),
        }
    }
}

impl AutoConfirmer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ChangeConfirmer for AutoConfirmer<W> {
    fn confirm(&self, report: &ChangeReport) -> Result<bool> {
        let mut output = self.output.borrow_mut();
        write!(output, "{}", render_human_summary(report))
            .and_then(|_| output.flush())
            .map_err(confirmation_error)?;
        tracing::info!("Changes accepted without prompting");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oncotree_core::report::model::ReportIdentity;

    fn report() -> ChangeReport {
        ChangeReport {
            report_schema_version: 1,
            identity: ReportIdentity {
                original_path: "original.csv".to_string(),
                original_digest: String::new(),
                modified_path: "modified.csv".to_string(),
                modified_digest: String::new(),
            },
            excluded: Vec::new(),
            removed: Vec::new(),
            added: Vec::new(),
            identity_candidates: Vec::new(),
            precursors: Vec::new(),
            revocations: Vec::new(),
            code_changes: Vec::new(),
            parent_changes: Vec::new(),
        }
    }

    #[test]
    fn test_yes_answers_are_case_insensitive() {
        assert!(is_yes("Y\n"));
        assert!(is_yes("  yes "));
        assert!(is_yes("YES"));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
        assert!(!is_yes(""));
    }

    #[test]
    fn test_terminal_prints_report_then_question() {
        let mut out = Vec::new();
        {
            let confirmer = TerminalConfirmer::new("y\n".as_bytes(), &mut out);
            assert!(confirmer.confirm(&report()).unwrap());
        }
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("## OncoTree Change Report"));
        assert!(text.ends_with("[n]o if not: "));
    }

    #[test]
    fn test_terminal_declines_on_other_answer() {
        let confirmer = TerminalConfirmer::new("maybe\n".as_bytes(), Vec::new());
        assert!(!confirmer.confirm(&report()).unwrap());
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let confirmer = TerminalConfirmer::new("".as_bytes(), Vec::new());
        assert!(matches!(
            confirmer.confirm(&report()),
            Err(ReconcileError::Confirmation { .. })
        ));
    }

    #[test]
    fn test_auto_confirmer_accepts() {
        let confirmer = AutoConfirmer::new(Vec::new());
        assert!(confirmer.confirm(&report()).unwrap());
    }
}

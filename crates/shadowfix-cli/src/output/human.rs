//! Human-readable listings.

use std::io::{self, Write};

use shadowfix_harness::{RewritePatch, WriteOutcome};
use shadowfix_rules::{ExpectationMode, VerificationReport};

use super::models::{FileError, FileFix, FixReport, RunReport, ScanReport, ViolationRecord};

pub(super) fn scan<W: Write>(report: &ScanReport, out: &mut W) -> io::Result<()> {
    for file in &report.files {
        writeln!(out, "{}", file.path.display())?;
        for violation in &file.violations {
            write_violation(violation, out)?;
        }
    }
    write_problems(&report.missing, &report.errors, out)?;

    let total = report.total_violations();
    if total == 0 {
        writeln!(
            out,
            "no shadow violations found ({} scanned)",
            plural(report.files_scanned, "file")
        )
    } else {
        writeln!(
            out,
            "{} in {} ({} scanned)",
            plural(total, "violation"),
            plural(report.files.len(), "file"),
            plural(report.files_scanned, "file")
        )
    }
}

pub(super) fn fix<W: Write>(report: &FixReport, out: &mut W) -> io::Result<()> {
    for file in &report.files {
        write_file_fix(file, out)?;
    }
    write_problems(&report.missing, &report.errors, out)?;

    let planned: usize = report.files.iter().map(|file| file.patches.len()).sum();
    if report.dry_run {
        writeln!(
            out,
            "dry run: {} planned across {} ({} scanned)",
            plural(planned, "patch"),
            plural(report.files.len(), "file"),
            plural(report.files_scanned, "file")
        )
    } else {
        writeln!(
            out,
            "{} written, {} remaining ({} scanned)",
            plural(report.files_written(), "file"),
            plural(report.residual_violations(), "violation"),
            plural(report.files_scanned, "file")
        )
    }
}

fn write_file_fix<W: Write>(file: &FileFix, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", file.path.display())?;
    for violation in &file.violations {
        write_violation(violation, out)?;
    }
    for patch in &file.patches {
        write_patch(patch, out)?;
    }
    for note in &file.notes {
        writeln!(out, "  note: {note}")?;
    }
    match &file.outcome {
        Some(WriteOutcome::Written { backup, .. }) => {
            writeln!(out, "  backup: {}", backup.display())?;
        }
        Some(WriteOutcome::Unchanged) => writeln!(out, "  unchanged")?,
        None => {}
    }
    if let Some(verification) = &file.verification {
        if verification.is_clean() {
            writeln!(out, "  verified: clean")?;
        } else {
            writeln!(
                out,
                "  verified: {} remaining",
                plural(verification.violations().len(), "violation")
            )?;
        }
    }
    Ok(())
}

fn write_patch<W: Write>(patch: &RewritePatch, out: &mut W) -> io::Result<()> {
    if let Some(inserted) = patch.inserted_lines() {
        writeln!(out, "  insert after line {}:", patch.display_line())?;
        for line in inserted.lines() {
            writeln!(out, "    + {line}")?;
        }
        return Ok(());
    }
    writeln!(out, "  replace line {}:", patch.display_line())?;
    writeln!(out, "    - {}", patch.original_text())?;
    for line in patch.replacement_text().lines() {
        writeln!(out, "    + {line}")?;
    }
    Ok(())
}

pub(super) fn verify<W: Write>(report: &VerificationReport, out: &mut W) -> io::Result<()> {
    let status = if report.is_clean() { "clean" } else { "failed" };
    writeln!(out, "{}: {status}", report.path().display())?;
    for violation in report.violations() {
        write_violation(&ViolationRecord::from(violation), out)?;
    }
    for result in report.failed_expectations() {
        let expectation = result.expectation();
        let verb = match expectation.mode() {
            ExpectationMode::Contains => "expected",
            ExpectationMode::Absent => "rejected",
        };
        writeln!(
            out,
            "  line {}: {verb} '{}', found '{}'",
            expectation.line(),
            expectation.text(),
            result.actual().map_or("<no such line>", str::trim)
        )?;
    }
    Ok(())
}

pub(super) fn run_all<W: Write>(report: &RunReport, out: &mut W) -> io::Result<()> {
    match report {
        RunReport::Completed { runs, next_steps } => {
            for run in runs {
                writeln!(out, "ran {}", run.script)?;
                write_verbatim(&run.stdout, out)?;
            }
            writeln!(out, "next steps:")?;
            for (position, step) in next_steps.iter().enumerate() {
                writeln!(out, "  {}. {step}", position.saturating_add(1))?;
            }
            Ok(())
        }
        RunReport::Failed {
            message,
            stdout,
            stderr,
            ..
        } => {
            writeln!(out, "{message}")?;
            if let Some(text) = stdout.as_deref().filter(|text| !text.is_empty()) {
                writeln!(out, "--- stdout ---")?;
                write_verbatim(text, out)?;
            }
            if let Some(text) = stderr.as_deref().filter(|text| !text.is_empty()) {
                writeln!(out, "--- stderr ---")?;
                write_verbatim(text, out)?;
            }
            Ok(())
        }
    }
}

fn write_violation<W: Write>(violation: &ViolationRecord, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "  {:>4}  {:<26}  {}",
        violation.line,
        violation.kind.as_str(),
        violation.evidence
    )
}

fn write_problems<W: Write>(
    missing: &[std::path::PathBuf],
    errors: &[FileError],
    out: &mut W,
) -> io::Result<()> {
    for path in missing {
        writeln!(out, "missing: {}", path.display())?;
    }
    for error in errors {
        writeln!(out, "error: {}: {}", error.path.display(), error.message)?;
    }
    Ok(())
}

fn write_verbatim<W: Write>(text: &str, out: &mut W) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.is_empty() && !text.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}

fn plural(count: usize, noun: &str) -> String {
    match (count, noun) {
        (1, _) => format!("1 {noun}"),
        (_, "patch") => format!("{count} patches"),
        _ => format!("{count} {noun}s"),
    }
}

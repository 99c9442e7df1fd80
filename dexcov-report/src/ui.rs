//! Status lines on `stderr`.
//!
//! `stdout` carries the reports, so progress, warnings and diagnostics all go to `stderr`, each line starting with a
//! colored label. The writers take any `WriteColor`, the macros and `print_*` functions pick the terminal.

use error::Error;

use dexcov::MergeTally;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use std::fmt::{Arguments, Display};
use std::io::{Result, Write};
use std::path::Path;

/// Prints a green status line, e.g. `progress!("Loading", "{}", path.display())`.
macro_rules! progress {
    ($tag:expr, $($arg:tt)+) => {
        ::ui::emit(::ui::Label::Progress($tag), format_args!($($arg)+))
    }
}

/// Prints a yellow `warning:` line.
macro_rules! warning {
    ($($arg:tt)+) => {
        ::ui::emit(::ui::Label::Warning, format_args!($($arg)+))
    }
}

/// The colored prefix of a status line.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Label<'a> {
    /// A step of the run, right-aligned like cargo's `Compiling`.
    Progress(&'a str),
    /// Input that was read but not fully used. Aligned like `Progress`.
    Notice(&'a str),
    Warning,
    Error,
    Cause,
}

impl<'a> Label<'a> {
    fn color_spec(self) -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_bold(true);
        match self {
            Label::Progress(_) => spec.set_fg(Some(Color::Green)),
            Label::Notice(_) | Label::Warning => spec.set_fg(Some(Color::Yellow)),
            Label::Error => spec.set_fg(Some(Color::Red)).set_intense(true),
            Label::Cause => spec.set_fg(Some(Color::Red)),
        };
        spec
    }

    fn write_to<W: Write>(self, out: &mut W) -> Result<()> {
        match self {
            Label::Progress(tag) | Label::Notice(tag) => write!(out, "{:>12} ", tag),
            Label::Warning => write!(out, "warning: "),
            Label::Error => write!(out, "error: "),
            Label::Cause => write!(out, "caused by: "),
        }
    }
}

/// Writes one status line.
pub fn write_line<W: WriteColor>(out: &mut W, label: Label, message: &dyn Display) -> Result<()> {
    out.set_color(&label.color_spec())?;
    label.write_to(out)?;
    out.reset()?;
    writeln!(out, "{}", message)
}

/// Writes a status line to `stderr`. Used by `progress!` and `warning!`.
pub fn emit(label: Label, message: Arguments) {
    let stream = StandardStream::stderr(ColorChoice::Auto);
    let mut lock = stream.lock();
    write_line(&mut lock, label, &message).expect("print status line");
}

/// Writes how many records of a coverage file were skipped, and why. Records excluded by the package filter are not
/// counted. Nothing is written if no record was skipped.
pub fn write_skipped<W: WriteColor>(out: &mut W, path: &Path, tally: &MergeTally) -> Result<()> {
    if tally.skipped() == 0 {
        return Ok(());
    }
    let reasons = [
        (tally.unknown_method, "unknown method"),
        (tally.no_implementation, "no implementation"),
        (tally.length_mismatch, "length mismatch"),
    ];
    let reasons = reasons
        .iter()
        .filter(|&&(count, _)| count > 0)
        .map(|&(count, reason)| format!("{} {}", count, reason))
        .collect::<Vec<_>>();
    let message = format!(
        "{} of {} records in {} ({})",
        tally.skipped(),
        tally.total(),
        path.display(),
        reasons.join(", "),
    );
    write_line(out, Label::Notice("Skipped"), &message)
}

/// Prints the skipped records of a coverage file to `stderr`.
pub fn print_skipped(path: &Path, tally: &MergeTally) -> Result<()> {
    let stream = StandardStream::stderr(ColorChoice::Auto);
    let mut lock = stream.lock();
    write_skipped(&mut lock, path, tally)
}

/// Writes an error, one line per cause, then the backtrace if one was captured.
pub fn write_error<W: WriteColor>(out: &mut W, error: &Error) -> Result<()> {
    let mut chain = error.iter();
    if let Some(head) = chain.next() {
        write_line(out, Label::Error, &format_args!("{}", head))?;
    }
    for cause in chain {
        write_line(out, Label::Cause, &format_args!("{}", cause))?;
    }
    if let Some(backtrace) = error.backtrace() {
        writeln!(out, "\n{:?}", backtrace)?;
    }
    Ok(())
}

/// Prints an error to `stderr`.
pub fn print_error(error: &Error) -> Result<()> {
    let stream = StandardStream::stderr(ColorChoice::Auto);
    let mut lock = stream.lock();
    write_error(&mut lock, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use error::ErrorKind;
    use termcolor::Buffer;

    use std::path::PathBuf;

    fn render<F: FnOnce(&mut Buffer) -> Result<()>>(f: F) -> String {
        let mut buffer = Buffer::no_color();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    #[test]
    fn test_labels() {
        assert_eq!(render(|b| write_line(b, Label::Progress("Loading"), &"a.json")), "     Loading a.json\n");
        assert_eq!(render(|b| write_line(b, Label::Warning, &"no data")), "warning: no data\n");
    }

    #[test]
    fn test_write_skipped() {
        let path = Path::new("dump.json");
        let tally = MergeTally {
            applied: 5,
            filtered: 2,
            unknown_method: 1,
            no_implementation: 0,
            length_mismatch: 2,
        };
        assert_eq!(
            render(|b| write_skipped(b, path, &tally)),
            "     Skipped 3 of 10 records in dump.json (1 unknown method, 2 length mismatch)\n"
        );

        let clean = MergeTally {
            applied: 5,
            filtered: 2,
            ..MergeTally::default()
        };
        assert_eq!(render(|b| write_skipped(b, path, &clean)), "");
    }

    #[test]
    fn test_write_error() {
        let error = Error::from(ErrorKind::NotAFile(PathBuf::from("missing.json")));
        let text = render(|b| write_error(b, &error));
        assert!(text.starts_with("error: "), "{:?}", text);
        assert!(text.contains("missing.json"), "{:?}", text);
    }
}

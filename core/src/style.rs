use std::{
    fmt::Display,
    io::{self, Write},
    time::Duration,
};

use colored::{Color, ColoredString, Colorize};
use crossterm::terminal;
use indicatif::{ProgressBar, ProgressStyle};

use crate::testing::{
    CaseRecord, CommandLine, CompileResult, EvalListener, Report, TestCase, Verdict,
};

#[macro_export]
macro_rules! print_success {
    ($fmt:literal, $($e:tt)*) => {
        use ::colored::Colorize as _;
        println!("{}", format!($fmt, $($e)*).green())
    }
}

pub fn is_truecolor_supported() -> bool {
    let Ok(v) = std::env::var("COLORTERM") else {
        return false
    };
    matches!(v.as_str(), "truecolor" | "24bit")
}

pub trait ColorTheme {
    fn color(&self) -> Color;
}

impl ColorTheme for Verdict {
    fn color(&self) -> Color {
        use Verdict::*;
        if !self::is_truecolor_supported() {
            return match self {
                Accepted => Color::Green,
                WrongAnswer => Color::Yellow,
                TimeLimitExceeded => Color::Red,
                RuntimeError => Color::Magenta,
            };
        }

        match self {
            Accepted => Color::TrueColor {
                r: 30,
                g: 180,
                b: 40,
            },
            WrongAnswer => Color::TrueColor {
                r: 210,
                g: 138,
                b: 4,
            },
            TimeLimitExceeded => Color::TrueColor {
                r: 220,
                g: 42,
                b: 42,
            },
            RuntimeError => Color::TrueColor {
                r: 171,
                g: 40,
                b: 200,
            },
        }
    }
}

pub fn verdict_icon(verdict: Verdict) -> ColoredString {
    let fg = if is_truecolor_supported() {
        Color::TrueColor {
            r: 255,
            g: 255,
            b: 255,
        }
    } else {
        Color::BrightBlack
    };
    format!(" {:<3} ", verdict)
        .on_color(verdict.color())
        .bold()
        .color(fg)
}

/// Renders compile and per-case progress live while the evaluator runs.
///
/// The spinner is transient; every finished case is written to `out` as a plain line,
/// so the verdicts survive when stderr is not a terminal.
pub struct ConsoleListener<W = io::Stdout> {
    spinner: Option<ProgressBar>,
    out: W,
}

impl ConsoleListener {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for ConsoleListener {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleListener<W> {
    pub fn with_writer(out: W) -> Self {
        Self { spinner: None, out }
    }

    fn case_label(index: usize) -> String {
        format!("Case #{}", index)
    }

    fn emit(&mut self, line: impl Display) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            log::warn!("Failed to write progress: {}", e);
        }
    }
}

impl<W: Write> EvalListener for ConsoleListener<W> {
    fn on_compile_start(&mut self, command: &CommandLine) {
        self.emit(format_args!("{} {}", "Compiling:".cyan().bold(), command));
    }

    fn on_compile_finish(&mut self, result: &CompileResult) {
        if result.invoked_command.is_none() {
            return;
        }
        if result.success() {
            self.emit("Compilation succeeded".green());
        } else {
            self.emit("Compilation failed".bright_red().bold());
        }
    }

    fn on_case_start(&mut self, index: usize, _case: &TestCase) {
        let style = ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let spinner = ProgressBar::new_spinner()
            .with_style(style)
            .with_message(format!("{} ...", Self::case_label(index)));
        spinner.enable_steady_tick(Duration::from_millis(50));
        self.spinner = Some(spinner);
    }

    fn on_case_finish(&mut self, record: &CaseRecord) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        self.emit(format_args!(
            "{} ... {} [{}ms]",
            Self::case_label(record.index).cyan(),
            self::verdict_icon(record.verdict),
            record.outcome.elapsed.as_millis(),
        ));
    }
}

pub fn print_report(report: &Report) {
    println!();
    report
        .cases()
        .iter()
        .filter(|c| !c.verdict.is_accepted())
        .for_each(print_case_detail);
    print_summary(report);
}

pub fn print_summary(report: &Report) {
    let bar = "-".repeat(5);
    let msg = format!(
        "{} out of {} passed",
        report.accepted_count(),
        report.total()
    );

    if report.all_accepted() {
        println!("{} {} {}", bar, msg.green().bold(), bar);
        return;
    }

    let detail_msg = report
        .verdict_counts()
        .into_iter()
        .map(|(verdict, cnt)| {
            format!(
                "{}{}{}",
                self::verdict_icon(verdict),
                "x".dimmed(),
                cnt.to_string().bold().bright_white(),
            )
        })
        .collect::<Vec<String>>()
        .join(", ");

    println!("{} {} ({}) {}", bar, msg.bright_red().bold(), detail_msg, bar);
}

pub fn print_case_detail(record: &CaseRecord) {
    let (cols, _) = terminal::size().unwrap_or((40, 40));
    if let Err(e) = write_case_detail(&mut io::stdout().lock(), record, cols as usize) {
        log::warn!("Failed to print case detail: {}", e);
    }
}

/// Header, status line, expected and actual output, then stderr when present.
pub fn write_case_detail(
    out: &mut impl Write,
    record: &CaseRecord,
    cols: usize,
) -> io::Result<()> {
    const BOLD_LINE: &str = "━";
    const THIN_LINE: &str = "─";

    let bold_bar = BOLD_LINE.repeat(cols).blue().bold();

    writeln!(
        out,
        "\n{}: {} {} [{}ms]\n{}",
        format!("Case #{}", record.index).bright_yellow().bold(),
        self::verdict_icon(record.verdict),
        record.verdict.description(),
        record.outcome.elapsed.as_millis(),
        bold_bar,
    )?;

    fn sub_title(out: &mut dyn Write, s: &str, cols: usize) -> io::Result<()> {
        writeln!(
            out,
            "{}{}",
            s.cyan().bold(),
            THIN_LINE.repeat(cols.saturating_sub(s.len() + 1)).bright_black(),
        )
    }

    fn write_lines(out: &mut dyn Write, text: &str) -> io::Result<()> {
        let lines: Vec<_> = text.trim().lines().collect();
        if lines.is_empty() {
            return writeln!(out, "{}", "<EMPTY>".magenta().dimmed());
        }
        for line in lines {
            let trimmed = line.trim_end();
            write!(out, "{}", trimmed)?;

            let num_trailing_whitespace = line.len() - trimmed.len();
            if num_trailing_whitespace > 0 {
                write!(
                    out,
                    "{}{}",
                    " ".repeat(num_trailing_whitespace).on_red(),
                    "(Trailing whitespace)".bright_red().bold()
                )?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    let outcome = &record.outcome;
    match record.verdict {
        Verdict::TimeLimitExceeded => writeln!(
            out,
            "{}",
            format!("Killed after {}ms", outcome.elapsed.as_millis()).bright_red()
        )?,
        Verdict::RuntimeError => {
            let status = match outcome.exit_code {
                Some(code) => format!("Exited with code {}", code),
                None => "Terminated by a signal".to_owned(),
            };
            writeln!(out, "{}", status.bright_red())?;
        }
        Verdict::WrongAnswer | Verdict::Accepted => (),
    }

    sub_title(out, "[expected]", cols)?;
    write_lines(out, &record.expected_output)?;
    sub_title(out, "[stdout]", cols)?;
    write_lines(out, &outcome.stdout)?;

    if !outcome.stderr.is_empty() {
        sub_title(out, "[stderr]", cols)?;
        write!(out, "{}", outcome.stderr)?;
        if !outcome.stderr.ends_with('\n') {
            writeln!(out)?;
        }
    }

    writeln!(out, "{}", bold_bar)
}

//! Text rendering of flow steps.
//!
//! Each flow step becomes a [`Screen`]: a title, body lines made of
//! [`Segment`]s (matched segments are emphasized), and the commands that
//! apply. Views only read flow state; input is parsed by [`command`].

pub mod command;
mod controls;
pub mod deactivate;
pub mod gate;
pub mod security;
pub mod setup;

use crate::{
    controls::Segment,
    flows::{Toast, ToastKind},
};
use anyhow::Result;
use clap::builder::styling::{AnsiColor, Effects, Style};
use std::io::{IsTerminal, Write};

pub type Line = Vec<Segment>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Screen {
    /// Step identifier, e.g. `provider_confirmation`.
    pub step: &'static str,
    pub title: String,
    pub lines: Vec<Line>,
    pub actions: Vec<String>,
    /// A submission is outstanding or cooling down.
    pub busy: bool,
}

impl Screen {
    #[must_use]
    pub fn new(step: &'static str, title: impl Into<String>) -> Self {
        Self {
            step,
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn text(&mut self, text: impl Into<String>) {
        self.lines.push(vec![plain(text)]);
    }

    pub fn blank(&mut self) {
        self.lines.push(Vec::new());
    }

    pub fn line(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// Inline validation message, if any.
    pub fn error(&mut self, error: Option<&str>) {
        if let Some(error) = error {
            self.lines.push(vec![Segment {
                text: format!("! {error}"),
                matched: true,
            }]);
        }
    }

    pub fn action(&mut self, action: impl Into<String>) {
        self.actions.push(action.into());
    }

    #[must_use]
    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    /// Lines flattened to plain text.
    #[must_use]
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| line.iter().map(|segment| segment.text.as_str()).collect())
            .collect()
    }
}

pub(crate) fn plain(text: impl Into<String>) -> Segment {
    Segment {
        text: text.into(),
        matched: false,
    }
}

/// Output side of an interactive flow.
pub trait FlowView {
    /// Shows the current step.
    ///
    /// # Errors
    /// Returns an error if the output cannot be written.
    fn render(&mut self, screen: &Screen) -> Result<()>;

    /// Shows a transient notification.
    ///
    /// # Errors
    /// Returns an error if the output cannot be written.
    fn toast(&mut self, toast: &Toast) -> Result<()>;
}

/// Writes screens to a terminal, styling matches and toasts when colors are on.
pub struct TerminalView<W: Write> {
    out: W,
    colored: bool,
    last: Option<Screen>,
}

impl TerminalView<std::io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        let colored = std::io::stdout().is_terminal();
        Self::new(std::io::stdout(), colored)
    }
}

impl<W: Write> TerminalView<W> {
    #[must_use]
    pub fn new(out: W, colored: bool) -> Self {
        Self {
            out,
            colored,
            last: None,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn styled(&self, style: Style, text: &str) -> String {
        if self.colored {
            format!("{}{text}{}", style.render(), style.render_reset())
        } else {
            text.to_string()
        }
    }
}

impl<W: Write> FlowView for TerminalView<W> {
    fn render(&mut self, screen: &Screen) -> Result<()> {
        // Ticks and unlocks re-render without visible change.
        if self.last.as_ref() == Some(screen) {
            return Ok(());
        }

        let title = self.styled(AnsiColor::Yellow.on_default() | Effects::BOLD, &screen.title);
        writeln!(self.out)?;
        writeln!(self.out, "{title}")?;

        for line in &screen.lines {
            let mut rendered = String::new();
            for segment in line {
                if segment.matched {
                    let style = if self.colored {
                        AnsiColor::Green.on_default() | Effects::BOLD
                    } else {
                        Style::new()
                    };
                    rendered.push_str(&self.styled(style, &segment.text));
                } else {
                    rendered.push_str(&segment.text);
                }
            }
            writeln!(self.out, "  {rendered}")?;
        }

        if !screen.actions.is_empty() {
            let actions = screen.actions.join("  ");
            let actions = self.styled(AnsiColor::Blue.on_default(), &actions);
            writeln!(self.out, "  {actions}")?;
        }

        self.out.flush()?;
        self.last = Some(screen.clone());
        Ok(())
    }

    fn toast(&mut self, toast: &Toast) -> Result<()> {
        let (label, color) = match toast.kind {
            ToastKind::Success => ("ok", AnsiColor::Green),
            ToastKind::Warning => ("warning", AnsiColor::Yellow),
            ToastKind::Error => ("error", AnsiColor::Red),
        };
        let label = self.styled(color.on_default() | Effects::BOLD, label);
        writeln!(self.out, "[{label}] {}", toast.message)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Keeps every screen and toast in memory.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub screens: Vec<Screen>,
    pub toasts: Vec<Toast>,
}

impl RecordingView {
    /// Step names in render order, consecutive duplicates collapsed.
    #[must_use]
    pub fn steps(&self) -> Vec<&'static str> {
        let mut steps: Vec<&'static str> = self.screens.iter().map(|screen| screen.step).collect();
        steps.dedup();
        steps
    }
}

impl FlowView for RecordingView {
    fn render(&mut self, screen: &Screen) -> Result<()> {
        self.screens.push(screen.clone());
        Ok(())
    }

    fn toast(&mut self, toast: &Toast) -> Result<()> {
        self.toasts.push(toast.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Screen {
        let mut screen = Screen::new("phone_setup", "Phone number");
        screen.line(vec![
            plain("Country: "),
            Segment {
                text: "Ne".into(),
                matched: true,
            },
            plain("therlands"),
        ]);
        screen.error(Some("The phone number is invalid."));
        screen.action("[enter] continue");
        screen
    }

    #[test]
    fn plain_terminal_output() -> Result<()> {
        let mut view = TerminalView::new(Vec::new(), false);
        view.render(&screen())?;
        view.toast(&Toast::error("Too many attempts"))?;

        let output = String::from_utf8(view.into_inner())?;
        assert!(output.contains("Phone number\n"));
        assert!(output.contains("  Country: Netherlands\n"));
        assert!(output.contains("! The phone number is invalid."));
        assert!(output.contains("[error] Too many attempts"));
        assert!(!output.contains('\u{1b}'));
        Ok(())
    }

    #[test]
    fn identical_screens_render_once() -> Result<()> {
        let mut view = TerminalView::new(Vec::new(), false);
        view.render(&screen())?;
        view.render(&screen())?;
        let output = String::from_utf8(view.into_inner())?;
        assert_eq!(output.matches("Phone number").count(), 1);
        Ok(())
    }

    #[test]
    fn colored_output_styles_matches() -> Result<()> {
        let mut view = TerminalView::new(Vec::new(), true);
        view.render(&screen())?;
        let output = String::from_utf8(view.into_inner())?;
        assert!(output.contains('\u{1b}'));
        Ok(())
    }

    #[test]
    fn recording_view_collapses_repeated_steps() -> Result<()> {
        let mut view = RecordingView::default();
        view.render(&screen())?;
        view.render(&screen())?;
        view.render(&Screen::new("success", "Done"))?;
        assert_eq!(view.steps(), vec!["phone_setup", "success"]);
        assert_eq!(view.screens[0].plain_lines()[0], "Country: Netherlands");
        Ok(())
    }
}

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use colored::{Color, ColoredString, Colorize};

/// The kinds of line the CLI prints, each with its own marker and colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Saved,
    Failed,
    Warning,
    Note,
    Detail,
    Pending,
    Heading,
    Key,
}

impl Tone {
    pub fn marker(self) -> &'static str {
        match self {
            Tone::Saved => "✓",
            Tone::Failed => "✗",
            Tone::Warning => "⚠",
            Tone::Note => "ℹ",
            Tone::Detail => "→",
            Tone::Pending => "⟳",
            Tone::Heading | Tone::Key => "•",
        }
    }

    fn color(self) -> Color {
        match self {
            Tone::Saved => Color::Green,
            Tone::Failed => Color::Red,
            Tone::Warning => Color::Yellow,
            Tone::Note => Color::Blue,
            Tone::Detail => Color::BrightBlack,
            Tone::Pending => Color::Cyan,
            Tone::Heading => Color::BrightBlue,
            Tone::Key => Color::BrightCyan,
        }
    }

    pub fn paint(self, text: &str) -> ColoredString {
        let painted = text.color(self.color());
        match self {
            Tone::Heading | Tone::Key | Tone::Pending => painted.bold(),
            _ => painted,
        }
    }

    /// `marker message`, coloured unless `plain`.
    pub fn line(self, message: &str, plain: bool) -> String {
        if plain {
            format!("{} {message}", self.marker())
        } else {
            format!("{} {}", self.paint(self.marker()), self.paint(message))
        }
    }
}

/// Help colours in the same palette as the output lines.
pub fn help_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().bold())
        .usage(AnsiColor::BrightBlue.on_default().bold())
        .literal(AnsiColor::Magenta.on_default())
        .placeholder(AnsiColor::BrightBlack.on_default())
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().bold())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_keep_the_marker() {
        assert_eq!(Tone::Saved.line("Record saved", true), "✓ Record saved");
        assert_eq!(Tone::Failed.line("Backend down", true), "✗ Backend down");
    }
}

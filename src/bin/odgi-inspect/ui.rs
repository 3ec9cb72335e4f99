use nu_ansi_term::{Color, Style};
use std::fmt::Display;
use std::io::IsTerminal;

/// Terminal renderer for the text reports.
///
/// Blocks are printed as a title line followed by aligned `key  value` rows.
/// Oriented handles are shown as `<id><strand>` with the strand colored.
pub struct Ui {
    palette: Option<Palette>,
}

impl Ui {
    /// Colors only when stdout is a terminal and `NO_COLOR` is unset.
    pub fn detect() -> Self {
        let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();

        #[cfg(windows)]
        if color {
            let _ = nu_ansi_term::enable_ansi_support();
        }

        Self {
            palette: color.then(Palette::strands),
        }
    }

    #[cfg(test)]
    fn plain() -> Self {
        Self { palette: None }
    }

    /// Prints a titled block of fields. Nothing is printed for an empty block.
    pub fn fields<'a, I, V>(&self, title: &str, rows: I)
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: Display,
    {
        let rows: Vec<(&str, String)> = rows
            .into_iter()
            .map(|(key, value)| (key, value.to_string()))
            .collect();
        if rows.is_empty() {
            return;
        }
        println!("{}", self.paint(|p| p.title, title));
        for line in render_fields(&rows) {
            println!("{line}");
        }
    }

    /// Prints a titled, numbered listing.
    pub fn numbered<I>(&self, title: &str, items: I)
    where
        I: IntoIterator<Item = String>,
    {
        let items: Vec<String> = items.into_iter().collect();
        println!("{}", self.paint(|p| p.title, title));
        for line in render_numbered(&items) {
            println!("{line}");
        }
    }

    /// `<id>+` or `<id>-`, with the strand colored when painting.
    pub fn handle(&self, id: u64, is_reverse: bool) -> String {
        let strand = if is_reverse { "-" } else { "+" };
        let strand = if is_reverse {
            self.paint(|p| p.reverse, strand)
        } else {
            self.paint(|p| p.forward, strand)
        };
        format!("{id}{strand}")
    }

    /// Writes a note to stderr.
    pub fn note(&self, message: &str) {
        eprintln!("{} {message}", self.paint(|p| p.note, "note:"));
    }

    fn paint(&self, pick: fn(&Palette) -> Style, text: &str) -> String {
        match &self.palette {
            Some(palette) => pick(palette).paint(text).to_string(),
            None => text.to_string(),
        }
    }
}

fn render_fields(rows: &[(&str, String)]) -> Vec<String> {
    let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(key, value)| {
            if value.is_empty() {
                format!("  {key}")
            } else {
                format!("  {key:<width$}  {value}")
            }
        })
        .collect()
}

fn render_numbered(items: &[String]) -> Vec<String> {
    if items.is_empty() {
        return vec!["  (empty)".to_string()];
    }
    let width = items.len().to_string().len();
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("  {:>width$}  {item}", i + 1))
        .collect()
}

struct Palette {
    title: Style,
    forward: Style,
    reverse: Style,
    note: Style,
}

impl Palette {
    fn strands() -> Self {
        Self {
            title: Style::new().bold().underline(),
            forward: Style::new().fg(Color::Green),
            reverse: Style::new().fg(Color::Red),
            note: Style::new().fg(Color::Yellow).bold(),
        }
    }
}

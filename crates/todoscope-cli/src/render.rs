use std::io::Write;

use todoscope_core::view::View;

/// Terminal display surface: the list region, page controls, and the error
/// banner, written as plain lines.
#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    #[tracing::instrument(skip(self, out, view), fields(rows = view.rows.len()))]
    pub fn print_view<W: Write>(&self, out: &mut W, view: &View) -> anyhow::Result<()> {
        if let Some(message) = &view.banner {
            writeln!(out, "{}", self.paint(&format!("! {message}"), "31"))?;
        }

        match view.placeholder {
            Some(text) => writeln!(out, "{}", self.paint(text, "2"))?,
            None => {
                for row in &view.rows {
                    if row.completed {
                        writeln!(out, "{}", self.paint(&row.line, "32"))?;
                    } else {
                        writeln!(out, "{}", row.line)?;
                    }
                }
            }
        }

        if !view.pages.is_empty() {
            let controls = view
                .pages
                .iter()
                .map(|page| {
                    if page.active {
                        self.paint(&format!("[{}]", page.number), "1;36")
                    } else {
                        page.number.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(out, "Pages: {controls}")?;
        }

        Ok(())
    }

    pub fn print_error<W: Write>(&self, out: &mut W, message: &str) -> anyhow::Result<()> {
        writeln!(out, "{}", self.paint(&format!("error: {message}"), "31"))?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

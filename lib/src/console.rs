use owo_colors::{OwoColorize, Style, Styled};
use supports_color::Stream::Stderr;

use crate::mix::{MixArchive, MixEntry};

pub trait ErrStyle {
    fn errstyle(&self, style: Style) -> Styled<&Self>;
}

impl<D> ErrStyle for D {
    fn errstyle(&self, style: Style) -> Styled<&Self> {
        self.style(get_errstyle(style))
    }
}

pub fn get_errstyle(style: Style) -> Style {
    supports_color::on(Stderr)
        .filter(|f| f.has_basic)
        .map_or_else(Style::new, |_| style)
}

/// Render one archive entry the way the extraction log prints it.
pub fn format_entry_for_console(archive: &MixArchive, entry: &MixEntry) -> String {
    let name = entry.name.as_deref().unwrap_or("<unresolved>");
    format!(
        "{} ({}), {} bytes at offset {} in a {} archive",
        name.errstyle(Style::new().green()),
        format!("{:#010X}", entry.hash).errstyle(Style::new().blue()),
        entry.size.errstyle(Style::new().yellow()),
        format!("{:#X}", entry.offset).errstyle(Style::new().yellow()),
        archive.info().format.errstyle(Style::new().cyan()),
    )
}

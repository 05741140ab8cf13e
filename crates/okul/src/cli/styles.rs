//! Terminal styles for the okul CLI.
//!
//! Renderers refer to styles by what they mark (a title, a timestamp, a
//! default-content hint), never by color. `console` drops the escape codes on
//! its own when stdout is not a terminal.

use console::Style;
use std::sync::OnceLock;

pub struct Styles {
    pub title: Style,
    pub muted: Style,
    pub faint: Style,
    pub time: Style,
    pub key: Style,
    pub stored: Style,
    pub default_content: Style,
    pub success: Style,
    pub info: Style,
    pub warning: Style,
}

impl Styles {
    fn build() -> Self {
        let muted = Style::new().color256(245);
        Self {
            title: Style::new().bold(),
            faint: Style::new().color256(240),
            time: muted.clone().italic(),
            key: Style::new().color256(178),
            stored: Style::new().green(),
            default_content: Style::new().yellow(),
            success: Style::new().green(),
            info: muted.clone(),
            warning: Style::new().yellow().bold(),
            muted,
        }
    }
}

pub fn styles() -> &'static Styles {
    static STYLES: OnceLock<Styles> = OnceLock::new();
    STYLES.get_or_init(Styles::build)
}

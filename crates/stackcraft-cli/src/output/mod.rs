//! Terminal output utilities: styling, progress bars, tables, and JSON
//! mode.
//!
//! Handles TTY detection, `NO_COLOR`, and degradation to ASCII glyphs
//! when the terminal's locale doesn't advertise UTF-8.

pub mod json;
pub mod progress;
pub mod table;

use std::io::{IsTerminal, stderr, stdout};
use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, Ordering};

static COLOR_ENABLED: AtomicBool = AtomicBool::new(true);
static UNICODE_ENABLED: AtomicBool = AtomicBool::new(true);

static IS_TTY: LazyLock<bool> = LazyLock::new(|| stdout().is_terminal() && stderr().is_terminal());
static NO_COLOR: LazyLock<bool> = LazyLock::new(|| std::env::var("NO_COLOR").is_ok());

pub fn init(force_ansi: Option<bool>, quiet: bool) {
    let colors = force_ansi.unwrap_or(*IS_TTY && !*NO_COLOR);
    COLOR_ENABLED.store(colors, Ordering::Relaxed);

    let unicode = std::env::var("LANG")
        .or_else(|_| std::env::var("LC_ALL"))
        .map(|l| l.to_uppercase().contains("UTF"))
        .unwrap_or(cfg!(not(windows)));
    UNICODE_ENABLED.store(unicode && !quiet, Ordering::Relaxed);
}

pub fn colors_enabled() -> bool {
    COLOR_ENABLED.load(Ordering::Relaxed)
}

pub fn unicode_enabled() -> bool {
    UNICODE_ENABLED.load(Ordering::Relaxed)
}

pub fn is_tty() -> bool {
    *IS_TTY
}

fn glyph(unicode: &'static str, ascii: &'static str) -> &'static str {
    if unicode_enabled() { unicode } else { ascii }
}

pub fn header(text: &str) {
    use owo_colors::OwoColorize;
    if colors_enabled() {
        println!("{} {}", "stackcraft".cyan().bold(), text.dimmed());
    } else {
        println!("stackcraft {text}");
    }
}

pub fn success(text: &str) {
    use owo_colors::OwoColorize;
    let mark = glyph("✓", "OK");
    if colors_enabled() {
        println!("{} {text}", mark.green());
    } else {
        println!("{mark} {text}");
    }
}

pub fn warning(text: &str) {
    use owo_colors::OwoColorize;
    let mark = glyph("⚠", "!");
    if colors_enabled() {
        eprintln!("{} {}", mark.yellow(), text.yellow());
    } else {
        eprintln!("{mark} {text}");
    }
}

pub fn error(text: &str) {
    use owo_colors::OwoColorize;
    let mark = glyph("✗", "X");
    if colors_enabled() {
        eprintln!("{} {}", mark.red(), text.red());
    } else {
        eprintln!("{mark} {text}");
    }
}

pub fn info(text: &str) {
    use owo_colors::OwoColorize;
    let mark = glyph("ℹ", "i");
    if colors_enabled() {
        println!("{} {text}", mark.blue());
    } else {
        println!("{mark} {text}");
    }
}

pub fn debug(text: &str) {
    use owo_colors::OwoColorize;
    if colors_enabled() {
        eprintln!("{}", text.dimmed());
    } else {
        eprintln!("{text}");
    }
}

pub fn package(name: &str, version: Option<&str>) {
    use owo_colors::OwoColorize;
    match (colors_enabled(), version) {
        (true, Some(v)) => println!("  {} {}", name.green(), v.yellow()),
        (true, None) => println!("  {}", name.green()),
        (false, Some(v)) => println!("  {name} {v}"),
        (false, None) => println!("  {name}"),
    }
}

#[must_use]
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.2} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(5)), "5.000s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3700)), "1h 1m 40s");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1536), "1.50 KiB");
        assert_eq!(format_bytes(1024 * 1024 * 3), "3.00 MiB");
    }
}

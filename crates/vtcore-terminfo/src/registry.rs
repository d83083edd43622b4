//! In-memory terminfo capability registry.
//!
//! Carries the handful of boolean/number/string capabilities the render
//! kernel needs for terminal-specific output (cursor addressing, color
//! setting, screen-switching), keyed by terminal name with the same
//! progressive-fallback lookup policy as the system `terminfo` database.

use std::collections::HashMap;

/// Boolean, numeric, and string capabilities for one terminal type.
///
/// Field names follow the standard terminfo short names (`cup`, `setaf`,
/// `smcup`, ...) rather than full words, matching how capability strings
/// are referenced in terminfo source and documentation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TerminfoRecord {
    pub name: &'static str,
    pub booleans: HashMap<&'static str, bool>,
    pub numbers: HashMap<&'static str, i32>,
    pub strings: HashMap<&'static str, &'static str>,
}

impl TerminfoRecord {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    fn with_bools(mut self, entries: &[(&'static str, bool)]) -> Self {
        self.booleans.extend(entries.iter().copied());
        self
    }

    fn with_numbers(mut self, entries: &[(&'static str, i32)]) -> Self {
        self.numbers.extend(entries.iter().copied());
        self
    }

    fn with_strings(mut self, entries: &[(&'static str, &'static str)]) -> Self {
        self.strings.extend(entries.iter().copied());
        self
    }

    /// Fetch a string capability by its terminfo short name.
    #[must_use]
    pub fn string_cap(&self, name: &str) -> Option<&str> {
        self.strings.get(name).copied()
    }

    /// Fetch a boolean capability by its terminfo short name. Absent
    /// capabilities are `false`, matching terminfo's convention.
    #[must_use]
    pub fn bool_cap(&self, name: &str) -> bool {
        self.booleans.get(name).copied().unwrap_or(false)
    }

    /// Fetch a numeric capability by its terminfo short name.
    #[must_use]
    pub fn number_cap(&self, name: &str) -> Option<i32> {
        self.numbers.get(name).copied()
    }
}

const CUP: &str = "\x1b[%i%p1%d;%p2%dH";
const SETAF: &str = "\x1b[3%p1%dm";
const SETAB: &str = "\x1b[4%p1%dm";
const SETAF_256: &str = "\x1b[38;5;%p1%dm";
const SETAB_256: &str = "\x1b[48;5;%p1%dm";

fn xterm_256color() -> TerminfoRecord {
    TerminfoRecord::new("xterm-256color")
        .with_bools(&[("am", true), ("xenl", true), ("km", true)])
        .with_numbers(&[("colors", 256), ("pairs", 32767), ("cols", 80), ("lines", 24)])
        .with_strings(&[
            ("cup", CUP),
            ("setaf", SETAF_256),
            ("setab", SETAB_256),
            ("smcup", "\x1b[?1049h"),
            ("rmcup", "\x1b[?1049l"),
            ("civis", "\x1b[?25l"),
            ("cnorm", "\x1b[?25h"),
            ("clear", "\x1b[H\x1b[2J"),
            ("sgr0", "\x1b[0m"),
            ("bold", "\x1b[1m"),
            ("smul", "\x1b[4m"),
            ("rmul", "\x1b[24m"),
        ])
}

fn xterm() -> TerminfoRecord {
    TerminfoRecord::new("xterm")
        .with_bools(&[("am", true), ("xenl", true), ("km", true)])
        .with_numbers(&[("colors", 8), ("pairs", 64), ("cols", 80), ("lines", 24)])
        .with_strings(&[
            ("cup", CUP),
            ("setaf", SETAF),
            ("setab", SETAB),
            ("smcup", "\x1b[?1049h"),
            ("rmcup", "\x1b[?1049l"),
            ("civis", "\x1b[?25l"),
            ("cnorm", "\x1b[?25h"),
            ("clear", "\x1b[H\x1b[2J"),
            ("sgr0", "\x1b[0m"),
            ("bold", "\x1b[1m"),
        ])
}

fn vt100() -> TerminfoRecord {
    TerminfoRecord::new("vt100")
        .with_bools(&[("am", true), ("xenl", false), ("km", false)])
        .with_numbers(&[("colors", 0), ("pairs", 0), ("cols", 80), ("lines", 24)])
        .with_strings(&[
            ("cup", "\x1b[%i%p1%d;%p2%dH"),
            ("smcup", ""),
            ("rmcup", ""),
            ("civis", ""),
            ("cnorm", ""),
            ("clear", "\x1b[H\x1b[2J"),
            ("sgr0", "\x1b[0m"),
            ("bold", "\x1b[1m"),
        ])
}

fn screen() -> TerminfoRecord {
    TerminfoRecord::new("screen")
        .with_bools(&[("am", true), ("xenl", true), ("km", true)])
        .with_numbers(&[("colors", 8), ("pairs", 64), ("cols", 80), ("lines", 24)])
        .with_strings(&[
            ("cup", CUP),
            ("setaf", SETAF),
            ("setab", SETAB),
            ("smcup", "\x1b[?1049h"),
            ("rmcup", "\x1b[?1049l"),
            ("civis", "\x1b[?25l"),
            ("cnorm", "\x1b[?25h"),
            ("clear", "\x1b[H\x1b[2J"),
            ("sgr0", "\x1b[0m"),
        ])
}

fn screen_256color() -> TerminfoRecord {
    TerminfoRecord {
        name: "screen-256color",
        ..screen()
            .with_numbers(&[("colors", 256), ("pairs", 32767)])
            .with_strings(&[("setaf", SETAF_256), ("setab", SETAB_256)])
    }
}

fn tmux() -> TerminfoRecord {
    TerminfoRecord {
        name: "tmux",
        ..screen()
    }
}

fn tmux_256color() -> TerminfoRecord {
    TerminfoRecord {
        name: "tmux-256color",
        ..screen_256color()
    }
}

fn linux() -> TerminfoRecord {
    TerminfoRecord::new("linux")
        .with_bools(&[("am", true), ("xenl", false), ("km", true)])
        .with_numbers(&[("colors", 8), ("pairs", 64), ("cols", 80), ("lines", 25)])
        .with_strings(&[
            ("cup", CUP),
            ("setaf", SETAF),
            ("setab", SETAB),
            ("civis", "\x1b[?25l"),
            ("cnorm", "\x1b[?25h"),
            ("clear", "\x1b[H\x1b[2J"),
            ("sgr0", "\x1b[0m"),
        ])
}

fn dumb() -> TerminfoRecord {
    TerminfoRecord::new("dumb")
        .with_bools(&[("am", false), ("xenl", false), ("km", false)])
        .with_numbers(&[("colors", 0), ("pairs", 0), ("cols", 80), ("lines", 24)])
}

/// An in-memory, immutable registry of built-in [`TerminfoRecord`]s.
///
/// Lookup is exact-match first, then progressively strips hyphen-separated
/// suffixes (`xterm-256color-italic -> xterm-256color -> xterm`), and
/// ultimately falls back to `xterm-256color`. Lookup never fails.
#[derive(Debug, Clone)]
pub struct TerminfoRegistry {
    records: HashMap<&'static str, TerminfoRecord>,
}

impl TerminfoRegistry {
    /// Build the registry with its built-in terminal set.
    #[must_use]
    pub fn new() -> Self {
        let built_in = [
            xterm_256color(),
            xterm(),
            vt100(),
            screen(),
            screen_256color(),
            tmux(),
            tmux_256color(),
            linux(),
            dumb(),
        ];
        let mut records = HashMap::new();
        for record in built_in {
            records.insert(record.name, record);
        }
        Self { records }
    }

    /// Look up a terminal by name, falling back progressively and then to
    /// `xterm-256color`. Always returns a record.
    #[must_use]
    pub fn lookup(&self, name: &str) -> &TerminfoRecord {
        let mut candidate = name;
        loop {
            if let Some(record) = self.records.get(candidate) {
                return record;
            }
            match candidate.rfind('-') {
                Some(idx) => candidate = &candidate[..idx],
                None => break,
            }
        }
        self.records
            .get("xterm-256color")
            .expect("xterm-256color is always registered")
    }
}

impl Default for TerminfoRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#![forbid(unsafe_code)]

//! vtcore public facade crate.
//!
//! # Role
//! This crate is the user-facing entry point for the render kernel. It
//! re-exports the most commonly used types from the internal crates
//! (core/render/sgr/terminfo) so application code does not need to wire
//! each crate individually.
//!
//! # What belongs here
//! - Stable public surface area (re-exports).
//! - Minimal glue and convenience APIs.
//! - A lightweight prelude for day-to-day use.
//!
//! # How it fits in the system
//! - Geometry and logging shim: provided by `vtcore-core`
//! - Cells, double buffer, ANSI encoder, terminal controller: `vtcore-render`
//! - SGR attribute model and color downgrading: `vtcore-sgr`
//! - Terminfo registry and tparm interpreter: `vtcore-terminfo`
//!
//! If you only depend on one crate in your application, it should be `vtcore`.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use vtcore_core::geometry::Rect;

// --- Render re-exports -----------------------------------------------------

pub use vtcore_render::buffer::ScreenBuffer;
pub use vtcore_render::cell::{Cell, PackedColor, StyleFlags};
pub use vtcore_render::double_buffer::{CellChange, DoubleBuffer};
pub use vtcore_render::encoder::{encode, MouseMode, OutputState};
pub use vtcore_render::terminal::{self as terminal_controller, CursorShape};

// --- SGR re-exports ----------------------------------------------------

pub use vtcore_sgr::{
    attr_to_sgr, parse_sgr, strip_ansi, Ansi16, Attribute, Color, ColorCache, ColorDepth,
    ColorProfile, DowngradeOptions, MonoColor, Rgb, RichColor,
};

// --- Terminfo re-exports -----------------------------------------------

pub use vtcore_terminfo::{
    compile, execute, tparm, CompiledCapability, TerminfoRecord, TerminfoRegistry, TparmCache,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for vtcore apps.
#[derive(Debug)]
pub enum Error {
    /// I/O failure during terminal operations.
    Io(std::io::Error),
    /// Terminal or construction error with message.
    Terminal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Terminal(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Standard result type for vtcore APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        encode, Attribute, Cell, Color, DoubleBuffer, Error, OutputState, Rect, Result,
        ScreenBuffer, StyleFlags,
    };

    pub use crate::{core, render, sgr, terminfo};
}

pub use vtcore_core as core;
pub use vtcore_render as render;
pub use vtcore_sgr as sgr;
pub use vtcore_terminfo as terminfo;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: Error = Error::from(io_err);
        match &err {
            Error::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn error_terminal_display() {
        let err = Error::Terminal("something broke".into());
        assert_eq!(format!("{err}"), "something broke");
    }

    #[test]
    fn error_io_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::Io(io_err);
        assert_eq!(format!("{err}"), "access denied");
    }

    #[test]
    fn error_debug() {
        let err = Error::Terminal("test".into());
        let debug = format!("{err:?}");
        assert!(debug.contains("Terminal"));
    }

    #[test]
    fn error_is_std_error() {
        let err = Error::Terminal("msg".into());
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_ok().unwrap(), 42);

        let err: Result<i32> = Err(Error::Terminal("fail".into()));
        assert!(err.is_err());
    }

    #[test]
    fn prelude_re_exports_core_types() {
        use crate::prelude::*;
        let _buf = ScreenBuffer::create(4, 4, Cell::blank()).unwrap();
        let _attr = Attribute::reset();
        let _rect = Rect::new(0, 0, 4, 4);
    }
}

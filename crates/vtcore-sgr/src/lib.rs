#![forbid(unsafe_code)]

//! SGR attribute model, color-profile downgrading, and a single-pass
//! ANSI/SGR parser used to fold escape sequences into an [`Attribute`].

pub mod attribute;
pub mod color;
pub mod parser;

pub use attribute::{Attribute, Color};
pub use color::{Ansi16, ColorCache, ColorProfile, MonoColor, Rgb, RichColor};
pub use parser::{attr_to_sgr, parse_sgr, strip_ansi, ColorDepth, DowngradeOptions};

#![forbid(unsafe_code)]

//! Terminfo capability registry and a tparm stack-machine interpreter for
//! the small set of parameterized capability strings the render kernel
//! needs when it falls back to terminal-specific output.

pub mod registry;
pub mod tparm;

pub use registry::{TerminfoRecord, TerminfoRegistry};
pub use tparm::{compile, execute, tparm, CompiledCapability, Instr, TparmCache, VarKind};

//! Pipeline stages for FPP report generation.
//!
//! Each submodule implements exactly one step of producing a report.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ resolve ──▶ assemble ──▶ typeset ×2 ──▶ cleanup
//! (list)    (slots)     (.tex)       (engine)       (aux files)
//! ```
//!
//! 1. [`input`]: load the ordered identifier list
//! 2. [`resolve`]: per slot, the candidate's plot or the placeholder
//! 3. [`assemble`]: build the LaTeX source from the resolved slots
//! 4. [`typeset`]: the external engine, behind the [`typeset::Typesetter`] trait
//! 5. [`cleanup`]: delete `.tex`, `.out`, `.aux` and `.log`

pub mod assemble;
pub mod cleanup;
pub mod input;
pub mod resolve;
pub mod typeset;

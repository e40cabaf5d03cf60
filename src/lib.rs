//! Stencil - Gerador de pacotes de extensão
//!
//! Library half of the `stencil` binary: the extension contract that the
//! generated packages implement, and the template engine that produces them.

pub mod core;
pub mod extension;

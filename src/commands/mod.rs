//! Módulo de comandos do Stencil

pub mod env;
pub mod run;
pub mod schema;
pub mod template;

//! Módulo core - Lógica central do Stencil

pub mod builder;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod template;
pub mod utils;

//! tesla-cotizador: PILI, a rule-based quote, project and report generator for
//! electrical services, with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;

// src/sound/mod.rs

//! Os dois chips de síntese: o gerador de envelopes (EGS) e o banco de
//! operadores FM (OPS), mais as tabelas ROM e o filtro de decimação.

pub mod egs;
pub mod envelope;
pub mod filter;
pub mod ops;
pub mod tables;

pub use egs::Egs;
pub use envelope::Envelope;
pub use filter::{Filter, Lp1};
pub use ops::Ops;

pub mod dot;
pub mod path;
pub mod scc;

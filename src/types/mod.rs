pub mod envelope;
pub mod verse;

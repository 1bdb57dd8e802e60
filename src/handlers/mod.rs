pub mod accounts;
pub mod status;
pub mod verse;

pub mod games;
pub mod help;

pub mod imports;
pub mod tickets;

pub mod fasta;
pub mod table;

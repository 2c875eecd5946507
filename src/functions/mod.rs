pub mod hash_counter;
pub mod kmer_counter;

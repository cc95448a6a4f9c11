pub mod equivalence;

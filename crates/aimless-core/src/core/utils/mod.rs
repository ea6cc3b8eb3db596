pub mod masses;

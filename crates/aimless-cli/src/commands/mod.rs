pub mod shoot;

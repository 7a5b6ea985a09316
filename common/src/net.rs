pub mod block;
pub mod sort;

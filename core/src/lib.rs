pub mod aggregate;
pub mod grouper;
pub mod prober;

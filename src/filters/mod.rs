pub mod butterworth;

pub use butterworth::Butterworth;

mod actuator;

pub use actuator::*;

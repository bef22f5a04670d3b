//! Condition text notation shared by the translator and its consumers

/// Token standing for the object the method is invoked on
pub const RECEIVER: &str = "receiver";

/// Token standing for the method's return value
pub const RESULT: &str = "result";

pub const AND: &str = " && ";
pub const OR: &str = " || ";

/// Positional access to the `index`-th parameter
pub fn arg(index: usize) -> String {
    format!("args[{index}]")
}

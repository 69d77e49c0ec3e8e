//! Small capability traits shared by chemistry, table and pipeline types.

/// Values ordered by a similarity or quality score, higher is better.
pub trait Scored {
    fn score(&self) -> f64;
}

/// Values with a display name.
pub trait Annotated {
    /// Empty when the value is unnamed.
    fn name(&self) -> &str;
}

/// One-line description for logs and reports.
pub trait Summarizable {
    fn summary(&self) -> String;
}

//! Result type alias for dwgbatch

use super::errors::DwgBatchError;

/// Result type alias for dwgbatch operations
///
/// # Examples
///
/// ```
/// use dwgbatch::domain::result::Result;
/// use dwgbatch::domain::errors::DwgBatchError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(DwgBatchError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, DwgBatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}

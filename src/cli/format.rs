//! Output format dispatch macro shared by command modules

/// Dispatch on the output format. The json branch returns `Result`, the
/// human branch returns `()`.
#[macro_export]
macro_rules! output_by_format_result {
    ($format:expr, json => $json:expr, human => $human:block) => {
        match $format {
            $crate::cli::OutputFormat::Json => $json,
            $crate::cli::OutputFormat::Human => {
                $human;
                Ok(())
            }
        }
    };
}

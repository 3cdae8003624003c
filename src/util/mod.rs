//! Miscellaneous utilities.

/// Render an error and its chain of sources, one per line, each source
/// indented `indent_step` spaces deeper than the error it caused.
pub fn aggregate_error_tree<Error: std::error::Error + 'static>(
    error: &Error,
    indent_step: usize,
) -> String {
    let mut next: Option<&(dyn std::error::Error)> = Some(error);
    let mut depth: usize = 0;
    let mut aggregated: String = String::new();
    while let Some(node) = next {
        aggregated.push_str(&" ".repeat(depth * indent_step));
        aggregated.push_str(&node.to_string());
        aggregated.push('\n');
        next = node.source();
        depth += 1;
    }
    return aggregated;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_error_tree() {
        let err = crate::loader::InstallError {
            url: "https://files.example.invalid/installer.jar".into(),
            cause: crate::loader::InstallCause::Process(crate::proc::ProcessError::Spawn((
                "java".into(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
            ))),
        };
        assert_eq!(
            aggregate_error_tree(&err, 2),
            "problem while installing loader from https://files.example.invalid/installer.jar\n  cannot start 'java'\n    No such file or directory\n"
        );
    }
}

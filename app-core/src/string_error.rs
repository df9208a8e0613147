/// Turn any displayable error into a `String` prefixed with some context, so
/// that fallible calls can be chained with `?` in functions returning
/// `Result<_, String>`.
pub trait ErrorStringExt<T> {
    fn err_to_string(self, context: &str) -> Result<T, String>;
}

impl<T, E> ErrorStringExt<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn err_to_string(self, context: &str) -> Result<T, String> {
        self.map_err(|e| format!("{context}: {e}"))
    }
}

impl<T> ErrorStringExt<T> for Option<T> {
    fn err_to_string(self, context: &str) -> Result<T, String> {
        self.ok_or_else(|| context.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_err_to_string_prefixes_context() {
        let res: Result<u8, String> = "x".parse::<u8>().err_to_string("bad byte");
        assert!(res.unwrap_err().starts_with("bad byte: "));

        let none: Option<u8> = None;
        assert_eq!(none.err_to_string("missing").unwrap_err(), "missing");
    }
}

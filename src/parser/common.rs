//! Common parsing functions used by the various parsers
use nom::{
    IResult,
    Parser,
    error::{ParseError, VerboseError},
    bytes::complete::take_while1,
    sequence::delimited,
    character::complete::space0,
};

pub type VResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// Surrounds a parser with optional spaces and tabs.  Documents are parsed a
/// line at a time so newlines never need skipping.
pub fn ws<'a, F, O, E>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
    where
    E: ParseError<&'a str>,
    F: Parser<&'a str, O, E>,
{
    delimited(space0, inner, space0)
}

pub fn is_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.'
}

pub fn label(input: &str) -> VResult<&str> {
    ws(take_while1(is_label_char))(input)
}

/// Property keys also come from settings files, so they allow any printable
/// ASCII other than the characters that delimit lines of a document
pub fn is_key_char(c: char) -> bool {
    c.is_ascii_graphic() && !matches!(c, ':' | '[' | ']' | '#' | '"' | ',')
}

pub fn key(input: &str) -> VResult<&str> {
    ws(take_while1(is_key_char))(input)
}

// type names are labels which may be namespaced with slashes
pub fn type_name(input: &str) -> VResult<&str> {
    ws(take_while1(|c: char| is_label_char(c) || c == '/'))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        assert_eq!(label("TestSource").unwrap(), ("", "TestSource"));
        assert_eq!(label("  TestSource_AppInstallerTest.Test-Package  ").unwrap(), ("", "TestSource_AppInstallerTest.Test-Package"));
        assert_eq!(label("AppInstallerTest/TestResource").unwrap(), ("/TestResource", "AppInstallerTest"));
        assert!(label(" [id]").is_err());
    }

    #[test]
    fn test_key() {
        assert_eq!(key("  $schema: x").unwrap(), (": x", "$schema"));
        assert_eq!(key("editor.fontSize").unwrap(), ("", "editor.fontSize"));
        assert_eq!(key("a[0]").unwrap(), ("[0]", "a"));
        assert!(key("#comment").is_err());
    }

    #[test]
    fn test_type_name() {
        assert_eq!(type_name(" Microsoft.WinGet.Dev/Source [").unwrap(), ("[", "Microsoft.WinGet.Dev/Source"));
    }
}

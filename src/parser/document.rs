/*
 * Example document block:
 *
 * Microsoft.WinGet.Dev/Package [TestSource_AppInstallerTest.TestPackageExport]
 * ^-- type name                ^-- instance id
 *   id: AppInstallerTest.TestPackageExport      <-- property lines, key: value
 *   source: TestSource
 *   Dependencies: TestSource_Microsoft.PreIndexed.Package   <-- optional, comma separated ids
 *
 * Blocks are separated by blank lines, and lines starting with # are comments.
 */

use crate::models::Value;

use nom::{
    bytes::complete::tag,
    branch::alt,
    character::complete::{char, not_line_ending, space1},
    combinator::map,
    multi::separated_list1,
    sequence::{delimited, pair, preceded, separated_pair},
};

use super::{
    common::{VResult, key, label, type_name, ws},
    value::value,
};

pub const DEPENDENCIES_KEY: &str = "Dependencies";

#[derive(Debug, PartialEq, Eq)]
pub enum Line<'a> {
    Comment,
    Header { type_name: &'a str, instance_id: &'a str },
    Property(&'a str, Value),
    Dependencies(Vec<&'a str>),
}

pub fn line(input: &str) -> VResult<Line> {
    alt((comment, dependencies, header, property))(input)
}

fn comment(input: &str) -> VResult<Line> {
    map(preceded(ws(char('#')), not_line_ending), |_| Line::Comment)(input)
}

fn header(input: &str) -> VResult<Line> {
    map(
        pair(type_name, delimited(ws(tag("[")), label, ws(tag("]")))),
        |(type_name, instance_id)| Line::Header { type_name, instance_id }
    )(input)
}

fn dependencies(input: &str) -> VResult<Line> {
    map(
        preceded(
            pair(ws(tag(DEPENDENCIES_KEY)), tag(":")),
            separated_list1(tag(","), label),
        ),
        Line::Dependencies
    )(input)
}

fn property(input: &str) -> VResult<Line> {
    map(
        separated_pair(
            key,
            tag(":"),
            preceded(space1, value),
        ),
        |(key, value)| Line::Property(key, value)
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header() {
        let input = "Microsoft.WinGet.Dev/Source [TestSource_Microsoft.PreIndexed.Package]";
        let (rest, result) = line(input).unwrap();

        assert_eq!(rest, "");
        assert_eq!(result, Line::Header {
            type_name: "Microsoft.WinGet.Dev/Source",
            instance_id: "TestSource_Microsoft.PreIndexed.Package",
        });

        let input = "  AppInstallerTest/TestResource  [  res_1 ]  ";
        let (rest, result) = line(input).unwrap();

        assert_eq!(rest, "");
        assert_eq!(result, Line::Header { type_name: "AppInstallerTest/TestResource", instance_id: "res_1" });
    }

    #[test]
    fn test_property() {
        let input = "  argument: https://localhost:5001/TestKit";
        let (rest, result) = line(input).unwrap();

        assert_eq!(rest, "");
        assert_eq!(result, Line::Property("argument", Value::String("https://localhost:5001/TestKit".into())));

        let input = "  LocalManifestFiles: false";
        let (_, result) = line(input).unwrap();
        assert_eq!(result, Line::Property("LocalManifestFiles", Value::Bool(false)));

        let input = "  $schema: https://aka.ms/winget-settings.schema.json";
        let (_, result) = line(input).unwrap();
        assert_eq!(result, Line::Property("$schema", Value::String("https://aka.ms/winget-settings.schema.json".into())));

        let input = "  data: \"two\\nlines\"";
        let (_, result) = line(input).unwrap();
        assert_eq!(result, Line::Property("data", Value::String("two\nlines".into())));
    }

    #[test]
    fn test_dependencies() {
        let input = "  Dependencies: TestSource_Microsoft.PreIndexed.Package";
        let (rest, result) = line(input).unwrap();

        assert_eq!(rest, "");
        assert_eq!(result, Line::Dependencies(vec!["TestSource_Microsoft.PreIndexed.Package"]));

        let input = "  Dependencies: a, b ,c";
        let (_, result) = line(input).unwrap();
        assert_eq!(result, Line::Dependencies(vec!["a", "b", "c"]));
    }

    #[test]
    fn test_comment() {
        let (rest, result) = line("# cfgx configuration export").unwrap();
        assert_eq!(rest, "");
        assert_eq!(result, Line::Comment);
    }

    #[test]
    fn test_garbage() {
        assert!(line("this is not a unit").is_err());
        assert!(line("key:novalue-space").is_err());
    }
}

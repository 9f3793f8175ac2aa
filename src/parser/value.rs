/// Parses scalar property values
///
/// Values are read from the remainder of a property line.  A value is a quoted
/// string, a bool, an integer, or failing those, the plain text of the line.

use crate::models::val::Value;

use super::common::VResult;

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{all_consuming, map, map_res, opt, recognize},
    bytes::complete::escaped_transform,
    sequence::{delimited, pair},
};

fn string(input: &str) -> VResult<Value> {
    let escapes = alt((
        map(tag("\\"), |_| "\\"),
        map(tag("\""), |_| "\""),
        map(tag("n"), |_| "\n"),
        map(tag("r"), |_| "\r"),
        map(tag("t"), |_| "\t"),
    ));

    map(
        delimited(
            char('"'),
            opt(escaped_transform(is_not("\\\""), '\\', escapes)),
            char('"'),
        ),
        |value: Option<String>| Value::String(value.unwrap_or_default())
    )(input)
}

fn int(input: &str) -> VResult<Value> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), |value: &str| {
        value.parse::<i64>().map(Value::Int)
    })(input)
}

fn boolean(input: &str) -> VResult<Value> {
    alt((
        map(tag("true"), |_| Value::Bool(true)),
        map(tag("false"), |_| Value::Bool(false)),
    ))(input)
}

fn plain_string(input: &str) -> VResult<Value> {
    map(take_while1(|c| c != '\n' && c != '\r'), |value: &str| {
        Value::String(value.to_string())
    })(input)
}

pub fn value(input: &str) -> VResult<Value> {
    alt((
        all_consuming(string),
        all_consuming(boolean),
        all_consuming(int),
        plain_string,
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_string() {
        assert_eq!(string("\"TestData\"").unwrap(), ("", Value::from("TestData")));
        assert_eq!(string("\"\"").unwrap(), ("", Value::from("")));
        assert_eq!(string("\"a\" b").unwrap(), (" b", Value::from("a")));
    }

    #[test]
    fn test_quoted_string_escapes() {
        let (rest, parsed) = string(r#""C:\\Tools\n\t\"x\"""#).unwrap();
        assert_eq!(rest, "");
        assert!(parsed.string_equals("C:\\Tools\n\t\"x\""));
    }

    #[test]
    fn test_boolean() {
        assert_eq!(boolean("true").unwrap(), ("", Value::Bool(true)));
        assert_eq!(boolean("false").unwrap(), ("", Value::Bool(false)));
        assert!(boolean("True").is_err());
    }

    #[test]
    fn test_int() {
        assert_eq!(int("0").unwrap(), ("", Value::Int(0)));
        assert_eq!(int("-42").unwrap(), ("", Value::Int(-42)));
        assert_eq!(int("+5").unwrap(), ("", Value::Int(5)));
        assert!(int("99999999999999999999").is_err());
    }

    #[test]
    fn test_value_falls_back_to_plain() {
        for text in [
            "1.0.0.0",
            "https://localhost:5001/TestKit",
            "trueish",
            "\"unterminated",
            "99999999999999999999",
            "12 monkeys",
        ] {
            let (rest, parsed) = value(text).unwrap();
            assert_eq!(rest, "");
            assert!(parsed.string_equals(text), "{}", text);
        }
    }

    #[test]
    fn test_value_scalars() {
        assert_eq!(value("true").unwrap().1, Value::Bool(true));
        assert_eq!(value("7").unwrap().1, Value::Int(7));
        assert_eq!(value("\"7\"").unwrap().1, Value::String("7".into()));
        assert_eq!(value("\"false\"").unwrap().1, Value::String("false".into()));
    }
}

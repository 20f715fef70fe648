//! Canonical text emission for values, columns and row blocks.

use chrono::SecondsFormat;
use tabula_core::{DataType, Value};

/// Everything the writer needs to emit one column declaration.
pub struct ColumnExport<'a> {
    pub name: &'a str,
    pub primary_key: bool,
    pub foreign_key: Option<&'a str>,
    pub data_type: DataType,
    pub generator: Option<&'a Value>,
}

/// Renders a value in its canonical text form.
///
/// `force` collapses dates and regexps to their plain quoted string forms.
pub fn write_value(value: &Value, force: bool) -> String {
    let mut out = String::new();
    emit_value(&mut out, value, force);
    out
}

fn emit_value(out: &mut String, value: &Value, force: bool) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(*n)),
        Value::String(s) => emit_quoted(out, s),
        Value::Date(d) => {
            let text = d.to_rfc3339_opts(SecondsFormat::AutoSi, true);
            if force {
                emit_quoted(out, &text);
            } else {
                out.push_str("Date(");
                emit_quoted(out, &text);
                out.push(')');
            }
        }
        Value::Regexp(r) => {
            if force {
                emit_quoted(out, &format!("/{}/", r.pattern()));
            } else {
                out.push('/');
                for c in r.pattern().chars() {
                    match c {
                        '\\' | '/' => {
                            out.push('\\');
                            out.push(c);
                        }
                        _ => out.push(c),
                    }
                }
                out.push('/');
            }
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                emit_value(out, item, force);
            }
            out.push(']');
        }
        Value::Object(fields) => {
            out.push('{');
            for (i, (key, item)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                emit_quoted(out, key);
                out.push(':');
                emit_value(out, item, force);
            }
            out.push('}');
        }
    }
}

/// Renders a number without a trailing `.0` when it is integral.
///
/// Non-finite values get their own tokens so they survive a re-import.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn emit_quoted(out: &mut String, s: &str) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push('\'');
}

/// Renders one column declaration.
///
/// The generator entry is present only when the writer was handed one, so
/// callers decide equivalence with the type's built-in default.
pub fn write_column(column: &ColumnExport<'_>, force: bool) -> String {
    let mut out = String::new();
    out.push_str("{'name':");
    emit_quoted(&mut out, column.name);
    if column.primary_key {
        out.push_str(",'pk':true");
    }
    match column.foreign_key {
        Some(table) => {
            out.push_str(",'fk':");
            emit_quoted(&mut out, table);
        }
        None => {
            out.push_str(",'type':");
            emit_quoted(&mut out, column.data_type.as_str());
        }
    }
    if let Some(generator) = column.generator {
        out.push_str(",'generator':");
        emit_value(&mut out, generator, force);
    }
    out.push('}');
    out
}

/// Renders a full table block: schema then live rows in position order.
pub fn write_table<'a>(
    columns: &[ColumnExport<'_>],
    rows: impl Iterator<Item = &'a Vec<Value>>,
    force: bool,
) -> String {
    let mut out = String::new();
    out.push_str("{'columns':[");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&write_column(column, force));
    }
    out.push_str("],'rows':[");
    for (i, row) in rows.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('[');
        for (j, value) in row.iter().enumerate() {
            if j > 0 {
                out.push(',');
            }
            emit_value(&mut out, value, force);
        }
        out.push(']');
    }
    out.push_str("]}");
    out
}

/// Renders a database block from pre-rendered table blocks.
pub fn write_database<'a>(tables: impl Iterator<Item = (&'a str, String)>) -> String {
    let mut out = String::new();
    out.push('{');
    for (i, (name, block)) in tables.enumerate() {
        if i > 0 {
            out.push(',');
        }
        emit_quoted(&mut out, name);
        out.push(':');
        out.push_str(&block);
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tabula_core::RegexpValue;

    #[test]
    fn test_scalars() {
        assert_eq!(write_value(&Value::Null, false), "null");
        assert_eq!(write_value(&Value::Boolean(true), false), "true");
        assert_eq!(write_value(&Value::Number(2.0), false), "2");
        assert_eq!(write_value(&Value::Number(2.5), false), "2.5");
        assert_eq!(write_value(&"orange".into(), false), "'orange'");
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(write_value(&"it's".into(), false), r"'it\'s'");
        assert_eq!(write_value(&r"a\b".into(), false), r"'a\\b'");
    }

    #[test]
    fn test_date_forms() {
        let d = Utc.with_ymd_and_hms(2009, 6, 1, 12, 0, 0).unwrap();
        let v = Value::Date(d);
        assert_eq!(write_value(&v, false), "Date('2009-06-01T12:00:00Z')");
        assert_eq!(write_value(&v, true), "'2009-06-01T12:00:00Z'");
    }

    #[test]
    fn test_regexp_forms() {
        let v = Value::from(RegexpValue::new("^a+b$").unwrap());
        assert_eq!(write_value(&v, false), "/^a+b$/");
        assert_eq!(write_value(&v, true), "'/^a+b$/'");

        let slashed = Value::from(RegexpValue::new("a/b").unwrap());
        assert_eq!(write_value(&slashed, false), r"/a\/b/");
    }

    #[test]
    fn test_regexp_backslash_escapes() {
        let classes = Value::from(RegexpValue::new(r"\d+\.\d+").unwrap());
        assert_eq!(write_value(&classes, false), r"/\\d+\\.\\d+/");

        // A backslash directly before a slash must stay two separate
        // escapes, or the re-reader sees an escaped backslash and a bare
        // delimiter.
        let mixed = Value::from(RegexpValue::new(r"a\/b").unwrap());
        assert_eq!(write_value(&mixed, false), r"/a\\\/b/");
        assert_eq!(
            crate::parser::parse_value(&write_value(&mixed, false))
                .unwrap()
                .as_regexp()
                .unwrap()
                .pattern(),
            r"a\/b"
        );
    }

    #[test]
    fn test_nonfinite_numbers() {
        assert_eq!(write_value(&Value::Number(f64::INFINITY), false), "Infinity");
        assert_eq!(write_value(&Value::Number(f64::NEG_INFINITY), false), "-Infinity");
        assert_eq!(write_value(&Value::Number(f64::NAN), false), "NaN");
    }

    #[test]
    fn test_composites() {
        let v = Value::Array(vec![Value::Number(1.0), "x".into(), Value::Null]);
        assert_eq!(write_value(&v, false), "[1,'x',null]");

        let v = Value::Object(vec![
            ("a".into(), Value::Number(1.0)),
            ("b".into(), Value::Boolean(false)),
        ]);
        assert_eq!(write_value(&v, false), "{'a':1,'b':false}");
    }

    #[test]
    fn test_column_variants() {
        let typed = ColumnExport {
            name: "id",
            primary_key: true,
            foreign_key: None,
            data_type: DataType::Auto,
            generator: None,
        };
        assert_eq!(write_column(&typed, false), "{'name':'id','pk':true,'type':'auto'}");

        let fk = ColumnExport {
            name: "owner",
            primary_key: false,
            foreign_key: Some("users"),
            data_type: DataType::Number,
            generator: None,
        };
        assert_eq!(write_column(&fk, false), "{'name':'owner','fk':'users'}");

        let generated = ColumnExport {
            name: "state",
            primary_key: false,
            foreign_key: None,
            data_type: DataType::String,
            generator: Some(&Value::String("new".into())),
        };
        assert_eq!(
            write_column(&generated, false),
            "{'name':'state','type':'string','generator':'new'}"
        );
    }

    #[test]
    fn test_table_block() {
        let columns = vec![
            ColumnExport {
                name: "id",
                primary_key: true,
                foreign_key: None,
                data_type: DataType::Auto,
                generator: None,
            },
            ColumnExport {
                name: "name",
                primary_key: false,
                foreign_key: None,
                data_type: DataType::String,
                generator: None,
            },
        ];
        let rows = vec![
            vec![Value::Number(0.0), "apple".into()],
            vec![Value::Number(1.0), "pear".into()],
        ];
        assert_eq!(
            write_table(&columns, rows.iter(), false),
            "{'columns':[{'name':'id','pk':true,'type':'auto'},\
             {'name':'name','type':'string'}],'rows':[[0,'apple'],[1,'pear']]}"
        );
    }
}

//! Client-side binding of `?` placeholders.
//!
//! The ProxySQL admin interface only speaks the text protocol, so parameters
//! are inlined as SQL literals. Admin statements are evaluated by SQLite,
//! where a quote inside a string is escaped by doubling it and backslashes
//! have no special meaning.

use galera_hostgroups_core::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("statement has more placeholders than the {given} given parameters")]
    MissingParameter { given: usize },
    #[error("statement has {placeholders} placeholders but {given} parameters were given")]
    UnusedParameter { placeholders: usize, given: usize },
}

fn push_literal(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Int(v) => out.push_str(&v.to_string()),
        Value::Text(text) => {
            out.push('\'');
            for c in text.chars() {
                if c == '\'' {
                    out.push('\'');
                }
                out.push(c);
            }
            out.push('\'');
        }
    }
}

/// Substitute each `?` outside of quotes with the next parameter as a literal.
///
/// # Errors
///
/// Returns a [`RenderError`] if the number of placeholders and parameters differ.
pub fn render(sql: &str, params: &[Value]) -> Result<String, RenderError> {
    let mut out = String::with_capacity(sql.len() + params.len() * 8);
    let mut params_iter = params.iter();
    let mut quote: Option<char> = None;
    let mut used = 0;

    for c in sql.chars() {
        match (quote, c) {
            (None, '\'' | '"' | '`') => {
                quote = Some(c);
                out.push(c);
            }
            // a doubled quote reopens right away, which needs no special case
            (Some(open), _) if c == open => {
                quote = None;
                out.push(c);
            }
            (None, '?') => {
                let value = params_iter
                    .next()
                    .ok_or(RenderError::MissingParameter {
                        given: params.len(),
                    })?;
                push_literal(&mut out, value);
                used += 1;
            }
            _ => out.push(c),
        }
    }

    if used == params.len() {
        Ok(out)
    } else {
        Err(RenderError::UnusedParameter {
            placeholders: used,
            given: params.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_integers_and_text() {
        let sql = render(
            "UPDATE mysql_galera_hostgroups SET comment = ? WHERE writer_hostgroup = ?",
            &[Value::from("prod"), Value::Int(10)],
        )
        .unwrap();
        assert_eq!(
            sql,
            "UPDATE mysql_galera_hostgroups SET comment = 'prod' WHERE writer_hostgroup = 10"
        );
    }

    #[test]
    fn test_render_escapes_quotes() {
        let sql = render("SELECT ?", &[Value::from("it's a \\ test")]).unwrap();
        assert_eq!(sql, "SELECT 'it''s a \\ test'");
    }

    #[test]
    fn test_render_null() {
        assert_eq!(render("SELECT ?", &[Value::Null]).unwrap(), "SELECT NULL");
    }

    #[test]
    fn test_placeholders_inside_quotes_are_kept() {
        let sql = render("SELECT '?', \"?\", 'a''?' WHERE x = ?", &[Value::Int(-1)]).unwrap();
        assert_eq!(sql, "SELECT '?', \"?\", 'a''?' WHERE x = -1");
    }

    #[test]
    fn test_parameter_count_mismatch() {
        assert_eq!(
            render("SELECT ?, ?", &[Value::Int(1)]),
            Err(RenderError::MissingParameter { given: 1 })
        );
        assert_eq!(
            render("SELECT ?", &[Value::Int(1), Value::Int(2)]),
            Err(RenderError::UnusedParameter {
                placeholders: 1,
                given: 2,
            })
        );
    }
}

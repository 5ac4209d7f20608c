use tokio_postgres::types::ToSql;

pub type PgParam = dyn ToSql + Sync;
pub type PgParamBox = Box<dyn ToSql + Sync + Send>;

/// Accumulates `AND`-joined conditions with positional parameters.
///
/// Conditions are templates where `{}` stands for the parameter slot,
/// e.g. `"name ILIKE {}"` becomes `name ILIKE $2`.
#[derive(Default)]
pub struct WhereBuilder {
    clauses: Vec<String>,
    params: Vec<PgParamBox>,
}

impl WhereBuilder {
    pub fn new() -> Self { Self::default() }

    /// Add `column = $n` when `value` is present.
    pub fn eq<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        if let Some(value) = value {
            self.condition(&format!("{column} = {{}}"), value);
        }
        self
    }

    pub fn condition<T>(&mut self, template: &str, value: T) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        let slot = self.bind(value);
        self.clauses.push(template.replace("{}", &slot));
        self
    }

    /// Register a parameter that is not part of the WHERE clause, such as
    /// LIMIT or OFFSET, returning its placeholder.
    pub fn bind<T>(&mut self, value: T) -> String
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.params.push(Box::new(value));
        format!("${}", self.params.len())
    }

    /// ` WHERE a AND b`, or an empty string without conditions.
    pub fn clause(&self) -> String {
        if self.clauses.is_empty() {
            return String::new();
        }
        format!(" WHERE {}", self.clauses.join(" AND "))
    }

    pub fn params(&self) -> Vec<&PgParam> {
        self.params
            .iter()
            .map(|param| param.as_ref() as &PgParam)
            .collect()
    }
}

/// Escape `%`, `_` and `\` for a literal match inside a LIKE pattern.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder() {
        let builder = WhereBuilder::new();
        assert_eq!(builder.clause(), "");
        assert!(builder.params().is_empty());
    }

    #[test]
    fn test_conditions_are_numbered() {
        let mut builder = WhereBuilder::new();
        builder
            .eq("status", Some("todo".to_string()))
            .eq("assignee", None::<String>)
            .condition("title ILIKE {}", "%x%".to_string());
        let limit = builder.bind(20_i64);

        assert_eq!(builder.clause(), " WHERE status = $1 AND title ILIKE $2");
        assert_eq!(limit, "$3");
        assert_eq!(builder.params().len(), 3);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}

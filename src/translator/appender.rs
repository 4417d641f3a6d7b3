//! Text sink used by every renderer.

/// Accumulates SQL text. Renderers emit characters only through this trait.
pub trait SqlAppender {
    fn append_sql(&mut self, fragment: &str);

    fn append_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.append_sql(c.encode_utf8(&mut buf));
    }

    fn append_int(&mut self, value: i64) {
        self.append_sql(&value.to_string());
    }

    /// Append `value` as a single-quoted SQL string literal.
    fn append_single_quote_escaped_string(&mut self, value: &str) {
        self.append_char('\'');
        self.append_sql(&value.replace('\'', "''"));
        self.append_char('\'');
    }

    /// Append `value` wrapped in double quotes, doubling embedded quotes.
    fn append_double_quote_escaped_string(&mut self, value: &str) {
        self.append_char('"');
        self.append_sql(&value.replace('"', "\"\""));
        self.append_char('"');
    }
}

impl SqlAppender for String {
    fn append_sql(&mut self, fragment: &str) {
        self.push_str(fragment);
    }

    fn append_char(&mut self, c: char) {
        self.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaping() {
        let mut sql = String::new();
        sql.append_single_quote_escaped_string("it's");
        sql.append_char(' ');
        sql.append_double_quote_escaped_string("a\"b");
        sql.append_char(' ');
        sql.append_int(-3);
        assert_eq!(sql, "'it''s' \"a\"\"b\" -3");
    }
}

//! Clause context tracking.

/// The SQL clause currently being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    Select,
    From,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Offset,
    Fetch,
    /// Ordering arguments of an ordered-set or ordered aggregate
    WithinGroup,
    Insert,
    Values,
    Update,
    Set,
    Delete,
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Clause::Select => "SELECT",
            Clause::From => "FROM",
            Clause::Where => "WHERE",
            Clause::GroupBy => "GROUP BY",
            Clause::Having => "HAVING",
            Clause::OrderBy => "ORDER BY",
            Clause::Offset => "OFFSET",
            Clause::Fetch => "FETCH",
            Clause::WithinGroup => "WITHIN GROUP",
            Clause::Insert => "INSERT",
            Clause::Values => "VALUES",
            Clause::Update => "UPDATE",
            Clause::Set => "SET",
            Clause::Delete => "DELETE",
        };
        write!(f, "{}", name)
    }
}

/// Stack of clause markers owned by one translator.
///
/// Pushes and pops are paired by `SqlAstTranslator::with_clause`; the stack
/// is empty before and after every top-level translation.
#[derive(Debug, Default, Clone)]
pub struct ClauseStack {
    clauses: Vec<Clause>,
}

impl ClauseStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    pub(crate) fn pop(&mut self) -> Option<Clause> {
        self.clauses.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.clauses.clear();
    }

    /// The innermost clause, if any.
    pub fn current(&self) -> Option<Clause> {
        self.clauses.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Whether `clause` is anywhere on the stack.
    pub fn contains(&self, clause: Clause) -> bool {
        self.clauses.contains(&clause)
    }

    /// Clauses from outermost to innermost.
    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }
}

//! Recursive-descent parser for command text.
//!
//! ```text
//! command   := "df" "=" "df" step* ";"?
//! step      := "." IDENT "(" args? ")"
//!            | "[" expr "]"                      -- filter
//!            | "[" "[" name ("," name)* "]" "]"  -- select
//! args      := arg ("," arg)* ","?
//! arg       := IDENT "=" value | value
//! value     := "[" name ("," name)* "]" | expr
//!
//! expr      := and ("or" and)*
//! and       := not ("and" not)*
//! not       := "not" not | cmp
//! cmp       := sum (("=="|"!="|"<"|"<="|">"|">=") sum)?
//! sum       := product (("+"|"-") product)*
//! product   := unary (("*"|"/"|"%") unary)*
//! unary     := "-" unary | primary
//! primary   := NUMBER | STRING | true | false | null
//!            | "col" "(" STRING ")" | "df" "[" STRING "]" | "df" "." IDENT
//!            | FUNCTION "(" expr ("," expr)* ")" | IDENT | "(" expr ")"
//! ```
//!
//! `&`, `|`, `~` and `!` are accepted as spellings of and/or/not.

use dna_core::dataset::Value;

use crate::ast::{BinaryOp, Expr, Function, Operation, Program, SortKey, UnaryOp};
use crate::error::TransformError;
use crate::lexer::{Spanned, Token, tokenize};

const DEFAULT_HEAD: usize = 5;

enum ArgValue {
    Expr(Expr),
    List(Vec<String>),
}

struct Arg {
    keyword: Option<String>,
    value: ArgValue,
    position: usize,
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end: usize,
}

/// Parse a full `df = df...` command.
///
/// # Errors
///
/// - [`TransformError::MissingPrefix`] when the text does not open with `df =`
/// - [`TransformError::Syntax`] for malformed text
/// - [`TransformError::UnknownOperation`] / [`TransformError::UnknownFunction`]
///   for names outside the whitelist
/// - [`TransformError::InvalidArguments`] for bad operation or function arguments
pub fn parse(command: &str) -> Result<Program, TransformError> {
    let tokens = tokenize(command)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: command.chars().count(),
    };

    if !(parser.eat_ident("df") && parser.eat(&Token::Assign)) {
        return Err(TransformError::MissingPrefix);
    }
    if !parser.eat_ident("df") {
        return Err(parser.error("expected 'df' after 'df ='"));
    }

    let mut operations = Vec::new();
    loop {
        match parser.peek() {
            None => break,
            Some(Token::Semicolon) => {
                parser.bump();
                if parser.peek().is_some() {
                    return Err(parser.error("only one statement is allowed"));
                }
                break;
            }
            Some(Token::Dot) => {
                parser.bump();
                operations.extend(parser.operation()?);
            }
            Some(Token::LBracket) => {
                parser.bump();
                operations.push(parser.index()?);
            }
            Some(_) => return Err(parser.error("expected '.' or end of command")),
        }
    }

    Ok(Program { operations })
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|s| &s.token)
    }

    fn position(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |s| s.position)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|s| s.token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_ident(&mut self, name: &str) -> bool {
        if matches!(self.peek(), Some(Token::Ident(n)) if n == name) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<(), TransformError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn error(&self, message: impl Into<String>) -> TransformError {
        TransformError::syntax(self.position(), message)
    }

    fn ident(&mut self) -> Result<String, TransformError> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.error("expected a name")),
        }
    }

    /// A column name: bare identifier or string literal.
    fn name(&mut self) -> Result<String, TransformError> {
        match self.peek() {
            Some(Token::Ident(n) | Token::Str(n)) => {
                let n = n.clone();
                self.pos += 1;
                Ok(n)
            }
            _ => Err(self.error("expected a column name")),
        }
    }

    /// `name, name, ...` up to (not including) the closing bracket.
    fn name_list(&mut self) -> Result<Vec<String>, TransformError> {
        let mut names = Vec::new();
        while self.peek() != Some(&Token::RBracket) {
            names.push(self.name()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RBracket, "']'")?;
        Ok(names)
    }

    // ── steps ──────────────────────────────────────────────────────────

    /// `df[...]` after the opening bracket.
    fn index(&mut self) -> Result<Operation, TransformError> {
        if self.eat(&Token::LBracket) {
            let names = self.name_list()?;
            self.expect(&Token::RBracket, "']'")?;
            if names.is_empty() {
                return Err(TransformError::args("select", "no columns given"));
            }
            return Ok(Operation::Select(names));
        }
        let predicate = self.expr()?;
        self.expect(&Token::RBracket, "']'")?;
        Ok(Operation::Filter(predicate))
    }

    fn operation(&mut self) -> Result<Vec<Operation>, TransformError> {
        let start = self.position();
        let name = self.ident()?;
        self.expect(&Token::LParen, "'('")?;
        let args = self.args()?;
        self.expect(&Token::RParen, "')'")?;

        let op = match name.as_str() {
            "filter" | "where" => filter_op(&name, args)?,
            "select" => Operation::Select(required_names(&name, args)?),
            "drop" => Operation::Drop(required_names(&name, args)?),
            "rename" => rename_op(&name, args)?,
            "derive" | "assign" | "with_column" => return derive_ops(&name, args),
            "sort" | "sort_values" => sort_op(&name, args, false)?,
            "sort_desc" => sort_op(&name, args, true)?,
            "head" | "limit" => head_op(&name, &args)?,
            "dropna" => Operation::DropNa(optional_names(&name, args)?),
            "fillna" => fillna_op(&name, args)?,
            "distinct" | "drop_duplicates" => Operation::Distinct(optional_names(&name, args)?),
            "promote_header" | "promote_headers" => {
                if !args.is_empty() {
                    return Err(TransformError::args(&name, "takes no arguments"));
                }
                Operation::PromoteHeader
            }
            _ => {
                tracing::debug!(operation = %name, position = start, "rejected operation");
                return Err(TransformError::UnknownOperation(name));
            }
        };
        Ok(vec![op])
    }

    fn args(&mut self) -> Result<Vec<Arg>, TransformError> {
        let mut args = Vec::new();
        while self.peek() != Some(&Token::RParen) {
            let position = self.position();
            let keyword = match (self.peek(), self.peek_at(1)) {
                (Some(Token::Ident(k)), Some(Token::Assign)) => {
                    let k = k.clone();
                    self.pos += 2;
                    Some(k)
                }
                _ => None,
            };
            let value = if self.eat(&Token::LBracket) {
                ArgValue::List(self.name_list()?)
            } else {
                ArgValue::Expr(self.expr()?)
            };
            args.push(Arg {
                keyword,
                value,
                position,
            });
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        Ok(args)
    }

    // ── expressions ────────────────────────────────────────────────────

    fn expr(&mut self) -> Result<Expr, TransformError> {
        let mut lhs = self.and_expr()?;
        while self.eat_ident("or") || self.eat(&Token::Pipe) {
            let rhs = self.and_expr()?;
            lhs = binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr, TransformError> {
        let mut lhs = self.not_expr()?;
        while self.eat_ident("and") || self.eat(&Token::Amp) {
            let rhs = self.not_expr()?;
            lhs = binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<Expr, TransformError> {
        if self.eat_ident("not") || self.eat(&Token::Tilde) || self.eat(&Token::Bang) {
            let inner = self.not_expr()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                expr: Box::new(inner),
            });
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, TransformError> {
        let lhs = self.sum()?;
        let op = match self.peek() {
            Some(Token::Eq) => BinaryOp::Eq,
            Some(Token::Ne) => BinaryOp::Ne,
            Some(Token::Lt) => BinaryOp::Lt,
            Some(Token::Le) => BinaryOp::Le,
            Some(Token::Gt) => BinaryOp::Gt,
            Some(Token::Ge) => BinaryOp::Ge,
            _ => return Ok(lhs),
        };
        self.bump();
        let rhs = self.sum()?;
        Ok(binary(op, lhs, rhs))
    }

    fn sum(&mut self) -> Result<Expr, TransformError> {
        let mut lhs = self.product()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.bump();
            let rhs = self.product()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn product(&mut self) -> Result<Expr, TransformError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.bump();
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn unary(&mut self) -> Result<Expr, TransformError> {
        if self.eat(&Token::Minus) {
            let inner = self.unary()?;
            return Ok(match inner {
                Expr::Literal(Value::Int(i)) => Expr::Literal(Value::Int(-i)),
                Expr::Literal(Value::Float(f)) => Expr::Literal(Value::Float(-f)),
                other => Expr::Unary {
                    op: UnaryOp::Neg,
                    expr: Box::new(other),
                },
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, TransformError> {
        let start = self.position();
        match self.bump() {
            Some(Token::Int(i)) => Ok(Expr::Literal(Value::Int(i))),
            Some(Token::Float(f)) => Ok(Expr::Literal(Value::Float(f))),
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::Text(s))),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => self.ident_expr(name, start),
            Some(_) => Err(TransformError::syntax(start, "expected an expression")),
            None => Err(TransformError::syntax(start, "unexpected end of command")),
        }
    }

    fn ident_expr(&mut self, name: String, start: usize) -> Result<Expr, TransformError> {
        match name.as_str() {
            "true" | "True" => return Ok(Expr::Literal(Value::Bool(true))),
            "false" | "False" => return Ok(Expr::Literal(Value::Bool(false))),
            "null" | "None" | "NULL" => return Ok(Expr::Literal(Value::Null)),
            "df" if self.eat(&Token::LBracket) => {
                let column = self.name()?;
                self.expect(&Token::RBracket, "']'")?;
                return Ok(Expr::Column(column));
            }
            "df" if self.eat(&Token::Dot) => return Ok(Expr::Column(self.ident()?)),
            _ => {}
        }

        if !self.eat(&Token::LParen) {
            return Ok(Expr::Column(name));
        }

        let mut args = Vec::new();
        while self.peek() != Some(&Token::RParen) {
            args.push(self.expr()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RParen, "')'")?;

        if name == "col" {
            return match args.as_slice() {
                [Expr::Literal(Value::Text(column))] => Ok(Expr::Column(column.clone())),
                _ => Err(TransformError::args("col", "expects one string argument")),
            };
        }

        let Some(func) = Function::from_name(&name) else {
            tracing::debug!(function = %name, position = start, "rejected function");
            return Err(TransformError::UnknownFunction(name));
        };
        let (min, max) = func.arity();
        if args.len() < min || max.is_some_and(|m| args.len() > m) {
            let expected = match max {
                Some(m) if m == min => format!("{min}"),
                Some(m) => format!("{min} to {m}"),
                None => format!("at least {min}"),
            };
            return Err(TransformError::args(
                func.name(),
                format!("expects {expected} argument(s), got {}", args.len()),
            ));
        }
        Ok(Expr::Call { func, args })
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

// ── operation builders ─────────────────────────────────────────────────

fn reject_keywords(op: &str, args: &[Arg]) -> Result<(), TransformError> {
    match args.iter().find_map(|a| a.keyword.as_deref()) {
        Some(k) => Err(TransformError::args(op, format!("unexpected keyword '{k}'"))),
        None => Ok(()),
    }
}

fn arg_names(op: &str, arg: Arg) -> Result<Vec<String>, TransformError> {
    match arg.value {
        ArgValue::List(names) => Ok(names),
        ArgValue::Expr(Expr::Column(name) | Expr::Literal(Value::Text(name))) => Ok(vec![name]),
        ArgValue::Expr(_) => Err(TransformError::args(
            op,
            format!("expected a column name at column {}", arg.position + 1),
        )),
    }
}

fn optional_names(op: &str, args: Vec<Arg>) -> Result<Vec<String>, TransformError> {
    let mut names = Vec::new();
    for arg in args {
        match arg.keyword.as_deref() {
            None | Some("subset" | "columns") => names.extend(arg_names(op, arg)?),
            Some(k) => return Err(TransformError::args(op, format!("unexpected keyword '{k}'"))),
        }
    }
    Ok(names)
}

fn required_names(op: &str, args: Vec<Arg>) -> Result<Vec<String>, TransformError> {
    let names = optional_names(op, args)?;
    if names.is_empty() {
        return Err(TransformError::args(op, "no columns given"));
    }
    Ok(names)
}

fn filter_op(op: &str, mut args: Vec<Arg>) -> Result<Operation, TransformError> {
    reject_keywords(op, &args)?;
    match (args.pop(), args.is_empty()) {
        (
            Some(Arg {
                value: ArgValue::Expr(predicate),
                ..
            }),
            true,
        ) => Ok(Operation::Filter(predicate)),
        _ => Err(TransformError::args(op, "expects exactly one predicate")),
    }
}

fn rename_op(op: &str, args: Vec<Arg>) -> Result<Operation, TransformError> {
    let mut pairs = Vec::new();
    let mut positional = Vec::new();
    for arg in args {
        match arg.keyword.clone() {
            Some(old) => {
                let mut new = arg_names(op, arg)?;
                match (new.pop(), new.is_empty()) {
                    (Some(new), true) => pairs.push((old, new)),
                    _ => return Err(TransformError::args(op, "expects one new name per column")),
                }
            }
            None => positional.extend(arg_names(op, arg)?),
        }
    }
    if positional.len() % 2 != 0 {
        return Err(TransformError::args(op, "positional names must come in pairs"));
    }
    let mut it = positional.into_iter();
    while let (Some(old), Some(new)) = (it.next(), it.next()) {
        pairs.push((old, new));
    }
    if pairs.is_empty() {
        return Err(TransformError::args(op, "no columns given"));
    }
    Ok(Operation::Rename(pairs))
}

fn derive_ops(op: &str, args: Vec<Arg>) -> Result<Vec<Operation>, TransformError> {
    let mut ops = Vec::new();
    let mut positional = Vec::new();
    for arg in args {
        match (arg.keyword, arg.value) {
            (Some(name), ArgValue::Expr(expr)) => ops.push(Operation::Derive { name, expr }),
            (None, ArgValue::Expr(expr)) => positional.push(expr),
            (_, ArgValue::List(_)) => {
                return Err(TransformError::args(op, "expected an expression, found a list"));
            }
        }
    }
    match positional.len() {
        0 => {}
        2 => {
            let mut it = positional.into_iter();
            if let (Some(Expr::Literal(Value::Text(name))), Some(expr)) = (it.next(), it.next()) {
                ops.push(Operation::Derive { name, expr });
            } else {
                return Err(TransformError::args(op, "expects (\"name\", expression)"));
            }
        }
        _ => return Err(TransformError::args(op, "expects name=expression")),
    }
    if ops.is_empty() {
        return Err(TransformError::args(op, "no columns given"));
    }
    Ok(ops)
}

fn sort_op(op: &str, args: Vec<Arg>, force_desc: bool) -> Result<Operation, TransformError> {
    let mut descending = force_desc;
    let mut columns = Vec::new();
    for arg in args {
        match arg.keyword.as_deref() {
            None | Some("by") => columns.extend(arg_names(op, arg)?),
            Some(k @ ("desc" | "descending" | "ascending")) => {
                let ArgValue::Expr(Expr::Literal(Value::Bool(flag))) = arg.value else {
                    return Err(TransformError::args(op, format!("'{k}' must be true or false")));
                };
                descending = if k == "ascending" { !flag } else { flag };
            }
            Some(k) => return Err(TransformError::args(op, format!("unexpected keyword '{k}'"))),
        }
    }
    if columns.is_empty() {
        return Err(TransformError::args(op, "no columns given"));
    }
    Ok(Operation::Sort(
        columns
            .into_iter()
            .map(|column| SortKey { column, descending })
            .collect(),
    ))
}

fn head_op(op: &str, args: &[Arg]) -> Result<Operation, TransformError> {
    reject_keywords(op, args)?;
    match args {
        [] => Ok(Operation::Head(DEFAULT_HEAD)),
        [
            Arg {
                value: ArgValue::Expr(Expr::Literal(Value::Int(n))),
                ..
            },
        ] => usize::try_from(*n)
            .map(Operation::Head)
            .map_err(|_| TransformError::args(op, "row count must not be negative")),
        _ => Err(TransformError::args(op, "expects one integer row count")),
    }
}

fn fillna_op(op: &str, args: Vec<Arg>) -> Result<Operation, TransformError> {
    let mut value = None;
    let mut columns = Vec::new();
    for arg in args {
        match (arg.keyword.as_deref(), value.is_some()) {
            (Some("value") | None, false) => match arg.value {
                ArgValue::Expr(Expr::Literal(v)) if !v.is_null() => value = Some(v),
                _ => return Err(TransformError::args(op, "fill value must be a literal")),
            },
            (None | Some("subset" | "columns"), true) => columns.extend(arg_names(op, arg)?),
            (Some(k), _) => {
                return Err(TransformError::args(op, format!("unexpected keyword '{k}'")));
            }
        }
    }
    let value = value.ok_or_else(|| TransformError::args(op, "missing fill value"))?;
    Ok(Operation::FillNa { value, columns })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn ops(command: &str) -> Vec<Operation> {
        parse(command).unwrap().operations
    }

    fn col(name: &str) -> Box<Expr> {
        Box::new(Expr::Column(name.into()))
    }

    #[test]
    fn identity_command() {
        assert!(ops("df = df").is_empty());
        assert!(ops("  df=df;  ").is_empty());
    }

    #[test]
    fn filter_with_precedence() {
        assert_eq!(
            ops("df = df.filter(amt > 100 and name != 'x' or flag)"),
            vec![Operation::Filter(Expr::Binary {
                op: BinaryOp::Or,
                lhs: Box::new(Expr::Binary {
                    op: BinaryOp::And,
                    lhs: Box::new(Expr::Binary {
                        op: BinaryOp::Gt,
                        lhs: col("amt"),
                        rhs: Box::new(Expr::Literal(Value::Int(100))),
                    }),
                    rhs: Box::new(Expr::Binary {
                        op: BinaryOp::Ne,
                        lhs: col("name"),
                        rhs: Box::new(Expr::Literal(Value::Text("x".into()))),
                    }),
                }),
                rhs: col("flag"),
            })]
        );
    }

    #[test]
    fn arithmetic_binds_tighter_than_comparison() {
        assert_eq!(
            ops("df = df.filter(a + b * 2 >= -1)"),
            vec![Operation::Filter(Expr::Binary {
                op: BinaryOp::Ge,
                lhs: Box::new(Expr::Binary {
                    op: BinaryOp::Add,
                    lhs: col("a"),
                    rhs: Box::new(Expr::Binary {
                        op: BinaryOp::Mul,
                        lhs: col("b"),
                        rhs: Box::new(Expr::Literal(Value::Int(2))),
                    }),
                }),
                rhs: Box::new(Expr::Literal(Value::Int(-1))),
            })]
        );
    }

    #[test]
    fn pandas_style_indexing() {
        assert_eq!(
            ops("df = df[df['amt'] > 100]"),
            ops("df = df.filter(amt > 100)")
        );
        assert_eq!(
            ops(r#"df = df[["id", "amt"]]"#),
            vec![Operation::Select(vec!["id".into(), "amt".into()])]
        );
        assert_eq!(
            ops("df = df[df.amt > 1]"),
            ops("df = df.filter(col('amt') > 1)")
        );
    }

    #[test]
    fn chained_operations() {
        let parsed = ops(
            r#"df = df.dropna("amt").derive(total = amt * 2, tag = upper(name)).sort(total, desc=true).head(10)"#,
        );
        let names: Vec<&str> = parsed.iter().map(Operation::name).collect();
        assert_eq!(
            names,
            vec!["dropna", "derive", "derive", "sort", "head"]
        );
        assert_eq!(
            parsed[3],
            Operation::Sort(vec![SortKey {
                column: "total".into(),
                descending: true
            }])
        );
        assert_eq!(parsed[4], Operation::Head(10));
    }

    #[test]
    fn rename_forms() {
        assert_eq!(
            ops(r#"df = df.rename(amt = "amount", "first name", "first")"#),
            vec![Operation::Rename(vec![
                ("amt".into(), "amount".into()),
                ("first name".into(), "first".into()),
            ])]
        );
    }

    #[test]
    fn keyword_lists_and_aliases() {
        assert_eq!(
            ops("df = df.drop_duplicates(subset=['a', 'b'])"),
            vec![Operation::Distinct(vec!["a".into(), "b".into()])]
        );
        assert_eq!(
            ops("df = df.sort_values(by='a', ascending=False)"),
            vec![Operation::Sort(vec![SortKey {
                column: "a".into(),
                descending: true
            }])]
        );
        assert_eq!(
            ops("df = df.fillna(0, amt)"),
            vec![Operation::FillNa {
                value: Value::Int(0),
                columns: vec!["amt".into()]
            }]
        );
        assert_eq!(ops("df = df.head()"), vec![Operation::Head(5)]);
    }

    #[rstest]
    #[case("df.filter(a > 1)")]
    #[case("x = df.head(1)")]
    #[case("import os")]
    #[case("")]
    fn missing_prefix(#[case] command: &str) {
        assert!(matches!(parse(command), Err(TransformError::MissingPrefix)));
    }

    #[rstest]
    #[case("df = df.eval('1+1')", "eval")]
    #[case("df = df.apply(lambda)", "apply")]
    #[case("df = df.to_csv('x')", "to_csv")]
    fn unknown_operations(#[case] command: &str, #[case] name: &str) {
        match parse(command) {
            Err(TransformError::UnknownOperation(n)) => assert_eq!(n, name),
            other => panic!("expected UnknownOperation, got {other:?}"),
        }
    }

    #[test]
    fn unknown_function() {
        assert!(matches!(
            parse("df = df.filter(exec('x'))"),
            Err(TransformError::UnknownFunction(n)) if n == "exec"
        ));
    }

    #[rstest]
    #[case("df = df.head(-1)")]
    #[case("df = df.head('x')")]
    #[case("df = df.select()")]
    #[case("df = df.filter()")]
    #[case("df = df.filter(a, b)")]
    #[case("df = df.fillna(amt)")]
    #[case("df = df.rename('a')")]
    #[case("df = df.sort(a, desc='yes')")]
    #[case("df = df.filter(lower(a, b))")]
    #[case("df = df.filter(col(a))")]
    fn invalid_arguments(#[case] command: &str) {
        assert!(
            matches!(parse(command), Err(TransformError::InvalidArguments { .. })),
            "{command}"
        );
    }

    #[rstest]
    #[case("df = df.filter(a > 1", 20)]
    #[case("df = df.head(1) df", 16)]
    #[case("df = df.head(1); df = df", 17)]
    #[case("df = df.filter(a >)", 18)]
    fn syntax_errors_carry_position(#[case] command: &str, #[case] position: usize) {
        match parse(command) {
            Err(TransformError::Syntax { position: p, .. }) => assert_eq!(p, position),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }
}

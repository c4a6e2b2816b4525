//! Recursive-descent parser for the parameter-text dialect.

use paramspace_core::{
    Distribution, GammaDist, NormalDist, Op, Parameter, ParameterRange, ParameterTree, Reference,
    UniformDist, Value,
};

use crate::error::TextError;
use crate::lexer::{line_col, tokenize, Spanned, Token};

/// Parse a complete parameter-text document into a tree.
///
/// # Errors
///
/// [`TextError::Lex`] or [`TextError::Parse`] for malformed input,
/// [`TextError::Tree`] when an entry cannot be inserted (reserved key
/// names) or a constant expression folds onto incompatible operands.
pub fn parse_str(source: &str) -> Result<ParameterTree, TextError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
    };
    let tree = parser.parse_tree()?;
    if parser.pos < parser.tokens.len() {
        return Err(parser.error("trailing input after the closing '}'"));
    }
    Ok(tree)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Spanned>,
    pos: usize,
}

/// One constructor-call argument: positional or `name=value`.
enum Arg {
    Positional(Value),
    Keyword(String, Value),
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek2(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1).map(|(t, _)| t)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, what: &str) -> Result<(), TextError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(&format!("expected {what}")))
        }
    }

    /// Error at the current token (or end of input).
    fn error(&self, message: &str) -> TextError {
        let offset = self
            .tokens
            .get(self.pos)
            .map_or(self.source.len(), |(_, span)| span.start);
        let (line, column) = line_col(self.source, offset);
        TextError::Parse {
            line,
            column,
            message: message.to_owned(),
        }
    }

    /// `{ key: value, ... }` with an optional trailing comma.
    fn parse_tree(&mut self) -> Result<ParameterTree, TextError> {
        self.expect(&Token::LBrace, "'{'")?;
        let mut tree = ParameterTree::new();
        loop {
            if self.eat(&Token::RBrace) {
                return Ok(tree);
            }
            let key = match self.peek() {
                Some(Token::Str(s)) => s.clone(),
                Some(Token::Ident(s)) => s.clone(),
                _ => return Err(self.error("expected a parameter key")),
            };
            self.pos += 1;
            self.expect(&Token::Colon, "':' after the key")?;
            let value = self.parse_expr()?;
            tree.add(&key, value)?;
            if !self.eat(&Token::Comma) {
                self.expect(&Token::RBrace, "',' or '}'")?;
                return Ok(tree);
            }
        }
    }

    /// Addition and subtraction, left-associative.
    fn parse_expr(&mut self) -> Result<Value, TextError> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => Op::Add,
                Some(Token::Minus) => Op::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_term()?;
            lhs = self.combine(lhs, op, rhs)?;
        }
    }

    /// Multiplication and division, left-associative.
    fn parse_term(&mut self) -> Result<Value, TextError> {
        let mut lhs = self.parse_power()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => Op::Mul,
                Some(Token::Slash) => Op::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_power()?;
            lhs = self.combine(lhs, op, rhs)?;
        }
    }

    /// Exponentiation, right-associative.
    fn parse_power(&mut self) -> Result<Value, TextError> {
        let base = self.parse_unary()?;
        if self.eat(&Token::DoubleStar) {
            let exponent = self.parse_power()?;
            return self.combine(base, Op::Pow, exponent);
        }
        Ok(base)
    }

    fn parse_unary(&mut self) -> Result<Value, TextError> {
        if self.eat(&Token::Minus) {
            let value = self.parse_unary()?;
            return match value {
                Value::Int(i) => Ok(Value::Int(-i)),
                Value::Real(r) => Ok(Value::Real(-r)),
                // -ref(...) defers as 0 - ref.
                Value::Ref(r) => Ok(Value::Ref(r.rsub(Value::Int(0)))),
                other => Err(self.error(&format!("cannot negate a {}", other.kind()))),
            };
        }
        self.parse_atom()
    }

    /// Fold an infix operator into a value pair. A reference on either
    /// side defers the operation; two plain values fold immediately.
    fn combine(&self, lhs: Value, op: Op, rhs: Value) -> Result<Value, TextError> {
        match (lhs, rhs) {
            (Value::Ref(r), rhs) => Ok(Value::Ref(r.with_operation(op, false, rhs))),
            (lhs, Value::Ref(r)) => Ok(Value::Ref(r.with_operation(op, true, lhs))),
            (lhs, rhs) => Ok(lhs.apply_op(op, &rhs)?),
        }
    }

    fn parse_atom(&mut self) -> Result<Value, TextError> {
        match self.peek() {
            Some(Token::LBrace) => Ok(Value::Tree(self.parse_tree()?)),
            Some(Token::LBracket) => self.parse_list(),
            Some(Token::LParen) => {
                self.pos += 1;
                let value = self.parse_expr()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(value)
            }
            Some(Token::Null) => {
                self.pos += 1;
                Ok(Value::Null)
            }
            Some(Token::True) => {
                self.pos += 1;
                Ok(Value::Bool(true))
            }
            Some(Token::False) => {
                self.pos += 1;
                Ok(Value::Bool(false))
            }
            Some(Token::Int(i)) => {
                let v = Value::Int(*i);
                self.pos += 1;
                Ok(v)
            }
            Some(Token::Real(r)) => {
                let v = Value::Real(*r);
                self.pos += 1;
                Ok(v)
            }
            Some(Token::Str(s)) => {
                let v = Value::Text(s.clone());
                self.pos += 1;
                Ok(v)
            }
            Some(Token::Ident(_)) => self.parse_ident(),
            _ => Err(self.error("expected a value")),
        }
    }

    fn parse_list(&mut self) -> Result<Value, TextError> {
        self.expect(&Token::LBracket, "'['")?;
        let mut items = Vec::new();
        loop {
            if self.eat(&Token::RBracket) {
                return Ok(Value::List(items));
            }
            items.push(self.parse_expr()?);
            if !self.eat(&Token::Comma) {
                self.expect(&Token::RBracket, "',' or ']'")?;
                return Ok(Value::List(items));
            }
        }
    }

    /// Constructor call or named constant.
    fn parse_ident(&mut self) -> Result<Value, TextError> {
        let name = match self.bump() {
            Some(Token::Ident(name)) => name,
            _ => return Err(self.error("expected an identifier")),
        };
        if self.peek() != Some(&Token::LParen) {
            return match name.as_str() {
                "pi" => Ok(Value::Real(std::f64::consts::PI)),
                "nan" => Ok(Value::Real(f64::NAN)),
                "inf" => Ok(Value::Real(f64::INFINITY)),
                _ => Err(self.error(&format!("unknown identifier '{name}'"))),
            };
        }
        let args = self.parse_args()?;
        self.build_call(&name, args)
    }

    fn parse_args(&mut self) -> Result<Vec<Arg>, TextError> {
        self.expect(&Token::LParen, "'('")?;
        let mut args = Vec::new();
        loop {
            if self.eat(&Token::RParen) {
                return Ok(args);
            }
            // `ident =` introduces a keyword argument.
            if matches!(self.peek(), Some(Token::Ident(_))) && self.peek2() == Some(&Token::Eq) {
                let keyword = match self.bump() {
                    Some(Token::Ident(k)) => k,
                    _ => return Err(self.error("expected a keyword name")),
                };
                self.pos += 1; // '='
                args.push(Arg::Keyword(keyword, self.parse_expr()?));
            } else {
                args.push(Arg::Positional(self.parse_expr()?));
            }
            if !self.eat(&Token::Comma) {
                self.expect(&Token::RParen, "',' or ')'")?;
                return Ok(args);
            }
        }
    }

    fn build_call(&self, name: &str, args: Vec<Arg>) -> Result<Value, TextError> {
        let mut positional = Vec::new();
        let mut keywords = Vec::new();
        for arg in args {
            match arg {
                Arg::Positional(v) => positional.push(v),
                Arg::Keyword(k, v) => keywords.push((k, v)),
            }
        }
        match name {
            "ref" => self.build_ref(positional, keywords),
            "range" => self.build_range(positional, keywords),
            "param" => self.build_param(positional, keywords),
            "normal" | "uniform" | "gamma" => self.build_dist(name, positional, keywords),
            _ => Err(self.error(&format!("unknown constructor '{name}'"))),
        }
    }

    fn build_ref(
        &self,
        positional: Vec<Value>,
        keywords: Vec<(String, Value)>,
    ) -> Result<Value, TextError> {
        if !keywords.is_empty() || positional.len() != 1 {
            return Err(self.error("ref() takes exactly one path string"));
        }
        match positional.into_iter().next() {
            Some(Value::Text(path)) => Ok(Value::Ref(Reference::to(path))),
            _ => Err(self.error("ref() takes exactly one path string")),
        }
    }

    fn build_range(
        &self,
        positional: Vec<Value>,
        keywords: Vec<(String, Value)>,
    ) -> Result<Value, TextError> {
        if positional.len() != 1 {
            return Err(self.error("range() takes exactly one candidate list"));
        }
        let values = match positional.into_iter().next() {
            Some(Value::List(values)) => values,
            _ => return Err(self.error("range() takes exactly one candidate list")),
        };
        let mut range = ParameterRange::new(values);
        for (keyword, value) in keywords {
            match (keyword.as_str(), value) {
                ("units", Value::Text(u)) => range = range.with_units(u),
                ("name", Value::Text(n)) => range = range.with_name(n),
                ("shuffle_seed", Value::Int(seed)) => {
                    let candidates = range.values().to_vec();
                    let name = range.name.clone();
                    let units = range.units.clone();
                    range = ParameterRange::shuffled(candidates, seed as u64);
                    range.name = name;
                    range.units = units;
                }
                (other, _) => {
                    return Err(self.error(&format!("range() has no '{other}' argument")))
                }
            }
        }
        Ok(Value::Range(range))
    }

    fn build_param(
        &self,
        positional: Vec<Value>,
        keywords: Vec<(String, Value)>,
    ) -> Result<Value, TextError> {
        let scalar = match positional.as_slice() {
            [v] => v
                .as_f64()
                .ok_or_else(|| self.error("param() takes one numeric value"))?,
            _ => return Err(self.error("param() takes one numeric value")),
        };
        let mut parameter = Parameter::new(scalar);
        for (keyword, value) in keywords {
            match (keyword.as_str(), value) {
                ("name", Value::Text(n)) => parameter.name = n,
                ("units", Value::Text(u)) => parameter.units = Some(u),
                (other, _) => {
                    return Err(self.error(&format!("param() has no '{other}' argument")))
                }
            }
        }
        Ok(Value::Param(parameter))
    }

    fn build_dist(
        &self,
        name: &str,
        positional: Vec<Value>,
        keywords: Vec<(String, Value)>,
    ) -> Result<Value, TextError> {
        let mut first = None;
        let mut second = None;
        let mut moments = false;
        let mut seed = None;
        match positional.as_slice() {
            [] => {}
            [a, b] => {
                first = Some(self.numeric(a)?);
                second = Some(self.numeric(b)?);
            }
            _ => {
                return Err(self.error(&format!(
                    "{name}() takes two positional parameters or keywords"
                )))
            }
        }
        for (keyword, value) in keywords {
            match (name, keyword.as_str()) {
                (_, "seed") => match value {
                    Value::Int(s) => seed = Some(s as u64),
                    _ => return Err(self.error("seed must be an integer")),
                },
                ("normal", "mean") | ("uniform", "min") | ("gamma", "shape") => {
                    first = Some(self.numeric(&value)?);
                }
                ("normal", "std") | ("uniform", "max") | ("gamma", "scale") => {
                    second = Some(self.numeric(&value)?);
                }
                ("gamma", "mean") => {
                    moments = true;
                    first = Some(self.numeric(&value)?);
                }
                ("gamma", "std") => {
                    moments = true;
                    second = Some(self.numeric(&value)?);
                }
                (_, other) => {
                    return Err(self.error(&format!("{name}() has no '{other}' argument")))
                }
            }
        }
        let dist = match name {
            "normal" => {
                let (mean, std) = (first.unwrap_or(0.0), second.unwrap_or(1.0));
                Distribution::Normal(match seed {
                    Some(s) => NormalDist::with_seed(mean, std, s),
                    None => NormalDist::new(mean, std),
                })
            }
            "uniform" => {
                let (min, max) = (first.unwrap_or(0.0), second.unwrap_or(1.0));
                Distribution::Uniform(match seed {
                    Some(s) => UniformDist::with_seed(min, max, s),
                    None => UniformDist::new(min, max),
                })
            }
            _ => {
                let (a, b) = (first.unwrap_or(1.0), second.unwrap_or(1.0));
                let mut gamma = if moments {
                    GammaDist::from_mean_std(a, b)
                } else {
                    GammaDist::new(a, b)
                };
                if let Some(s) = seed {
                    gamma = if moments {
                        let (shape, scale) = (gamma.shape, gamma.scale);
                        GammaDist::with_seed(shape, scale, s)
                    } else {
                        GammaDist::with_seed(a, b, s)
                    };
                }
                Distribution::Gamma(gamma)
            }
        };
        Ok(Value::Dist(dist))
    }

    fn numeric(&self, value: &Value) -> Result<f64, TextError> {
        value
            .as_f64()
            .ok_or_else(|| self.error(&format!("expected a number, got {}", value.kind())))
    }
}

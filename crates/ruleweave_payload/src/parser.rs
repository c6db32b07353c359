//! Parser for formula text.
//!
//! The parser converts a stream of tokens into an [`Expr`] tree using
//! precedence climbing. From loosest to tightest binding: `+ -`, `* / %`,
//! unary minus, `^` (right associative), then literals, variables, calls and
//! parenthesized expressions.
//!
//! Nesting is bounded by [`MAX_DEPTH`]. Parentheses, prefix operators,
//! exponents and operator chains all count toward it, so the parsed tree
//! can be evaluated and dropped without exhausting the stack.

use ruleweave_foundation::{Error, Result};

use crate::expr::{BinaryOp, Expr, Function};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Deepest expression tree the parser will build.
pub const MAX_DEPTH: usize = 256;

/// Parser for formula source text.
pub struct Parser<'src> {
    /// The lexer providing tokens.
    lexer: Lexer<'src>,
    /// Current token (lookahead).
    current: Token,
    /// Names a variable reference must come from, if restricted.
    declared: Option<&'src [&'src str]>,
    /// Current nesting depth.
    depth: usize,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            declared: None,
            depth: 0,
        }
    }

    /// Restricts variable references to the given names.
    #[must_use]
    pub fn with_declared(mut self, declared: &'src [&'src str]) -> Self {
        self.declared = Some(declared);
        self
    }

    /// Parses the whole source as one expression.
    ///
    /// # Errors
    /// Returns a parse error for malformed text or nesting past
    /// [`MAX_DEPTH`], or `UndefinedVariable` for a reference outside the
    /// declared names.
    pub fn parse(mut self) -> Result<Expr> {
        let expr = self.parse_additive()?;
        if self.current.kind != TokenKind::Eof {
            return Err(self.unexpected("end of input"));
        }
        Ok(expr)
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    /// Descends one level, failing past [`MAX_DEPTH`].
    fn nest(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::parse(
                format!("formula nests deeper than {MAX_DEPTH} levels"),
                self.current.position,
            ));
        }
        Ok(())
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let depth = self.depth;
        self.nest()?;
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => {
                    self.depth = depth;
                    return Ok(lhs);
                }
            };
            // Each link deepens the left-leaning tree.
            self.nest()?;
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let depth = self.depth;
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => {
                    self.depth = depth;
                    return Ok(lhs);
                }
            };
            self.nest()?;
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let depth = self.depth;
        let expr = match self.current.kind {
            TokenKind::Minus => {
                self.nest()?;
                self.advance();
                // Fold negative literals so `-3` stays a plain number.
                match self.parse_unary()? {
                    Expr::Number(n) => Expr::Number(-n),
                    inner => Expr::Neg(Box::new(inner)),
                }
            }
            TokenKind::Plus => {
                self.nest()?;
                self.advance();
                self.parse_unary()?
            }
            _ => self.parse_power()?,
        };
        self.depth = depth;
        Ok(expr)
    }

    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_primary()?;
        if self.current.kind == TokenKind::Caret {
            let depth = self.depth;
            self.nest()?;
            self.advance();
            // Right associative: 2^3^2 == 2^(3^2); -x binds looser than ^.
            let exponent = self.parse_unary()?;
            self.depth = depth;
            return Ok(Expr::Binary(
                BinaryOp::Pow,
                Box::new(base),
                Box::new(exponent),
            ));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match &self.current.kind {
            TokenKind::Number(n) => {
                let n = *n;
                self.advance();
                Ok(Expr::Number(n))
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                let position = self.current.position;
                self.advance();
                if self.current.kind == TokenKind::LParen {
                    self.parse_call(&name, position)
                } else {
                    self.variable(name)
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_additive()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Error(message) => Err(Error::parse(message.clone(), self.current.position)),
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_call(&mut self, name: &str, position: usize) -> Result<Expr> {
        let function = Function::from_name(name)
            .ok_or_else(|| Error::parse(format!("unknown function: {name}"), position))?;

        // Consume '('
        self.advance();
        let mut args = Vec::new();
        if self.current.kind != TokenKind::RParen {
            loop {
                args.push(self.parse_additive()?);
                if self.current.kind == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;

        if !function.accepts(args.len()) {
            return Err(Error::parse(
                format!("{} does not take {} argument(s)", function.name(), args.len()),
                position,
            ));
        }
        Ok(Expr::Call(function, args))
    }

    fn variable(&self, name: String) -> Result<Expr> {
        if let Some(declared) = self.declared {
            if !declared.contains(&name.as_str()) {
                return Err(Error::undefined_variable(name));
            }
        }
        Ok(Expr::Variable(name))
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<()> {
        if self.current.kind == *kind {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(kind.name()))
        }
    }

    fn unexpected(&self, expected: &str) -> Error {
        Error::parse(
            format!("expected {expected}, found {}", self.current.kind.name()),
            self.current.position,
        )
    }
}

//! Parser for the textual clause syntax.
//!
//! ```text
//! clause := atom [ ":-" atom { "," atom } ] "."
//! atom   := name "(" term { "," term } ")"
//! term   := identifier
//! ```

use super::{Atom, Clause, Term};
use crate::ClauseError;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    LParen,
    RParen,
    Comma,
    Neck,
    Dot,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("'{}'", name),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Neck => "':-'".to_string(),
            Token::Dot => "'.'".to_string(),
        }
    }
}

fn syntax(offset: usize, message: impl Into<String>) -> ClauseError {
    ClauseError::Syntax {
        offset,
        message: message.into(),
    }
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, ClauseError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            '.' => Token::Dot,
            ':' => match chars.next() {
                Some((_, '-')) => Token::Neck,
                _ => return Err(syntax(offset, "expected ':-'")),
            },
            c if c.is_ascii_alphanumeric() || c == '_' => {
                let mut name = String::from(c);
                while let Some(&(_, next)) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                Token::Ident(name)
            }
            other => return Err(syntax(offset, format!("unexpected character '{}'", other))),
        };
        tokens.push((offset, token));
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn new(text: &str) -> Result<Self, ClauseError> {
        Ok(Self {
            tokens: tokenize(text)?,
            pos: 0,
            end: text.len(),
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, token)| token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(offset, _)| *offset)
            .unwrap_or(self.end)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, token)| token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), ClauseError> {
        let offset = self.offset();
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(syntax(
                offset,
                format!("expected {} but found {}", expected.describe(), token.describe()),
            )),
            None => Err(syntax(offset, format!("expected {} but input ended", expected.describe()))),
        }
    }

    fn identifier(&mut self) -> Result<String, ClauseError> {
        let offset = self.offset();
        match self.next() {
            Some(Token::Ident(name)) => Ok(name),
            Some(token) => Err(syntax(offset, format!("expected a name but found {}", token.describe()))),
            None => Err(syntax(offset, "expected a name but input ended")),
        }
    }

    fn atom(&mut self) -> Result<Atom, ClauseError> {
        let predicate = self.identifier()?;
        self.expect(Token::LParen)?;

        let mut args = vec![Term::from_identifier(self.identifier()?)];
        while self.peek() == Some(&Token::Comma) {
            self.next();
            args.push(Term::from_identifier(self.identifier()?));
        }
        self.expect(Token::RParen)?;

        Ok(Atom { predicate, args })
    }

    fn finish(&self) -> Result<(), ClauseError> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(syntax(
                self.offset(),
                format!("unexpected trailing {}", token.describe()),
            )),
        }
    }
}

/// Parse a clause such as `mortal(X) :- human(X).`
pub(crate) fn parse_clause(text: &str) -> Result<Clause, ClauseError> {
    let mut parser = Parser::new(text)?;
    let head = parser.atom()?;

    let mut body = Vec::new();
    if parser.peek() == Some(&Token::Neck) {
        parser.next();
        body.push(parser.atom()?);
        while parser.peek() == Some(&Token::Comma) {
            parser.next();
            body.push(parser.atom()?);
        }
    }
    parser.expect(Token::Dot)?;
    parser.finish()?;

    Ok(Clause::from_parts(head, body))
}

/// Parse a goal such as `human(X)`; a trailing `.` is accepted.
pub(crate) fn parse_goal(text: &str) -> Result<Atom, ClauseError> {
    let mut parser = Parser::new(text)?;
    let atom = parser.atom()?;
    if parser.peek() == Some(&Token::Dot) {
        parser.next();
    }
    parser.finish()?;
    Ok(atom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fact() {
        let clause = parse_clause("teacher(socrates, plato).").unwrap();
        assert!(clause.is_fact());
        assert_eq!(clause.head.predicate, "teacher");
        assert_eq!(
            clause.head.args,
            vec![Term::constant("socrates"), Term::constant("plato")]
        );
    }

    #[test]
    fn test_parse_rule() {
        let clause = parse_clause("philosopher(X) :- human(X), teacher(X, _).").unwrap();
        assert!(!clause.is_fact());
        assert_eq!(clause.body.len(), 2);
        assert_eq!(clause.body[1].args[1], Term::variable("_"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_clause("human(socrates)"),
            Err(ClauseError::Syntax { .. })
        ));
        assert!(matches!(
            parse_clause("human socrates."),
            Err(ClauseError::Syntax { .. })
        ));
        assert!(matches!(
            parse_clause("mortal(X) :- ."),
            Err(ClauseError::Syntax { .. })
        ));
        assert!(matches!(
            parse_clause("mortal(X) : human(X)."),
            Err(ClauseError::Syntax { offset: 10, .. })
        ));
        assert!(matches!(
            parse_clause("human(socrates). extra"),
            Err(ClauseError::Syntax { .. })
        ));
        assert!(matches!(
            parse_clause("human(soc$rates)."),
            Err(ClauseError::Syntax { offset: 9, .. })
        ));
    }

    #[test]
    fn test_parse_goal() {
        assert_eq!(
            parse_goal("mortal(socrates)").unwrap(),
            parse_goal("mortal(socrates).").unwrap()
        );
        assert!(parse_goal("mortal(socrates) :- human(socrates).").is_err());
        assert!(parse_goal("").is_err());
    }
}

//! Character scanner shared by the statement and column splitters.
//!
//! The scanner walks definition text one character at a time and classifies
//! every character as structural code, part of a quoted literal/identifier,
//! or part of a comment. It also tracks parenthesis depth so callers can
//! split on delimiters that appear only at the top level.

/// Classification of a scanned character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Structural SQL text (keywords, identifiers, punctuation, whitespace).
    Code,
    /// Inside a `'string'`, `"string"` or `` `identifier` ``, quotes included.
    Quoted,
    /// Inside a `-- line`, `# line` or `/* block */` comment.
    Comment,
}

/// A single scanned character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanned {
    /// Byte offset of the character in the input.
    pub offset: usize,
    /// The character itself.
    pub ch: char,
    /// How the character was classified.
    pub class: CharClass,
    /// Parenthesis depth after this character was consumed.
    pub depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    Quoted { quote: char, escaped: bool },
    LineComment,
    BlockComment { star: bool },
}

/// Quote- and comment-aware character scanner.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
    state: State,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner over the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
            state: State::Code,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn emit(&self, offset: usize, ch: char, class: CharClass) -> Scanned {
        Scanned {
            offset,
            ch,
            class,
            depth: self.depth,
        }
    }

    fn scan_code(&mut self, offset: usize, ch: char) -> Scanned {
        match ch {
            '\'' | '"' | '`' => {
                self.state = State::Quoted {
                    quote: ch,
                    escaped: false,
                };
                self.emit(offset, ch, CharClass::Quoted)
            }
            '-' if self.peek() == Some('-') => {
                self.state = State::LineComment;
                self.emit(offset, ch, CharClass::Comment)
            }
            '#' => {
                self.state = State::LineComment;
                self.emit(offset, ch, CharClass::Comment)
            }
            '/' if self.peek() == Some('*') => {
                // The opening star must not close the comment, so it is
                // consumed here rather than scanned.
                self.pos += 1;
                self.state = State::BlockComment { star: false };
                self.emit(offset, ch, CharClass::Comment)
            }
            '(' => {
                self.depth += 1;
                self.emit(offset, ch, CharClass::Code)
            }
            ')' => {
                self.depth = self.depth.saturating_sub(1);
                self.emit(offset, ch, CharClass::Code)
            }
            _ => self.emit(offset, ch, CharClass::Code),
        }
    }

    fn scan_quoted(&mut self, offset: usize, ch: char, quote: char, escaped: bool) -> Scanned {
        if escaped {
            self.state = State::Quoted {
                quote,
                escaped: false,
            };
        } else if ch == '\\' && quote != '`' {
            self.state = State::Quoted {
                quote,
                escaped: true,
            };
        } else if ch == quote {
            if self.peek() == Some(quote) {
                // Doubled quote: the next quote character is content.
                self.state = State::Quoted {
                    quote,
                    escaped: true,
                };
            } else {
                self.state = State::Code;
            }
        }
        self.emit(offset, ch, CharClass::Quoted)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Scanned;

    fn next(&mut self) -> Option<Scanned> {
        let ch = self.peek()?;
        let offset = self.pos;
        self.pos += ch.len_utf8();

        let scanned = match self.state {
            State::Code => self.scan_code(offset, ch),
            State::Quoted { quote, escaped } => self.scan_quoted(offset, ch, quote, escaped),
            State::LineComment => {
                if ch == '\n' {
                    self.state = State::Code;
                    self.emit(offset, ch, CharClass::Code)
                } else {
                    self.emit(offset, ch, CharClass::Comment)
                }
            }
            State::BlockComment { star } => {
                if star && ch == '/' {
                    self.state = State::Code;
                } else {
                    self.state = State::BlockComment { star: ch == '*' };
                }
                self.emit(offset, ch, CharClass::Comment)
            }
        };
        Some(scanned)
    }
}

/// Splits `input` on `delimiter` wherever it appears as code.
///
/// With `top_level_only`, delimiters nested inside parentheses are kept as
/// part of the fragment. Fragments are returned untrimmed.
#[must_use]
pub fn split_on(input: &str, delimiter: char, top_level_only: bool) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut start = 0;
    for scanned in Scanner::new(input) {
        if scanned.ch == delimiter
            && scanned.class == CharClass::Code
            && (!top_level_only || scanned.depth == 0)
        {
            fragments.push(&input[start..scanned.offset]);
            start = scanned.offset + scanned.ch.len_utf8();
        }
    }
    fragments.push(&input[start..]);
    fragments
}

/// Collapses every run of code whitespace and comments into a single space.
///
/// Quoted text is copied verbatim. The result is trimmed.
#[must_use]
pub fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;
    for scanned in Scanner::new(input) {
        let blank = match scanned.class {
            CharClass::Comment => true,
            CharClass::Code => scanned.ch.is_whitespace(),
            CharClass::Quoted => false,
        };
        if blank {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(scanned.ch);
    }
    out
}

/// Removes closing parentheses at the end of `input` that have no matching
/// opener.
#[must_use]
pub fn strip_unbalanced_closers(input: &str) -> &str {
    let mut balance: isize = 0;
    for scanned in Scanner::new(input) {
        if scanned.class != CharClass::Code {
            continue;
        }
        match scanned.ch {
            '(' => balance += 1,
            ')' => balance -= 1,
            _ => {}
        }
    }

    let mut out = input.trim_end();
    while balance < 0 {
        match out.strip_suffix(')') {
            Some(rest) => {
                out = rest.trim_end();
                balance += 1;
            }
            None => break,
        }
    }
    out
}

/// Finds the byte offset of the parenthesis that closes the one at `open`.
///
/// Returns `None` if `input[open..]` does not start with `(` or the group is
/// never closed.
#[must_use]
pub fn matching_paren(input: &str, open: usize) -> Option<usize> {
    let rest = input.get(open..)?;
    if !rest.starts_with('(') {
        return None;
    }
    Scanner::new(rest)
        .find(|s| s.class == CharClass::Code && s.ch == ')' && s.depth == 0)
        .map(|s| open + s.offset)
}

use std::cmp::Ordering;

/// Characters skipped for the primary comparison
const SPECIAL_CHARS: &[char] = &[' ', '\t', '"', '\''];

fn is_special(c: char) -> bool {
    SPECIAL_CHARS.contains(&c)
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Starts with `-` immediately followed by a digit
fn starts_negative(s: &[char]) -> bool {
    s.len() > 1 && s[0] == '-' && s[1].is_ascii_digit()
}

/// One unit of the primary comparison
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Case-folded character other than an ASCII digit
    Char(char),
    /// Number at the very start of the string preceded by `-`; significant digits only
    Negative(String),
    /// Digit run; significant digits only
    Number(String),
}

impl Token {
    /// Order between token kinds. Characters below `0` come first, then
    /// negative numbers, numbers, and the remaining characters.
    fn rank(&self) -> u8 {
        match self {
            Token::Char(c) if *c < '0' => 0,
            Token::Negative(_) => 1,
            Token::Number(_) => 2,
            Token::Char(_) => 3,
        }
    }
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Token::Char(a), Token::Char(b)) => a.cmp(b),
            (Token::Number(a), Token::Number(b)) => magnitude(a, b),
            (Token::Negative(a), Token::Negative(b)) => magnitude(a, b).reverse(),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn magnitude(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// What the primary comparison ignores at one token position: the special
/// run before it, the leading zeros of a number and the raw character.
type Detail = (usize, String, usize, char);

/// Sort key of a string in natural order.
///
/// Tokens are compared first; on a tie the ignored details decide, position
/// by position. A key holds everything needed to rebuild its string, so two
/// keys are equal only for identical strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey {
    tokens: Vec<Token>,
    details: Vec<Detail>,
}

impl NaturalKey {
    pub fn new(s: &str) -> Self {
        let chars: Vec<char> = s.chars().collect();
        let mut tokens = Vec::new();
        let mut details = Vec::new();
        let mut pos = 0;

        if starts_negative(&chars) {
            let end = digit_run_end(&chars, 1);
            let (zeros, digits) = split_leading_zeros(&chars[1..end]);
            tokens.push(Token::Negative(digits.iter().collect()));
            details.push((0, String::new(), zeros, '-'));
            pos = end;
        }

        loop {
            let run_end = skip_specials(&chars, pos);
            let run: String = chars[pos..run_end].iter().collect();
            let run_len = run_end - pos;
            pos = run_end;

            let Some(&c) = chars.get(pos) else {
                details.push((run_len, run, 0, '\0'));
                break;
            };
            if c.is_ascii_digit() {
                let end = digit_run_end(&chars, pos);
                let (zeros, digits) = split_leading_zeros(&chars[pos..end]);
                tokens.push(Token::Number(digits.iter().collect()));
                details.push((run_len, run, zeros, '\0'));
                pos = end;
            } else {
                tokens.push(Token::Char(fold(c)));
                details.push((run_len, run, 0, c));
                pos += 1;
            }
        }

        Self { tokens, details }
    }
}

/// Compares two strings in natural order.
///
/// Digit runs compare by magnitude, letters compare case-insensitively, and
/// runs of spaces and quotes are ignored for the primary comparison. A
/// leading `-` before a digit makes the first number negative. Whatever the
/// primary comparison ignored is used as a tie-break, so distinct strings
/// never compare equal.
pub fn compare(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    NaturalKey::new(a).cmp(&NaturalKey::new(b))
}

fn skip_specials(s: &[char], mut pos: usize) -> usize {
    while pos < s.len() && is_special(s[pos]) {
        pos += 1;
    }
    pos
}

fn digit_run_end(s: &[char], mut pos: usize) -> usize {
    while pos < s.len() && s[pos].is_ascii_digit() {
        pos += 1;
    }
    pos
}

/// Returns the number of leading zeros and the significant digits
fn split_leading_zeros(run: &[char]) -> (usize, &[char]) {
    let zeros = run.iter().take_while(|c| **c == '0').count();
    (zeros, &run[zeros..])
}

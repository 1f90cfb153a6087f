/// A sender address with the `local@domain.tld` shape.
///
/// The check is purely syntactic: a single `@`, no whitespace, and a domain
/// part holding at least one `.` with something on either side of it.
/// Deliverability is never probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail(String);

impl ContactEmail {
    pub fn parse(s: String) -> Result<ContactEmail, String> {
        if has_email_shape(&s) {
            Ok(Self(s))
        } else {
            Err(format!("{} is not a valid email address", s))
        }
    }

    pub fn inner(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for ContactEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContactEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

fn has_email_shape(s: &str) -> bool {
    if s.chars().any(is_separator) {
        return false;
    }

    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // Any dot will do, as long as something precedes and follows it.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < domain.len() - 1)
}

/// Whitespace as browsers' regular expressions see it: the Unicode
/// `White_Space` set without NEL, plus the byte order mark.
fn is_separator(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}')
}

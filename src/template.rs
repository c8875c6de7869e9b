use std::str::FromStr;

/// A redirect target with `$N` / `${N}` placeholders for capture groups (1-based).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template(Vec<Piece>);

#[derive(Clone, Debug, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Group(usize),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("`$` at byte {0} must be followed by a group number, `{{N}}` or `$`")]
    DanglingDollar(usize),
    #[error("`${{` at byte {0} is never closed")]
    UnclosedBrace(usize),
    #[error("`{0}` is not a capture group number (groups start at 1)")]
    InvalidGroup(String),
}

#[derive(Debug, thiserror::Error)]
#[error("template references group ${index}, but the pattern only has {available} groups")]
pub struct MissingGroup {
    pub index: usize,
    pub available: usize,
}

impl FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut rest = s;

        while let Some(dollar) = rest.find('$') {
            literal.push_str(&rest[..dollar]);
            let offset = s.len() - rest.len() + dollar;
            let after = &rest[dollar + 1..];

            let (group, consumed) = if let Some(after) = after.strip_prefix('$') {
                literal.push('$');
                rest = after;
                continue;
            } else if let Some(braced) = after.strip_prefix('{') {
                let close = braced
                    .find('}')
                    .ok_or(TemplateError::UnclosedBrace(offset))?;
                (&braced[..close], close + 2)
            } else {
                let digits = after
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(after.len());
                if digits == 0 {
                    return Err(TemplateError::DanglingDollar(offset));
                }
                (&after[..digits], digits)
            };

            let index = match group.parse::<usize>() {
                Ok(index) if index > 0 => index,
                _ => return Err(TemplateError::InvalidGroup(group.to_string())),
            };
            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(Piece::Group(index));
            rest = &after[consumed..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }
        Ok(Self(pieces))
    }
}

impl Template {
    /// Non-participating groups expand to nothing; groups past the end are an error.
    pub fn render(&self, groups: &[Option<&str>]) -> Result<String, MissingGroup> {
        let mut out = String::new();
        for piece in &self.0 {
            match piece {
                Piece::Literal(s) => out.push_str(s),
                Piece::Group(index) => match groups.get(index - 1) {
                    Some(group) => out.push_str(group.unwrap_or("")),
                    None => {
                        return Err(MissingGroup {
                            index: *index,
                            available: groups.len(),
                        })
                    }
                },
            }
        }
        Ok(out)
    }
}

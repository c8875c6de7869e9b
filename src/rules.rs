use crate::err::{ConfigError, Error};
use crate::template::Template;
use regex::Regex;
use std::fmt::{self, Debug, Display};
use std::str::FromStr;

/// A regular expression that must match the entire reconstructed URL.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl FromStr for Pattern {
    type Err = regex::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let regex = Regex::new(&format!("^(?:{})$", s))?;
        Ok(Self {
            source: s.to_string(),
            regex,
        })
    }
}

impl Pattern {
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Capture groups of a whole-string match, excluding the match itself.
    pub fn captures<'u>(&self, url: &'u str) -> Option<Vec<Option<&'u str>>> {
        let captures = self.regex.captures(url)?;
        Some(
            captures
                .iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str()))
                .collect(),
        )
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

pub type Synthesize = Box<dyn Fn(&[Option<&str>]) -> Result<String, Error> + Send + Sync>;

pub struct Rule {
    pattern: Pattern,
    synthesize: Synthesize,
}

impl Rule {
    /// `synthesize` receives the pattern's capture groups positionally; the group count is not checked here.
    pub fn new(
        pattern: Pattern,
        synthesize: impl Fn(&[Option<&str>]) -> Result<String, Error> + Send + Sync + 'static,
    ) -> Self {
        Self {
            pattern,
            synthesize: Box::new(synthesize),
        }
    }

    pub fn from_template(pattern: Pattern, template: Template) -> Self {
        Self::new(pattern, move |groups| Ok(template.render(groups)?))
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

#[derive(Default)]
pub struct Rules(Vec<Rule>);

impl Rules {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self(rules)
    }

    /// Pair each pattern with the template at the same position.
    pub fn zip(from: Vec<Pattern>, to: Vec<Template>) -> Result<Self, ConfigError> {
        if from.len() != to.len() {
            return Err(ConfigError::RuleCount {
                from: from.len(),
                to: to.len(),
            });
        }
        Ok(Self::new(
            from.into_iter()
                .zip(to)
                .map(|(pattern, template)| Rule::from_template(pattern, template))
                .collect(),
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.0.iter().map(Rule::pattern)
    }

    /// The first matching rule (in declaration order) decides; later rules are never consulted.
    pub fn try_match(&self, url: &str) -> Option<Result<String, Error>> {
        for (i, rule) in self.0.iter().enumerate() {
            match rule.pattern.captures(url) {
                Some(groups) => {
                    log::debug!("Rule {} '{}' matched: {:?}", i + 1, rule.pattern, groups);
                    return Some((rule.synthesize)(&groups));
                }
                None => log::debug!("Rule {} '{}' did not match", i + 1, rule.pattern),
            }
        }
        None
    }
}

use super::node::Element;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid selector {selector:?}: {reason}")]
pub struct SelectorError {
    pub selector: String,
    pub reason: &'static str,
}

/// A small CSS selector subset: type, `.class`, `#id` and `*` compounds,
/// joined by descendant combinators, with comma-separated alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Vec<Compound>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        let err = |reason| SelectorError {
            selector: selector.to_string(),
            reason,
        };

        let mut alternatives = Vec::new();
        for alternative in selector.split(',') {
            let compounds = alternative
                .split_whitespace()
                .map(|part| parse_compound(part).map_err(err))
                .collect::<Result<Vec<_>, _>>()?;
            if compounds.is_empty() {
                return Err(err("empty selector"));
            }
            alternatives.push(compounds);
        }
        Ok(Self { alternatives })
    }

    /// Whether `element` matches, looking at its ancestors for descendant
    /// combinators.
    pub fn matches(&self, element: &Element) -> bool {
        self.alternatives
            .iter()
            .any(|compounds| matches_chain(compounds, element))
    }
}

fn parse_compound(part: &str) -> Result<Compound, &'static str> {
    let mut compound = Compound::default();
    let mut rest = part;

    let head_len = rest.find(['.', '#']).unwrap_or(rest.len());
    let head = &rest[..head_len];
    if !head.is_empty() && head != "*" {
        if !head.chars().all(is_name_char) {
            return Err("unsupported selector syntax");
        }
        compound.tag = Some(head.to_ascii_lowercase());
    }
    rest = &rest[head_len..];

    while let Some(marker) = rest.chars().next() {
        let body = &rest[1..];
        let len = body.find(['.', '#']).unwrap_or(body.len());
        let name = &body[..len];
        if name.is_empty() || !name.chars().all(is_name_char) {
            return Err("expected a name after '.' or '#'");
        }
        if marker == '.' {
            compound.classes.push(name.to_string());
        } else {
            compound.id = Some(name.to_string());
        }
        rest = &body[len..];
    }
    Ok(compound)
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn matches_compound(compound: &Compound, element: &Element) -> bool {
    let Some(tag) = element.tag() else {
        return false;
    };
    if let Some(want) = &compound.tag
        && *want != tag
    {
        return false;
    }
    if let Some(want) = &compound.id
        && element.attr("id").as_deref() != Some(want.as_str())
    {
        return false;
    }
    compound.classes.iter().all(|c| element.has_class(c))
}

fn matches_chain(compounds: &[Compound], element: &Element) -> bool {
    let Some((last, ancestors)) = compounds.split_last() else {
        return false;
    };
    if !matches_compound(last, element) {
        return false;
    }

    // Greedy right-to-left walk is enough for pure descendant combinators.
    let mut pending = ancestors.iter().rev().peekable();
    let mut current = element.parent();
    while let Some(wanted) = pending.peek() {
        let Some(node) = current else {
            return false;
        };
        if matches_compound(wanted, &node) {
            pending.next();
        }
        current = node.parent();
    }
    true
}

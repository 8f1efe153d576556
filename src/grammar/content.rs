//! Content model matching
//!
//! Children are matched against a production's particles greedily, left to
//! right. The schema-for-schemas is deterministic: at every point at most
//! one particle can consume the next child, so no backtracking is needed.
//! A particle stops consuming when the next child cannot start it or its
//! maximum is reached.

use super::{Context, Particle, Term};
use crate::documents::Element;
use crate::error::{Error, Result};
use crate::XSD_NAMESPACE;

/// Assign each child element the context it is parsed under
///
/// Fails with `UnexpectedContent` on the first child no particle accepts and
/// with `MissingContent` when the children run out before a required
/// particle is matched.
pub(crate) fn match_content<'e>(
    context: Context,
    model: &'static [Particle],
    children: &[&'e Element],
) -> Result<Vec<(Context, &'e Element)>> {
    let mut matcher = Matcher {
        context,
        children,
        position: 0,
        matched: Vec::with_capacity(children.len()),
    };
    matcher.sequence(model)?;

    if let Some(extra) = matcher.peek() {
        return Err(Error::UnexpectedContent {
            context,
            found: describe(extra),
        });
    }
    Ok(matcher.matched)
}

/// Describe an element for error messages
pub(crate) fn describe(element: &Element) -> String {
    format!("element '{}'", element.name)
}

struct Matcher<'m, 'e> {
    context: Context,
    children: &'m [&'e Element],
    position: usize,
    matched: Vec<(Context, &'e Element)>,
}

impl<'m, 'e> Matcher<'m, 'e> {
    fn peek(&self) -> Option<&'e Element> {
        self.children.get(self.position).copied()
    }

    /// Local name of the next child when it is in the XSD namespace
    fn next_name(&self) -> Option<&'e str> {
        self.peek()
            .filter(|e| e.namespace() == Some(XSD_NAMESPACE))
            .map(Element::local_name)
    }

    fn sequence(&mut self, particles: &'static [Particle]) -> Result<()> {
        for particle in particles {
            self.particle(particle)?;
        }
        Ok(())
    }

    fn particle(&mut self, particle: &'static Particle) -> Result<()> {
        let mut count = 0;
        while particle.occurs.allows(count) {
            match self.next_name() {
                Some(name) if particle.term.starts_with(name) => {}
                _ => break,
            }
            let before = self.position;
            self.term(&particle.term)?;
            count += 1;
            if self.position == before {
                break;
            }
        }

        if count < particle.occurs.min && !particle.term.is_nullable() {
            if let Some(child) = self.peek() {
                return Err(Error::UnexpectedContent {
                    context: self.context,
                    found: describe(child),
                });
            }
            let mut names = Vec::new();
            particle.term.first_names(&mut names);
            return Err(Error::MissingContent {
                context: self.context,
                expected: expected(&names),
            });
        }
        Ok(())
    }

    fn term(&mut self, term: &'static Term) -> Result<()> {
        match term {
            Term::Element { context, .. } => {
                if let Some(child) = self.peek() {
                    self.matched.push((*context, child));
                    self.position += 1;
                }
                Ok(())
            }
            Term::Sequence(items) => self.sequence(items),
            Term::Choice(alternatives) => {
                let alternative = self.next_name().and_then(|name| {
                    alternatives
                        .iter()
                        .find(|alternative| alternative.term.starts_with(name))
                });
                match alternative {
                    Some(alternative) => self.particle(alternative),
                    None => Ok(()),
                }
            }
        }
    }
}

fn expected(names: &[&str]) -> String {
    match names {
        [single] => format!("element '{single}'"),
        _ => {
            let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
            format!("one of {}", quoted.join(", "))
        }
    }
}

//! Index specifications and the label algebra the planner is built on.
//!
//! A [`Spec`] names the dimensions of one operand, left to right. Repeating a
//! label inside one spec selects a diagonal; sharing a label between specs
//! iterates those dimensions in lockstep.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;

use crate::error::{EinError, Result};
use crate::operand::{dim_extent, Shaped};

/// A dimension label: a single ASCII letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(u8);

impl Label {
    /// Create a label from a character, rejecting anything but ASCII letters.
    pub fn new(c: char) -> Result<Self> {
        if c.is_ascii_alphabetic() {
            Ok(Label(c as u8))
        } else {
            Err(EinError::invalid(format!(
                "label must be an ASCII letter, got '{}'",
                c.escape_debug()
            )))
        }
    }

    /// The label as a character.
    pub fn as_char(self) -> char {
        self.0 as char
    }
}

impl TryFrom<char> for Label {
    type Error = EinError;

    fn try_from(c: char) -> Result<Self> {
        Label::new(c)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Insertion-ordered map keyed by label.
pub(crate) type LabelMap<V> = IndexMap<Label, V, FxBuildHasher>;

/// Ordered labels for the dimensions of one operand.
///
/// An empty spec describes a scalar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Spec {
    labels: SmallVec<[Label; 8]>,
}

impl Spec {
    /// The spec of a scalar operand.
    pub fn scalar() -> Self {
        Self::default()
    }

    /// Parse a spec such as `"ij"`. The empty string is the scalar spec.
    pub fn parse(s: &str) -> Result<Self> {
        let labels = s.chars().map(Label::new).collect::<Result<_>>()?;
        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Number of labels, which must equal the operand's rank.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// First label, if any.
    pub fn first(&self) -> Option<Label> {
        self.labels.first().copied()
    }

    /// Position of the first occurrence of `label`.
    pub fn locate(&self, label: Label) -> Option<usize> {
        self.labels.iter().position(|&l| l == label)
    }

    pub fn contains(&self, label: Label) -> bool {
        self.locate(label).is_some()
    }

    /// Number of occurrences of `label`.
    pub fn count(&self, label: Label) -> usize {
        self.labels.iter().filter(|&&l| l == label).count()
    }

    /// Remove the first occurrence of `label`.
    pub fn drop_one(&self, label: Label) -> Self {
        let mut labels = self.labels.clone();
        if let Some(pos) = self.locate(label) {
            labels.remove(pos);
        }
        Self { labels }
    }

    /// Remove every occurrence of `label`.
    pub fn drop_all(&self, label: Label) -> Self {
        let labels = self.labels.iter().copied().filter(|&l| l != label).collect();
        Self { labels }
    }

    /// Positions at which `label` is fixed, one per occurrence.
    ///
    /// Each position is taken in the spec left after the previous
    /// occurrences were dropped, which is the order a view must be narrowed
    /// in: `"iji"` yields `[0, 1]`.
    pub fn axes(&self, label: Label) -> SmallVec<[usize; 2]> {
        let mut axes = SmallVec::new();
        let mut rest = self.clone();
        while let Some(pos) = rest.locate(label) {
            axes.push(pos);
            rest = rest.drop_one(label);
        }
        axes
    }

    /// Size of `operand` along the first dimension labelled `label`.
    ///
    /// `None` when the label is absent or the operand exposes no size for
    /// that dimension; the caller then has to take the bound from another
    /// operand carrying the label.
    pub fn extent<S: Shaped + ?Sized>(&self, label: Label, operand: &S) -> Option<usize> {
        dim_extent(operand, self.locate(label)?)
    }
}

/// First label of the first non-empty spec, in argument order.
///
/// This choice fixes the loop nesting order of a plan.
pub fn representative<'a>(specs: impl IntoIterator<Item = &'a Spec>) -> Option<Label> {
    specs.into_iter().find_map(Spec::first)
}

impl FromStr for Spec {
    type Err = EinError;

    fn from_str(s: &str) -> Result<Self> {
        Spec::parse(s)
    }
}

impl FromIterator<Label> for Spec {
    fn from_iter<T: IntoIterator<Item = Label>>(iter: T) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in &self.labels {
            write!(f, "{}", label)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l(c: char) -> Label {
        Label::new(c).unwrap()
    }

    fn s(text: &str) -> Spec {
        Spec::parse(text).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(s("ijk").to_string(), "ijk");
        assert!(s("").is_empty());
        assert_eq!(s("").len(), 0);
        assert_eq!(Spec::scalar(), s(""));
        assert_eq!("ij".parse::<Spec>().unwrap(), s("ij"));
        assert!(Spec::parse("i1").is_err());
        assert!(Spec::parse("i j").is_err());
    }

    #[test]
    fn test_representative() {
        assert_eq!(representative([&s(""), &s("ji"), &s("k")]), Some(l('j')));
        assert_eq!(representative([&s(""), &s("")]), None);
        assert_eq!(representative(std::iter::empty()), None);
    }

    #[test]
    fn test_locate_and_count() {
        let spec = s("iji");
        assert_eq!(spec.locate(l('j')), Some(1));
        assert_eq!(spec.locate(l('k')), None);
        assert_eq!(spec.count(l('i')), 2);
        assert_eq!(spec.count(l('k')), 0);
        assert!(spec.contains(l('j')));
        assert!(!spec.contains(l('k')));
    }

    #[test]
    fn test_drop() {
        let spec = s("iji");
        assert_eq!(spec.drop_one(l('i')), s("ji"));
        assert_eq!(spec.drop_all(l('i')), s("j"));
        assert_eq!(spec.drop_one(l('k')), spec);
    }

    #[test]
    fn test_axes_follow_reduced_positions() {
        assert_eq!(s("ii").axes(l('i')).as_slice(), &[0, 0]);
        assert_eq!(s("iji").axes(l('i')).as_slice(), &[0, 1]);
        assert_eq!(s("jki").axes(l('i')).as_slice(), &[2]);
        assert!(s("jk").axes(l('i')).is_empty());
    }

    #[test]
    fn test_extent_against_operand() {
        let v = vec![0.0f64; 5];
        assert_eq!(s("i").extent(l('i'), &v), Some(5));
        assert_eq!(s("i").extent(l('j'), &v), None);
        assert_eq!(s("").extent(l('i'), &1.0f64), None);
    }
}

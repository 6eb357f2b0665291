//! Dependency tree utilities
//!
//! [`GoldTree`] validates head/label arrays before they reach the oracles,
//! [`ParseTree`] is the read-out of a parse, and [`AttachmentScore`]
//! compares the two.

use core::ops::AddAssign;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    Label, UnitId, NO_HEAD, NO_LABEL, ROOT,
};

/// Validated gold dependency tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldTree {
    heads: Vec<UnitId>,
    deprels: Vec<Label>,
}

impl GoldTree {
    /// Validate head/label arrays against a vocabulary of `num_labels` labels
    ///
    /// Checks: equal lengths, ROOT present and headless, every real unit
    /// headed inside the sentence, no self loops, no cycles, labels in range.
    /// Projectivity is checked separately with [`GoldTree::check_projective`].
    pub fn new(heads: Vec<UnitId>, deprels: Vec<Label>, num_labels: usize) -> Result<Self> {
        validate_tree(&heads, &deprels, num_labels)?;
        Ok(Self { heads, deprels })
    }

    /// Gold heads, `NO_HEAD` at ROOT
    pub fn heads(&self) -> &[UnitId] {
        &self.heads
    }

    /// Gold labels, `NO_LABEL` at ROOT
    pub fn deprels(&self) -> &[Label] {
        &self.deprels
    }

    /// Number of units including ROOT
    pub fn len(&self) -> usize {
        self.heads.len()
    }

    /// Whether the tree has no real units
    pub fn is_empty(&self) -> bool {
        self.heads.len() <= 1
    }

    /// Number of real units
    pub fn num_words(&self) -> usize {
        self.heads.len().saturating_sub(1)
    }

    /// Whether no two arcs cross
    pub fn is_projective(&self) -> bool {
        find_crossing(&self.heads).is_none()
    }

    /// Projectivity as a `Result`, naming one offending unit
    pub fn check_projective(&self) -> Result<()> {
        match find_crossing(&self.heads) {
            Some(unit) => Err(CoreError::NonProjective { unit }),
            None => Ok(()),
        }
    }

    /// Gold dependents of every unit, in sentence order
    pub fn dependents(&self) -> Vec<Vec<UnitId>> {
        let mut deps = vec![Vec::new(); self.heads.len()];
        for (unit, &head) in self.heads.iter().enumerate().skip(1) {
            deps[head].push(unit);
        }
        deps
    }

    /// Split back into raw arrays
    pub fn into_parts(self) -> (Vec<UnitId>, Vec<Label>) {
        (self.heads, self.deprels)
    }
}

/// Validate raw head/label arrays; see [`GoldTree::new`]
pub fn validate_tree(heads: &[UnitId], deprels: &[Label], num_labels: usize) -> Result<()> {
    if heads.len() != deprels.len() {
        return Err(CoreError::LengthMismatch {
            heads: heads.len(),
            deprels: deprels.len(),
        });
    }
    if heads.is_empty() {
        return Err(CoreError::Empty);
    }
    if heads[ROOT] != NO_HEAD {
        return Err(CoreError::RootHasHead { head: heads[ROOT] });
    }

    let len = heads.len();
    for unit in 1..len {
        let head = heads[unit];
        if head == NO_HEAD {
            return Err(CoreError::MissingHead { unit });
        }
        if head >= len {
            return Err(CoreError::HeadOutOfRange { unit, head, len });
        }
        if head == unit {
            return Err(CoreError::SelfLoop { unit });
        }
        let label = deprels[unit];
        if label >= num_labels {
            return Err(CoreError::LabelOutOfRange {
                unit,
                label,
                num_labels,
            });
        }
    }

    // 0 = unvisited, 1 = on current path, 2 = reaches ROOT
    let mut mark = vec![0u8; len];
    mark[ROOT] = 2;
    let mut path = Vec::new();
    for start in 1..len {
        let mut unit = start;
        while mark[unit] == 0 {
            mark[unit] = 1;
            path.push(unit);
            unit = heads[unit];
        }
        if mark[unit] == 1 {
            return Err(CoreError::Cycle { unit });
        }
        for visited in path.drain(..) {
            mark[visited] = 2;
        }
    }
    Ok(())
}

/// Whether the arcs given by `heads` are projective
///
/// Arcs from ROOT are included, so a tree whose root arc is covered by
/// another arc is reported as non-projective. Units with `NO_HEAD` are
/// ignored.
pub fn is_projective(heads: &[UnitId]) -> bool {
    find_crossing(heads).is_none()
}

fn find_crossing(heads: &[UnitId]) -> Option<UnitId> {
    let spans: Vec<(UnitId, UnitId, UnitId)> = heads
        .iter()
        .enumerate()
        .skip(1)
        .filter(|&(_, &head)| head != NO_HEAD && head < heads.len())
        .map(|(unit, &head)| (head.min(unit), head.max(unit), unit))
        .collect();

    for (i, &(a, b, unit)) in spans.iter().enumerate() {
        for &(c, d, _) in &spans[i + 1..] {
            if (a < c && c < b && b < d) || (c < a && a < d && d < b) {
                return Some(unit);
            }
        }
    }
    None
}

/// Head/label arrays read out of a parser state
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParseTree {
    heads: Vec<UnitId>,
    deprels: Vec<Label>,
}

impl ParseTree {
    /// Wrap read-out arrays
    pub fn new(heads: Vec<UnitId>, deprels: Vec<Label>) -> Self {
        assert_eq!(
            heads.len(),
            deprels.len(),
            "#heads should be equal to #deprels"
        );
        Self { heads, deprels }
    }

    /// Predicted heads (`NO_HEAD` where nothing was attached)
    pub fn heads(&self) -> &[UnitId] {
        &self.heads
    }

    /// Predicted labels (`NO_LABEL` where nothing was attached)
    pub fn deprels(&self) -> &[Label] {
        &self.deprels
    }

    /// Number of units including ROOT
    pub fn len(&self) -> usize {
        self.heads.len()
    }

    /// Whether the tree has no real units
    pub fn is_empty(&self) -> bool {
        self.heads.len() <= 1
    }

    /// Whether every real unit received a head
    pub fn is_complete(&self) -> bool {
        self.heads.iter().skip(1).all(|&h| h != NO_HEAD)
    }

    /// Compare with a gold tree
    pub fn score_against(&self, gold: &GoldTree) -> AttachmentScore {
        AttachmentScore::evaluate(&self.heads, &self.deprels, gold.heads(), gold.deprels())
    }

    /// Split back into raw arrays
    pub fn into_parts(self) -> (Vec<UnitId>, Vec<Label>) {
        (self.heads, self.deprels)
    }
}

/// Attachment counts between predicted and gold trees
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttachmentScore {
    /// Real units compared
    pub total: usize,
    /// Units with the correct head
    pub unlabeled: usize,
    /// Units with the correct head and label
    pub labeled: usize,
}

impl AttachmentScore {
    /// Count correct attachments over the real units (ROOT excluded)
    ///
    /// # Panics
    /// Panics if the arrays differ in length.
    pub fn evaluate(
        pred_heads: &[UnitId],
        pred_deprels: &[Label],
        gold_heads: &[UnitId],
        gold_deprels: &[Label],
    ) -> Self {
        assert!(
            pred_heads.len() == gold_heads.len()
                && pred_deprels.len() == gold_deprels.len()
                && pred_heads.len() == pred_deprels.len(),
            "predicted and gold arrays must have equal lengths"
        );
        let mut score = Self::default();
        for unit in 1..gold_heads.len() {
            score.total += 1;
            if pred_heads[unit] == gold_heads[unit] {
                score.unlabeled += 1;
                if pred_deprels[unit] == gold_deprels[unit] && pred_deprels[unit] != NO_LABEL {
                    score.labeled += 1;
                }
            }
        }
        score
    }

    /// Unlabeled attachment score in `[0, 1]`
    pub fn uas(&self) -> f64 {
        ratio(self.unlabeled, self.total)
    }

    /// Labeled attachment score in `[0, 1]`
    pub fn las(&self) -> f64 {
        ratio(self.labeled, self.total)
    }
}

impl AddAssign for AttachmentScore {
    fn add_assign(&mut self, other: Self) {
        self.total += other.total;
        self.unlabeled += other.unlabeled;
        self.labeled += other.labeled;
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        1.0
    } else {
        num as f64 / den as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: UnitId = NO_HEAD;
    const X: Label = NO_LABEL;

    #[test]
    fn test_valid_tree() {
        let tree = GoldTree::new(vec![N, 0, 1], vec![X, 0, 1], 2).unwrap();
        assert_eq!(tree.num_words(), 2);
        assert!(tree.is_projective());
        assert_eq!(tree.dependents(), vec![vec![1], vec![2], vec![]]);
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            GoldTree::new(vec![N, 0], vec![X], 1),
            Err(CoreError::LengthMismatch {
                heads: 2,
                deprels: 1
            })
        );
        assert_eq!(GoldTree::new(vec![], vec![], 1), Err(CoreError::Empty));
        assert_eq!(
            GoldTree::new(vec![1, 0], vec![X, 0], 1),
            Err(CoreError::RootHasHead { head: 1 })
        );
        assert_eq!(
            GoldTree::new(vec![N, N], vec![X, 0], 1),
            Err(CoreError::MissingHead { unit: 1 })
        );
        assert_eq!(
            GoldTree::new(vec![N, 5], vec![X, 0], 1),
            Err(CoreError::HeadOutOfRange {
                unit: 1,
                head: 5,
                len: 2
            })
        );
        assert_eq!(
            GoldTree::new(vec![N, 1], vec![X, 0], 1),
            Err(CoreError::SelfLoop { unit: 1 })
        );
        assert_eq!(
            GoldTree::new(vec![N, 0], vec![X, 3], 2),
            Err(CoreError::LabelOutOfRange {
                unit: 1,
                label: 3,
                num_labels: 2
            })
        );
    }

    #[test]
    fn test_cycle_detected() {
        let err = GoldTree::new(vec![N, 2, 1, 0], vec![X, 0, 0, 0], 1).unwrap_err();
        assert!(matches!(err, CoreError::Cycle { .. }));
    }

    #[test]
    fn test_projectivity() {
        // 1 <- 3, 2 <- 0, 3 <- 2: arc (1,3) crosses arc (0,2)
        let heads = vec![N, 3, 0, 2];
        assert!(!is_projective(&heads));
        let tree = GoldTree::new(heads, vec![X, 0, 0, 0], 1).unwrap();
        assert_eq!(
            tree.check_projective(),
            Err(CoreError::NonProjective { unit: 1 })
        );

        assert!(is_projective(&[N, 2, 0, 2]));
        assert!(is_projective(&[N]));
    }

    #[test]
    fn test_attachment_score() {
        let gold = GoldTree::new(vec![N, 2, 0, 2], vec![X, 0, 1, 2], 3).unwrap();
        let pred = ParseTree::new(vec![N, 2, 0, 1], vec![X, 1, 1, 2]);
        let score = pred.score_against(&gold);
        assert_eq!(score.total, 3);
        assert_eq!(score.unlabeled, 2);
        assert_eq!(score.labeled, 1);
        assert!((score.uas() - 2.0 / 3.0).abs() < 1e-9);

        let mut sum = score;
        sum += score;
        assert_eq!(sum.total, 6);
        assert_eq!(AttachmentScore::default().las(), 1.0);
    }

    #[test]
    fn test_parse_tree_completeness() {
        assert!(ParseTree::new(vec![N, 0], vec![X, 0]).is_complete());
        assert!(!ParseTree::new(vec![N, N], vec![X, X]).is_complete());
    }
}

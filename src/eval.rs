//! Walks over a decoded packet tree: version sum and expression value.

use crate::error::{BitsError, Result};
use crate::packet::{OperatorKind, Packet};
use crate::parser::DEFAULT_MAX_DEPTH;

/// Sum of the version numbers of `packet` and every packet nested inside it.
pub fn total_version_sum(packet: &Packet) -> u64 {
    let mut total = 0u64;
    let mut stack = vec![packet];
    while let Some(p) = stack.pop() {
        total += u64::from(p.version());
        stack.extend(p.children());
    }
    total
}

/// Value of the expression rooted at `packet`.
pub fn evaluate(packet: &Packet) -> Result<u64> {
    evaluate_with_limit(packet, DEFAULT_MAX_DEPTH)
}

/// Like [`evaluate`], for trees nested deeper than the default parser limit.
pub fn evaluate_with_limit(packet: &Packet, max_depth: usize) -> Result<u64> {
    eval_at(packet, 1, max_depth)
}

fn eval_at(packet: &Packet, depth: usize, max_depth: usize) -> Result<u64> {
    if depth > max_depth {
        return Err(BitsError::NestingTooDeep { limit: max_depth });
    }
    let (kind, children) = match packet {
        Packet::Literal { value, .. } => return Ok(*value),
        Packet::Operator { kind, children, .. } => (*kind, children.as_slice()),
    };
    kind.check_arity(children.len())?;
    let mut values = children.iter().map(|c| eval_at(c, depth + 1, max_depth));

    match kind {
        OperatorKind::Sum => values.try_fold(0u64, |acc, v| -> Result<u64> {
            acc.checked_add(v?)
                .ok_or(BitsError::ArithmeticOverflow { kind })
        }),
        OperatorKind::Product => values.try_fold(1u64, |acc, v| -> Result<u64> {
            acc.checked_mul(v?)
                .ok_or(BitsError::ArithmeticOverflow { kind })
        }),
        OperatorKind::Min => values.try_fold(u64::MAX, |acc, v| -> Result<u64> { Ok(acc.min(v?)) }),
        OperatorKind::Max => values.try_fold(0u64, |acc, v| -> Result<u64> { Ok(acc.max(v?)) }),
        OperatorKind::GreaterThan | OperatorKind::LessThan | OperatorKind::EqualTo => {
            let (Some(a), Some(b)) = (values.next(), values.next()) else {
                return Err(BitsError::InvalidOperatorArity {
                    kind,
                    expected: kind.arity().describe(),
                    actual: children.len(),
                });
            };
            let (a, b) = (a?, b?);
            let holds = match kind {
                OperatorKind::GreaterThan => a > b,
                OperatorKind::LessThan => a < b,
                _ => a == b,
            };
            Ok(u64::from(holds))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(value: u64) -> Packet {
        Packet::Literal { version: 1, value }
    }

    fn op(kind: OperatorKind, children: Vec<Packet>) -> Packet {
        Packet::Operator {
            version: 2,
            kind,
            children,
        }
    }

    #[test]
    fn version_sum_counts_every_packet() {
        let tree = op(OperatorKind::Sum, vec![lit(1), op(OperatorKind::Max, vec![lit(2), lit(3)])]);
        assert_eq!(total_version_sum(&tree), 2 + 1 + 2 + 1 + 1);
    }

    #[test]
    fn arithmetic_kinds() {
        let xs = || vec![lit(4), lit(9), lit(2)];
        assert_eq!(evaluate(&op(OperatorKind::Sum, xs())).unwrap(), 15);
        assert_eq!(evaluate(&op(OperatorKind::Product, xs())).unwrap(), 72);
        assert_eq!(evaluate(&op(OperatorKind::Min, xs())).unwrap(), 2);
        assert_eq!(evaluate(&op(OperatorKind::Max, xs())).unwrap(), 9);
        assert_eq!(evaluate(&op(OperatorKind::Product, vec![lit(7)])).unwrap(), 7);
    }

    #[test]
    fn relational_kinds() {
        let pair = |a, b| vec![lit(a), lit(b)];
        assert_eq!(evaluate(&op(OperatorKind::GreaterThan, pair(5, 3))).unwrap(), 1);
        assert_eq!(evaluate(&op(OperatorKind::GreaterThan, pair(3, 5))).unwrap(), 0);
        assert_eq!(evaluate(&op(OperatorKind::LessThan, pair(3, 5))).unwrap(), 1);
        assert_eq!(evaluate(&op(OperatorKind::EqualTo, pair(5, 5))).unwrap(), 1);
        assert_eq!(evaluate(&op(OperatorKind::EqualTo, pair(5, 6))).unwrap(), 0);
    }

    #[test]
    fn arity_is_checked() {
        for kind in [OperatorKind::Sum, OperatorKind::Product, OperatorKind::Min, OperatorKind::Max] {
            assert!(matches!(
                evaluate(&op(kind, vec![])),
                Err(BitsError::InvalidOperatorArity { actual: 0, .. })
            ));
        }
        assert!(matches!(
            evaluate(&op(OperatorKind::EqualTo, vec![lit(1)])),
            Err(BitsError::InvalidOperatorArity { actual: 1, .. })
        ));
        assert!(matches!(
            evaluate(&op(OperatorKind::LessThan, vec![lit(1), lit(2), lit(3)])),
            Err(BitsError::InvalidOperatorArity { actual: 3, .. })
        ));
    }

    #[test]
    fn overflow_is_reported() {
        let big = || vec![lit(u64::MAX), lit(2)];
        assert!(matches!(
            evaluate(&op(OperatorKind::Sum, big())),
            Err(BitsError::ArithmeticOverflow { kind: OperatorKind::Sum })
        ));
        assert!(matches!(
            evaluate(&op(OperatorKind::Product, big())),
            Err(BitsError::ArithmeticOverflow { kind: OperatorKind::Product })
        ));
    }

    #[test]
    fn depth_limit() {
        let mut tree = lit(3);
        for _ in 0..10 {
            tree = op(OperatorKind::Sum, vec![tree]);
        }
        assert_eq!(evaluate_with_limit(&tree, 11).unwrap(), 3);
        assert!(matches!(
            evaluate_with_limit(&tree, 10),
            Err(BitsError::NestingTooDeep { limit: 10 })
        ));
    }
}

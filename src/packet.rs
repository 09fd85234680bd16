//! Packet tree produced by the parser.

use crate::error::BitsError;

/// Type id reserved for literal packets.
pub const LITERAL_TYPE_ID: u8 = 4;

/// Operation performed by an operator packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Sum,
    Product,
    Min,
    Max,
    GreaterThan,
    LessThan,
    EqualTo,
}

/// Number of sub-packets an operator kind accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    AtLeastOne,
    ExactlyTwo,
}

impl Arity {
    pub fn accepts(self, children: usize) -> bool {
        match self {
            Arity::AtLeastOne => children >= 1,
            Arity::ExactlyTwo => children == 2,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Arity::AtLeastOne => "at least 1",
            Arity::ExactlyTwo => "exactly 2",
        }
    }
}

impl OperatorKind {
    pub fn type_id(self) -> u8 {
        match self {
            OperatorKind::Sum => 0,
            OperatorKind::Product => 1,
            OperatorKind::Min => 2,
            OperatorKind::Max => 3,
            OperatorKind::GreaterThan => 5,
            OperatorKind::LessThan => 6,
            OperatorKind::EqualTo => 7,
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            OperatorKind::Sum | OperatorKind::Product | OperatorKind::Min | OperatorKind::Max => {
                Arity::AtLeastOne
            }
            OperatorKind::GreaterThan | OperatorKind::LessThan | OperatorKind::EqualTo => {
                Arity::ExactlyTwo
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OperatorKind::Sum => "Sum",
            OperatorKind::Product => "Product",
            OperatorKind::Min => "Min",
            OperatorKind::Max => "Max",
            OperatorKind::GreaterThan => "GreaterThan",
            OperatorKind::LessThan => "LessThan",
            OperatorKind::EqualTo => "EqualTo",
        }
    }

    /// Fail with [`BitsError::InvalidOperatorArity`] unless `children` fits this kind.
    pub fn check_arity(self, children: usize) -> Result<(), BitsError> {
        let arity = self.arity();
        if arity.accepts(children) {
            Ok(())
        } else {
            Err(BitsError::InvalidOperatorArity {
                kind: self,
                expected: arity.describe(),
                actual: children,
            })
        }
    }
}

impl TryFrom<u32> for OperatorKind {
    type Error = BitsError;

    fn try_from(type_id: u32) -> Result<Self, BitsError> {
        Ok(match type_id {
            0 => OperatorKind::Sum,
            1 => OperatorKind::Product,
            2 => OperatorKind::Min,
            3 => OperatorKind::Max,
            5 => OperatorKind::GreaterThan,
            6 => OperatorKind::LessThan,
            7 => OperatorKind::EqualTo,
            other => return Err(BitsError::InvalidTypeId(other)),
        })
    }
}

/// One decoded packet. Operators own their sub-packets in transmission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Literal {
        version: u8,
        value: u64,
    },
    Operator {
        version: u8,
        kind: OperatorKind,
        children: Vec<Packet>,
    },
}

impl Packet {
    pub fn version(&self) -> u8 {
        match self {
            Packet::Literal { version, .. } | Packet::Operator { version, .. } => *version,
        }
    }

    pub fn type_id(&self) -> u8 {
        match self {
            Packet::Literal { .. } => LITERAL_TYPE_ID,
            Packet::Operator { kind, .. } => kind.type_id(),
        }
    }

    /// Operator kind, or `None` for a literal.
    pub fn kind(&self) -> Option<OperatorKind> {
        match self {
            Packet::Literal { .. } => None,
            Packet::Operator { kind, .. } => Some(*kind),
        }
    }

    /// Sub-packets; empty for a literal.
    pub fn children(&self) -> &[Packet] {
        match self {
            Packet::Literal { .. } => &[],
            Packet::Operator { children, .. } => children,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Packet::Literal { .. })
    }

    /// Literal value, or `None` for an operator.
    pub fn literal_value(&self) -> Option<u64> {
        match self {
            Packet::Literal { value, .. } => Some(*value),
            Packet::Operator { .. } => None,
        }
    }
}

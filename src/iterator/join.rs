//! Merge-join of two ordered cursors
//!
//! A [`JoinTree`] is either a leaf cursor over one container or a [`Join`]
//! of two child trees. Union visits every position seen by either child,
//! intersection only positions seen by both. Both emit positions in the
//! same strictly increasing order as their children.

use std::fmt;

use crate::error::{Error, Result};
use crate::iterator::CursorIterator;
use crate::Scalar;

/// Element-wise arithmetic applied at merged positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn apply<T: Scalar>(self, a: T, b: T) -> T {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
        }
    }

    pub fn is_commutative(self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Mul)
    }

    fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }
}

/// A combining function `f(a, b)`, optionally with its arguments swapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JoinFunction {
    pub op: BinaryOp,
    pub reversed: bool,
}

impl JoinFunction {
    pub const ADD: JoinFunction = JoinFunction::new(BinaryOp::Add);
    pub const SUB: JoinFunction = JoinFunction::new(BinaryOp::Sub);
    pub const MUL: JoinFunction = JoinFunction::new(BinaryOp::Mul);
    pub const DIV: JoinFunction = JoinFunction::new(BinaryOp::Div);

    pub const fn new(op: BinaryOp) -> Self {
        Self { op, reversed: false }
    }

    /// `g(a, b) = f(b, a)`
    pub fn reverse(self) -> Self {
        Self {
            op: self.op,
            reversed: !self.reversed,
        }
    }

    pub fn apply<T: Scalar>(self, a: T, b: T) -> T {
        if self.reversed {
            self.op.apply(b, a)
        } else {
            self.op.apply(a, b)
        }
    }

    /// How a union fills the side missing at a one-sided position
    ///
    /// Addition passes the present value through untouched. Everything else
    /// evaluates `f` against an explicit zero, which keeps a missing left
    /// operand of a subtraction negated.
    pub fn union_fill(self) -> FillMode {
        match self.op {
            BinaryOp::Add => FillMode::Passthrough,
            _ => FillMode::DefaultFilled,
        }
    }
}

impl fmt::Display for JoinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reversed {
            write!(f, "rev({})", self.op.symbol())
        } else {
            write!(f, "{}", self.op.symbol())
        }
    }
}

/// Value produced by a union at a position only one side holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// The present side's raw value
    Passthrough,
    /// `f(a, 0)` or `f(0, b)`
    DefaultFilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Union(FillMode),
    Intersect,
}

/// What a union must advance before it can emit its next position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeState {
    Start,
    AdvanceBoth,
    AdvanceLeftOnly,
    AdvanceRightOnly,
    BothExhausted,
}

/// A leaf cursor or a merge of two subtrees
pub enum JoinTree<'a, T> {
    Leaf {
        label: String,
        cursor: Box<dyn CursorIterator<T> + 'a>,
    },
    Join(Box<Join<'a, T>>),
}

/// Merge state for one union or intersection node
pub struct Join<'a, T> {
    kind: JoinKind,
    function: JoinFunction,
    left: JoinTree<'a, T>,
    right: JoinTree<'a, T>,
    state: MergeState,
    // Whether each child holds a current cell that has not been consumed yet.
    left_live: bool,
    right_live: bool,
    // Next intersection match, found ahead of time so `has_next` is exact.
    lookahead: Option<(usize, T)>,
    current: Option<(usize, T)>,
}

impl<'a, T: Scalar> JoinTree<'a, T> {
    pub fn leaf<C>(label: impl Into<String>, cursor: C) -> Self
    where
        C: CursorIterator<T> + 'a,
    {
        JoinTree::Leaf {
            label: label.into(),
            cursor: Box::new(cursor),
        }
    }

    /// Every position held by either side, in increasing order
    pub fn union(self, other: Self, function: JoinFunction, fill: FillMode) -> Self {
        JoinTree::Join(Box::new(Join {
            kind: JoinKind::Union(fill),
            function,
            left: self,
            right: other,
            state: MergeState::Start,
            left_live: false,
            right_live: false,
            lookahead: None,
            current: None,
        }))
    }

    /// Only positions held by both sides, in increasing order
    ///
    /// The first match is located eagerly, which may advance the children.
    pub fn intersect(self, other: Self, function: JoinFunction) -> Result<Self> {
        let mut join = Join {
            kind: JoinKind::Intersect,
            function,
            left: self,
            right: other,
            state: MergeState::Start,
            left_live: false,
            right_live: false,
            lookahead: None,
            current: None,
        };
        join.seek_match()?;
        Ok(JoinTree::Join(Box::new(join)))
    }

    /// Renders the tree shape, e.g. `((a ∪ b) ∩ c)`
    pub fn describe(&self) -> String {
        match self {
            JoinTree::Leaf { label, .. } => label.clone(),
            JoinTree::Join(join) => {
                let symbol = match join.kind {
                    JoinKind::Union(_) => '∪',
                    JoinKind::Intersect => '∩',
                };
                format!(
                    "({} {}{} {})",
                    join.left.describe(),
                    symbol,
                    join.function,
                    join.right.describe()
                )
            }
        }
    }

    /// Number of leaf cursors feeding this tree
    pub fn leaf_count(&self) -> usize {
        match self {
            JoinTree::Leaf { .. } => 1,
            JoinTree::Join(join) => join.left.leaf_count() + join.right.leaf_count(),
        }
    }

    pub fn as_join(&self) -> Option<&Join<'a, T>> {
        match self {
            JoinTree::Join(join) => Some(join),
            JoinTree::Leaf { .. } => None,
        }
    }
}

impl<'a, T: Scalar> Join<'a, T> {
    pub fn kind(&self) -> JoinKind {
        self.kind
    }

    pub fn function(&self) -> JoinFunction {
        self.function
    }

    pub fn state(&self) -> MergeState {
        self.state
    }

    pub fn children(&self) -> (&JoinTree<'a, T>, &JoinTree<'a, T>) {
        (&self.left, &self.right)
    }

    fn has_next(&self) -> bool {
        match self.kind {
            JoinKind::Intersect => self.lookahead.is_some(),
            JoinKind::Union(_) => match self.state {
                MergeState::Start | MergeState::AdvanceBoth => {
                    self.left.has_next() || self.right.has_next()
                }
                MergeState::AdvanceLeftOnly => self.left.has_next() || self.right_live,
                MergeState::AdvanceRightOnly => self.right.has_next() || self.left_live,
                MergeState::BothExhausted => false,
            },
        }
    }

    fn advance(&mut self) -> Result<()> {
        match self.kind {
            JoinKind::Union(fill) => self.advance_union(fill),
            JoinKind::Intersect => {
                let entry = self.lookahead.take().ok_or(Error::IteratorExhausted)?;
                self.current = Some(entry);
                self.seek_match()
            }
        }
    }

    fn advance_union(&mut self, fill: FillMode) -> Result<()> {
        match self.state {
            MergeState::BothExhausted => return Err(Error::IteratorExhausted),
            MergeState::Start | MergeState::AdvanceBoth => {
                self.left_live = step(&mut self.left)?;
                self.right_live = step(&mut self.right)?;
            }
            MergeState::AdvanceLeftOnly => self.left_live = step(&mut self.left)?,
            MergeState::AdvanceRightOnly => self.right_live = step(&mut self.right)?,
        }

        let zero = T::zero();
        let (position, value, next_state) = match (self.left_live, self.right_live) {
            (true, true) => {
                let (l, r) = (self.left.cursor(), self.right.cursor());
                if l < r {
                    let a = self.left.value();
                    (l, fill_left(fill, self.function, a, zero), MergeState::AdvanceLeftOnly)
                } else if l > r {
                    let b = self.right.value();
                    (r, fill_right(fill, self.function, b, zero), MergeState::AdvanceRightOnly)
                } else {
                    let value = self.function.apply(self.left.value(), self.right.value());
                    (l, value, MergeState::AdvanceBoth)
                }
            }
            (true, false) => {
                let a = self.left.value();
                (
                    self.left.cursor(),
                    fill_left(fill, self.function, a, zero),
                    MergeState::AdvanceLeftOnly,
                )
            }
            (false, true) => {
                let b = self.right.value();
                (
                    self.right.cursor(),
                    fill_right(fill, self.function, b, zero),
                    MergeState::AdvanceRightOnly,
                )
            }
            (false, false) => {
                self.state = MergeState::BothExhausted;
                return Err(Error::IteratorExhausted);
            }
        };

        // The emitted side's cell is consumed; the other side's stays pending.
        match next_state {
            MergeState::AdvanceLeftOnly => self.left_live = false,
            MergeState::AdvanceRightOnly => self.right_live = false,
            _ => {
                self.left_live = false;
                self.right_live = false;
            }
        }
        self.state = next_state;
        self.current = Some((position, value));
        Ok(())
    }

    // Moves both children to their next shared position, if there is one.
    fn seek_match(&mut self) -> Result<()> {
        if !(self.left.has_next() && self.right.has_next()) {
            self.state = MergeState::BothExhausted;
            return Ok(());
        }
        self.left.advance()?;
        self.right.advance()?;

        loop {
            let (l, r) = (self.left.cursor(), self.right.cursor());
            if l < r {
                if !self.left.has_next() {
                    break;
                }
                self.left.advance()?;
            } else if l > r {
                if !self.right.has_next() {
                    break;
                }
                self.right.advance()?;
            } else {
                let value = self.function.apply(self.left.value(), self.right.value());
                self.lookahead = Some((l, value));
                self.state = MergeState::AdvanceBoth;
                return Ok(());
            }
        }

        self.state = MergeState::BothExhausted;
        Ok(())
    }
}

fn step<T: Scalar>(side: &mut JoinTree<'_, T>) -> Result<bool> {
    if side.has_next() {
        side.advance()?;
        Ok(true)
    } else {
        Ok(false)
    }
}

fn fill_left<T: Scalar>(fill: FillMode, function: JoinFunction, a: T, zero: T) -> T {
    match fill {
        FillMode::Passthrough => a,
        FillMode::DefaultFilled => function.apply(a, zero),
    }
}

fn fill_right<T: Scalar>(fill: FillMode, function: JoinFunction, b: T, zero: T) -> T {
    match fill {
        FillMode::Passthrough => b,
        FillMode::DefaultFilled => function.apply(zero, b),
    }
}

impl<'a, T: Scalar> CursorIterator<T> for JoinTree<'a, T> {
    fn has_next(&self) -> bool {
        match self {
            JoinTree::Leaf { cursor, .. } => cursor.has_next(),
            JoinTree::Join(join) => join.has_next(),
        }
    }

    fn advance(&mut self) -> Result<()> {
        match self {
            JoinTree::Leaf { cursor, .. } => cursor.advance(),
            JoinTree::Join(join) => join.advance(),
        }
    }

    fn cursor(&self) -> usize {
        match self {
            JoinTree::Leaf { cursor, .. } => cursor.cursor(),
            JoinTree::Join(join) => match join.current {
                Some((position, _)) => position,
                None => panic!("cursor() read before the first advance()"),
            },
        }
    }

    fn value(&self) -> T {
        match self {
            JoinTree::Leaf { cursor, .. } => cursor.value(),
            JoinTree::Join(join) => match join.current {
                Some((_, value)) => value,
                None => panic!("value() read before the first advance()"),
            },
        }
    }
}

impl<T> fmt::Debug for JoinTree<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinTree::Leaf { label, .. } => write!(f, "Leaf({label})"),
            JoinTree::Join(join) => f
                .debug_struct("Join")
                .field("kind", &join.kind)
                .field("function", &join.function)
                .field("state", &join.state)
                .field("left", &join.left)
                .field("right", &join.right)
                .finish(),
        }
    }
}

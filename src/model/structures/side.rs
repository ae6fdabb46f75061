use serde::Serialize;

/// One of the two participants of a bout.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    First,
    Second
}

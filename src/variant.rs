use anyhow::bail;
use std::fmt;
use std::str::FromStr;

/// Layout of the ordered record sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    /// Growable contiguous array (`Vec`).
    Contiguous,
    /// Doubly linked list (`LinkedList`).
    Linked,
}

/// Layout of the email index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexKind {
    Hash,
    /// Ordered by key (`BTreeMap`).
    Sorted,
}

/// Storage strategy under benchmark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Variant {
    #[value(name = "array-hash")]
    ArrayHash,
    #[value(name = "linked-hash")]
    LinkedHash,
    #[value(name = "array-tree")]
    ArraySorted,
}

impl Variant {
    /// Every variant, in matrix order.
    pub const ALL: [Variant; 3] = [Variant::ArrayHash, Variant::LinkedHash, Variant::ArraySorted];

    /// Label written to the results table.
    pub const fn name(self) -> &'static str {
        match self {
            Variant::ArrayHash => "ArrayList+HashMap",
            Variant::LinkedHash => "LinkedList+HashMap",
            Variant::ArraySorted => "ArrayList+TreeMap",
        }
    }

    pub const fn sequence_kind(self) -> SequenceKind {
        match self {
            Variant::ArrayHash | Variant::ArraySorted => SequenceKind::Contiguous,
            Variant::LinkedHash => SequenceKind::Linked,
        }
    }

    pub const fn index_kind(self) -> IndexKind {
        match self {
            Variant::ArrayHash | Variant::LinkedHash => IndexKind::Hash,
            Variant::ArraySorted => IndexKind::Sorted,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for v in Variant::ALL {
            if v.name() == s {
                return Ok(v);
            }
        }
        match s {
            "array-hash" => Ok(Variant::ArrayHash),
            "linked-hash" => Ok(Variant::LinkedHash),
            "array-tree" => Ok(Variant::ArraySorted),
            _ => bail!("unknown variant {s:?}"),
        }
    }
}

//! types.rs
//! Relation records: typed associations between a data file (or one data
//! set inside it) and external information.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A typed association supplied by the external relation-file parser. The
/// serde shape doubles as the descriptor record at the ingestion boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Relation {
    /// "This data uses the gating definitions at `location`", optionally
    /// narrowed to one gate id inside that file.
    Gating {
        location: PathBuf,
        #[serde(default)]
        gate_id: Option<String>,
    },
    /// A compensation matrix inside the named file.
    Compensation { location: PathBuf, matrix_id: String },
    /// A transformation set.
    Transformation { location: PathBuf },
    /// An unrecognized relation, carried through untouched.
    Unknown { kind: String, payload: String },
}

impl Relation {
    pub fn kind(&self) -> RelationKind {
        match self {
            Relation::Gating { .. } => RelationKind::Gating,
            Relation::Compensation { .. } => RelationKind::Compensation,
            Relation::Transformation { .. } => RelationKind::Transformation,
            Relation::Unknown { kind, .. } => RelationKind::Unknown(kind.clone()),
        }
    }

    /// Whether several relations of this type may coexist at one scope.
    /// Only unknown relations may: the typed ones are single-valued per
    /// file or data set.
    pub fn allows_duplicates(&self) -> bool {
        matches!(self, Relation::Unknown { .. })
    }
}

/// Discriminant used for same-type comparison in duplicate checks and the
/// override merge. Unknown relations compare by their kind string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Gating,
    Compensation,
    Transformation,
    Unknown(String),
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::Gating => f.write_str("gating"),
            RelationKind::Compensation => f.write_str("compensation"),
            RelationKind::Transformation => f.write_str("transformation"),
            RelationKind::Unknown(kind) => write!(f, "unknown({kind})"),
        }
    }
}

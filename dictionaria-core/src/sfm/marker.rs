use std::{fmt, str::FromStr};

use super::RecordError;

/// Field markers recognised on an example record.
///
/// The variant order matches the canonical serialisation order, which is
/// also exposed as [`Marker::ALL`].
///
/// # Examples
/// ```
/// use dictionaria_core::sfm::Marker;
///
/// let marker: Marker = "gl".parse().expect("known marker");
/// assert_eq!(marker, Marker::Gl);
/// assert!(marker.is_alignment());
/// assert!("xyz".parse::<Marker>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Marker {
    /// `\ref`: reference identifier of the example.
    Ref,
    /// `\lemma`: headwords illustrated by the example (accumulating).
    Lemma,
    /// `\rf`: reference into the source corpus.
    Rf,
    /// `\tx`: vernacular text.
    Tx,
    /// `\mb`: morpheme breaks (alignment line).
    Mb,
    /// `\gl`: interlinear glosses (alignment line).
    Gl,
    /// `\ft`: free translation.
    Ft,
    /// `\ot`: text in an orthography other than the main one.
    Ot,
    /// `\ota`: translation into an additional meta language.
    Ota,
    /// `\sf`: sound file reference.
    Sf,
}

impl Marker {
    /// Every marker in canonical serialisation order.
    pub const ALL: [Self; 10] = [
        Self::Ref,
        Self::Lemma,
        Self::Rf,
        Self::Tx,
        Self::Mb,
        Self::Gl,
        Self::Ft,
        Self::Ot,
        Self::Ota,
        Self::Sf,
    ];

    /// The marker code as written after the backslash sigil.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ref => "ref",
            Self::Lemma => "lemma",
            Self::Rf => "rf",
            Self::Tx => "tx",
            Self::Mb => "mb",
            Self::Gl => "gl",
            Self::Ft => "ft",
            Self::Ot => "ot",
            Self::Ota => "ota",
            Self::Sf => "sf",
        }
    }

    /// Alignment lines hold whitespace separated tokens that line up
    /// between morphemes and glosses.
    #[must_use]
    pub const fn is_alignment(self) -> bool {
        matches!(self, Self::Mb | Self::Gl)
    }

    /// Accumulating markers join repeated values instead of replacing them.
    #[must_use]
    pub const fn is_accumulating(self) -> bool {
        matches!(self, Self::Lemma)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\{}", self.code())
    }
}

impl FromStr for Marker {
    type Err = RecordError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let trimmed = code.trim().trim_start_matches('\\');
        Self::ALL
            .into_iter()
            .find(|marker| marker.code() == trimmed)
            .ok_or_else(|| RecordError::UnknownMarker {
                marker: trimmed.to_owned(),
            })
    }
}

//! tcr_types
// Copyright (c) 2021 10x Genomics, Inc. All rights reserved.

use serde::{Deserialize, Serialize};
use std::fmt;

// From https://danielkeep.github.io/tlborm/book/blk-counting.html
macro_rules! replace_expr {
    ($_t:tt $sub:expr) => {
        $sub
    };
}

macro_rules! count_tts {
    ($($tts:tt)*) => {0usize $(+ replace_expr!($tts 1usize))*};
}

macro_rules! make_enum {
    (
        name: $name:ident,
        variants:[$( ($field:ident, $lit: literal) ,)*],
        const_var_name: $const_var_name:ident,
    ) => {
        pub const $const_var_name: [&str; count_tts!($($field)*)] = [
            $($lit,)*
        ];

        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
            Hash,
        )]
        pub enum $name {
            $(
                #[serde(rename = $lit)]
                $field,
            )*
        }

        impl $name {
            pub fn all() -> [Self; count_tts!($($field)*)] {
                [
                    $($name::$field,)*
                ]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", match self {
                    $(
                        $name::$field => $lit,
                    )*
                })
            }
        }

        impl From<$name> for &'static str {
            fn from(src: $name) -> &'static str {
                match src {
                    $(
                        $name::$field => $lit,
                    )*
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(
                        $lit => Ok($name::$field),
                    )*
                    unknown => Err(
                        format!("Unknown variant '{}' for {}. Supported variants are: [{}]", unknown, stringify!($name), $const_var_name.join(", "))
                    )
                }
            }
        }
    };
}

make_enum! {
    name: TcrLocus,
    variants: [
        (TRA, "TRA"),
        (TRB, "TRB"),
        (TRG, "TRG"),
        (TRD, "TRD"),
    ],
    const_var_name: TCR_LOCI,
}

impl TcrLocus {
    /// Parse any of the accepted spellings of a chain, case-insensitive:
    /// `a`, `alpha`, `tra`, `tcra` (and likewise for b/g/d).
    pub fn from_chain_name(name: &str) -> Option<TcrLocus> {
        match name.to_ascii_uppercase().as_str() {
            "A" | "ALPHA" | "TRA" | "TCRA" => Some(TcrLocus::TRA),
            "B" | "BETA" | "TRB" | "TCRB" => Some(TcrLocus::TRB),
            "G" | "GAMMA" | "TRG" | "TCRG" => Some(TcrLocus::TRG),
            "D" | "DELTA" | "TRD" | "TCRD" => Some(TcrLocus::TRD),
            _ => None,
        }
    }

    /// Greek-letter name as it appears in sample file names, e.g. "alpha".
    pub fn long_name(self) -> &'static str {
        match self {
            TcrLocus::TRA => "alpha",
            TcrLocus::TRB => "beta",
            TcrLocus::TRG => "gamma",
            TcrLocus::TRD => "delta",
        }
    }

    /// Single letter used in reference file names, e.g. the `A` of `TRAV`.
    pub fn letter(self) -> char {
        match self {
            TcrLocus::TRA => 'A',
            TcrLocus::TRB => 'B',
            TcrLocus::TRG => 'G',
            TcrLocus::TRD => 'D',
        }
    }

    /// Loci whose long name appears in `file_name`, in `TCR_LOCI` order.
    pub fn detect_in_file_name(file_name: &str) -> Vec<TcrLocus> {
        let lower = file_name.to_ascii_lowercase();
        TcrLocus::all()
            .into_iter()
            .filter(|locus| lower.contains(locus.long_name()))
            .collect()
    }
}

make_enum! {
    name: Segment,
    variants: [
        (V, "V"),
        (J, "J"),
    ],
    const_var_name: SEGMENTS,
}

/// Strand a read was searched on. Reverse means the reverse complement of the
/// sequenced read.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReadFrame {
    Forward,
    Reverse,
}

impl fmt::Display for ReadFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadFrame::Forward => write!(f, "forward"),
            ReadFrame::Reverse => write!(f, "reverse"),
        }
    }
}

make_enum! {
    name: Orientation,
    variants: [
        (Forward, "forward"),
        (Reverse, "reverse"),
        (Either, "either"),
        (Both, "both"),
    ],
    const_var_name: ORIENTATIONS,
}

impl Orientation {
    /// Frames to search, in the order they are tried.
    pub fn frames(self) -> &'static [ReadFrame] {
        match self {
            Orientation::Forward => &[ReadFrame::Forward],
            Orientation::Reverse => &[ReadFrame::Reverse],
            Orientation::Either | Orientation::Both => &[ReadFrame::Reverse, ReadFrame::Forward],
        }
    }

    /// Stop after the first frame that yields a record.
    pub fn first_hit_only(self) -> bool {
        self == Orientation::Either
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Reverse
    }
}

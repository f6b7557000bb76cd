// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering variants a test case can execute against.

use crate::errors::UnknownVariantError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Which of the two supported rendering surfaces a result belongs to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariantKind {
    /// The globe-like (3D) surface.
    Globe,
    /// The map-like (flat) surface.
    Map,
}

impl VariantKind {
    /// Returns the string representations of all known variants.
    pub fn variants() -> &'static [&'static str] {
        &["Globe", "Map"]
    }

    /// The name used in result keys and status labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Globe => "Globe",
            Self::Map => "Map",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariantKind {
    type Err = UnknownVariantError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "Globe" | "globe" => Ok(Self::Globe),
            "Map" | "map" => Ok(Self::Map),
            _ => Err(UnknownVariantError::new(input)),
        }
    }
}

bitflags::bitflags! {
    /// The set of variants a test case is configured to execute.
    ///
    /// Assembled at configure time from the run toggles (or passed in
    /// directly), then handed to the case before it starts.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct VariantSet: u8 {
        /// Execute the globe variant.
        const GLOBE = 1 << 0;
        /// Execute the map variant.
        const MAP = 1 << 1;
    }
}

impl VariantSet {
    /// Returns the individual kinds in this set, in key order.
    pub fn kinds(self) -> impl Iterator<Item = VariantKind> {
        [VariantKind::Globe, VariantKind::Map]
            .into_iter()
            .filter(move |kind| self.contains(VariantSet::from(*kind)))
    }

    /// Returns true if the given kind is in this set.
    pub fn contains_kind(self, kind: VariantKind) -> bool {
        self.contains(VariantSet::from(kind))
    }
}

impl From<VariantKind> for VariantSet {
    fn from(kind: VariantKind) -> Self {
        match kind {
            VariantKind::Globe => VariantSet::GLOBE,
            VariantKind::Map => VariantSet::MAP,
        }
    }
}

impl fmt::Display for VariantSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for kind in self.kinds() {
            if !first {
                write!(f, " + ")?;
            }
            write!(f, "{kind}")?;
            first = false;
        }
        if first {
            write!(f, "(none)")?;
        }
        Ok(())
    }
}

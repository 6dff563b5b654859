//! Enumeration types for the Microworld simulation.
//!
//! Grid cells track the three [`ResourceKind`]s. Agent inventories hold
//! [`Item`]s, which are the raw resources plus anything produced by a
//! [`Recipe`].

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Resources tracked on the grid
// ---------------------------------------------------------------------------

/// A raw resource tracked per grid cell.
///
/// The declaration order is the forage tie-break priority: when two kinds at
/// a cell hold the same quantity, the earlier kind is taken first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Lumber.
    Wood,
    /// Knappable stone.
    Flint,
    /// Anything edible.
    Food,
}

impl ResourceKind {
    /// Every tracked kind, in forage priority order.
    pub const ALL: [Self; 3] = [Self::Wood, Self::Flint, Self::Food];

    /// Lowercase name used in metrics keys and signals.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wood => "wood",
            Self::Flint => "flint",
            Self::Food => "food",
        }
    }

    /// The inventory item a unit of this resource becomes when foraged.
    pub const fn item(self) -> Item {
        match self {
            Self::Wood => Item::Wood,
            Self::Flint => Item::Flint,
            Self::Food => Item::Food,
        }
    }
}

impl core::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Inventory items
// ---------------------------------------------------------------------------

/// Something an agent can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Item {
    /// Lumber.
    Wood,
    /// Knappable stone.
    Flint,
    /// Anything edible.
    Food,
    /// A crafted hunting spear.
    Spear,
}

impl Item {
    /// Lowercase name used in metrics keys and prompts.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wood => "wood",
            Self::Flint => "flint",
            Self::Food => "food",
            Self::Spear => "spear",
        }
    }
}

impl core::fmt::Display for Item {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Crafting recipes
// ---------------------------------------------------------------------------

/// A crafting recipe: a fixed bag of inputs consumed to produce one output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recipe {
    /// One wood and one flint make one spear.
    Spear,
}

impl Recipe {
    /// Items consumed by one craft, with their quantities.
    pub const fn inputs(self) -> &'static [(Item, u32)] {
        match self {
            Self::Spear => &[(Item::Wood, 1), (Item::Flint, 1)],
        }
    }

    /// The item produced by one craft.
    pub const fn output(self) -> Item {
        match self {
            Self::Spear => Item::Spear,
        }
    }

    /// Lowercase recipe name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spear => "spear",
        }
    }
}

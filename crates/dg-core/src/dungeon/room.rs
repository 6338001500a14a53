//! Room catalog: exit directions and the sixteen room variants

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Cardinal side of a cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[repr(u8)]
pub enum Direction {
    #[strum(serialize = "N")]
    North = 0,
    #[strum(serialize = "E")]
    East = 1,
    #[strum(serialize = "S")]
    South = 2,
    #[strum(serialize = "W")]
    West = 3,
}

impl Direction {
    /// All directions in exploration order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The side facing back from the neighbor
    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// (row, column) delta of the neighbor on this side
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }

    /// Single-exit flag for this side
    pub const fn exit(self) -> Exits {
        match self {
            Direction::North => Exits::NORTH,
            Direction::East => Exits::EAST,
            Direction::South => Exits::SOUTH,
            Direction::West => Exits::WEST,
        }
    }
}

bitflags! {
    /// Set of open sides of a room
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Exits: u8 {
        const NORTH = 0x01;
        const EAST = 0x02;
        const SOUTH = 0x04;
        const WEST = 0x08;
    }
}

impl Exits {
    /// Iterate the open sides in N, E, S, W order
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |dir| self.contains(dir.exit()))
    }

    pub fn has(self, dir: Direction) -> bool {
        self.contains(dir.exit())
    }
}

impl From<Direction> for Exits {
    fn from(dir: Direction) -> Self {
        dir.exit()
    }
}

impl Serialize for Exits {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Exits {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Exits::from_bits(bits)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid exit bits {bits:#x}")))
    }
}

/// Room variant assigned to a grid cell
///
/// `Empty` is the unassigned sentinel; the other fifteen are every
/// non-empty combination of exits. The display name lists the exits in
/// N, E, S, W order and is stable (it is the on-disk format).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[repr(u8)]
pub enum RoomVariant {
    #[default]
    #[strum(serialize = "CLR")]
    Empty = 0,
    #[strum(serialize = "NESW")]
    Nesw = 1,
    #[strum(serialize = "NES")]
    Nes = 2,
    #[strum(serialize = "NEW")]
    New = 3,
    #[strum(serialize = "NSW")]
    Nsw = 4,
    #[strum(serialize = "ESW")]
    Esw = 5,
    #[strum(serialize = "NE")]
    Ne = 6,
    #[strum(serialize = "NS")]
    Ns = 7,
    #[strum(serialize = "NW")]
    Nw = 8,
    #[strum(serialize = "ES")]
    Es = 9,
    #[strum(serialize = "EW")]
    Ew = 10,
    #[strum(serialize = "SW")]
    Sw = 11,
    #[strum(serialize = "N")]
    N = 12,
    #[strum(serialize = "E")]
    E = 13,
    #[strum(serialize = "S")]
    S = 14,
    #[strum(serialize = "W")]
    W = 15,
}

/// The fifteen populated variants, in sampling order
pub const NONEMPTY_VARIANTS: [RoomVariant; 15] = [
    RoomVariant::Nesw,
    RoomVariant::Nes,
    RoomVariant::New,
    RoomVariant::Nsw,
    RoomVariant::Esw,
    RoomVariant::Ne,
    RoomVariant::Ns,
    RoomVariant::Nw,
    RoomVariant::Es,
    RoomVariant::Ew,
    RoomVariant::Sw,
    RoomVariant::N,
    RoomVariant::E,
    RoomVariant::S,
    RoomVariant::W,
];

impl RoomVariant {
    /// Width of the longest name, used to pad text tables
    pub const NAME_WIDTH: usize = 4;

    /// The populated variants in a stable order
    pub fn all_nonempty() -> &'static [RoomVariant] {
        &NONEMPTY_VARIANTS
    }

    /// Exits this room exposes
    pub const fn exits(self) -> Exits {
        const N: u8 = Exits::NORTH.bits();
        const E: u8 = Exits::EAST.bits();
        const S: u8 = Exits::SOUTH.bits();
        const W: u8 = Exits::WEST.bits();
        let bits = match self {
            RoomVariant::Empty => 0,
            RoomVariant::Nesw => N | E | S | W,
            RoomVariant::Nes => N | E | S,
            RoomVariant::New => N | E | W,
            RoomVariant::Nsw => N | S | W,
            RoomVariant::Esw => E | S | W,
            RoomVariant::Ne => N | E,
            RoomVariant::Ns => N | S,
            RoomVariant::Nw => N | W,
            RoomVariant::Es => E | S,
            RoomVariant::Ew => E | W,
            RoomVariant::Sw => S | W,
            RoomVariant::N => N,
            RoomVariant::E => E,
            RoomVariant::S => S,
            RoomVariant::W => W,
        };
        Exits::from_bits_truncate(bits)
    }

    /// Check whether the room opens on `dir`
    pub const fn contains_exit(self, dir: Direction) -> bool {
        self.exits().bits() & dir.exit().bits() != 0
    }

    /// Variant with exactly these exits (`Empty` for no exits)
    pub fn from_exits(exits: Exits) -> Self {
        NONEMPTY_VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.exits() == exits)
            .unwrap_or(RoomVariant::Empty)
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, RoomVariant::Empty)
    }

    /// Stable symbolic name (`"CLR"` for `Empty`)
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl Serialize for RoomVariant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for RoomVariant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse()
            .map_err(|_| serde::de::Error::custom(format!("unknown room variant {name:?}")))
    }
}

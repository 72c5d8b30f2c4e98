//! Mounts and their rotational slots

/// Discrete slots on each mount
pub const SLOTS_PER_MOUNT: u8 = 4;

/// Mounts on the carousel
pub const MOUNT_COUNT: usize = 3;

/// One of the three rotary carriers, in motor order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mount {
    /// Upper garment (`superior`), motor 0
    Upper,
    /// Lower garment (`inferior`), motor 1
    Lower,
    /// Footwear (`calçado`), motor 2
    Footwear,
}

impl Mount {
    /// All mounts in processing order
    pub const ALL: [Mount; MOUNT_COUNT] = [Mount::Upper, Mount::Lower, Mount::Footwear];

    /// Motor index
    pub const fn index(self) -> usize {
        match self {
            Mount::Upper => 0,
            Mount::Lower => 1,
            Mount::Footwear => 2,
        }
    }

    /// Role key used in the remote documents
    pub const fn key(self) -> &'static str {
        match self {
            Mount::Upper => "superior",
            Mount::Lower => "inferior",
            Mount::Footwear => "calçado",
        }
    }

    /// Parse a role key
    ///
    /// The footwear role is written both with and without the cedilla;
    /// both map to [`Mount::Footwear`].
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "superior" => Some(Mount::Upper),
            "inferior" => Some(Mount::Lower),
            "calçado" | "calcado" => Some(Mount::Footwear),
            _ => None,
        }
    }
}

/// Rotational position of a mount, always within `1..=4`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Slot(u8);

impl Slot {
    /// Slot every mount assumes at boot
    pub const HOME: Slot = Slot(1);

    /// Create a slot, `None` outside `1..=4`
    pub const fn new(n: u8) -> Option<Self> {
        if n >= 1 && n <= SLOTS_PER_MOUNT {
            Some(Slot(n))
        } else {
            None
        }
    }

    /// Slot number in `1..=4`
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Slot after one full revolution
    pub const fn next(self) -> Self {
        Slot(self.0 % SLOTS_PER_MOUNT + 1)
    }

    /// Slot after `revolutions` full revolutions
    pub const fn advanced_by(self, revolutions: u32) -> Self {
        let slots = SLOTS_PER_MOUNT as u32;
        let zero_based = (self.0 as u32 - 1 + revolutions % slots) % slots;
        Slot(zero_based as u8 + 1)
    }

    /// Every slot, in rotation order
    pub fn all() -> impl Iterator<Item = Slot> {
        (1..=SLOTS_PER_MOUNT).map(Slot)
    }
}

impl Default for Slot {
    fn default() -> Self {
        Slot::HOME
    }
}

//! Look resolution
//!
//! A look names up to one garment per mount; each garment maps to the slot
//! it hangs in. Resolving a look takes one read for the look document and
//! one read per named garment:
//!
//! ```text
//! /posicoesRoupas/look2      -> { "superior": "shirtA", "calçado": "shoeB" }
//! /mapaPecas/shirtA/posicao  -> 3
//! /mapaPecas/shoeB/posicao   -> "1"
//! ```
//!
//! Anything missing below the look document only skips the affected mount.

use serde::Deserialize;

use crate::motion::{Mount, Slot, MOUNT_COUNT};
use crate::remote::{self, paths, MAX_DOCUMENT_LEN};
use crate::state::LookIndex;
use crate::traits::RemoteStore;

/// Why a mount is left where it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SkipReason {
    /// The look names no garment for this mount
    RoleMissing,
    /// The garment id cannot be used as a path segment
    InvalidGarmentId,
    /// No position stored for the garment
    GarmentNotFound,
    /// The stored position is not a slot number
    InvalidPosition,
}

/// Resolution result for one mount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MountTarget {
    Present(Slot),
    Absent(SkipReason),
}

/// Per-mount targets of a look, indexed by [`Mount::index`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResolvedLook {
    pub targets: [MountTarget; MOUNT_COUNT],
}

impl ResolvedLook {
    pub fn target(&self, mount: Mount) -> MountTarget {
        self.targets[mount.index()]
    }
}

/// Resolution failures that abort the whole look
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResolveError {
    /// Look document absent, unreadable or not an object of garment ids
    LookNotFound,
}

/// Garment ids per role, borrowed from the look document
///
/// Ids are taken verbatim: JSON escape sequences are not decoded, so escaped
/// ids are not supported.
#[derive(Deserialize, Default)]
struct LookDoc<'a> {
    #[serde(borrow, default)]
    superior: Option<&'a str>,
    #[serde(borrow, default)]
    inferior: Option<&'a str>,
    #[serde(borrow, default, rename = "calçado")]
    footwear: Option<&'a str>,
    #[serde(borrow, default)]
    calcado: Option<&'a str>,
}

impl<'a> LookDoc<'a> {
    fn garment(&self, mount: Mount) -> Option<&'a str> {
        let id = match mount {
            Mount::Upper => self.superior,
            Mount::Lower => self.inferior,
            Mount::Footwear => self.footwear.or(self.calcado),
        };
        id.filter(|id| !id.is_empty())
    }
}

/// Resolve `look` to a target slot per mount
pub async fn resolve_look<S: RemoteStore>(store: &mut S, look: LookIndex) -> Result<ResolvedLook, ResolveError> {
    let mut look_buf = [0u8; MAX_DOCUMENT_LEN];
    let body = remote::fetch(store, &paths::look(look), &mut look_buf)
        .await
        .ok_or(ResolveError::LookNotFound)?;
    let (doc, _) = serde_json_core::from_slice::<LookDoc>(body).map_err(|_| ResolveError::LookNotFound)?;

    let mut targets = [MountTarget::Absent(SkipReason::RoleMissing); MOUNT_COUNT];
    for mount in Mount::ALL {
        if let Some(garment) = doc.garment(mount) {
            targets[mount.index()] = resolve_garment(store, garment).await;
        }
    }
    Ok(ResolvedLook { targets })
}

async fn resolve_garment<S: RemoteStore>(store: &mut S, garment: &str) -> MountTarget {
    let Some(path) = paths::garment_position(garment) else {
        return MountTarget::Absent(SkipReason::InvalidGarmentId);
    };
    let mut buf = [0u8; 32];
    let Some(body) = remote::fetch(store, &path, &mut buf).await else {
        return MountTarget::Absent(SkipReason::GarmentNotFound);
    };
    match decode_position(body) {
        Some(slot) => MountTarget::Present(slot),
        None => MountTarget::Absent(SkipReason::InvalidPosition),
    }
}

/// Decode a stored position: a bare integer or an integer in a string
pub fn decode_position(body: &[u8]) -> Option<Slot> {
    let n = match serde_json_core::from_slice::<u8>(body) {
        Ok((n, _)) => n,
        Err(_) => {
            let (s, _) = serde_json_core::from_slice::<&str>(body).ok()?;
            s.trim().parse::<u8>().ok()?
        }
    };
    Slot::new(n)
}
